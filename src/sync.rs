//! Mutex selection behind the `fast-lock` feature.
//!
//! Extractors that keep interior state (the subprocess session, the scripted
//! stub's call log) lock through [`lock`], so they compile the same way on
//! both mutex implementations.

#[cfg(feature = "fast-lock")]
use parking_lot::Mutex as ParkingLotMutex;

#[cfg(not(feature = "fast-lock"))]
use std::sync::Mutex as StdMutex;

/// `parking_lot::Mutex` with `fast-lock`, `std::sync::Mutex` otherwise.
///
/// ```rust
/// use orgtract::sync::{lock, Mutex};
///
/// let seen = Mutex::new(Vec::<String>::new());
/// lock(&seen).push("ACME LTD".to_string());
/// assert_eq!(lock(&seen).len(), 1);
/// ```
#[cfg(feature = "fast-lock")]
pub type Mutex<T> = ParkingLotMutex<T>;

/// `std::sync::Mutex` (build with `fast-lock` for `parking_lot`).
#[cfg(not(feature = "fast-lock"))]
pub type Mutex<T> = StdMutex<T>;

/// Acquire the guard. A poisoned std mutex is recovered rather than panicking.
#[cfg(feature = "fast-lock")]
pub fn lock<T>(mutex: &Mutex<T>) -> parking_lot::MutexGuard<'_, T> {
    mutex.lock()
}

/// Acquire the guard, recovering from poisoning.
#[cfg(not(feature = "fast-lock"))]
pub fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
