//! Scripted extractor for tests.

use super::Extractor;
use crate::sync::{lock, Mutex};
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Deterministic extractor answering from a script.
///
/// Texts with no scripted answer get the default response (empty unless set).
///
/// ```rust
/// use orgtract::{Extractor, StubExtractor};
///
/// let stub = StubExtractor::new()
///     .with_response("ACME LTD", ["ACME LTD"])
///     .with_failure("BROKEN", "model crashed");
///
/// assert_eq!(stub.extract("ACME LTD").unwrap(), vec!["ACME LTD"]);
/// assert!(stub.extract("BROKEN").is_err());
/// assert!(stub.extract("OTHER CO").unwrap().is_empty());
/// assert_eq!(stub.calls(), 3);
/// ```
#[derive(Debug, Default)]
pub struct StubExtractor {
    responses: HashMap<String, std::result::Result<Vec<String>, String>>,
    default: Vec<String>,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl StubExtractor {
    /// Stub that answers nothing for every text.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `names` for exactly `text`.
    #[must_use]
    pub fn with_response<I, S>(mut self, text: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.responses
            .insert(text.into(), Ok(names.into_iter().map(Into::into).collect()));
        self
    }

    /// Fail with `message` for exactly `text`.
    #[must_use]
    pub fn with_failure(mut self, text: impl Into<String>, message: impl Into<String>) -> Self {
        self.responses.insert(text.into(), Err(message.into()));
        self
    }

    /// Answer `names` for every unscripted text.
    #[must_use]
    pub fn with_default<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default = names.into_iter().map(Into::into).collect();
        self
    }

    /// Number of `extract` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Texts passed to `extract`, in call order.
    #[must_use]
    pub fn seen(&self) -> Vec<String> {
        lock(&self.seen).clone()
    }
}

impl Extractor for StubExtractor {
    fn extract(&self, text: &str) -> Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.seen).push(text.to_string());
        match self.responses.get(text) {
            Some(Ok(names)) => Ok(names.clone()),
            Some(Err(message)) => Err(Error::extractor(message.clone())),
            None => Ok(self.default.clone()),
        }
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls_in_order() {
        let stub = StubExtractor::new();
        stub.extract("B").unwrap();
        stub.extract("A").unwrap();
        assert_eq!(stub.seen(), vec!["B", "A"]);
        assert_eq!(stub.calls(), 2);
    }

    #[test]
    fn scripted_answer_beats_default() {
        let stub = StubExtractor::new()
            .with_default(["FALLBACK"])
            .with_response("X", Vec::<String>::new());
        assert!(stub.extract("X").unwrap().is_empty());
        assert_eq!(stub.extract("Y").unwrap(), vec!["FALLBACK"]);
    }

    #[test]
    fn failure_is_extractor_error() {
        let stub = StubExtractor::new().with_failure("X", "timeout");
        assert!(matches!(stub.extract("X"), Err(Error::Extractor(_))));
    }
}
