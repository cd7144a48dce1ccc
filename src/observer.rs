//! Progress callbacks for long resolves.

use std::fmt;

/// Resolver stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Canonical text for every record.
    Canonicalize,
    /// Extractor calls and classification.
    Extract,
    /// Alias merge over the complete label index.
    Merge,
    /// Substring fallback for unlabelled records.
    Fallback,
    /// Automatic and operator disambiguation.
    Disambiguate,
    /// Fallback again with operator-approved names.
    SecondFallback,
}

impl Phase {
    /// Short lowercase name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Canonicalize => "canonicalize",
            Self::Extract => "extract",
            Self::Merge => "merge",
            Self::Fallback => "fallback",
            Self::Disambiguate => "disambiguate",
            Self::SecondFallback => "second-fallback",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives progress while a resolve runs. Every method defaults to a no-op.
pub trait ResolveObserver: Sync {
    /// A stage is starting.
    fn on_phase(&self, _phase: Phase) {}

    /// `done` of `total` records have been through extraction.
    fn on_record(&self, _done: usize, _total: usize) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ResolveObserver for NoopObserver {}
