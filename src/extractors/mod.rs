//! Candidate-name extractors.
//!
//! The resolver treats named-entity extraction as a black box: canonical text
//! in, an ordered list of candidate organization names out. Anything that can
//! answer that question implements [`Extractor`].
//!
//! | Extractor | Source of names | Typical use |
//! |-----------|-----------------|-------------|
//! | [`SuffixExtractor`] | spans ending in a legal-entity abbreviation | default, no model |
//! | [`LexiconExtractor`] | a newline-delimited list of known names | closed vendor lists |
//! | [`CommandExtractor`] | an external NER process over stdin/stdout | spaCy or similar |
//! | [`StubExtractor`] | scripted answers | tests |
//!
//! Implementations must be deterministic for identical input; the sort-adjacency
//! cache reuses answers on that assumption.

mod command;
mod lexicon;
mod stub;
mod suffix;

pub use command::CommandExtractor;
pub use lexicon::LexiconExtractor;
pub use stub::StubExtractor;
pub use suffix::SuffixExtractor;

use crate::Result;

/// Source of candidate organization names for one canonical string.
///
/// Unlike a closed backend family this trait is open: external NER servers
/// plug in by implementing it.
pub trait Extractor: Send + Sync {
    /// Candidate names found in `text`, in text order. May be empty.
    ///
    /// An `Err` is not fatal to a batch; the resolver logs it and treats the
    /// record as having no candidates.
    fn extract(&self, text: &str) -> Result<Vec<String>>;

    /// Short identifier used in logs.
    fn name(&self) -> &'static str {
        "unknown"
    }
}

impl<T: Extractor + ?Sized> Extractor for Box<T> {
    fn extract(&self, text: &str) -> Result<Vec<String>> {
        (**self).extract(text)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Whether the byte range `start..end` of `text` is bounded by whitespace or
/// the string edges on both sides.
pub(crate) fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    before.map_or(true, char::is_whitespace) && after.map_or(true, char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_bounds() {
        let t = "PAID ACME LTD";
        assert!(is_word_bounded(t, 5, 9));
        assert!(is_word_bounded(t, 0, 4));
        assert!(!is_word_bounded("ACMECORP", 0, 4));
    }

    #[test]
    fn boxed_extractor_delegates() {
        let boxed: Box<dyn Extractor> = Box::new(StubExtractor::new().with_default(["X"]));
        assert_eq!(boxed.extract("anything").unwrap(), vec!["X".to_string()]);
        assert_eq!(boxed.name(), "stub");
    }
}
