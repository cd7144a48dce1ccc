//! Records flowing through the resolver.
//!
//! A [`Record`] starts `Unseen`, is classified exactly once by extraction (or
//! by the adjacency cache), and may be relabelled at most once more by the
//! alias merge or by a fallback/disambiguation pass:
//!
//! ```text
//! Unseen ──► Cached ─────────┐
//!        ├─► SingleMatch ──► Merged
//!        ├─► NoMatch ──────► FallbackAssigned
//!        └─► MultiMatch ───► FallbackAssigned | Disambiguated
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a record: its position in the input sequence.
pub type RecordId = u64;

/// Upper bound on how many times a record's label may be written.
pub const MAX_LABEL_WRITES: u8 = 2;

/// Where a record is in the resolution state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionState {
    /// Not classified yet.
    #[default]
    Unseen,
    /// Label reused from the previous record with identical canonical text.
    Cached,
    /// Extractor returned no candidates.
    NoMatch,
    /// Extractor returned exactly one candidate.
    SingleMatch,
    /// Extractor returned two or more candidates.
    MultiMatch,
    /// Label replaced by a longer containing label during the alias merge.
    Merged,
    /// Label found by substring search against the canonical label set.
    FallbackAssigned,
    /// A multi-match candidate was accepted against an existing label.
    Disambiguated,
}

impl ResolutionState {
    /// Stable lowercase name used in audit output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unseen => "unseen",
            Self::Cached => "cached",
            Self::NoMatch => "no-match",
            Self::SingleMatch => "single-match",
            Self::MultiMatch => "multi-match",
            Self::Merged => "merged",
            Self::FallbackAssigned => "fallback-assigned",
            Self::Disambiguated => "disambiguated",
        }
    }

    /// Whether the state machine allows moving from `self` to `next`.
    #[must_use]
    pub fn can_transition_to(&self, next: ResolutionState) -> bool {
        use ResolutionState::*;
        matches!(
            (self, next),
            (Unseen, Cached | NoMatch | SingleMatch | MultiMatch)
                | (SingleMatch | Cached, Merged)
                | (NoMatch | MultiMatch, FallbackAssigned)
                | (MultiMatch, Disambiguated)
        )
    }
}

impl fmt::Display for ResolutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal classification of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    /// The record carries a canonical label.
    Resolved,
    /// No label could be assigned.
    Unresolved,
}

/// One input row: the source text, its canonical form and what it resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Position of the record in the input sequence.
    pub id: RecordId,
    /// Source text exactly as read.
    pub raw_source_text: String,
    /// Output of the canonicalization pipeline, computed once.
    pub canonical_source_text: String,
    /// Candidate names returned by the extractor (empty when not called).
    #[serde(default)]
    pub candidates: Vec<String>,
    /// Canonical organization name, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_label: Option<String>,
    /// Current state.
    #[serde(default)]
    pub state: ResolutionState,
    #[serde(skip)]
    label_writes: u8,
}

impl Record {
    /// Create an unseen record.
    #[must_use]
    pub fn new(
        id: RecordId,
        raw_source_text: impl Into<String>,
        canonical_source_text: impl Into<String>,
    ) -> Self {
        Self {
            id,
            raw_source_text: raw_source_text.into(),
            canonical_source_text: canonical_source_text.into(),
            candidates: Vec::new(),
            resolved_label: None,
            state: ResolutionState::Unseen,
            label_writes: 0,
        }
    }

    /// Move to `state` without touching the label.
    pub fn set_state(&mut self, state: ResolutionState) {
        debug_assert!(
            self.state.can_transition_to(state),
            "illegal transition {} -> {} for record {}",
            self.state,
            state,
            self.id
        );
        self.state = state;
    }

    /// Write the resolved label and move to `state`.
    ///
    /// A record's label is written at most [`MAX_LABEL_WRITES`] times.
    pub fn assign(&mut self, label: impl Into<String>, state: ResolutionState) {
        self.set_state(state);
        self.label_writes += 1;
        debug_assert!(
            self.label_writes <= MAX_LABEL_WRITES,
            "record {} labelled more than {} times",
            self.id,
            MAX_LABEL_WRITES
        );
        self.resolved_label = Some(label.into());
    }

    /// Number of label writes so far.
    #[must_use]
    pub fn label_writes(&self) -> u8 {
        self.label_writes
    }

    /// True when a label has been assigned.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved_label.is_some()
    }

    /// Terminal classification.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        if self.is_resolved() {
            Outcome::Resolved
        } else {
            Outcome::Unresolved
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Strip leading and trailing non-word characters from an extracted name.
///
/// ```
/// use orgtract_core::trim_label;
///
/// assert_eq!(trim_label("  -ACME LTD.; "), "ACME LTD");
/// assert_eq!(trim_label("***"), "");
/// ```
#[must_use]
pub fn trim_label(text: &str) -> &str {
    text.trim_matches(|c: char| !is_word_char(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_is_unseen() {
        let r = Record::new(0, "acme ltd", "ACME LTD");
        assert_eq!(r.state, ResolutionState::Unseen);
        assert_eq!(r.outcome(), Outcome::Unresolved);
        assert_eq!(r.label_writes(), 0);
    }

    #[test]
    fn assign_counts_writes() {
        let mut r = Record::new(3, "x", "X");
        r.assign("ACME", ResolutionState::SingleMatch);
        r.assign("ACME LTD", ResolutionState::Merged);
        assert_eq!(r.resolved_label.as_deref(), Some("ACME LTD"));
        assert_eq!(r.label_writes(), 2);
        assert_eq!(r.outcome(), Outcome::Resolved);
    }

    #[test]
    fn transitions() {
        use ResolutionState::*;
        assert!(Unseen.can_transition_to(Cached));
        assert!(SingleMatch.can_transition_to(Merged));
        assert!(NoMatch.can_transition_to(FallbackAssigned));
        assert!(MultiMatch.can_transition_to(Disambiguated));
        assert!(!Merged.can_transition_to(Merged));
        assert!(!NoMatch.can_transition_to(Merged));
        assert!(!FallbackAssigned.can_transition_to(Merged));
    }

    #[test]
    fn trim_label_keeps_inner_punctuation() {
        assert_eq!(trim_label("(ACME S.A)"), "ACME S.A");
        assert_eq!(trim_label("ACME_"), "ACME_");
        assert_eq!(trim_label(""), "");
    }

    #[test]
    fn state_serializes_kebab_case() {
        let json = serde_json::to_string(&ResolutionState::FallbackAssigned).unwrap();
        assert_eq!(json, "\"fallback-assigned\"");
        assert_eq!(ResolutionState::NoMatch.to_string(), "no-match");
    }
}
