//! One-pass alias merging.

use crate::catalog::OrganizationCatalog;
use crate::index::OrganizationIndex;
use orgtract_core::RecordId;
use regex::{Regex, RegexBuilder};

/// Case-insensitive matcher for one label occurring as a whole word.
///
/// "Whole word" means bounded on both sides by whitespace or the start/end of
/// the haystack, so `ACME` occurs in `BIG ACME LTD` but not in `ACMECORP`.
#[derive(Debug, Clone)]
pub struct WholeWord {
    pattern: Regex,
}

impl WholeWord {
    /// Compile a matcher for `needle`.
    pub fn new(needle: &str) -> Result<Self, regex::Error> {
        let pattern = RegexBuilder::new(&format!(r"(?:^|\s){}(?:$|\s)", regex::escape(needle)))
            .case_insensitive(true)
            .build()?;
        Ok(Self { pattern })
    }

    /// Whether the needle occurs in `haystack` as a whole word.
    #[must_use]
    pub fn is_match(&self, haystack: &str) -> bool {
        self.pattern.is_match(haystack)
    }
}

/// Whether `needle` occurs in `haystack` bounded by whitespace or string edges.
///
/// ```
/// use orgtract_coalesce::whole_word_contains;
///
/// assert!(whole_word_contains("ACME", "ACME LTD"));
/// assert!(whole_word_contains("acme", "BIG ACME"));
/// assert!(!whole_word_contains("ACME", "ACMECORP"));
/// ```
#[must_use]
pub fn whole_word_contains(needle: &str, haystack: &str) -> bool {
    WholeWord::new(needle)
        .map(|w| w.is_match(haystack))
        .unwrap_or(false)
}

/// What the merger decided for one label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeDecision<'a> {
    /// The label stays its own canonical name.
    ///
    /// `matches` is the number of containing labels found; a non-zero value
    /// means the threshold was exceeded (or merging is disabled).
    Keep {
        /// Containing labels found.
        matches: usize,
    },
    /// The label becomes an alias of `into`.
    Merge {
        /// Longest containing label.
        into: &'a str,
        /// Containing labels found.
        matches: usize,
    },
}

/// Records moved from one label to another by the merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relabel {
    /// Absorbed label.
    pub from: String,
    /// Canonical label it was folded into.
    pub to: String,
    /// Records that carried `from`.
    pub members: Vec<RecordId>,
}

/// Result of a full merge pass.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// Canonical entries in first-seen order of their canonical label.
    pub catalog: OrganizationCatalog,
    /// Labels folded into longer ones.
    pub relabels: Vec<Relabel>,
    /// Labels kept because their containing matches exceeded `max_variation`.
    pub skipped: usize,
}

impl MergeOutcome {
    /// Canonical label that `label` was folded into, if it was merged.
    #[must_use]
    pub fn target_of(&self, label: &str) -> Option<&str> {
        self.relabels
            .iter()
            .find(|r| r.from == label)
            .map(|r| r.to.as_str())
    }
}

/// Folds each label into the longest label containing it as a whole word.
///
/// The pass is single-hop: a label is compared against the raw label set
/// only, never against the output of another merge, so containment chains
/// are not iterated to a fixed point.
#[derive(Debug, Clone, Default)]
pub struct AliasMerger {
    max_variation: i64,
}

impl AliasMerger {
    /// Create a merger.
    ///
    /// `max_variation <= 0` disables merging; a positive value is the
    /// inclusive upper bound on the number of containing labels accepted.
    #[must_use]
    pub fn new(max_variation: i64) -> Self {
        Self { max_variation }
    }

    /// Whether merging is enabled at all.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.max_variation > 0
    }

    /// The configured threshold.
    #[must_use]
    pub fn max_variation(&self) -> i64 {
        self.max_variation
    }

    /// Decide the canonical label for `label` given every distinct label.
    pub fn decide<'a>(&self, label: &str, labels: &'a [String]) -> MergeDecision<'a> {
        if !self.is_enabled() {
            return MergeDecision::Keep { matches: 0 };
        }
        let matcher = match WholeWord::new(label) {
            Ok(m) => m,
            Err(e) => {
                log::warn!("Cannot build matcher for label '{}': {}", label, e);
                return MergeDecision::Keep { matches: 0 };
            }
        };

        let containing: Vec<&'a str> = labels
            .iter()
            .map(String::as_str)
            .filter(|other| *other != label && matcher.is_match(other))
            .collect();

        let matches = containing.len();
        if matches == 0 || i64::try_from(matches).unwrap_or(i64::MAX) > self.max_variation {
            return MergeDecision::Keep { matches };
        }

        // Ties keep the first label in first-seen order.
        let mut into = containing[0];
        let mut best = into.chars().count();
        for candidate in &containing[1..] {
            let len = candidate.chars().count();
            if len > best {
                into = candidate;
                best = len;
            }
        }
        MergeDecision::Merge { into, matches }
    }

    /// Run the merge over a fully built index.
    pub fn merge(&self, index: &OrganizationIndex) -> MergeOutcome {
        let labels = index.labels();
        let mut outcome = MergeOutcome::default();

        for (label, members) in index.iter() {
            match self.decide(label, labels) {
                MergeDecision::Keep { matches } => {
                    if matches > 0 {
                        log::debug!(
                            "Keeping '{}': {} containing labels exceed max_variation={}",
                            label,
                            matches,
                            self.max_variation
                        );
                        outcome.skipped += 1;
                    }
                    outcome
                        .catalog
                        .entry_or_insert(label)
                        .absorb(label, members.iter().copied());
                }
                MergeDecision::Merge { into, matches } => {
                    log::debug!("Merging '{}' into '{}' ({} matches)", label, into, matches);
                    outcome
                        .catalog
                        .entry_or_insert(into)
                        .absorb(label, members.iter().copied());
                    outcome.relabels.push(Relabel {
                        from: label.to_string(),
                        to: into.to_string(),
                        members: members.iter().copied().collect(),
                    });
                }
            }
        }

        log::info!(
            "Alias merge: {} labels -> {} canonical ({} merged, {} over threshold)",
            index.len(),
            outcome.catalog.len(),
            outcome.relabels.len(),
            outcome.skipped
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(labels: &[&str]) -> OrganizationIndex {
        let mut index = OrganizationIndex::new();
        for (i, label) in labels.iter().enumerate() {
            index.register(label, i as RecordId);
        }
        index
    }

    #[test]
    fn whole_word_bounds() {
        assert!(whole_word_contains("ACME", "ACME"));
        assert!(whole_word_contains("ACME LTD", "THE ACME LTD BRANCH"));
        assert!(!whole_word_contains("ACME", "ACMECORP"));
        assert!(!whole_word_contains("ACME", "XACME LTD"));
        assert!(!whole_word_contains("ACME", "ACME-LTD"));
    }

    #[test]
    fn whole_word_escapes_metacharacters() {
        assert!(whole_word_contains("S.A", "ACME S.A"));
        assert!(!whole_word_contains("S.A", "ACME SXA"));
        assert!(whole_word_contains("A+B (X)", "A+B (X) HOLDINGS"));
    }

    #[test]
    fn merges_into_longest_within_threshold() {
        let index = index_of(&["ACME", "ACME LTD", "ACME LTD BRANCH"]);
        let outcome = AliasMerger::new(2).merge(&index);
        assert_eq!(outcome.target_of("ACME"), Some("ACME LTD BRANCH"));
        assert_eq!(outcome.target_of("ACME LTD"), Some("ACME LTD BRANCH"));
        assert_eq!(outcome.target_of("ACME LTD BRANCH"), None);

        let labels: Vec<_> = outcome.catalog.labels().collect();
        assert_eq!(labels, vec!["ACME LTD BRANCH"]);
        let entry = outcome.catalog.get("ACME LTD BRANCH").unwrap();
        assert_eq!(entry.member_ids.len(), 3);
        assert!(entry.aliases.contains("ACME"));
        assert!(entry.aliases.contains("ACME LTD"));
    }

    #[test]
    fn threshold_exceeded_keeps_label() {
        let index = index_of(&["ACME", "ACME LTD", "ACME LTD BRANCH"]);
        let outcome = AliasMerger::new(1).merge(&index);
        assert_eq!(outcome.target_of("ACME"), None);
        // "ACME LTD" has a single containing label, which is within the bound.
        assert_eq!(outcome.target_of("ACME LTD"), Some("ACME LTD BRANCH"));
        assert_eq!(outcome.skipped, 1);
        assert!(outcome.catalog.get("ACME").is_some());
    }

    #[test]
    fn non_positive_threshold_disables_merge() {
        let index = index_of(&["ACME", "ACME LTD"]);
        for max in [0, -1] {
            let outcome = AliasMerger::new(max).merge(&index);
            assert!(outcome.relabels.is_empty());
            assert_eq!(outcome.catalog.len(), 2);
        }
    }

    #[test]
    fn glued_tokens_never_merge() {
        let index = index_of(&["ACME", "ACMECORP"]);
        let outcome = AliasMerger::new(5).merge(&index);
        assert!(outcome.relabels.is_empty());
    }

    #[test]
    fn longest_tie_keeps_first_seen() {
        let labels: Vec<String> = ["ACME", "ACME NORTH", "ACME SOUTH"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let decision = AliasMerger::new(3).decide("ACME", &labels);
        assert_eq!(
            decision,
            MergeDecision::Merge {
                into: "ACME NORTH",
                matches: 2
            }
        );
    }

    #[test]
    fn case_insensitive_containment() {
        let labels: Vec<String> = vec!["Acme".into(), "ACME LTD".into()];
        let decision = AliasMerger::new(1).decide("Acme", &labels);
        assert_eq!(
            decision,
            MergeDecision::Merge {
                into: "ACME LTD",
                matches: 1
            }
        );
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn label() -> impl Strategy<Value = String> {
            proptest::string::string_regex("[A-C]{1,3}( [A-C]{1,3}){0,2}").unwrap()
        }

        proptest! {
            /// INVARIANT: a merge target strictly contains the label folded into it
            #[test]
            fn targets_contain_their_aliases(
                labels in prop::collection::vec(label(), 1..10),
                max in 1i64..4,
            ) {
                let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
                let outcome = AliasMerger::new(max).merge(&index_of(&refs));
                for r in &outcome.relabels {
                    prop_assert!(whole_word_contains(&r.from, &r.to));
                    prop_assert!(r.to.len() > r.from.len());
                }
            }

            /// INVARIANT: every registered record lands in exactly one entry
            #[test]
            fn membership_is_a_partition(
                labels in prop::collection::vec(label(), 1..10),
                max in 0i64..4,
            ) {
                let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
                let outcome = AliasMerger::new(max).merge(&index_of(&refs));
                let total: usize = outcome
                    .catalog
                    .entries()
                    .iter()
                    .map(|e| e.member_ids.len())
                    .sum();
                prop_assert_eq!(total, labels.len());
            }
        }
    }
}
