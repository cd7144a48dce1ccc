//! Heuristic extraction of names that end in a legal-entity abbreviation.

use super::Extractor;
use crate::canonicalize::LEGAL_ABBREVIATIONS;
use crate::Result;

/// Suffixes that mark a company name but are not rewritten by the canonicalizer.
const EXTRA_SUFFIXES: &[&str] = &["LLC", "INC", "GMBH", "PLC", "CORP"];

/// Extracts every span ending in a legal-entity suffix (`LTDA`, `S.A`, `B.V`, ...).
///
/// A span starts after the previous span, after a `-` separator token or after
/// a token containing digits (reference numbers), so
/// `PAYMENT REF 123 ACME LTD` yields `ACME LTD`. A bare suffix with no name in
/// front of it is ignored.
///
/// ```rust
/// use orgtract::{Extractor, SuffixExtractor};
///
/// let ex = SuffixExtractor::new();
/// assert_eq!(ex.extract("PAGTO - ACME LTDA").unwrap(), vec!["ACME LTDA"]);
/// assert!(ex.extract("OTHER CO").unwrap().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct SuffixExtractor {
    suffixes: Vec<String>,
}

impl Default for SuffixExtractor {
    fn default() -> Self {
        Self {
            suffixes: LEGAL_ABBREVIATIONS
                .iter()
                .chain(EXTRA_SUFFIXES)
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

impl SuffixExtractor {
    /// Default suffix set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Additional suffix tokens (matched against canonical, uppercase text).
    #[must_use]
    pub fn with_suffixes<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for s in extra {
            let s = s.into().to_uppercase();
            if !self.suffixes.contains(&s) {
                self.suffixes.push(s);
            }
        }
        self
    }

    fn is_suffix(&self, token: &str) -> bool {
        self.suffixes.iter().any(|s| s == token)
    }
}

impl Extractor for SuffixExtractor {
    fn extract(&self, text: &str) -> Result<Vec<String>> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let mut found = Vec::new();
        let mut start = 0;

        for (i, token) in tokens.iter().enumerate() {
            if *token == "-" || token.chars().any(|c| c.is_ascii_digit()) {
                start = i + 1;
            } else if self.is_suffix(token) {
                if i > start {
                    let span = tokens[start..=i].join(" ");
                    if !found.contains(&span) {
                        found.push(span);
                    }
                }
                start = i + 1;
            }
        }
        Ok(found)
    }

    fn name(&self) -> &'static str {
        "suffix"
    }
}
