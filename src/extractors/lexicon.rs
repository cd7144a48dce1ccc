//! Gazetteer lookup over a closed list of organization names.

use super::{is_word_bounded, Extractor};
use crate::canonicalize::canonicalize;
use crate::{Error, Result};
use std::path::Path;

/// Finds known organization names in canonical text.
///
/// Names are canonicalized on load, so a lexicon line `Acme Ltda.` matches
/// the canonical text `PAGTO ACME LTDA`. Matches are whole-word, longest
/// first and non-overlapping; they are returned in text order without
/// duplicates.
///
/// ```rust
/// use orgtract::{Extractor, LexiconExtractor};
///
/// let lexicon = LexiconExtractor::new(["Acme", "Acme Ltda", "Beta S/A"]);
/// let found = lexicon.extract("PAGTO ACME LTDA E BETA S.A").unwrap();
/// assert_eq!(found, vec!["ACME LTDA", "BETA S.A"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LexiconExtractor {
    // Longest first.
    names: Vec<String>,
}

impl LexiconExtractor {
    /// Build from raw names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = names
            .into_iter()
            .map(|n| canonicalize(n.as_ref()))
            .filter(|n| !n.is_empty())
            .collect();
        names.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });
        names.dedup();
        Self { names }
    }

    /// Load one name per line. Blank lines and `#` comments are skipped.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read lexicon {}: {}", path.display(), e)))?;
        let lexicon = Self::new(
            content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#')),
        );
        log::info!("Loaded {} lexicon names from {}", lexicon.len(), path.display());
        Ok(lexicon)
    }

    /// Number of distinct canonical names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when the lexicon has no names.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Extractor for LexiconExtractor {
    fn extract(&self, text: &str) -> Result<Vec<String>> {
        let mut taken: Vec<(usize, usize, &str)> = Vec::new();
        for name in &self.names {
            for (start, _) in text.match_indices(name.as_str()) {
                let end = start + name.len();
                if !is_word_bounded(text, start, end) {
                    continue;
                }
                if taken.iter().any(|&(s, e, _)| start < e && s < end) {
                    continue;
                }
                taken.push((start, end, name.as_str()));
            }
        }
        taken.sort_by_key(|&(start, _, _)| start);

        let mut found: Vec<String> = Vec::with_capacity(taken.len());
        for (_, _, name) in taken {
            if !found.iter().any(|f| f == name) {
                found.push(name.to_string());
            }
        }
        Ok(found)
    }

    fn name(&self) -> &'static str {
        "lexicon"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn longest_match_wins() {
        let lex = LexiconExtractor::new(["ACME", "ACME LTD"]);
        assert_eq!(lex.extract("PAID ACME LTD").unwrap(), vec!["ACME LTD"]);
        assert_eq!(lex.extract("PAID ACME").unwrap(), vec!["ACME"]);
    }

    #[test]
    fn whole_words_only() {
        let lex = LexiconExtractor::new(["ACME"]);
        assert!(lex.extract("ACMECORP").unwrap().is_empty());
    }

    #[test]
    fn repeated_name_reported_once() {
        let lex = LexiconExtractor::new(["ACME"]);
        assert_eq!(lex.extract("ACME ACME").unwrap(), vec!["ACME"]);
    }

    #[test]
    fn text_order() {
        let lex = LexiconExtractor::new(["ZETA", "ALPHA CO"]);
        assert_eq!(
            lex.extract("ZETA PAYS ALPHA CO").unwrap(),
            vec!["ZETA", "ALPHA CO"]
        );
    }

    #[test]
    fn loads_file_skipping_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# vendors").unwrap();
        writeln!(file, "acme ltda").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "Beta B.V.").unwrap();
        let lex = LexiconExtractor::from_file(file.path()).unwrap();
        assert_eq!(lex.len(), 2);
        assert_eq!(lex.extract("BETA B.V").unwrap(), vec!["BETA B.V"]);
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = LexiconExtractor::from_file("/definitely/not/here.txt").unwrap_err();
        assert!(err.is_fatal());
    }
}
