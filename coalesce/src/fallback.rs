//! Substring matching against the canonical label set.

use crate::catalog::OrganizationCatalog;

/// Assigns unresolved text to the first canonical label it contains.
///
/// Unlike the alias merge, matching here is a plain (case-sensitive)
/// substring test: `ACME LTD` is found inside `PAYMENT REF 123 ACME LTD`.
/// Empty labels are ignored since they would match everything.
#[derive(Debug, Clone)]
pub struct FallbackMatcher<'a> {
    labels: Vec<&'a str>,
}

impl<'a> FallbackMatcher<'a> {
    /// Match against the catalog's labels in catalog order.
    #[must_use]
    pub fn new(catalog: &'a OrganizationCatalog) -> Self {
        Self::from_labels(catalog.labels())
    }

    /// Match against an explicit ordered label list.
    pub fn from_labels<I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            labels: labels.into_iter().filter(|l| !l.is_empty()).collect(),
        }
    }

    /// First label that occurs anywhere in `text`.
    #[must_use]
    pub fn find(&self, text: &str) -> Option<&'a str> {
        self.labels.iter().copied().find(|label| text.contains(label))
    }

    /// First label that contains `fragment`.
    #[must_use]
    pub fn find_containing(&self, fragment: &str) -> Option<&'a str> {
        if fragment.is_empty() {
            return None;
        }
        self.labels
            .iter()
            .copied()
            .find(|label| label.contains(fragment))
    }

    /// Number of labels considered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when there is nothing to match against.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
