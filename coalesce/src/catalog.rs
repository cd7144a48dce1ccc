//! The canonical label set produced by the merge.

use crate::index::OrganizationIndex;
use orgtract_core::{OrganizationEntry, RecordId};
use std::collections::HashMap;

/// Canonical organization entries in first-seen order.
///
/// Order matters: fallback matching assigns the first label that matches.
#[derive(Debug, Clone, Default)]
pub struct OrganizationCatalog {
    entries: Vec<OrganizationEntry>,
    positions: HashMap<String, usize>,
}

impl OrganizationCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// One entry per raw label, without merging.
    #[must_use]
    pub fn from_index(index: &OrganizationIndex) -> Self {
        let mut catalog = Self::new();
        for (label, members) in index.iter() {
            catalog
                .entry_or_insert(label)
                .absorb(label, members.iter().copied());
        }
        catalog
    }

    /// Entry for `label`, appended at the end if new.
    pub fn entry_or_insert(&mut self, label: &str) -> &mut OrganizationEntry {
        let slot = match self.positions.get(label) {
            Some(&slot) => slot,
            None => {
                let slot = self.entries.len();
                self.entries.push(OrganizationEntry::new(label));
                self.positions.insert(label.to_string(), slot);
                slot
            }
        };
        &mut self.entries[slot]
    }

    /// Add a label with no members yet. Returns false if it already existed.
    pub fn insert_label(&mut self, label: &str) -> bool {
        if self.positions.contains_key(label) {
            return false;
        }
        self.entry_or_insert(label);
        true
    }

    /// Entry whose canonical label is `label`.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&OrganizationEntry> {
        self.positions.get(label).map(|&slot| &self.entries[slot])
    }

    /// Entry that answers to `label` canonically or through an alias.
    #[must_use]
    pub fn find(&self, label: &str) -> Option<&OrganizationEntry> {
        self.get(label)
            .or_else(|| self.entries.iter().find(|e| e.aliases.contains(label)))
    }

    /// Add a record to the entry for `label`. Returns false if there is no such entry.
    pub fn add_member(&mut self, label: &str, id: RecordId) -> bool {
        match self.positions.get(label) {
            Some(&slot) => {
                self.entries[slot].member_ids.insert(id);
                true
            }
            None => false,
        }
    }

    /// Record `alias` (and optionally a member) on the entry for `label`.
    pub fn add_alias(&mut self, label: &str, alias: &str, member: Option<RecordId>) -> bool {
        match self.positions.get(label) {
            Some(&slot) => {
                self.entries[slot].absorb(alias, member);
                true
            }
            None => false,
        }
    }

    /// Canonical labels in order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.canonical_label.as_str())
    }

    /// Entries in order.
    #[must_use]
    pub fn entries(&self) -> &[OrganizationEntry] {
        &self.entries
    }

    /// Consume into the entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<OrganizationEntry> {
        self.entries
    }

    /// Number of canonical labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries that currently have at least one member.
    pub fn populated(&self) -> impl Iterator<Item = &OrganizationEntry> {
        self.entries.iter().filter(|e| !e.member_ids.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_preserves_order_and_dedups() {
        let mut c = OrganizationCatalog::new();
        assert!(c.insert_label("B"));
        assert!(c.insert_label("A"));
        assert!(!c.insert_label("B"));
        assert_eq!(c.labels().collect::<Vec<_>>(), vec!["B", "A"]);
    }

    #[test]
    fn find_by_alias() {
        let mut c = OrganizationCatalog::new();
        c.entry_or_insert("ACME LTD").absorb("ACME", [1]);
        assert_eq!(c.find("ACME").unwrap().canonical_label, "ACME LTD");
        assert!(c.get("ACME").is_none());
        assert!(c.find("OTHER").is_none());
    }

    #[test]
    fn from_index_one_entry_per_label() {
        let mut index = OrganizationIndex::new();
        index.register("X", 0);
        index.register("Y", 1);
        index.register("X", 2);
        let c = OrganizationCatalog::from_index(&index);
        assert_eq!(c.len(), 2);
        assert_eq!(c.get("X").unwrap().member_ids.len(), 2);
    }

    #[test]
    fn add_member_and_alias() {
        let mut c = OrganizationCatalog::new();
        c.insert_label("ACME");
        assert!(c.add_member("ACME", 7));
        assert!(!c.add_member("NOPE", 7));
        assert!(c.add_alias("ACME", "ACM", Some(8)));
        let e = c.get("ACME").unwrap();
        assert!(e.aliases.contains("ACM"));
        assert_eq!(e.member_ids.len(), 2);
        assert_eq!(c.populated().count(), 1);
    }
}
