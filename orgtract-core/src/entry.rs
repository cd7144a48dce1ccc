//! Canonical organizations.

use crate::record::RecordId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A canonical organization name with the records that resolved to it.
///
/// Entries are created lazily when the first record is labelled with a new
/// name. During the alias merge an entry can absorb the members of a shorter
/// label, which is then kept as an alias; entries are never split again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationEntry {
    /// The canonical (longest) name.
    pub canonical_label: String,
    /// Records resolved to this organization.
    pub member_ids: BTreeSet<RecordId>,
    /// Shorter labels absorbed into this one.
    pub aliases: BTreeSet<String>,
}

impl OrganizationEntry {
    /// Create an empty entry.
    #[must_use]
    pub fn new(canonical_label: impl Into<String>) -> Self {
        Self {
            canonical_label: canonical_label.into(),
            member_ids: BTreeSet::new(),
            aliases: BTreeSet::new(),
        }
    }

    /// Whether `label` names this organization, either canonically or as an alias.
    #[must_use]
    pub fn answers_to(&self, label: &str) -> bool {
        self.canonical_label == label || self.aliases.contains(label)
    }

    /// Absorb another label and its members.
    pub fn absorb<I>(&mut self, alias: impl Into<String>, members: I)
    where
        I: IntoIterator<Item = RecordId>,
    {
        let alias = alias.into();
        if alias != self.canonical_label {
            self.aliases.insert(alias);
        }
        self.member_ids.extend(members);
    }
}
