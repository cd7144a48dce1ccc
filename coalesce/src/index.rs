//! Raw label index built during classification.

use orgtract_core::RecordId;
use std::collections::{BTreeSet, HashMap};

/// Raw labels and the records mapped to each, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct OrganizationIndex {
    labels: Vec<String>,
    members: Vec<BTreeSet<RecordId>>,
    positions: HashMap<String, usize>,
}

impl OrganizationIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `id` to `label`, creating the label on first use.
    pub fn register(&mut self, label: &str, id: RecordId) {
        let slot = match self.positions.get(label) {
            Some(&slot) => slot,
            None => {
                let slot = self.labels.len();
                self.labels.push(label.to_string());
                self.members.push(BTreeSet::new());
                self.positions.insert(label.to_string(), slot);
                slot
            }
        };
        self.members[slot].insert(id);
    }

    /// Distinct labels in first-seen order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Records mapped to `label`.
    #[must_use]
    pub fn members(&self, label: &str) -> Option<&BTreeSet<RecordId>> {
        self.positions.get(label).map(|&slot| &self.members[slot])
    }

    /// Iterate `(label, members)` in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<RecordId>)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.members.iter())
    }

    /// Number of distinct labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when no label has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
