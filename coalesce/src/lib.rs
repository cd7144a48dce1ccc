//! # orgtract-coalesce
//!
//! Collapsing near-duplicate organization labels into one canonical name.
//!
//! This crate provides the clustering half of the resolver:
//!
//! - [`OrganizationIndex`]: raw label → member records, in first-seen order
//! - [`AliasMerger`]: one full pass folding each label into the longest label
//!   that contains it as a whole word, bounded by `max_variation`
//! - [`OrganizationCatalog`]: the resulting canonical entries
//! - [`FallbackMatcher`]: substring search of unresolved text against the catalog
//!
//! # Example
//!
//! ```
//! use orgtract_coalesce::{AliasMerger, OrganizationIndex};
//!
//! let mut index = OrganizationIndex::new();
//! index.register("ACME", 0);
//! index.register("ACME LTD", 1);
//! index.register("ACME LTD BRANCH", 2);
//!
//! let outcome = AliasMerger::new(2).merge(&index);
//! assert_eq!(outcome.target_of("ACME"), Some("ACME LTD BRANCH"));
//! ```

#![warn(missing_docs)]

pub mod catalog;
pub mod fallback;
pub mod index;
pub mod merger;

pub use catalog::OrganizationCatalog;
pub use fallback::FallbackMatcher;
pub use index::OrganizationIndex;
pub use merger::{whole_word_contains, AliasMerger, MergeDecision, MergeOutcome, Relabel, WholeWord};
