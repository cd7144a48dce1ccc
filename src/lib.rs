//! # orgtract
//!
//! Canonical organization names from noisy ledger descriptions.
//!
//! - **Canonicalization**: an ordered rewrite pipeline (case, separators,
//!   reference codes, legal-entity abbreviations)
//! - **Extraction**: pluggable candidate-name [`Extractor`]s
//! - **Clustering**: alias merging over whole-word containment, substring
//!   fallback, and operator disambiguation
//!
//! ## Quick Start
//!
//! ```rust
//! use orgtract::{Resolver, ResolverConfig, SkipDisambiguator, SuffixExtractor};
//!
//! let extractor = SuffixExtractor::new();
//! let config = ResolverConfig::default().with_max_variation(2);
//! let out = Resolver::new(config, &extractor)
//!     .resolve(
//!         &["Pagto NF.1234- Acme Ltda - ME", "ACME LTDA", "transfer 03/2021"],
//!         &mut SkipDisambiguator,
//!     )
//!     .unwrap();
//!
//! assert_eq!(out.records[0].resolved_label.as_deref(), Some("ACME LTDA"));
//! assert_eq!(out.records[2].resolved_label, None);
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Type | Notes |
//! |-------|------|-------|
//! | canonicalize | [`TextCanonicalizer`] | idempotent |
//! | sort + cache | [`ResolutionCache`] | adjacent (default) or memo |
//! | extract | [`Extractor`] | failures degrade to no-match |
//! | merge | [`AliasMerger`] | single hop, bounded by `max_variation` |
//! | fallback | [`FallbackMatcher`] | first contained label |
//! | disambiguate | [`DisambiguationQueue`] + [`Disambiguator`] | operator callback |
//!
//! ## Feature Flags
//!
//! - `parallel` (default): extraction on a rayon pool when `workers > 1`
//! - `fast-lock`: `parking_lot` mutexes in [`sync`]

#![warn(missing_docs)]

pub mod cache;
pub mod canonicalize;
pub mod config;
pub mod disambiguation;
pub mod extractors;
pub mod observer;
pub mod resolver;
pub mod sync;

pub use cache::{CacheMode, ResolutionCache};
pub use canonicalize::{canonicalize, CanonicalizationRule, TextCanonicalizer, LEGAL_ABBREVIATIONS};
pub use config::ResolverConfig;
pub use disambiguation::{
    Decision, DisambiguationQueue, Disambiguator, FnDisambiguator, PromptDisambiguator,
    QueueOutcome, SkipDisambiguator,
};
pub use extractors::{
    CommandExtractor, Extractor, LexiconExtractor, StubExtractor, SuffixExtractor,
};
pub use observer::{NoopObserver, Phase, ResolveObserver};
pub use resolver::{Resolution, ResolveStats, Resolver};

// Shared model and clustering engine
pub use orgtract_coalesce::{
    whole_word_contains, AliasMerger, FallbackMatcher, MergeDecision, MergeOutcome,
    OrganizationCatalog, OrganizationIndex, Relabel,
};
pub use orgtract_core::{
    trim_label, Error, OrganizationEntry, Outcome, Record, RecordId, ResolutionState, Result,
    MAX_LABEL_WRITES,
};

pub mod prelude {
    //! Commonly used items, re-exported for convenience.
    //!
    //! ```rust
    //! use orgtract::prelude::*;
    //!
    //! let stub = StubExtractor::new().with_default(["ACME LTD"]);
    //! let out = Resolver::new(ResolverConfig::default(), &stub)
    //!     .resolve(&["paid acme ltd"], &mut SkipDisambiguator)
    //!     .unwrap();
    //! assert_eq!(out.records[0].state, ResolutionState::SingleMatch);
    //! ```
    pub use crate::{
        canonicalize, CacheMode, Decision, Disambiguator, Error, Extractor, Record, Resolution,
        ResolutionState, Resolver, ResolverConfig, Result, SkipDisambiguator, StubExtractor,
        SuffixExtractor,
    };
}
