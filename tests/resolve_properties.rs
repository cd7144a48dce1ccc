//! End-to-end properties of the resolve pipeline.
//!
//! Every test drives the public API with a scripted extractor so results are
//! fully deterministic.

use orgtract::{
    canonicalize, AliasMerger, CacheMode, Decision, FnDisambiguator, OrganizationIndex,
    ResolutionState, Resolver, ResolverConfig, SkipDisambiguator, StubExtractor,
};

fn resolve(stub: &StubExtractor, config: ResolverConfig, texts: &[&str]) -> orgtract::Resolution {
    Resolver::new(config, stub)
        .resolve(texts, &mut SkipDisambiguator)
        .unwrap()
}

// =============================================================================
// Canonical end-to-end example
// =============================================================================

#[test]
fn small_company_suffixes_collapse_to_one_label() {
    let texts = ["ACME LTD- SMALLCO", "ACME LTD - SMALLCO2", "OTHER CO"];
    assert_eq!(canonicalize(texts[0]), "ACME LTD");
    assert_eq!(canonicalize(texts[1]), "ACME LTD");

    let stub = StubExtractor::new()
        .with_response("ACME LTD", ["ACME LTD"])
        .with_response("OTHER CO", Vec::<String>::new());
    let out = resolve(&stub, ResolverConfig::default(), &texts);

    assert_eq!(out.labels(), vec![Some("ACME LTD"), Some("ACME LTD"), None]);
    assert_eq!(out.records[1].state, ResolutionState::Cached);
    assert_eq!(out.stats.resolved, 2);
    assert_eq!(out.stats.unresolved, 1);
    assert_eq!(out.organizations(), 1);
}

// =============================================================================
// Cache
// =============================================================================

mod cache {
    use super::*;

    #[test]
    fn adjacent_duplicate_costs_no_extra_call() {
        let stub = StubExtractor::new().with_response("BETA S.A", ["BETA S.A"]);
        let out = resolve(
            &stub,
            ResolverConfig::default(),
            &["Beta S/A", "beta s.a."],
        );
        assert_eq!(stub.calls(), 1);
        assert_eq!(out.labels(), vec![Some("BETA S.A"), Some("BETA S.A")]);
    }

    #[test]
    fn sort_makes_distant_duplicates_adjacent() {
        let stub = StubExtractor::new()
            .with_response("ACME", ["ACME"])
            .with_response("ZETA", ["ZETA"]);
        resolve(
            &stub,
            ResolverConfig::default(),
            &["acme", "zeta", "beta", "acme", "zeta"],
        );
        assert_eq!(stub.seen(), vec!["ACME", "BETA", "ZETA"]);
    }

    #[test]
    fn unresolved_neighbour_is_not_reused() {
        let stub = StubExtractor::new();
        resolve(&stub, ResolverConfig::default(), &["nobody", "nobody"]);
        assert_eq!(stub.calls(), 2);
    }

    #[test]
    fn memo_and_adjacent_agree_on_labels() {
        let texts = ["acme", "beta", "acme ltd", "acme", "gamma", "beta"];
        let make = || {
            StubExtractor::new()
                .with_response("ACME", ["ACME"])
                .with_response("BETA", ["BETA"])
                .with_response("ACME LTD", ["ACME LTD"])
        };
        let a = resolve(&make(), ResolverConfig::default(), &texts);
        let m = resolve(
            &make(),
            ResolverConfig::default().with_cache_mode(CacheMode::Memo),
            &texts,
        );
        assert_eq!(a.labels(), m.labels());
    }
}

// =============================================================================
// Merge
// =============================================================================

mod merge {
    use super::*;

    fn index() -> OrganizationIndex {
        let mut index = OrganizationIndex::new();
        for (id, label) in ["ACME", "ACME LTD", "ACME LTD BRANCH"].iter().enumerate() {
            index.register(label, id as u64);
        }
        index
    }

    #[test]
    fn within_threshold_takes_longest() {
        let out = AliasMerger::new(2).merge(&index());
        assert_eq!(out.target_of("ACME"), Some("ACME LTD BRANCH"));
    }

    #[test]
    fn over_threshold_keeps_label() {
        let out = AliasMerger::new(1).merge(&index());
        assert_eq!(out.target_of("ACME"), None);
        assert!(out.catalog.get("ACME").is_some());
    }

    #[test]
    fn glued_token_is_not_containment() {
        let stub = StubExtractor::new()
            .with_response("ACME", ["ACME"])
            .with_response("ACMECORP", ["ACMECORP"]);
        let out = resolve(
            &stub,
            ResolverConfig::default().with_max_variation(5),
            &["acme", "acmecorp"],
        );
        assert_eq!(out.labels(), vec![Some("ACME"), Some("ACMECORP")]);
        assert_eq!(out.stats.merged_labels, 0);
    }

    #[test]
    fn chains_are_single_hop() {
        // ACME sits in two labels and exceeds the bound; ACME LTD folds one hop.
        let stub = StubExtractor::new()
            .with_response("ACME", ["ACME"])
            .with_response("ACME LTD", ["ACME LTD"])
            .with_response("ACME LTD BRANCH", ["ACME LTD BRANCH"]);
        let out = resolve(
            &stub,
            ResolverConfig::default().with_max_variation(1),
            &["acme", "acme ltd", "acme ltd branch"],
        );
        assert_eq!(
            out.labels(),
            vec![Some("ACME"), Some("ACME LTD BRANCH"), Some("ACME LTD BRANCH")]
        );
    }
}

// =============================================================================
// Fallback and disambiguation
// =============================================================================

#[test]
fn fallback_finds_label_inside_reference_text() {
    let stub = StubExtractor::new().with_response("ACME LTD", ["ACME LTD"]);
    let out = resolve(
        &stub,
        ResolverConfig::default(),
        &["ACME LTD", "PAYMENT REF 123 ACME LTD"],
    );
    assert_eq!(out.records[1].resolved_label.as_deref(), Some("ACME LTD"));
    assert_eq!(out.records[1].state, ResolutionState::FallbackAssigned);
}

#[test]
fn operator_cancel_keeps_committed_labels() {
    let stub = StubExtractor::new()
        .with_response("ACME LTD", ["ACME LTD"])
        .with_response("PAY DELTA X", ["DELTA", "X"])
        .with_response("PAY OMEGA Y", ["OMEGA", "Y"]);
    let mut answers = vec![Decision::Accept(vec!["DELTA".into()]), Decision::Cancel].into_iter();
    let mut d = FnDisambiguator::new(move |_: &[String]| answers.next().unwrap_or(Decision::Cancel));

    let out = Resolver::new(ResolverConfig::default(), &stub)
        .resolve(&["acme ltd", "pay delta x", "pay omega y"], &mut d)
        .unwrap();

    assert_eq!(
        out.labels(),
        vec![Some("ACME LTD"), Some("DELTA"), None]
    );
    assert!(out.stats.operator_cancelled);
    assert_eq!(out.stats.operator_approved, 1);
}

// =============================================================================
// Invariants
// =============================================================================

#[test]
fn every_label_belongs_to_a_catalog_entry() {
    let stub = StubExtractor::new()
        .with_response("ACME", ["ACME"])
        .with_response("ACME LTD", ["ACME LTD"])
        .with_response("MOVE ACME TO BETA", ["ACME", "BETA"])
        .with_response("PAY ZED CO", ["ZED CO", "PAY"]);
    let mut d = FnDisambiguator::new(|_: &[String]| Decision::Accept(vec!["ZED CO".into()]));
    let out = Resolver::new(ResolverConfig::default().with_max_variation(1), &stub)
        .resolve(
            &["acme", "acme ltd", "move acme to beta", "pay zed co", "ref 1 acme ltd"],
            &mut d,
        )
        .unwrap();

    for record in &out.records {
        if let Some(label) = &record.resolved_label {
            let entry = out
                .catalog
                .find(label)
                .unwrap_or_else(|| panic!("no entry answers to {label}"));
            assert!(
                entry.member_ids.contains(&record.id),
                "record {} missing from '{}'",
                record.id,
                entry.canonical_label
            );
        }
        assert!(record.label_writes() <= orgtract::MAX_LABEL_WRITES);
    }

    // Membership is a partition.
    let mut seen = std::collections::HashSet::new();
    for entry in out.catalog.entries() {
        for id in &entry.member_ids {
            assert!(seen.insert(*id), "record {id} in two entries");
        }
    }
}

#[test]
fn repeated_runs_are_identical() {
    let texts = [
        "Pagto NF.1234- Acme Ltda - ME",
        "ACME LTDA",
        "Beta S/A 03/2021",
        "transfer to beta s.a.",
        "nobody",
    ];
    let make = || {
        StubExtractor::new()
            .with_response("PAGTO - ACME LTDA", ["ACME LTDA"])
            .with_response("ACME LTDA", ["ACME LTDA"])
            .with_response("BETA S.A", ["BETA S.A"])
    };
    let first = resolve(&make(), ResolverConfig::default().with_max_variation(2), &texts);
    for _ in 0..3 {
        let again = resolve(&make(), ResolverConfig::default().with_max_variation(2), &texts);
        assert_eq!(first.labels(), again.labels());
        assert_eq!(first.stats, again.stats);
    }
}
