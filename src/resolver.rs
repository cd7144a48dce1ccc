//! The resolve pipeline.
//!
//! ```text
//! texts ─▶ canonicalize ─▶ sort ─▶ extract + classify ─▶ merge ─▶ fallback
//!                                   (cache / 0 / 1 / n)            │
//!                     second fallback ◀─ operator ◀─ auto-disambiguate
//! ```
//!
//! Every record is classified before the merge starts, so merge decisions
//! always see the complete label index. Records come back in input order.

use crate::cache::ResolutionCache;
use crate::canonicalize::TextCanonicalizer;
use crate::config::ResolverConfig;
use crate::disambiguation::{DisambiguationQueue, Disambiguator};
use crate::extractors::Extractor;
use crate::observer::{NoopObserver, Phase, ResolveObserver};
use crate::Result;
use orgtract_coalesce::{AliasMerger, FallbackMatcher, OrganizationCatalog, OrganizationIndex};
use orgtract_core::{trim_label, Record, RecordId, ResolutionState};
use serde::Serialize;

static NOOP: NoopObserver = NoopObserver;

/// Extractor answer for one record; `None` when the extractor was not called.
type Answer = Option<Result<Vec<String>>>;

/// Counters collected during one resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolveStats {
    /// Input records.
    pub records: usize,
    /// Calls made to the extractor.
    pub extractor_calls: usize,
    /// Calls that failed and were treated as no candidates.
    pub extractor_failures: usize,
    /// Records labelled from the cache.
    pub cache_hits: usize,
    /// Records with no candidates.
    pub no_match: usize,
    /// Records with exactly one candidate.
    pub single_match: usize,
    /// Records with several candidates.
    pub multi_match: usize,
    /// Labels folded into a longer label.
    pub merged_labels: usize,
    /// Records relabelled by the merge.
    pub merged_records: usize,
    /// Labels kept because too many labels contained them.
    pub merge_skipped: usize,
    /// Records labelled by either fallback pass.
    pub fallback_assigned: usize,
    /// Multi-candidate records settled without the operator.
    pub auto_disambiguated: usize,
    /// Candidate sets presented to the operator.
    pub operator_sets: usize,
    /// Names the operator added to the catalog.
    pub operator_approved: usize,
    /// The operator stopped early.
    pub operator_cancelled: bool,
    /// Records with a label at the end.
    pub resolved: usize,
    /// Records without a label at the end.
    pub unresolved: usize,
}

/// Output of [`Resolver::resolve`].
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Records in input order.
    pub records: Vec<Record>,
    /// Final canonical organizations.
    pub catalog: OrganizationCatalog,
    /// Counters.
    pub stats: ResolveStats,
}

impl Resolution {
    /// Records in the order they were given.
    #[must_use]
    pub fn records_by_input_order(&self) -> &[Record] {
        &self.records
    }

    /// Resolved label per record, in input order.
    #[must_use]
    pub fn labels(&self) -> Vec<Option<&str>> {
        self.records
            .iter()
            .map(|r| r.resolved_label.as_deref())
            .collect()
    }

    /// Organizations that ended up with at least one record.
    #[must_use]
    pub fn organizations(&self) -> usize {
        self.catalog.populated().count()
    }
}

/// Resolves free-text descriptions to canonical organization names.
///
/// ```rust
/// use orgtract::{Resolver, ResolverConfig, SkipDisambiguator, StubExtractor};
///
/// let extractor = StubExtractor::new().with_response("ACME LTD", ["ACME LTD"]);
/// let resolver = Resolver::new(ResolverConfig::default(), &extractor);
/// let out = resolver
///     .resolve(&["ACME LTD- SMALLCO", "ACME LTD - SMALLCO2", "OTHER CO"], &mut SkipDisambiguator)
///     .unwrap();
///
/// assert_eq!(out.labels(), vec![Some("ACME LTD"), Some("ACME LTD"), None]);
/// assert_eq!(extractor.calls(), 2);
/// ```
pub struct Resolver<'a> {
    config: ResolverConfig,
    extractor: &'a dyn Extractor,
    canonicalizer: TextCanonicalizer,
    observer: &'a dyn ResolveObserver,
}

impl<'a> Resolver<'a> {
    /// Resolver over `extractor` with `config`.
    #[must_use]
    pub fn new(config: ResolverConfig, extractor: &'a dyn Extractor) -> Self {
        Self {
            config,
            extractor,
            canonicalizer: TextCanonicalizer::new(),
            observer: &NOOP,
        }
    }

    /// Report progress to `observer`.
    #[must_use]
    pub fn with_observer(mut self, observer: &'a dyn ResolveObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Replace the canonicalization pipeline.
    #[must_use]
    pub fn with_canonicalizer(mut self, canonicalizer: TextCanonicalizer) -> Self {
        self.canonicalizer = canonicalizer;
        self
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve one source text per record.
    pub fn resolve<S: AsRef<str>>(
        &self,
        texts: &[S],
        disambiguator: &mut dyn Disambiguator,
    ) -> Result<Resolution> {
        self.resolve_fields(texts.iter().map(|t| Some(t.as_ref())), disambiguator)
    }

    /// Resolve records whose source field may be absent (treated as empty text).
    pub fn resolve_fields<'s, I>(
        &self,
        fields: I,
        disambiguator: &mut dyn Disambiguator,
    ) -> Result<Resolution>
    where
        I: IntoIterator<Item = Option<&'s str>>,
    {
        self.config.validate()?;
        let mut stats = ResolveStats::default();

        self.observer.on_phase(Phase::Canonicalize);
        let mut records: Vec<Record> = fields
            .into_iter()
            .enumerate()
            .map(|(i, field)| {
                let raw = field.unwrap_or_default();
                Record::new(i as RecordId, raw, self.canonicalizer.canonicalize(raw))
            })
            .collect();
        stats.records = records.len();

        // Stable: equal canonical texts keep input order.
        let mut order: Vec<usize> = (0..records.len()).collect();
        order.sort_by(|&a, &b| {
            records[a]
                .canonical_source_text
                .cmp(&records[b].canonical_source_text)
        });

        self.observer.on_phase(Phase::Extract);
        let mut index = OrganizationIndex::new();
        self.extract_all(&mut records, &order, &mut index, &mut stats)?;
        log::info!(
            "Classified {} records: {} single, {} multi, {} none, {} cached",
            stats.records,
            stats.single_match,
            stats.multi_match,
            stats.no_match,
            stats.cache_hits
        );

        self.observer.on_phase(Phase::Merge);
        let merged = AliasMerger::new(self.config.max_variation).merge(&index);
        for relabel in &merged.relabels {
            for &id in &relabel.members {
                records[position(id)].assign(relabel.to.clone(), ResolutionState::Merged);
                stats.merged_records += 1;
            }
        }
        stats.merged_labels = merged.relabels.len();
        stats.merge_skipped = merged.skipped;
        let mut catalog = merged.catalog;

        self.observer.on_phase(Phase::Fallback);
        let unresolved: Vec<usize> = (0..records.len())
            .filter(|&i| !records[i].is_resolved())
            .collect();
        stats.fallback_assigned += fallback(&mut records, &unresolved, &mut catalog);

        self.observer.on_phase(Phase::Disambiguate);
        let queue = auto_disambiguate(&mut records, &mut catalog, &mut stats);
        if queue.is_empty() {
            log::debug!("No candidate sets need review");
        } else if self.config.interactive {
            stats.operator_sets = queue.len();
            let outcome = queue.drain_into(disambiguator, &mut catalog);
            stats.operator_approved = outcome.approved.len();
            stats.operator_cancelled = outcome.cancelled;
            log::info!(
                "Operator approved {} names over {} sets",
                outcome.approved.len(),
                outcome.answered
            );
        } else {
            log::info!(
                "{} candidate sets left unreviewed (non-interactive run)",
                queue.len()
            );
        }

        self.observer.on_phase(Phase::SecondFallback);
        let remaining: Vec<usize> = (0..records.len())
            .filter(|&i| records[i].state == ResolutionState::MultiMatch)
            .collect();
        stats.fallback_assigned += fallback(&mut records, &remaining, &mut catalog);

        stats.resolved = records.iter().filter(|r| r.is_resolved()).count();
        stats.unresolved = stats.records - stats.resolved;
        log::info!(
            "Resolved {}/{} records to {} organizations",
            stats.resolved,
            stats.records,
            catalog.populated().count()
        );

        Ok(Resolution {
            records,
            catalog,
            stats,
        })
    }

    fn extract_all(
        &self,
        records: &mut [Record],
        order: &[usize],
        index: &mut OrganizationIndex,
        stats: &mut ResolveStats,
    ) -> Result<()> {
        let total = order.len();

        if let Some(answers) = self.parallel_answers(records, order)? {
            for (done, (&slot, answer)) in order.iter().zip(answers).enumerate() {
                self.classify(&mut records[slot], answer, index, stats);
                self.observer.on_record(done + 1, total);
            }
            return Ok(());
        }

        let mut cache = ResolutionCache::new(self.config.cache_mode);
        for (done, &slot) in order.iter().enumerate() {
            let record = &mut records[slot];
            if let Some(label) = cache.lookup(&record.canonical_source_text) {
                log::debug!("Record {} reuses cached label '{}'", record.id, label);
                index.register(&label, record.id);
                record.assign(label, ResolutionState::Cached);
            } else {
                let answer = self.extract(&record.canonical_source_text);
                self.classify(record, answer, index, stats);
            }
            cache.store(
                &record.canonical_source_text,
                record.resolved_label.as_deref(),
            );
            self.observer.on_record(done + 1, total);
        }
        stats.cache_hits = cache.hits();
        Ok(())
    }

    fn extract(&self, text: &str) -> Answer {
        if text.is_empty() {
            return None;
        }
        Some(self.extractor.extract(text))
    }

    #[cfg(feature = "parallel")]
    fn parallel_answers(&self, records: &[Record], order: &[usize]) -> Result<Option<Vec<Answer>>> {
        use rayon::prelude::*;

        let workers = self.config.workers;
        if workers <= 1 {
            return Ok(None);
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| {
                crate::Error::config(format!("cannot start {} extraction workers: {}", workers, e))
            })?;
        log::info!(
            "Extracting on {} workers; the {} cache is bypassed",
            workers,
            self.config.cache_mode
        );

        let extractor = self.extractor;
        let texts: Vec<&str> = order
            .iter()
            .map(|&i| records[i].canonical_source_text.as_str())
            .collect();
        let answers = pool.install(|| {
            texts
                .par_iter()
                .map(|text| {
                    if text.is_empty() {
                        None
                    } else {
                        Some(extractor.extract(text))
                    }
                })
                .collect()
        });
        Ok(Some(answers))
    }

    #[cfg(not(feature = "parallel"))]
    fn parallel_answers(&self, _records: &[Record], _order: &[usize]) -> Result<Option<Vec<Answer>>> {
        if self.config.workers > 1 {
            log::warn!(
                "workers = {} ignored: built without the `parallel` feature",
                self.config.workers
            );
        }
        Ok(None)
    }

    fn classify(
        &self,
        record: &mut Record,
        answer: Answer,
        index: &mut OrganizationIndex,
        stats: &mut ResolveStats,
    ) {
        let candidates = match answer {
            None => Vec::new(),
            Some(Ok(candidates)) => {
                stats.extractor_calls += 1;
                candidates
            }
            Some(Err(e)) => {
                stats.extractor_calls += 1;
                stats.extractor_failures += 1;
                log::warn!(
                    "Extractor '{}' failed on record {}: {}",
                    self.extractor.name(),
                    record.id,
                    e
                );
                Vec::new()
            }
        };

        match candidates.len() {
            0 => {
                record.set_state(ResolutionState::NoMatch);
                stats.no_match += 1;
            }
            1 => {
                let label = trim_label(&candidates[0]).to_string();
                if label.is_empty() {
                    record.set_state(ResolutionState::NoMatch);
                    stats.no_match += 1;
                } else {
                    index.register(&label, record.id);
                    record.assign(label, ResolutionState::SingleMatch);
                    stats.single_match += 1;
                }
            }
            n => {
                log::debug!("Record {} has {} candidates", record.id, n);
                record.set_state(ResolutionState::MultiMatch);
                stats.multi_match += 1;
            }
        }
        record.candidates = candidates;
    }
}

fn position(id: RecordId) -> usize {
    id as usize
}

/// Label each record in `slots` with the first catalog label its canonical
/// text contains. Returns how many were labelled.
fn fallback(records: &mut [Record], slots: &[usize], catalog: &mut OrganizationCatalog) -> usize {
    let assignments: Vec<(usize, String)> = {
        let matcher = FallbackMatcher::new(catalog);
        slots
            .iter()
            .filter_map(|&slot| {
                matcher
                    .find(&records[slot].canonical_source_text)
                    .map(|label| (slot, label.to_string()))
            })
            .collect()
    };

    for (slot, label) in &assignments {
        let record = &mut records[*slot];
        log::debug!("Record {} falls back to '{}'", record.id, label);
        catalog.add_member(label, record.id);
        record.assign(label.clone(), ResolutionState::FallbackAssigned);
    }
    assignments.len()
}

/// Settle multi-candidate records whose trimmed candidate occurs inside a
/// catalog label; queue the rest for the operator.
fn auto_disambiguate(
    records: &mut [Record],
    catalog: &mut OrganizationCatalog,
    stats: &mut ResolveStats,
) -> DisambiguationQueue {
    let mut queue = DisambiguationQueue::new();
    let mut settled: Vec<(usize, String, String)> = Vec::new();
    {
        let matcher = FallbackMatcher::new(catalog);
        for (slot, record) in records.iter().enumerate() {
            if record.state != ResolutionState::MultiMatch {
                continue;
            }
            let trimmed: Vec<&str> = record
                .candidates
                .iter()
                .map(|c| trim_label(c))
                .filter(|c| !c.is_empty())
                .collect();
            let hit = trimmed.iter().find_map(|&candidate| {
                matcher
                    .find_containing(candidate)
                    .map(|label| (candidate, label))
            });
            match hit {
                Some((candidate, label)) => {
                    settled.push((slot, candidate.to_string(), label.to_string()))
                }
                None => {
                    queue.push(&trimmed);
                }
            }
        }
    }

    for (slot, candidate, label) in settled {
        let record = &mut records[slot];
        log::debug!(
            "Record {} settles on '{}' (inside '{}')",
            record.id,
            candidate,
            label
        );
        catalog.add_alias(&label, &candidate, Some(record.id));
        record.assign(candidate, ResolutionState::Disambiguated);
        stats.auto_disambiguated += 1;
    }
    queue
}
