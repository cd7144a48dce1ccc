//! Canonicalization and end-to-end resolve throughput.
//!
//! ```bash
//! cargo bench --bench resolve
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use orgtract::{
    canonicalize, CacheMode, Resolver, ResolverConfig, SkipDisambiguator, SuffixExtractor,
};

const SAMPLES: &[&str] = &[
    "Pagto NF.1234- Acme Ltda - ME 03/2021",
    "TED ACME LTDA 12345678901",
    "Beta S/A",
    "transfer to beta s.a.",
    "Gamma Sp. z o.o.",
    "RPS: 555 Delta B.V.",
    "INVOICE #77 Omega Ltd- SmallCo2",
    "tarifa bancaria",
];

fn synthetic_ledger(rows: usize) -> Vec<String> {
    (0..rows)
        .map(|i| format!("{} {}", SAMPLES[i % SAMPLES.len()], i % 37))
        .collect()
}

fn bench_canonicalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("canonicalize");
    group.throughput(Throughput::Elements(SAMPLES.len() as u64));
    group.bench_function("samples", |b| {
        b.iter(|| {
            for s in SAMPLES {
                black_box(canonicalize(black_box(s)));
            }
        })
    });
    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let ledger = synthetic_ledger(2_000);
    let extractor = SuffixExtractor::new();

    let mut group = c.benchmark_group("resolve");
    group.throughput(Throughput::Elements(ledger.len() as u64));
    group.sample_size(20);

    for (name, mode) in [("adjacent", CacheMode::Adjacent), ("memo", CacheMode::Memo)] {
        let config = ResolverConfig::default()
            .with_max_variation(2)
            .with_cache_mode(mode)
            .with_interactive(false);
        group.bench_function(name, |b| {
            b.iter(|| {
                let out = Resolver::new(config.clone(), &extractor)
                    .resolve(black_box(ledger.as_slice()), &mut SkipDisambiguator)
                    .unwrap();
                black_box(out.stats.resolved)
            })
        });
    }

    #[cfg(feature = "parallel")]
    {
        let config = ResolverConfig::default()
            .with_max_variation(2)
            .with_workers(4)
            .with_interactive(false);
        group.bench_function("parallel-4", |b| {
            b.iter(|| {
                let out = Resolver::new(config.clone(), &extractor)
                    .resolve(black_box(ledger.as_slice()), &mut SkipDisambiguator)
                    .unwrap();
                black_box(out.stats.resolved)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_canonicalize, bench_resolve);
criterion_main!(benches);
