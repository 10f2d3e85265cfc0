//! Benchmarks for the response matcher.
//!
//! Benchmark targets:
//! - Substring hit against the built-in catalog: <5us
//! - Full miss (all three tiers scanned): <20us
//! - Scaling with catalog size up to 1000 entries

// Criterion macros generate items without docs - this is expected for benchmarks
#![allow(missing_docs)]
#![allow(clippy::expect_used)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use docchat::catalog::Catalog;
use docchat::find_match;
use docchat::models::CatalogEntry;
use std::hint::black_box;
use std::time::Duration;

// ============================================================================
// Built-in Catalog
// ============================================================================

const SUBSTRING_QUERY: &str = "hello there";
const OVERLAP_QUERY: &str = "tell me what you can do";
const PARTIAL_QUERY: &str = "any compliance issues?";
const MISS_QUERY: &str = "xyz qqq zzz";

fn bench_embedded_catalog(c: &mut Criterion) {
    let catalog = Catalog::embedded().expect("embedded catalog is valid");
    let mut group = c.benchmark_group("embedded_catalog");
    group.measurement_time(Duration::from_secs(5));

    for (name, query) in [
        ("substring", SUBSTRING_QUERY),
        ("overlap", OVERLAP_QUERY),
        ("partial", PARTIAL_QUERY),
        ("miss", MISS_QUERY),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| catalog.resolve(black_box(query)).entry.id);
        });
    }

    group.finish();
}

// ============================================================================
// Catalog Size Scaling
// ============================================================================

fn synthetic_entries(count: usize) -> Vec<CatalogEntry> {
    (0..count)
        .map(|i| {
            CatalogEntry::new(
                i as u64,
                format!("topic{i} quarterly review section{i}"),
                format!("answer {i}"),
            )
        })
        .collect()
}

fn bench_catalog_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog_size");

    for count in [10, 100, 1000] {
        let entries = synthetic_entries(count);
        group.throughput(Throughput::Elements(count as u64));

        // Miss forces every tier to scan every entry.
        group.bench_with_input(BenchmarkId::new("miss", count), &entries, |b, entries| {
            b.iter(|| find_match(black_box("unrelated words only"), entries).is_none());
        });

        group.bench_with_input(BenchmarkId::new("last_entry", count), &entries, |b, entries| {
            let query = format!("topic{}", count - 1);
            b.iter(|| find_match(black_box(&query), entries).map(|m| m.entry.id));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_embedded_catalog, bench_catalog_size);
criterion_main!(benches);
