//! Performance benchmarks for the merge engine.
//!
//! Two synthetic extraction passes over a multi-page form are merged:
//! - Sparse: few attributes per page, most of them overlapping once
//! - Dense: many attributes per page with long overlap chains

use std::collections::BTreeMap;

use attrmerge::{MergeOptions, SpatialMergeEngine};
use attrmerge_core::{PageInfo, RasterZone, Rect, SpatialAttribute, SpatialText};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

// ---------------------------------------------------------------------------
// Fixture generators
// ---------------------------------------------------------------------------

/// Two passes of `fields` attributes on each of `pages` pages. The second
/// pass is shifted by `shift` pixels so that consecutive fields chain together
/// when `shift` exceeds the field spacing.
fn build_attributes(pages: u32, fields: i64, shift: i64) -> Vec<SpatialAttribute> {
    let mut attrs = Vec::new();
    for page in 1..=pages {
        for pass in 0..2 {
            for i in 0..fields {
                let top = i * 40 + pass * shift;
                let zone = RasterZone::new(page, Rect::new(100, top, 600, top + 30));
                attrs.push(SpatialAttribute::new(
                    format!("Field{i}"),
                    SpatialText::new(format!("value {i}"), vec![zone]),
                ));
            }
        }
    }
    attrs
}

fn build_doc(pages: u32) -> BTreeMap<u32, PageInfo> {
    (1..=pages).map(|p| (p, PageInfo::new(2550, 3300))).collect()
}

fn bench_merge(c: &mut Criterion) {
    let sparse = build_attributes(10, 10, 2);
    let dense = build_attributes(2, 60, 20);
    let options = MergeOptions {
        overlap_threshold_percent: 10.0,
        ..MergeOptions::default()
    };

    let mut group = c.benchmark_group("find_qualified_merges");
    group.bench_function("sparse", |b| {
        let doc = build_doc(10);
        let mut engine = SpatialMergeEngine::new(options.clone()).unwrap();
        b.iter(|| engine.find_qualified_merges(black_box(&sparse), &doc).unwrap())
    });
    group.bench_function("dense", |b| {
        let doc = build_doc(2);
        let mut engine = SpatialMergeEngine::new(options.clone()).unwrap();
        b.iter(|| engine.find_qualified_merges(black_box(&dense), &doc).unwrap())
    });
    group.finish();

    c.bench_function("merge_attributes/sparse", |b| {
        let doc = build_doc(10);
        let mut engine = SpatialMergeEngine::new(options.clone()).unwrap();
        b.iter(|| {
            let mut attrs = sparse.clone();
            engine.merge_attributes(&mut attrs, &doc).unwrap();
            attrs
        })
    });
}

criterion_group!(benches, bench_merge);
criterion_main!(benches);
