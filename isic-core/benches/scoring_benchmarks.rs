//! Performance benchmarks for CSV parsing and ranking metrics
//!
//! Run with: cargo bench --bench scoring_benchmarks

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use isic_core::metrics::{average_precision, roc_curve, specificity_at_sensitivity};
use isic_core::{parse_csv, TableSchema};
use std::hint::black_box;

/// Deterministic pseudo-random value in [0, 1)
fn pseudo_random(seed: usize) -> f64 {
    let x = (seed as u64)
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    (x >> 11) as f64 / (1u64 << 53) as f64
}

/// Generate a prediction CSV with the given number of rows
fn generate_csv(rows: usize) -> String {
    let schema = TableSchema::isic_2018();
    let mut csv = format!("image,{}\n", schema.categories.join(","));
    for row in 0..rows {
        csv.push_str(&format!("ISIC_{row:07}"));
        for category in 0..schema.categories.len() {
            csv.push_str(&format!(",{:.6}", pseudo_random(row * 7 + category)));
        }
        csv.push('\n');
    }
    csv
}

fn bench_parse_csv(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_csv");
    let schema = TableSchema::isic_2018();

    for rows in [100, 1_000, 10_000] {
        let csv = generate_csv(rows);
        group.throughput(Throughput::Bytes(csv.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &csv, |b, csv| {
            b.iter(|| parse_csv(black_box(csv.as_bytes()), &schema).unwrap());
        });
    }

    group.finish();
}

fn bench_ranking_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranking_metrics");

    for samples in [1_000, 10_000, 100_000] {
        let labels: Vec<bool> = (0..samples).map(|i| pseudo_random(i) < 0.2).collect();
        let scores: Vec<f64> = (0..samples).map(|i| pseudo_random(i + samples)).collect();
        group.throughput(Throughput::Elements(samples as u64));

        group.bench_with_input(BenchmarkId::new("roc_curve", samples), &samples, |b, _| {
            b.iter(|| roc_curve(black_box(&labels), black_box(&scores)).unwrap());
        });
        group.bench_with_input(
            BenchmarkId::new("average_precision", samples),
            &samples,
            |b, _| b.iter(|| average_precision(black_box(&labels), black_box(&scores)).unwrap()),
        );
        group.bench_with_input(
            BenchmarkId::new("spec_at_sens", samples),
            &samples,
            |b, _| {
                b.iter(|| {
                    specificity_at_sensitivity(black_box(&labels), black_box(&scores), 0.89)
                        .unwrap()
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_parse_csv, bench_ranking_metrics);
criterion_main!(benches);
