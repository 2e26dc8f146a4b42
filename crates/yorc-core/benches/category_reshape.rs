//! Benchmarks for reshaping month × category rows.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use yorc_core::aggregate::reshape_by_month;
use yorc_store::CategoryCount;

const FRAMEWORKS: &[&str] = &["react", "angularX", "vue", "svelte", ""];

fn rows(months: usize) -> Vec<CategoryCount> {
    let mut out = Vec::with_capacity(months * FRAMEWORKS.len());
    for m in 0..months {
        let key = format!("{:04}{:02}", 2000 + m / 12, m % 12 + 1);
        for (i, value) in FRAMEWORKS.iter().enumerate() {
            out.push(CategoryCount {
                month_key: key.clone(),
                value: (*value).to_string(),
                count: (m * 7 + i) as u64,
            });
        }
    }
    out
}

fn bench_reshape(c: &mut Criterion) {
    let mut group = c.benchmark_group("reshape_by_month");
    for months in [12usize, 120, 1200] {
        let input = rows(months);
        group.bench_with_input(BenchmarkId::from_parameter(months), &input, |b, input| {
            b.iter(|| reshape_by_month(black_box(input.clone())))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_reshape);
criterion_main!(benches);
