use campaignctl_core::{extract_variables, BulkImportReport, Counters};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn template_with(placeholders: usize) -> String {
    (0..placeholders)
        .map(|i| format!("Hello {{{{var{}}}}}, your order ships soon. ", i % 8))
        .collect()
}

fn bench_extract_variables(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_variables");
    for size in [1usize, 16, 256] {
        let content = template_with(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &content, |b, content| {
            b.iter(|| black_box(extract_variables(black_box(content))))
        });
    }
    group.finish();
}

fn bench_rates(c: &mut Criterion) {
    let counters = Counters::new(125_000, 118_750, 64_000, 3_200);
    c.bench_function("Counters::rates", |b| {
        b.iter(|| black_box(black_box(counters).rates()))
    });
}

fn bench_import_report(c: &mut Criterion) {
    c.bench_function("BulkImportReport::record_1000", |b| {
        b.iter(|| {
            let mut report = BulkImportReport::new();
            for i in 0..1000 {
                if i % 10 == 0 {
                    report.record_failure(i, format!("+1555{i:07}"), "Phone number already exists");
                } else {
                    report.record_success();
                }
            }
            black_box(report.message())
        })
    });
}

criterion_group!(benches, bench_extract_variables, bench_rates, bench_import_report);
criterion_main!(benches);
