use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use outlier_engine::IqrClassifier;
use schema_normalizer::Measurement;

const POLLUTANTS: [&str; 6] = ["PM2.5", "PM10", "NO2", "O3", "CO", "SO2"];

fn synthetic(n: usize) -> Vec<Measurement> {
    (0..n)
        .map(|i| {
            let pollutant = POLLUTANTS[i % POLLUTANTS.len()];
            // deterministic spread with a spike every 97 rows
            let base = ((i * 7919) % 100) as f64 / 10.0 + 20.0;
            let value = if i % 97 == 0 { base * 10.0 } else { base };
            Measurement::new(pollutant, value)
        })
        .collect()
}

fn bench_enrich(c: &mut Criterion) {
    let classifier = IqrClassifier::default();
    let mut group = c.benchmark_group("enrich");

    for size in [1_000usize, 10_000, 100_000] {
        let measurements = synthetic(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &measurements, |b, m| {
            b.iter(|| classifier.enrich(black_box(m.clone())))
        });
    }

    group.finish();
}

fn bench_classify_group(c: &mut Criterion) {
    let classifier = IqrClassifier::default();
    let values: Vec<f64> = synthetic(50_000).into_iter().map(|m| m.value).collect();

    c.bench_function("classify_group_50k", |b| {
        b.iter(|| classifier.classify(black_box(&values)))
    });
}

criterion_group!(benches, bench_enrich, bench_classify_group);
criterion_main!(benches);
