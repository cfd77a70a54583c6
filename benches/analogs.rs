//! Run these benches with `cargo bench --bench analogs -- --verbose`
use criterion::{criterion_group, criterion_main, Criterion};
use gradient_wind_analysis::{AnalogQuery, Calendar, StationStore, StoreConfig};
use metfor::{MetersPSec, WindSpdDir};

mod utils;

fn build_tester() -> Criterion {
    Criterion::default()
        .sample_size(100)
        .measurement_time(std::time::Duration::from_secs(10))
        .noise_threshold(0.03)
        .significance_level(0.01)
}

criterion_main!(analog_benches);

criterion_group!(
    name = analog_benches;
    config = build_tester();
    targets = ingest_bench, window_query_bench, wind_filter_query_bench
);

fn ingest_bench(c: &mut Criterion) {
    let lines = utils::climatology_lines();

    c.bench_function("ingest", |b| {
        b.iter(|| {
            let _x = StationStore::from_lines("BNCH", StoreConfig::new(), &lines).expect("oops");
        });
    });
}

fn window_query_bench(c: &mut Criterion) {
    let store = utils::load_store(Calendar::DayOfYear);
    let queries: Vec<_> = (1..=365)
        .step_by(30)
        .map(|doy| AnalogQuery::around(doy, 15, 12, 6))
        .collect();

    c.bench_function("window_query", |b| {
        b.iter(|| {
            for query in &queries {
                let _x = store.query(query);
            }
        });
    });
}

fn wind_filter_query_bench(c: &mut Criterion) {
    let store = utils::load_store(Calendar::Month);
    let queries: Vec<_> = (1..=12)
        .map(|month| {
            AnalogQuery::around(month, 1, 0, 6)
                .with_gradient_wind(WindSpdDir {
                    speed: MetersPSec(8.0),
                    direction: f64::from(month) * 30.0,
                })
                .with_tolerance(MetersPSec(5.0))
        })
        .collect();

    assert!(queries.iter().any(|q| !store.query(q).is_empty()));

    c.bench_function("wind_filter_query", |b| {
        b.iter(|| {
            for query in &queries {
                let _x = store.query(query);
            }
        });
    });
}
