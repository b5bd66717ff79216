use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};
use std::sync::Arc;
use synoptic_processor::models::{DayPayload, MeanPolicy, Reduction};
use synoptic_processor::processors::{
    reduce_values, HourlyReducer, ObservationNormalizer, StationRegistry, TableAssembler,
};
use synoptic_processor::utils::Settings;

// One month of days, each station reporting every five minutes over a 10 hour window
fn create_test_days(station_count: usize, days: u32) -> Vec<DayPayload> {
    (1..=days)
        .map(|day| {
            let stations: Vec<Value> = (1..=station_count)
                .map(|id| {
                    let times: Vec<String> = (0..120)
                        .map(|i| format!("2023-06-{:02}T{:02}:{:02}:00Z", day, 8 + i / 12, (i % 12) * 5))
                        .collect();
                    let temps: Vec<Value> = (0..120)
                        .map(|i| {
                            if i % 7 == 0 {
                                Value::Null
                            } else {
                                json!(15.0 + (i as f64) * 0.1 + id as f64)
                            }
                        })
                        .collect();
                    let precip: Vec<f64> = (0..120).map(|i| i as f64 * 0.01).collect();

                    json!({
                        "ID": id.to_string(),
                        "STID": format!("ST{:04}", id),
                        "MNET_ID": "1",
                        "LONGITUDE": "-104.6",
                        "LATITUDE": "39.8",
                        "OBSERVATIONS": {
                            "date_time": times,
                            "air_temp_set_1": temps,
                            "relative_humidity_set_1": temps,
                            "precip_accum_set_1": precip
                        }
                    })
                })
                .collect();

            DayPayload::decode(&format!("2023_06_{}", day), json!({ "STATION": stations }), "date_time")
                .unwrap()
        })
        .collect()
}

fn benchmark_normalize_and_reduce(c: &mut Criterion) {
    let catalog = Arc::new(Settings::default().catalog());
    let mut group = c.benchmark_group("normalize_reduce");

    for station_count in [1usize, 10, 50] {
        let days = create_test_days(station_count, 30);

        group.bench_with_input(
            BenchmarkId::from_parameter(station_count),
            &days,
            |b, days| {
                b.iter(|| {
                    let (registry, retained) = StationRegistry::extract(days);
                    let buckets =
                        ObservationNormalizer::new(Arc::clone(&catalog)).normalize(retained, &registry);
                    let rows = HourlyReducer::new(Arc::clone(&catalog)).reduce(buckets);
                    let table = TableAssembler::new(Arc::clone(&catalog)).assemble(&rows).unwrap();
                    black_box(table.num_rows())
                })
            },
        );
    }

    group.finish();
}

fn benchmark_reduce_values(c: &mut Criterion) {
    let values: Vec<Option<f64>> = (0..60)
        .map(|i| if i % 5 == 0 { None } else { Some(i as f64) })
        .collect();

    c.bench_function("reduce_mean_non_null", |b| {
        b.iter(|| reduce_values(Reduction::Mean, MeanPolicy::NonNull, black_box(&values)))
    });

    c.bench_function("reduce_max", |b| {
        b.iter(|| reduce_values(Reduction::Max, MeanPolicy::PeekFirst, black_box(&values)))
    });
}

criterion_group!(benches, benchmark_normalize_and_reduce, benchmark_reduce_values);
criterion_main!(benches);
