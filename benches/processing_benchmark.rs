use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndvi_importer::models::RawNdviRow;
use ndvi_importer::processors::NdviTransformer;
use ndvi_importer::readers::NdviReader;
use ndvi_importer::utils::coordinates::wkt_point;

// One row per 0.25° cell, like the global monthly composites
fn create_test_rows(count: usize) -> Vec<RawNdviRow> {
    (0..count)
        .map(|i| {
            let lat = 89.875 - (i / 1440) as f64 * 0.25;
            let lon = -179.875 + (i % 1440) as f64 * 0.25;
            let ndvi = if i % 7 == 0 {
                "99999.0".to_string()
            } else {
                format!("{:.4}", (i % 1000) as f64 / 1000.0)
            };

            RawNdviRow {
                system_index: Some(format!("{}_{}", i / 1440, i % 1440)),
                latitude: lat.to_string(),
                longitude: lon.to_string(),
                ndvi_value: ndvi,
                measurement_date: "2025-05-01".to_string(),
            }
        })
        .collect()
}

fn create_test_csv(count: usize) -> String {
    let mut csv = String::from("system:index,latitude,longitude,ndvi_value,measurement_date,.geo\n");
    for row in create_test_rows(count) {
        csv.push_str(&format!(
            "{},{},{},{},{},\n",
            row.system_index.unwrap_or_default(),
            row.latitude,
            row.longitude,
            row.ndvi_value,
            row.measurement_date
        ));
    }
    csv
}

fn benchmark_transformer(c: &mut Criterion) {
    let mut group = c.benchmark_group("transformer");

    for row_count in [10_000, 100_000].iter() {
        let rows = create_test_rows(*row_count);

        for workers in [1, 4].iter() {
            group.bench_with_input(
                BenchmarkId::new(format!("{}_workers", workers), row_count),
                &rows,
                |b, rows| {
                    let transformer = NdviTransformer::new(*workers);
                    b.iter(|| transformer.transform(black_box(rows)).unwrap())
                },
            );
        }
    }

    group.finish();
}

fn benchmark_csv_parsing(c: &mut Criterion) {
    let csv = create_test_csv(50_000);

    c.bench_function("parse_rows_50k", |b| {
        let reader = NdviReader::new();
        b.iter(|| reader.parse_rows(black_box(csv.as_bytes())).unwrap())
    });
}

fn benchmark_wkt_point(c: &mut Criterion) {
    c.bench_function("wkt_point", |b| {
        b.iter(|| wkt_point(black_box(-179.875), black_box(89.875)))
    });
}

criterion_group!(
    benches,
    benchmark_transformer,
    benchmark_csv_parsing,
    benchmark_wkt_point
);
criterion_main!(benches);
