use brc_processor::processors::{process_file, PipelineConfig, Strategy};
use brc_processor::readers::{parse_value, RecordTokenizer};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::Write;
use tempfile::NamedTempFile;

const STATIONS: [&str; 12] = [
    "Abha", "Accra", "Bergen", "Bulawayo", "Cairo", "Dublin", "Hamburg", "Istanbul",
    "Palembang", "St. John's", "Tromsø", "Zürich",
];

// Create test data for benchmarking
fn create_measurements(lines: usize) -> String {
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    let mut out = String::with_capacity(lines * 16);
    for _ in 0..lines {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let station = STATIONS[(state >> 33) as usize % STATIONS.len()];
        let tenths = ((state >> 11) % 1999) as i64 - 999;
        out.push_str(&format!("{};{:.1}\n", station, tenths as f64 / 10.0));
    }
    out
}

fn benchmark_tokenizer(c: &mut Criterion) {
    let data = create_measurements(100_000);
    let mut group = c.benchmark_group("tokenizer");
    group.throughput(Throughput::Bytes(data.len() as u64));

    group.bench_function("tokenize_100k_lines", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for record in RecordTokenizer::new(black_box(data.as_bytes())) {
                let (_, value) = record.unwrap();
                sum += value;
            }
            black_box(sum)
        })
    });

    group.bench_function("parse_value", |b| {
        let samples: [&[u8]; 4] = [b"-12.3", b"0.0", b"99.9", b"-7.5"];
        b.iter(|| {
            for sample in samples {
                black_box(parse_value(black_box(sample)));
            }
        })
    });

    group.finish();
}

fn benchmark_strategies(c: &mut Criterion) {
    let data = create_measurements(500_000);
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(data.as_bytes()).unwrap();
    file.flush().unwrap();

    let runtime = tokio::runtime::Runtime::new().unwrap();
    let config = PipelineConfig::new(num_cpus::get()).with_chunk_size(256 * 1024);

    let mut group = c.benchmark_group("strategies");
    group.sample_size(10);
    group.throughput(Throughput::Bytes(data.len() as u64));

    for strategy in [Strategy::Pipeline, Strategy::Mapped, Strategy::Sequential] {
        group.bench_with_input(
            BenchmarkId::from_parameter(strategy),
            &strategy,
            |b, &strategy| {
                b.iter(|| {
                    let outcome = runtime
                        .block_on(process_file(strategy, file.path(), &config, None))
                        .unwrap();
                    black_box(outcome.table.len())
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_tokenizer, benchmark_strategies);
criterion_main!(benches);
