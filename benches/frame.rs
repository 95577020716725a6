//! Criterion benchmarks for the frame codec (encode/decode).
//!
//! Run with:
//!   cargo bench --bench frame

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use refinery::chunk::Chunk;
use refinery::frame::{decode_all, encode_stream, Record};

fn synthetic_chunks(count: usize, payload_size: usize) -> Vec<Record> {
    (0..count)
        .map(|i| Record::Chunk(Chunk::root(vec![b'a' + (i % 26) as u8; payload_size])))
        .collect()
}

fn bench_frame_encode_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_encode_decode");

    for &payload_size in &[256usize, 4096, 65_536] {
        let records = synthetic_chunks(64, payload_size);
        let total_bytes = (64 * payload_size) as u64;

        group.throughput(Throughput::Bytes(total_bytes));
        group.bench_with_input(
            BenchmarkId::new("encode_stream", payload_size),
            &records,
            |b, records| {
                b.iter(|| {
                    let mut out = Vec::new();
                    encode_stream(&mut out, records.clone()).unwrap();
                })
            },
        );

        let mut encoded = Vec::new();
        encode_stream(&mut encoded, records.clone()).unwrap();

        group.throughput(Throughput::Bytes(total_bytes));
        group.bench_with_input(
            BenchmarkId::new("decode_all", payload_size),
            &encoded,
            |b, encoded| {
                b.iter(|| decode_all(encoded.as_slice()).unwrap())
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_frame_encode_decode);
criterion_main!(benches);
