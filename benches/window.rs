//! Cursor and stepping window benchmarks for jagmem
//!
//! These benchmarks measure jagged record decoding and the cost of the
//! different width/step combinations over a region of length-prefixed names.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box as hint_black_box;
use jagmem::{
    AlignmentPolicy, ByteRegion, Datum, FieldSpec, LayoutDescriptor, RecordCursor, RecordWriter,
    ScalarType, SteppingWindow, WindowConfig, WindowContents,
};

const NAMES: [&str; 8] = [
    "C", "Java", "Go", "Rust", "Haskell", "OCaml", "Zig", "TypeScript",
];

fn layout() -> LayoutDescriptor {
    LayoutDescriptor::build(vec![
        FieldSpec::scalar("id", ScalarType::I32),
        FieldSpec::scalar("name_len", ScalarType::U16),
        FieldSpec::var("name", "name_len").terminated(),
    ])
    .unwrap()
    .with_alignment(AlignmentPolicy::Relaxed)
}

fn build_region(layout: &LayoutDescriptor, records: usize) -> Vec<u8> {
    let rows: Vec<[Datum<'static>; 3]> = (0..records)
        .map(|i| {
            [
                Datum::Signed(i as i64),
                Datum::Derived,
                Datum::from(NAMES[i % NAMES.len()]),
            ]
        })
        .collect();
    let total: usize = rows
        .iter()
        .map(|values| RecordWriter::encoded_len(layout, values).unwrap())
        .sum();

    let mut bytes = vec![0u8; total];
    let mut writer = RecordWriter::new(layout, &mut bytes);
    for values in &rows {
        writer.write(values).unwrap();
    }
    bytes
}

fn bench_cursor(c: &mut Criterion) {
    let mut group = c.benchmark_group("cursor");
    let layout = layout();

    for records in [64usize, 4096] {
        let bytes = build_region(&layout, records);
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_with_input(BenchmarkId::new("decode_next", records), &bytes, |b, bytes| {
            b.iter(|| {
                let mut cursor = RecordCursor::new(ByteRegion::new(black_box(bytes)), &layout);
                let mut ids = 0i64;
                while let Some(record) = cursor.decode_next().unwrap() {
                    ids += record.i64("id").unwrap();
                }
                hint_black_box(ids)
            });
        });
    }

    group.bench_function("decode_at_single", |b| {
        let bytes = build_region(&layout, 1);
        let region = ByteRegion::new(&bytes);
        b.iter(|| hint_black_box(RecordCursor::new(region, &layout).decode_at(black_box(0))));
    });

    group.finish();
}

fn bench_windows(c: &mut Criterion) {
    let mut group = c.benchmark_group("stepping_window");
    let layout = layout();
    let bytes = build_region(&layout, 4096);
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    let configs = [
        ("records_tiling", WindowConfig::records(16)),
        ("records_overlap", WindowConfig::records(16).step_records(4)),
        ("records_gap", WindowConfig::records(4).step_records(16)),
        ("bytes_tiling", WindowConfig::bytes(256)),
        ("bytes_record_step", WindowConfig::bytes(256).step_records(8)),
        (
            "bytes_raw_span",
            WindowConfig::bytes(256).contents(WindowContents::RawSpan),
        ),
    ];

    for (name, config) in configs {
        group.bench_function(name, |b| {
            b.iter(|| {
                let windows =
                    SteppingWindow::new(ByteRegion::new(black_box(&bytes)), &layout, config).unwrap();
                let mut records = 0usize;
                for window in windows {
                    records += window.unwrap().len();
                }
                hint_black_box(records)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_cursor, bench_windows);
criterion_main!(benches);
