use std::{iter::repeat_with, sync::Arc};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use graphrow::{FieldKind, RowSchema, RowSetWriter, RowWriter, SchemaField, SchemaProvider};

fn schema(width: usize) -> Arc<dyn SchemaProvider> {
    let fields = (0..width)
        .map(|idx| {
            let kind = match idx % 4 {
                0 => FieldKind::Vid,
                1 => FieldKind::String,
                2 => FieldKind::Int,
                _ => FieldKind::Double,
            };
            SchemaField::new(format!("f{idx}"), kind)
        })
        .collect();
    Arc::new(RowSchema::new(fields).with_version(1))
}

#[inline(never)]
fn encode_row(schema: &Arc<dyn SchemaProvider>, text: &str) -> RowWriter {
    let mut writer = RowWriter::new(Arc::clone(schema));
    for idx in 0..schema.num_fields() {
        match idx % 4 {
            0 => writer.write(fastrand::i64(..)),
            1 => writer.write(text),
            2 => writer.write(fastrand::i32(..)),
            _ => writer.write(fastrand::f64()),
        }
        .unwrap();
    }
    writer
}

fn single_row(c: &mut Criterion) {
    let mut group = c.benchmark_group("row");
    let text: String = repeat_with(fastrand::alphanumeric).take(32).collect();

    for width in [4, 16, 64, 256] {
        let schema = schema(width);
        group.bench_with_input(BenchmarkId::new("encode", width), &width, |b, _| {
            b.iter(|| encode_row(&schema, &text).into_cord().unwrap());
        });
    }

    group.finish();
}

fn row_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("row_set");
    let text: String = repeat_with(fastrand::alphanumeric).take(32).collect();
    let schema = schema(32);

    for batch in [1, 16, 128] {
        group.throughput(Throughput::Elements(batch as u64));
        group.bench_with_input(BenchmarkId::new("owned", batch), &batch, |b, batch| {
            b.iter(|| {
                let mut rows = RowSetWriter::new(Arc::clone(&schema));
                for _ in 0..*batch {
                    rows.add_row(encode_row(&schema, &text)).unwrap();
                }
                rows.into_bytes()
            });
        });
        group.bench_with_input(BenchmarkId::new("copied", batch), &batch, |b, batch| {
            b.iter(|| {
                let mut rows = RowSetWriter::new(Arc::clone(&schema));
                for _ in 0..*batch {
                    let mut writer = encode_row(&schema, &text);
                    rows.add_encoded(&mut writer).unwrap();
                }
                rows.into_bytes()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, single_row, row_set);
criterion_main!(benches);
