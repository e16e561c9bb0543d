use std::hint::black_box;
use std::time::{Duration, Instant};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tempfile::tempdir;
use tumpuk::storage::env::DbEnv;
use tumpuk::storage::heap_table::HeapTable;
use tumpuk::types::value::{ColumnAttribute, DataType, Value};
use tumpuk::types::{ColumnAttributes, ColumnNames, ValueDict};

const DATASET_SIZES: &[usize] = &[1_000, 5_000];

fn table_columns() -> (ColumnNames, ColumnAttributes) {
    (
        vec!["id".to_string(), "name".to_string()],
        vec![
            ColumnAttribute::new(DataType::Integer),
            ColumnAttribute::new(DataType::Text),
        ],
    )
}

fn sample_row(i: i32) -> ValueDict {
    let mut row = ValueDict::new();
    row.insert("id".to_string(), Value::Integer(i));
    row.insert("name".to_string(), Value::Text(format!("row_{:08}", i)));
    row
}

fn benchmark_insert_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("heap_insert_throughput");
    for &size in DATASET_SIZES {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for _ in 0..iters {
                    let dir = tempdir().unwrap();
                    let env = DbEnv::open(dir.path()).unwrap();
                    let (names, attributes) = table_columns();
                    let mut table = HeapTable::new(&env, "bench_rows", names, attributes);
                    table.create().unwrap();
                    let start = Instant::now();
                    for i in 0..size {
                        black_box(table.insert(&sample_row(i as i32)).unwrap());
                    }
                    total += start.elapsed();
                }
                total
            });
        });
    }
    group.finish();
}

fn benchmark_full_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("heap_full_scan");
    for &size in DATASET_SIZES {
        let dir = tempdir().unwrap();
        let env = DbEnv::open(dir.path()).unwrap();
        let (names, attributes) = table_columns();
        let mut table = HeapTable::new(&env, "bench_scan", names, attributes);
        table.create().unwrap();
        for i in 0..size {
            table.insert(&sample_row(i as i32)).unwrap();
        }

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let handles = table.select().unwrap();
                assert_eq!(handles.len(), size);
                for handle in handles {
                    black_box(table.project(handle).unwrap());
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_insert_throughput, benchmark_full_scan);
criterion_main!(benches);
