use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use json_kv_store::{JsonFileStore, KeyValueStore, MemoryStore, Value};
use std::hint::black_box;
use std::time::Duration;

fn bench_set_get_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_get_remove");
    for size in [10, 100] {
        group.bench_with_input(BenchmarkId::new("json_file", size), &size, |b, &size| {
            let dir = tempfile::tempdir().unwrap();
            let store = JsonFileStore::new(dir.path().join("bench.json"));
            b.iter(|| {
                for i in 0..size {
                    store.set(&format!("k{i}"), Value::Int(i)).unwrap();
                }
                for i in 0..size {
                    black_box(store.get(&format!("k{i}")).unwrap());
                }
                for i in 0..size {
                    store.remove(&format!("k{i}")).unwrap();
                }
            });
        });
        group.bench_with_input(BenchmarkId::new("memory", size), &size, |b, &size| {
            let store = MemoryStore::new();
            b.iter(|| {
                for i in 0..size {
                    store.set(&format!("k{i}"), Value::Int(i)).unwrap();
                }
                for i in 0..size {
                    black_box(store.get(&format!("k{i}")).unwrap());
                }
                for i in 0..size {
                    store.remove(&format!("k{i}")).unwrap();
                }
            });
        });
    }
}

fn bench_get_multiple(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_multiple");
    for size in [100, 1000] {
        group.bench_with_input(BenchmarkId::new("json_file", size), &size, |b, &size| {
            let dir = tempfile::tempdir().unwrap();
            let store = JsonFileStore::new(dir.path().join("bench.json"));
            let keys: Vec<String> = (0..size).map(|i| format!("k{i}")).collect();
            for (i, k) in keys.iter().enumerate() {
                store.set(k, Value::from(format!("value {i}"))).unwrap();
            }
            let requested: Vec<&str> = keys.iter().map(String::as_str).collect();
            b.iter(|| black_box(store.get_multiple(&requested).unwrap()));
        });
    }
}

fn bench_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort");
    group.sample_size(50);
    group.measurement_time(Duration::from_secs(8));
    for size in [100, 1000] {
        group.bench_with_input(BenchmarkId::new("json_file", size), &size, |b, &size| {
            let dir = tempfile::tempdir().unwrap();
            let store = JsonFileStore::new(dir.path().join("bench.json"));
            for i in 0..size {
                store.set(&format!("k{i}"), Value::Int((i * 7919) % 1000)).unwrap();
            }
            let mut ascending = true;
            b.iter(|| {
                store.sort(ascending).unwrap();
                ascending = !ascending;
            });
        });
    }
}

criterion_group!(benches, bench_set_get_remove, bench_get_multiple, bench_sort);
criterion_main!(benches);
