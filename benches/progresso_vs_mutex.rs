use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use progresso::Progress;

const NUM_THREADS: usize = 8;
const ITERATIONS_PER_THREAD: usize = 100_000;

const KEYS: &[&str] = &[
    "key-1", "key-2", "key-3", "key-4", "key-5", "key-6", "key-7", "key-8", "key-9", "key-10",
    "key-11", "key-12",
];

fn bench_single_threaded(c: &mut Criterion) {
    let mut group = c.benchmark_group("increment_single_thread");

    group.bench_function("Progress", |b| {
        let progress = Progress::new();
        let mut i = 0usize;
        b.iter(|| {
            progress.inc(KEYS[i % KEYS.len()], 1);
            i += 1;
        });
        black_box(progress.get("key-1"));
    });

    group.bench_function("HashMap", |b| {
        let mut map: HashMap<&str, i64> = HashMap::new();
        let mut i = 0usize;
        b.iter(|| {
            *map.entry(KEYS[i % KEYS.len()]).or_insert(0) += 1;
            i += 1;
        });
        black_box(map.len());
    });

    group.finish();
}

fn bench_multi_threaded(c: &mut Criterion) {
    let mut group = c.benchmark_group("increment_multi_thread");

    group.bench_function(
        BenchmarkId::new(
            "Progress",
            format!("{}threads x {}iter", NUM_THREADS, ITERATIONS_PER_THREAD),
        ),
        |b| {
            b.iter(|| {
                let progress = Arc::new(Progress::new());
                let mut handles = vec![];

                for t in 0..NUM_THREADS {
                    let progress = Arc::clone(&progress);
                    handles.push(thread::spawn(move || {
                        for i in 0..ITERATIONS_PER_THREAD {
                            progress.inc(KEYS[(t + i) % KEYS.len()], 1);
                        }
                    }));
                }

                for handle in handles {
                    handle.join().unwrap();
                }

                black_box(progress.get("key-1"))
            })
        },
    );

    group.bench_function(
        BenchmarkId::new(
            "Mutex<HashMap>",
            format!("{}threads x {}iter", NUM_THREADS, ITERATIONS_PER_THREAD),
        ),
        |b| {
            b.iter(|| {
                let map = Arc::new(Mutex::new(HashMap::<&str, i64>::new()));
                let mut handles = vec![];

                for t in 0..NUM_THREADS {
                    let map = Arc::clone(&map);
                    handles.push(thread::spawn(move || {
                        for i in 0..ITERATIONS_PER_THREAD {
                            let mut map = map.lock().unwrap();
                            *map.entry(KEYS[(t + i) % KEYS.len()]).or_insert(0) += 1;
                        }
                    }));
                }

                for handle in handles {
                    handle.join().unwrap();
                }

                black_box(map.lock().unwrap().len())
            })
        },
    );

    // Each thread hammers its own key: the best case for the store, since
    // no two threads ever touch the same slot.
    group.bench_function(
        BenchmarkId::new(
            "Progress disjoint keys",
            format!("{}threads x {}iter", NUM_THREADS, ITERATIONS_PER_THREAD),
        ),
        |b| {
            b.iter(|| {
                let progress = Arc::new(Progress::new());
                let mut handles = vec![];

                for t in 0..NUM_THREADS {
                    let progress = Arc::clone(&progress);
                    handles.push(thread::spawn(move || {
                        let key = KEYS[t % KEYS.len()];
                        for _ in 0..ITERATIONS_PER_THREAD {
                            progress.inc(key, 1);
                        }
                    }));
                }

                for handle in handles {
                    handle.join().unwrap();
                }

                black_box(progress.get("key-1"))
            })
        },
    );

    group.finish();
}

criterion_group!(benches, bench_single_threaded, bench_multi_threaded);
criterion_main!(benches);
