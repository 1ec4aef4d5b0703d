use std::io;

use criterion::{criterion_group, criterion_main, Criterion};
use progresso::{Progress, Renderer};

fn bench_render(c: &mut Criterion) {
    let progress = Progress::new();
    for i in 0..10 {
        progress.inc(&format!("key-{i}"), 1);
    }

    let mut group = c.benchmark_group("render");

    // The intended usage: one renderer reused across renders, so the
    // scratch buffer stays warm and the render is allocation-free.
    group.bench_function("reused renderer", |b| {
        let mut renderer = Renderer::new();
        let mut sink = io::sink();
        b.iter(|| renderer.render(&progress, &mut sink, "Test progress:", false).unwrap());
    });

    group.bench_function("fresh renderer", |b| {
        let mut sink = io::sink();
        b.iter(|| {
            Renderer::new()
                .render(&progress, &mut sink, "Test progress:", false)
                .unwrap()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
