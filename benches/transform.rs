use criterion::{
    BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main,
};
use dfeval::ir::{Builder, Graph};
use dfeval::passes::SdfTransformer;

/// A ring of `n` actors alternating between 2 and 3 firings per iteration,
/// with enough initial tokens on the closing edge to complete an iteration.
fn ring(n: usize) -> Graph {
    let mut g = Graph::new(format!("ring{n}"));
    let mut b = Builder::new(&mut g);
    let reps = |i: usize| if i % 2 == 0 { 2 } else { 3 };
    for i in 0..n {
        b.add_actor(format!("a{i}"), reps(i), 1.0).unwrap();
    }
    for i in 0..n {
        let j = (i + 1) % n;
        let delay = if j == 0 { 6 } else { 0 };
        b.add_edge(format!("a{i}"), format!("a{j}"), reps(j), reps(i), delay)
            .unwrap();
    }
    g
}

fn transform_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");
    for n in [8, 32, 128] {
        group.bench_with_input(BenchmarkId::new("srsdf", n), &n, |b, &n| {
            b.iter_batched(
                || ring(n),
                |g| SdfTransformer::to_srsdf(&g).unwrap(),
                BatchSize::SmallInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("hsdf", n), &n, |b, &n| {
            b.iter_batched(
                || ring(n),
                |g| SdfTransformer::to_hsdf(&g).unwrap(),
                BatchSize::SmallInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("asap", n), &n, |b, &n| {
            b.iter_batched(
                || ring(n),
                |g| dfeval::schedule(&g).unwrap(),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group! {
    name = transform;
    config = Criterion::default().sample_size(20);
    targets = transform_bench
}
criterion_main!(transform);
