use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use shard_runner::core::models::TestFile;
use shard_runner::core::planner::partition;
use shard_runner::core::synthesis::synthesize;
use shard_runner::core::suite::render_declaration;
use shard_runner::models::DeclarationRoot;
use std::hint::black_box;
use std::num::NonZeroUsize;

fn files(count: usize) -> Vec<TestFile> {
    (0..count)
        .map(|i| TestFile::new(format!("/project/tests/Unit/Case{i:05}Test.php"), "Test.php"))
        .collect()
}

fn bench_partition(c: &mut Criterion) {
    let workers = NonZeroUsize::new(24).unwrap();
    let mut group = c.benchmark_group("partition");
    for count in [100usize, 1_000, 10_000] {
        let input = files(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &input, |b, input| {
            b.iter(|| partition(black_box(input.clone()), workers));
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let plan = partition(files(5_000), NonZeroUsize::new(24).unwrap());
    let root = DeclarationRoot::default();

    c.bench_function("render_synthesized_declaration", |b| {
        b.iter(|| render_declaration(&synthesize(black_box(&root), black_box(&plan.shards))));
    });
}

criterion_group!(benches, bench_partition, bench_render);
criterion_main!(benches);
