use beanwalk_reflect::{Reflector, TypeBuilder};
use beanwalk_tree::{TreeBuilder, TreeFields};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

#[derive(Default)]
struct Node {
    id: u64,
    parent_id: u64,
    order: i32,
    children: Option<Vec<Node>>,
}

fn reflector() -> Reflector {
    let reflector = Reflector::new();
    reflector
        .register(
            TypeBuilder::<Node>::class("Node")
                .property::<u64>("id", |n| &n.id, |n| &mut n.id)
                .property::<u64>("parentId", |n| &n.parent_id, |n| &mut n.parent_id)
                .property::<i32>("order", |n| &n.order, |n| &mut n.order)
                .property::<Option<Vec<Node>>>("children", |n| &n.children, |n| &mut n.children)
                .build(),
        )
        .unwrap();
    reflector
}

/// Complete tree with `fanout` children per node, ids numbered breadth-first from 1
fn nodes(count: u64, fanout: u64) -> Vec<Node> {
    (1..=count)
        .map(|id| Node {
            id,
            parent_id: if id == 1 { 0 } else { (id - 2) / fanout + 1 },
            order: ((id * 7919) % 101) as i32,
            children: None,
        })
        .collect()
}

fn bench_assemble(c: &mut Criterion) {
    let reflector = reflector();
    let builder = TreeBuilder::<u64>::new(&reflector, TreeFields::default());

    let mut group = c.benchmark_group("assemble");
    for count in [100u64, 1_000, 10_000] {
        group.throughput(Throughput::Elements(count));
        group.bench_with_input(BenchmarkId::new("unsorted", count), &count, |b, &count| {
            b.iter_batched(
                || nodes(count, 4),
                |input| builder.assemble(black_box(input)).unwrap(),
                criterion::BatchSize::LargeInput,
            );
        });
        group.bench_with_input(BenchmarkId::new("sorted", count), &count, |b, &count| {
            b.iter_batched(
                || nodes(count, 4),
                |input| builder.assemble_sorted::<Node, i32>(black_box(input)).unwrap(),
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_field_lookup(c: &mut Criterion) {
    let reflector = reflector();
    let node = Node {
        id: 42,
        ..Node::default()
    };

    c.bench_function("read_by_name", |b| {
        b.iter(|| reflector.read::<u64>(black_box(&node), black_box("id")).unwrap());
    });
}

criterion_group!(benches, bench_assemble, bench_field_lookup);
criterion_main!(benches);
