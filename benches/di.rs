use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ferrous_ioc::*;
use std::sync::Arc;

struct Leaf;

impl Injectable for Leaf {
    fn construct(_: &mut Arguments) -> DiResult<Self> {
        Ok(Leaf)
    }
}

struct Branch {
    _left: Arc<Leaf>,
    _right: Arc<Leaf>,
}

impl Injectable for Branch {
    const ARITY: usize = 2;

    fn construct(args: &mut Arguments) -> DiResult<Self> {
        Ok(Branch {
            _left: args.next()?,
            _right: args.next()?,
        })
    }
}

struct Root {
    _branch: Arc<Branch>,
    _config: Arc<u64>,
}

impl Injectable for Root {
    const ARITY: usize = 2;

    fn construct(args: &mut Arguments) -> DiResult<Self> {
        Ok(Root {
            _branch: args.next()?,
            _config: args.next()?,
        })
    }
}

fn graph_container(leaf: Lifecycle) -> Container {
    let container = Container::new();
    container
        .register(Token::class::<Leaf>(), Provider::class::<Leaf>(), leaf)
        .unwrap();
    container.register_instance(Token::name("config"), 42u64).unwrap();
    container
        .type_info()
        .record::<Branch>([
            Param::token(Token::class::<Leaf>()),
            Param::token(Token::class::<Leaf>()),
        ])
        .record::<Root>([
            Param::token(Token::class::<Branch>()),
            Param::token("config"),
        ]);
    container
}

// ===== Micro Benchmarks =====

fn bench_value_hit(c: &mut Criterion) {
    let container = Container::new();
    container.register_instance(Token::name("n"), 42u64).unwrap();
    let token = Token::name("n");

    c.bench_function("value_hit_u64", |b| {
        b.iter(|| {
            let v = container.resolve(&token).unwrap();
            black_box(v);
        })
    });
}

fn bench_singleton_hit(c: &mut Criterion) {
    let container = Container::new();
    container.register_singleton(Token::class::<Leaf>(), None).unwrap();
    let _ = container.resolve_type::<Leaf>().unwrap();

    c.bench_function("singleton_hit", |b| {
        b.iter(|| {
            let v = container.resolve_type::<Leaf>().unwrap();
            black_box(v);
        })
    });
}

fn bench_transient_leaf(c: &mut Criterion) {
    let container = Container::new();

    c.bench_function("transient_implicit_leaf", |b| {
        b.iter(|| {
            let v = container.resolve_type::<Leaf>().unwrap();
            black_box(v);
        })
    });
}

fn bench_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph");
    for lifecycle in [
        Lifecycle::Transient,
        Lifecycle::Singleton,
        Lifecycle::ResolutionScoped,
    ] {
        let container = graph_container(lifecycle);
        group.bench_with_input(
            BenchmarkId::from_parameter(lifecycle),
            &container,
            |b, container| {
                b.iter(|| {
                    let root = container.resolve_type::<Root>().unwrap();
                    black_box(root);
                })
            },
        );
    }
    group.finish();
}

fn bench_resolve_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_all");
    for count in [1usize, 8, 64] {
        let container = Container::new();
        for i in 0..count {
            container.register_instance(Token::name("plugin"), i).unwrap();
        }
        let token = Token::name("plugin");
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                let all = container.resolve_all(&token).unwrap();
                black_box(all);
            })
        });
    }
    group.finish();
}

// ===== Scoping Benchmarks =====

fn bench_child_container(c: &mut Criterion) {
    let root = graph_container(Lifecycle::ContainerScoped);

    c.bench_function("child_create_and_resolve", |b| {
        b.iter(|| {
            let child = root.create_child_container();
            let v = child.resolve_type::<Root>().unwrap();
            black_box(v);
        })
    });
}

fn bench_deep_parent_lookup(c: &mut Criterion) {
    let root = Container::new();
    root.register_instance(Token::name("deep"), 1u8).unwrap();
    let mut container = root.clone();
    for _ in 0..16 {
        container = container.create_child_container();
    }
    let token = Token::name("deep");

    c.bench_function("lookup_through_16_parents", |b| {
        b.iter(|| {
            let v = container.resolve(&token).unwrap();
            black_box(v);
        })
    });
}

criterion_group!(
    benches,
    bench_value_hit,
    bench_singleton_hit,
    bench_transient_leaf,
    bench_graph,
    bench_resolve_all,
    bench_child_container,
    bench_deep_parent_lookup
);
criterion_main!(benches);
