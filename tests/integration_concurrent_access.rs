/// Concurrent access integration tests
///
/// These tests verify that ferrous-ioc behaves correctly under concurrent access:
/// cached lifecycles construct exactly once, child containers stay isolated,
/// and registration may proceed while other threads resolve.

use crossbeam_utils::thread;
use ferrous_ioc::{
    Arguments, Constructor, Container, DiResult, Injectable, Lifecycle, Param, Provider, Token,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::time::Duration;

const THREADS: usize = 8;

#[derive(Debug)]
struct Slow {
    id: usize,
}

fn slow_constructor(built: Arc<AtomicUsize>) -> Constructor {
    Constructor::new::<Slow, _>(0, move |_| {
        std::thread::sleep(Duration::from_millis(20));
        Ok(Slow {
            id: built.fetch_add(1, Ordering::SeqCst),
        })
    })
}

#[test]
fn test_singleton_constructed_once_under_contention() {
    let built = Arc::new(AtomicUsize::new(0));
    let container = Container::new();
    container
        .register(
            Token::name("slow"),
            Provider::constructor(slow_constructor(built.clone())),
            Lifecycle::Singleton,
        )
        .unwrap();

    let barrier = Barrier::new(THREADS);
    let results: Vec<Arc<Slow>> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|_| {
                    barrier.wait();
                    container.resolve_as::<Slow>(&Token::name("slow")).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
    .unwrap();

    assert_eq!(built.load(Ordering::SeqCst), 1);
    assert!(results.iter().all(|r| Arc::ptr_eq(r, &results[0])));
}

#[test]
fn test_container_scoped_isolated_per_child_across_threads() {
    let built = Arc::new(AtomicUsize::new(0));
    let root = Container::new();
    root.register(
        Token::name("slow"),
        Provider::constructor(slow_constructor(built.clone())),
        Lifecycle::ContainerScoped,
    )
    .unwrap();

    let ids: Vec<usize> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let child = root.create_child_container();
                s.spawn(move |_| {
                    let a = child.resolve_as::<Slow>(&Token::name("slow")).unwrap();
                    let b = child.resolve_as::<Slow>(&Token::name("slow")).unwrap();
                    assert!(Arc::ptr_eq(&a, &b));
                    a.id
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
    .unwrap();

    let mut unique = ids.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), THREADS);
    assert_eq!(built.load(Ordering::SeqCst), THREADS);
}

#[test]
fn test_register_while_resolving() {
    let container = Container::new();
    container.register_instance(Token::name("base"), 0usize).unwrap();

    thread::scope(|s| {
        s.spawn(|_| {
            for i in 0..200usize {
                container
                    .register_instance(Token::name(format!("key_{}", i)), i)
                    .unwrap();
            }
        });
        for _ in 0..4 {
            s.spawn(|_| {
                for _ in 0..200 {
                    let base = container.resolve_as::<usize>(&Token::name("base")).unwrap();
                    assert_eq!(*base, 0);
                }
            });
        }
    })
    .unwrap();

    assert_eq!(container.len(), 201);
    let last = container.resolve_as::<usize>(&Token::name("key_199")).unwrap();
    assert_eq!(*last, 199);
}

#[test]
fn test_factory_may_register_during_resolution() {
    let container = Container::new();
    container
        .register(
            Token::name("lazy"),
            Provider::try_factory(|c: &Container| {
                c.register_instance(Token::name("side_effect"), true)?;
                Ok(1u8)
            }),
            Lifecycle::Transient,
        )
        .unwrap();

    container.resolve(&Token::name("lazy")).unwrap();
    assert!(container.is_registered(&Token::name("side_effect"), false));
}

#[test]
fn test_resolution_scoped_per_thread_call() {
    struct Scoped;
    impl Injectable for Scoped {
        fn construct(_: &mut Arguments) -> DiResult<Self> {
            Ok(Scoped)
        }
    }

    struct Twice {
        a: Arc<Scoped>,
        b: Arc<Scoped>,
    }
    impl Injectable for Twice {
        const ARITY: usize = 2;
        fn construct(args: &mut Arguments) -> DiResult<Self> {
            Ok(Twice {
                a: args.next()?,
                b: args.next()?,
            })
        }
    }

    let container = Container::new();
    container
        .register(
            Token::class::<Scoped>(),
            Provider::class::<Scoped>(),
            Lifecycle::ResolutionScoped,
        )
        .unwrap();
    container.type_info().record::<Twice>([
        Param::token(Token::class::<Scoped>()),
        Param::token(Token::class::<Scoped>()),
    ]);

    let pairs: Vec<Arc<Twice>> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| s.spawn(|_| container.resolve_type::<Twice>().unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
    .unwrap();

    for pair in &pairs {
        assert!(Arc::ptr_eq(&pair.a, &pair.b));
    }
    assert!(!Arc::ptr_eq(&pairs[0].a, &pairs[1].a));
}
