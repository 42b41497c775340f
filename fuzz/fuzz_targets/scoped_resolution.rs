#![no_main]

use ferrous_ioc::{Arguments, Container, DiResult, Injectable, Lifecycle, Param, Provider, Token};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

struct Leaf;

impl Injectable for Leaf {
    fn construct(_: &mut Arguments) -> DiResult<Self> {
        Ok(Leaf)
    }
}

struct Pair {
    a: Arc<Leaf>,
    b: Arc<Leaf>,
}

impl Injectable for Pair {
    const ARITY: usize = 2;

    fn construct(args: &mut Arguments) -> DiResult<Self> {
        Ok(Pair {
            a: args.next()?,
            b: args.next()?,
        })
    }
}

fn lifecycle(byte: u8) -> Lifecycle {
    match byte % 4 {
        0 => Lifecycle::Transient,
        1 => Lifecycle::Singleton,
        2 => Lifecycle::ContainerScoped,
        _ => Lifecycle::ResolutionScoped,
    }
}

// Builds a random container tree and checks the sharing rules of each lifecycle.
fuzz_target!(|data: &[u8]| {
    let Some((&first, rest)) = data.split_first() else {
        return;
    };
    let lifecycle = lifecycle(first);

    let root = Container::new();
    root.register(Token::class::<Leaf>(), Provider::class::<Leaf>(), lifecycle)
        .unwrap();
    root.type_info().record::<Pair>([
        Param::token(Token::class::<Leaf>()),
        Param::token(Token::class::<Leaf>()),
    ]);

    let mut containers = vec![root.clone()];
    for &byte in rest.iter().take(32) {
        let parent = containers[byte as usize % containers.len()].clone();
        containers.push(parent.create_child_container());
    }

    for container in &containers {
        let pair = container.resolve_type::<Pair>().unwrap();
        let shared = Arc::ptr_eq(&pair.a, &pair.b);
        assert_eq!(shared, lifecycle != Lifecycle::Transient);

        let again = container.resolve_type::<Pair>().unwrap();
        let persisted = Arc::ptr_eq(&pair.a, &again.a);
        assert_eq!(persisted, lifecycle.persists());
    }

    if lifecycle == Lifecycle::Singleton {
        let expected = root.resolve_type::<Leaf>().unwrap();
        for container in &containers {
            assert!(Arc::ptr_eq(&expected, &container.resolve_type::<Leaf>().unwrap()));
        }
    }
});
