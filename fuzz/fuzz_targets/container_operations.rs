#![no_main]

use ferrous_ioc::{Container, DiError, Lifecycle, Provider, Token};
use libfuzzer_sys::fuzz_target;

const NAMES: [&str; 4] = ["a", "b", "c", "d"];

fn lifecycle(byte: u8) -> Lifecycle {
    match byte % 4 {
        0 => Lifecycle::Transient,
        1 => Lifecycle::Singleton,
        2 => Lifecycle::ContainerScoped,
        _ => Lifecycle::ResolutionScoped,
    }
}

// Every byte pair is one operation against a small family of containers.
// Aliases may form cycles; the depth bound must turn those into errors.
fuzz_target!(|data: &[u8]| {
    let root = Container::with_config(ferrous_ioc::ContainerConfig::default().with_max_depth(64));
    let mut containers = vec![root];

    for chunk in data.chunks_exact(2) {
        let (op, arg) = (chunk[0], chunk[1]);
        let current = containers[arg as usize % containers.len()].clone();
        let name = Token::name(NAMES[(arg >> 2) as usize % NAMES.len()]);
        let other = Token::name(NAMES[(arg >> 4) as usize % NAMES.len()]);

        match op % 8 {
            0 => {
                current.register_instance(name, arg as u32).unwrap();
            }
            1 => {
                let result = current.register(name, Provider::factory(move |_| arg as u32), lifecycle(op >> 3));
                assert_eq!(result.is_ok(), lifecycle(op >> 3) == Lifecycle::Transient);
            }
            2 => {
                current.register(name, Provider::token(other), lifecycle(op >> 3)).unwrap();
            }
            3 => match current.resolve(&name) {
                Ok(_) | Err(DiError::Unregistered(_)) | Err(DiError::DepthExceeded(_)) => {}
                Err(e) => panic!("unexpected error: {}", e),
            },
            4 => {
                let _ = current.resolve_all(&name);
            }
            5 => {
                if containers.len() < 16 {
                    containers.push(current.create_child_container());
                }
            }
            6 => current.clear_instances(),
            _ => {
                if arg % 16 == 0 {
                    current.reset();
                }
            }
        }
    }
});
