use ferrous_ioc::{
    Arguments, Container, DiError, DiResult, Injectable, Lifecycle, Param, Provider, Token,
};
use std::sync::Arc;

trait Plugin: Send + Sync {
    fn name(&self) -> &'static str;
}

struct Auth;
impl Plugin for Auth {
    fn name(&self) -> &'static str {
        "auth"
    }
}

struct Cache;
impl Plugin for Cache {
    fn name(&self) -> &'static str {
        "cache"
    }
}

struct Compress;
impl Plugin for Compress {
    fn name(&self) -> &'static str {
        "compress"
    }
}

fn plugin_token() -> Token {
    Token::of_type::<dyn Plugin>()
}

fn with_plugins() -> Container {
    let container = Container::new();
    container
        .register_instance(plugin_token(), Arc::new(Auth) as Arc<dyn Plugin>)
        .unwrap()
        .register_instance(plugin_token(), Arc::new(Cache) as Arc<dyn Plugin>)
        .unwrap()
        .register_instance(plugin_token(), Arc::new(Compress) as Arc<dyn Plugin>)
        .unwrap();
    container
}

struct Pipeline {
    plugins: Vec<Arc<Arc<dyn Plugin>>>,
}

impl Injectable for Pipeline {
    const ARITY: usize = 1;

    fn construct(args: &mut Arguments) -> DiResult<Self> {
        Ok(Pipeline {
            plugins: args.next_all()?,
        })
    }
}

#[test]
fn test_resolve_all_in_registration_order() {
    let container = with_plugins();

    let plugins = container.resolve_all_as::<Arc<dyn Plugin>>(&plugin_token()).unwrap();
    let names: Vec<_> = plugins.iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["auth", "cache", "compress"]);
}

#[test]
fn test_single_resolution_takes_last() {
    let container = with_plugins();
    let last = container.resolve_as::<Arc<dyn Plugin>>(&plugin_token()).unwrap();
    assert_eq!(last.name(), "compress");
}

#[test]
fn test_multiple_parameter_receives_every_registration() {
    let container = with_plugins();
    container
        .type_info()
        .record::<Pipeline>([Param::all(plugin_token())]);

    let pipeline = container.resolve_type::<Pipeline>().unwrap();
    let names: Vec<_> = pipeline.plugins.iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["auth", "cache", "compress"]);
}

#[test]
fn test_resolve_all_mixed_providers() {
    let container = Container::new();
    container.register_instance(Token::name("n"), 1u32).unwrap();
    container
        .register(Token::name("n"), Provider::factory(|_| 2u32), Lifecycle::Transient)
        .unwrap();
    container.register_instance(Token::name("three"), 3u32).unwrap();
    container.register_type(Token::name("n"), Token::name("three")).unwrap();

    let values: Vec<u32> = container
        .resolve_all_as::<u32>(&Token::name("n"))
        .unwrap()
        .iter()
        .map(|v| **v)
        .collect();
    assert_eq!(values, vec![1, 2, 3]);
}

#[test]
fn test_resolve_all_unregistered() {
    let container = Container::new();
    assert!(matches!(
        container.resolve_all(&Token::name("none")),
        Err(DiError::Unregistered(_))
    ));

    // constructible tokens yield one implicitly constructed value
    struct Lone;
    impl Injectable for Lone {
        fn construct(_: &mut Arguments) -> DiResult<Self> {
            Ok(Lone)
        }
    }
    let all = container.resolve_all(&Token::class::<Lone>()).unwrap();
    assert_eq!(all.len(), 1);
}

#[test]
fn test_child_local_registrations_shadow_parent_list() {
    let root = with_plugins();
    let child = root.create_child_container();
    child
        .register_instance(plugin_token(), Arc::new(Auth) as Arc<dyn Plugin>)
        .unwrap();

    assert_eq!(child.resolve_all(&plugin_token()).unwrap().len(), 1);
    assert_eq!(root.resolve_all(&plugin_token()).unwrap().len(), 3);
}

#[test]
fn test_multiple_parameter_with_no_registrations_fails() {
    let container = Container::new();
    container
        .type_info()
        .record::<Pipeline>([Param::all(plugin_token())]);

    let err = match container.resolve_type::<Pipeline>() {
        Ok(_) => panic!("Expected an error for an empty multiple parameter"),
        Err(err) => err,
    };
    assert_eq!(err.construction_path().len(), 1);
    assert!(matches!(err.root_cause(), DiError::Unregistered(_)));
}
