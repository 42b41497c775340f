use ferrous_ioc::{
    Container, ContainerConfig, ContainerObserver, DiError, Lifecycle, MetricsObserver, Provider,
    ProviderKind, Token,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct EventLog {
    events: Mutex<Vec<String>>,
}

impl ContainerObserver for EventLog {
    fn resolving(&self, token: &Token) {
        self.events.lock().unwrap().push(format!("resolving {}", token));
    }

    fn resolved(&self, token: &Token, _duration: Duration) {
        self.events.lock().unwrap().push(format!("resolved {}", token));
    }

    fn failed(&self, token: &Token, _error: &DiError) {
        self.events.lock().unwrap().push(format!("failed {}", token));
    }

    fn registered(&self, token: &Token, provider: ProviderKind, lifecycle: Lifecycle) {
        self.events
            .lock()
            .unwrap()
            .push(format!("registered {} {} {}", token, provider, lifecycle));
    }
}

#[test]
fn test_observer_sees_nested_resolutions() {
    let log = Arc::new(EventLog::default());
    let container = Container::new();
    container.add_observer(log.clone());

    container.register_instance(Token::name("real"), 1u8).unwrap();
    container.register_type(Token::name("alias"), Token::name("real")).unwrap();
    container.resolve(&Token::name("alias")).unwrap();

    let events = log.events.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            "registered real Value Transient",
            "registered alias Token Transient",
            "resolving alias",
            "resolving real",
            "resolved real",
            "resolved alias",
        ]
    );
}

#[test]
fn test_observers_shared_with_children() {
    let metrics = Arc::new(MetricsObserver::new());
    let root = Container::new();
    root.add_observer(metrics.clone());
    root.register_instance(Token::name("n"), 1u8).unwrap();

    let child = root.create_child_container();
    child.resolve(&Token::name("n")).unwrap();
    assert!(child.resolve(&Token::name("missing")).is_err());

    assert_eq!(metrics.registration_count(), 1);
    assert_eq!(metrics.resolution_count(), 1);
    assert_eq!(metrics.failure_count(), 1);
}

#[test]
fn test_tracing_observer_with_subscriber() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("ferrous_ioc=trace")
        .with_test_writer()
        .try_init();

    let container = Container::with_config(
        ContainerConfig::default()
            .with_label("traced")
            .with_tracing(true),
    );
    container
        .register(Token::name("answer"), Provider::factory(|_| 42u32), Lifecycle::Transient)
        .unwrap();

    let answer = container.resolve_as::<u32>(&Token::name("answer")).unwrap();
    assert_eq!(*answer, 42);
    assert!(container.resolve(&Token::name("question")).is_err());
}
