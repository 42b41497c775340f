//! Diagnostic observers for container activity.
//!
//! Observers are notified synchronously during registration and resolution.
//! Keep implementations lightweight; every nested resolution in a graph
//! produces its own events.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use crate::error::DiError;
use crate::lifecycle::Lifecycle;
use crate::providers::ProviderKind;
use crate::token::Token;

/// Observer trait for container events.
///
/// All methods except [`resolving`](Self::resolving) and
/// [`resolved`](Self::resolved) have empty defaults.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{Container, ContainerObserver, Provider, Lifecycle, Token};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Recorder {
///     seen: Mutex<Vec<String>>,
/// }
///
/// impl ContainerObserver for Recorder {
///     fn resolving(&self, token: &Token) {
///         self.seen.lock().unwrap().push(token.display_name());
///     }
///
///     fn resolved(&self, _token: &Token, _duration: Duration) {}
/// }
///
/// let recorder = Arc::new(Recorder::default());
/// let container = Container::new();
/// container.add_observer(recorder.clone());
/// container.register(Token::name("answer"), Provider::value(42u32), Lifecycle::Transient).unwrap();
/// container.resolve(&Token::name("answer")).unwrap();
///
/// assert_eq!(*recorder.seen.lock().unwrap(), vec!["answer".to_string()]);
/// ```
pub trait ContainerObserver: Send + Sync {
    /// Called before a token is resolved.
    fn resolving(&self, token: &Token);

    /// Called after a token resolved successfully.
    fn resolved(&self, token: &Token, duration: Duration);

    /// Called when resolving a token failed.
    fn failed(&self, _token: &Token, _error: &DiError) {}

    /// Called when a registration is added.
    fn registered(&self, _token: &Token, _provider: ProviderKind, _lifecycle: Lifecycle) {}
}

/// Observers registered on a container family.
#[derive(Default)]
pub(crate) struct Observers {
    observers: RwLock<Vec<Arc<dyn ContainerObserver>>>,
    // Mirrors `observers.len() > 0` so the hot path skips the lock.
    active: AtomicBool,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&self, observer: Arc<dyn ContainerObserver>) {
        self.observers.write().push(observer);
        self.active.store(true, Ordering::Release);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    fn snapshot(&self) -> Vec<Arc<dyn ContainerObserver>> {
        self.observers.read().clone()
    }

    pub(crate) fn resolving(&self, token: &Token) {
        for observer in self.snapshot() {
            observer.resolving(token);
        }
    }

    pub(crate) fn resolved(&self, token: &Token, duration: Duration) {
        for observer in self.snapshot() {
            observer.resolved(token, duration);
        }
    }

    pub(crate) fn failed(&self, token: &Token, error: &DiError) {
        for observer in self.snapshot() {
            observer.failed(token, error);
        }
    }

    pub(crate) fn registered(&self, token: &Token, provider: ProviderKind, lifecycle: Lifecycle) {
        if !self.has_observers() {
            return;
        }
        for observer in self.snapshot() {
            observer.registered(token, provider, lifecycle);
        }
    }
}

/// Observer that forwards events to `tracing`.
///
/// Installed automatically when `ContainerConfig::trace_resolutions` is set.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    label: String,
}

impl TracingObserver {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }
}

impl ContainerObserver for TracingObserver {
    fn resolving(&self, token: &Token) {
        tracing::trace!(container = %self.label, token = %token, "resolving");
    }

    fn resolved(&self, token: &Token, duration: Duration) {
        tracing::debug!(container = %self.label, token = %token, ?duration, "resolved");
    }

    fn failed(&self, token: &Token, error: &DiError) {
        tracing::warn!(container = %self.label, token = %token, %error, "resolution failed");
    }

    fn registered(&self, token: &Token, provider: ProviderKind, lifecycle: Lifecycle) {
        tracing::trace!(
            container = %self.label,
            token = %token,
            %provider,
            %lifecycle,
            "registration observed"
        );
    }
}

/// Observer counting resolutions, failures and time spent.
#[derive(Debug, Default)]
pub struct MetricsObserver {
    resolution_count: AtomicU64,
    failure_count: AtomicU64,
    registration_count: AtomicU64,
    total_resolution_nanos: AtomicU64,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolution_count(&self) -> u64 {
        self.resolution_count.load(Ordering::Relaxed)
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn registration_count(&self) -> u64 {
        self.registration_count.load(Ordering::Relaxed)
    }

    pub fn total_resolution_time(&self) -> Duration {
        Duration::from_nanos(self.total_resolution_nanos.load(Ordering::Relaxed))
    }

    /// Average time per successful resolution, `None` before the first one.
    pub fn average_resolution_time(&self) -> Option<Duration> {
        let count = self.resolution_count();
        if count == 0 {
            return None;
        }
        Some(self.total_resolution_time() / count as u32)
    }

    pub fn reset(&self) {
        self.resolution_count.store(0, Ordering::Relaxed);
        self.failure_count.store(0, Ordering::Relaxed);
        self.registration_count.store(0, Ordering::Relaxed);
        self.total_resolution_nanos.store(0, Ordering::Relaxed);
    }
}

impl ContainerObserver for MetricsObserver {
    fn resolving(&self, _token: &Token) {}

    fn resolved(&self, _token: &Token, duration: Duration) {
        self.resolution_count.fetch_add(1, Ordering::Relaxed);
        self.total_resolution_nanos
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    fn failed(&self, _token: &Token, _error: &DiError) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    fn registered(&self, _token: &Token, _provider: ProviderKind, _lifecycle: Lifecycle) {
        self.registration_count.fetch_add(1, Ordering::Relaxed);
    }
}
