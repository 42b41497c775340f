//! Per-call cache for `ResolutionScoped` registrations.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::Instance;

/// Cache shared by every resolution inside one top-level resolve call.
///
/// `Container::resolve` creates a fresh context per call. Pass one explicitly
/// through [`Container::resolve_with`](crate::Container::resolve_with) to
/// stretch a single resolution scope across several calls. Cloning is cheap
/// and clones share the same cache.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Arguments, Container, DiResult, Injectable, Lifecycle, Provider, ResolutionContext, Token};
/// use std::sync::Arc;
///
/// struct UnitOfWork;
/// impl Injectable for UnitOfWork {
///     fn construct(_: &mut Arguments) -> DiResult<Self> { Ok(UnitOfWork) }
/// }
///
/// let container = Container::new();
/// let token = Token::name("uow");
/// container.register(token.clone(), Provider::class::<UnitOfWork>(), Lifecycle::ResolutionScoped).unwrap();
///
/// let context = ResolutionContext::new();
/// let a = container.resolve_with(&token, &context).unwrap();
/// let b = container.resolve_with(&token, &context).unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
///
/// let c = container.resolve(&token).unwrap();
/// assert!(!Arc::ptr_eq(&a, &c));
/// ```
#[derive(Clone, Default)]
pub struct ResolutionContext {
    scoped: Arc<Mutex<HashMap<u64, Instance>>>,
}

impl ResolutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get(&self, registration: u64) -> Option<Instance> {
        self.scoped.lock().get(&registration).cloned()
    }

    pub(crate) fn insert(&self, registration: u64, value: Instance) {
        self.scoped.lock().insert(registration, value);
    }

    /// Number of resolution-scoped values cached so far.
    pub fn len(&self) -> usize {
        self.scoped.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.scoped.lock().is_empty()
    }
}

impl fmt::Debug for ResolutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionContext")
            .field("cached", &self.len())
            .finish()
    }
}
