//! The container: registration, scoping and housekeeping.
//!
//! Resolution itself lives in `resolve.rs`; this module owns the registry and
//! everything that mutates it.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::config::ContainerConfig;
use crate::error::{DiError, DiResult};
use crate::lifecycle::{Lifecycle, RegistrationOptions};
use crate::observer::{ContainerObserver, Observers, TracingObserver};
use crate::providers::{Provider, ProviderKind};
use crate::registration::{Registration, Registry};
use crate::token::Token;
use crate::type_info::TypeInfo;

pub mod context;
mod resolve;

pub use context::ResolutionContext;

/// Inversion-of-control container.
///
/// A `Container` maps tokens to providers and builds object graphs on demand.
/// Handles are cheap to clone and share one underlying registry. Child
/// containers see every registration of their ancestors and add their own
/// storage on top.
///
/// # Thread Safety
///
/// Containers are `Send + Sync`. The registry lock is never held while a
/// provider runs, so factories and constructors may register or resolve
/// freely. Cached lifecycles construct exactly once even under concurrent
/// first resolution.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{Arguments, Container, DiResult, Injectable, Lifecycle, Param, Provider, Token};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct English;
/// impl Greeter for English {
///     fn greet(&self) -> String { "hello".to_string() }
/// }
///
/// struct App { greeter: Arc<dyn Greeter> }
/// impl Injectable for App {
///     const ARITY: usize = 1;
///     fn construct(args: &mut Arguments) -> DiResult<Self> {
///         Ok(App { greeter: args.next_cloned::<Arc<dyn Greeter>>()? })
///     }
/// }
///
/// let container = Container::new();
/// container
///     .register_instance(Token::of_type::<dyn Greeter>(), Arc::new(English) as Arc<dyn Greeter>)
///     .unwrap()
///     .register_singleton(Token::class::<App>(), None)
///     .unwrap();
/// container.type_info().record::<App>([Param::token(Token::of_type::<dyn Greeter>())]);
///
/// let app = container.resolve_type::<App>().unwrap();
/// assert_eq!(app.greeter.greet(), "hello");
/// assert!(Arc::ptr_eq(&app, &container.resolve_type::<App>().unwrap()));
/// ```
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

pub(crate) struct ContainerInner {
    pub(crate) registry: RwLock<Registry>,
    parent: Option<Container>,
    type_info: Arc<TypeInfo>,
    pub(crate) observers: Arc<Observers>,
    pub(crate) config: Arc<ContainerConfig>,
}

/// Non-owning container handle held by deferred proxies.
#[derive(Clone)]
pub struct WeakContainer {
    inner: Weak<ContainerInner>,
}

impl WeakContainer {
    pub fn upgrade(&self) -> Option<Container> {
        self.inner.upgrade().map(|inner| Container { inner })
    }
}

impl fmt::Debug for WeakContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakContainer")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl Container {
    /// Creates an empty root container with default configuration.
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// Creates an empty root container.
    pub fn with_config(config: ContainerConfig) -> Self {
        Self::from_parts(config, Arc::new(TypeInfo::new()))
    }

    /// Creates a root container reading parameter metadata from `type_info`.
    pub fn with_type_info(type_info: Arc<TypeInfo>) -> Self {
        Self::from_parts(ContainerConfig::default(), type_info)
    }

    pub fn from_parts(config: ContainerConfig, type_info: Arc<TypeInfo>) -> Self {
        let observers = Observers::new();
        if config.trace_resolutions {
            observers.add(Arc::new(TracingObserver::new(config.display_label())));
        }
        tracing::debug!(container = %config.display_label(), max_depth = config.max_depth, "container created");
        Self {
            inner: Arc::new(ContainerInner {
                registry: RwLock::new(Registry::new()),
                parent: None,
                type_info,
                observers: Arc::new(observers),
                config: Arc::new(config),
            }),
        }
    }

    #[inline]
    pub(crate) fn inner(&self) -> &ContainerInner {
        &self.inner
    }

    pub fn downgrade(&self) -> WeakContainer {
        WeakContainer {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Parameter metadata shared by this container family.
    pub fn type_info(&self) -> &Arc<TypeInfo> {
        &self.inner.type_info
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.inner.config
    }

    pub fn parent(&self) -> Option<&Container> {
        self.inner.parent.as_ref()
    }

    /// Adds an observer for every container in this family.
    pub fn add_observer(&self, observer: Arc<dyn ContainerObserver>) -> &Self {
        self.inner.observers.add(observer);
        self
    }

    /// Whether two handles point at the same container.
    pub fn ptr_eq(&self, other: &Container) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // ----- Registration -----

    /// Registers `provider` under `token`.
    ///
    /// Registrations accumulate: single resolution uses the most recent one,
    /// `resolve_all` returns all of them in order.
    ///
    /// A bare [`Constructor`](crate::Constructor) registered with a caching
    /// lifecycle is stored as a class provider, so its lifecycle is honored.
    ///
    /// # Errors
    ///
    /// [`DiError::UnsupportedLifecycle`] when a caching lifecycle is paired with
    /// a value or factory provider. Nothing is registered in that case.
    pub fn register(
        &self,
        token: impl Into<Token>,
        provider: impl Into<Provider>,
        options: impl Into<RegistrationOptions>,
    ) -> DiResult<&Self> {
        let token = token.into();
        let lifecycle = options.into().lifecycle;
        let provider = match provider.into() {
            // A bare constructor only stays bare when nothing is cached.
            Provider::Constructor(ctor) if lifecycle.is_cached() => {
                Provider::Class(Token::Class(ctor))
            }
            provider => provider,
        };
        let kind = provider.kind();

        if lifecycle.is_cached() && !kind.supports_caching() {
            return Err(DiError::UnsupportedLifecycle {
                lifecycle,
                provider: kind,
            });
        }

        tracing::debug!(
            container = %self.inner.config.display_label(),
            token = %token,
            provider = %kind,
            lifecycle = %lifecycle,
            "registered"
        );
        self.inner.observers.registered(&token, kind, lifecycle);
        self.inner
            .registry
            .write()
            .set(token, Arc::new(Registration::new(provider, lifecycle)));
        Ok(self)
    }

    /// Maps `from` to `to`: an alias for normal `to` tokens, a class provider otherwise.
    pub fn register_type(&self, from: impl Into<Token>, to: impl Into<Token>) -> DiResult<&Self> {
        let to = to.into();
        let provider = if to.is_normal() {
            Provider::Token(to)
        } else {
            Provider::Class(to)
        };
        self.register(from, provider, Lifecycle::Transient)
    }

    /// Registers a value returned as-is on every resolution.
    pub fn register_instance<T: Send + Sync + 'static>(
        &self,
        token: impl Into<Token>,
        value: T,
    ) -> DiResult<&Self> {
        self.register(token, Provider::value(value), Lifecycle::Transient)
    }

    /// Registers a singleton.
    ///
    /// A normal `from` resolves through `to`: an alias for a normal `to`, a
    /// class otherwise. A constructible `from` is built from a constructible
    /// `to` when one is given and from itself otherwise; a normal `to` is
    /// ignored in that case.
    ///
    /// # Errors
    ///
    /// [`DiError::InvalidRegistration`] when `from` is a normal token and no
    /// target is given.
    pub fn register_singleton(&self, from: impl Into<Token>, to: Option<Token>) -> DiResult<&Self> {
        let from = from.into();
        let provider = match to {
            Some(to) if to.is_constructible() => Provider::Class(to),
            _ if from.is_constructible() => Provider::Class(from.clone()),
            Some(to) => Provider::Token(to),
            None => {
                return Err(DiError::InvalidRegistration {
                    token: from.display_name(),
                    reason: "cannot register a type name as a singleton without a \"to\" token",
                })
            }
        };
        self.register(from, provider, Lifecycle::Singleton)
    }

    /// Whether `token` has a registration here, or with `recursive`, in any ancestor.
    pub fn is_registered(&self, token: &Token, recursive: bool) -> bool {
        if self.inner.registry.read().has(token) {
            return true;
        }
        recursive
            && self
                .inner
                .parent
                .as_ref()
                .is_some_and(|parent| parent.is_registered(token, true))
    }

    // ----- Scoping -----

    /// Creates a child container whose parent is `self`.
    ///
    /// Tokens with at least one `ContainerScoped` registration are copied into
    /// the child with their full list; the `ContainerScoped` entries become
    /// fresh, uncached registrations while the others stay shared. All other
    /// tokens are reached through the parent chain, which is what keeps a
    /// singleton single across the family.
    pub fn create_child_container(&self) -> Container {
        let mut registry = Registry::new();
        for (token, registrations) in self.inner.registry.read().iter() {
            if registrations
                .iter()
                .any(|r| r.lifecycle == Lifecycle::ContainerScoped)
            {
                let seeded = registrations
                    .iter()
                    .map(|r| {
                        if r.lifecycle == Lifecycle::ContainerScoped {
                            Arc::new(r.fresh_copy())
                        } else {
                            Arc::clone(r)
                        }
                    })
                    .collect();
                registry.set_all(token.clone(), seeded);
            }
        }

        tracing::debug!(
            container = %self.inner.config.display_label(),
            seeded = registry.len(),
            "child container created"
        );

        Container {
            inner: Arc::new(ContainerInner {
                registry: RwLock::new(registry),
                parent: Some(self.clone()),
                type_info: Arc::clone(&self.inner.type_info),
                observers: Arc::clone(&self.inner.observers),
                config: Arc::clone(&self.inner.config),
            }),
        }
    }

    // ----- Housekeeping -----

    /// Drops every registration of this container. Parents and children are untouched.
    pub fn reset(&self) {
        self.inner.registry.write().clear();
        tracing::debug!(container = %self.inner.config.display_label(), "container reset");
    }

    /// Clears every cached instance, keeping the registrations.
    ///
    /// Value providers are skipped: their value is user data, not a cache.
    pub fn clear_instances(&self) {
        let registry = self.inner.registry.read();
        let mut cleared = 0usize;
        for (_, registrations) in registry.iter() {
            for registration in registrations {
                if registration.provider.kind() != ProviderKind::Value {
                    registration.instance.clear();
                    cleared += 1;
                }
            }
        }
        tracing::debug!(
            container = %self.inner.config.display_label(),
            cleared,
            "instances cleared"
        );
    }

    /// Number of local registrations across all tokens.
    pub fn len(&self) -> usize {
        self.inner.registry.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("label", &self.inner.config.display_label())
            .field("registrations", &self.len())
            .field("has_parent", &self.inner.parent.is_some())
            .finish()
    }
}
