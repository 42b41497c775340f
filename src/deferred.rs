//! Deferred proxies for breaking construction cycles.
//!
//! A constructor that takes `Deferred<B>` instead of `Arc<B>` receives a proxy
//! with a stable identity immediately. `B` itself is resolved the first time
//! [`Deferred::get`] is called, after the constructor that holds the proxy
//! has returned, so `B` may in turn depend on that constructor's type.

use std::any::TypeId;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::container::{Container, ResolutionContext};
use crate::error::{DiError, DiResult};
use crate::internal::Slot;
use crate::token::Token;
use crate::Instance;

type ProxyFn = dyn Fn(&Token, Container, ResolutionContext) -> Instance + Send + Sync;

/// Payload of [`Token::Delayed`]: the target token and a typed proxy builder.
#[derive(Clone)]
pub struct Delay {
    target: Arc<Token>,
    proxy_type: TypeId,
    make_proxy: Arc<ProxyFn>,
}

impl Delay {
    pub fn new<T: Send + Sync + 'static>(target: Token) -> Self {
        Self {
            target: Arc::new(target),
            proxy_type: TypeId::of::<T>(),
            make_proxy: Arc::new(|target: &Token, container: Container, context: ResolutionContext| {
                let proxy: Instance = Arc::new(Deferred::<T>::new(target.clone(), container, context));
                proxy
            }),
        }
    }

    pub fn target(&self) -> &Token {
        &self.target
    }

    /// Type the proxy will downcast its target to.
    pub fn proxy_type(&self) -> TypeId {
        self.proxy_type
    }

    pub(crate) fn create_proxy(&self, container: Container, context: ResolutionContext) -> Instance {
        (self.make_proxy)(&self.target, container, context)
    }
}

impl fmt::Debug for Delay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delay").field("target", &self.target).finish()
    }
}

/// Lazily resolved reference to a `T`.
///
/// The proxy holds a strong handle to the container that created it, so it
/// keeps working after every other handle is dropped, for example in a graph
/// returned from a short-lived child container. A cached instance that holds
/// a proxy therefore keeps its container alive until the registration is
/// dropped by [`Container::reset`](crate::Container::reset).
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Arguments, Container, Deferred, DiResult, Injectable, Param, Token};
/// use std::sync::Arc;
///
/// struct Parent { child: Arc<Deferred<Child>> }
/// impl Injectable for Parent {
///     const ARITY: usize = 1;
///     fn construct(args: &mut Arguments) -> DiResult<Self> {
///         Ok(Parent { child: args.next_deferred()? })
///     }
/// }
///
/// struct Child { parent: Arc<Parent> }
/// impl Injectable for Child {
///     const ARITY: usize = 1;
///     fn construct(args: &mut Arguments) -> DiResult<Self> {
///         Ok(Child { parent: args.next()? })
///     }
/// }
///
/// let container = Container::new();
/// container.type_info()
///     .record::<Parent>([Param::token(Token::delay::<Child>())])
///     .record::<Child>([Param::token(Token::class::<Parent>())]);
///
/// let parent = container.resolve_type::<Parent>().unwrap();
/// assert!(!parent.child.is_resolved());
/// let child = parent.child.get().unwrap();
/// assert!(parent.child.is_resolved());
/// assert!(!child.parent.child.is_resolved());
/// ```
pub struct Deferred<T> {
    target: Token,
    container: Container,
    context: ResolutionContext,
    slot: Slot,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> Deferred<T> {
    pub(crate) fn new(target: Token, container: Container, context: ResolutionContext) -> Self {
        Self {
            target,
            container,
            context,
            slot: Slot::new(),
            _marker: PhantomData,
        }
    }

    /// Resolves the target on first call and returns the same value afterwards.
    pub fn get(&self) -> DiResult<Arc<T>> {
        let instance = self.slot.get_or_try_init(|| {
            tracing::trace!(target_token = %self.target, "resolving deferred target");
            self.container.resolve_with(&self.target, &self.context)
        })?;
        instance
            .downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    pub fn is_resolved(&self) -> bool {
        self.slot.is_set()
    }

    pub fn target(&self) -> &Token {
        &self.target
    }
}

impl<T> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("target", &self.target)
            .field("resolved", &self.slot.is_set())
            .finish()
    }
}
