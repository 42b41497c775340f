//! Registration lifecycle definitions.

use std::fmt;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Lifecycle policies controlling how a registration caches what it produces
///
/// Only `Class` and `Token` providers honor the caching lifecycles. Value and
/// factory providers are rejected at registration time when combined with
/// anything other than `Transient`, and bare constructors are always built
/// fresh.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Container, Injectable, Arguments, DiResult, Lifecycle, Provider, Token};
/// use std::sync::Arc;
///
/// struct Database;
/// impl Injectable for Database {
///     fn construct(_: &mut Arguments) -> DiResult<Self> { Ok(Database) }
/// }
///
/// let root = Container::new();
/// root.register(Token::name("db"), Provider::class::<Database>(), Lifecycle::Singleton).unwrap();
/// root.register(Token::name("conn"), Provider::class::<Database>(), Lifecycle::ContainerScoped).unwrap();
///
/// let child = root.create_child_container();
///
/// // Singleton: one instance for the whole container family
/// let a = root.resolve_as::<Database>(&Token::name("db")).unwrap();
/// let b = child.resolve_as::<Database>(&Token::name("db")).unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
///
/// // ContainerScoped: one instance per container
/// let c = root.resolve_as::<Database>(&Token::name("conn")).unwrap();
/// let d = child.resolve_as::<Database>(&Token::name("conn")).unwrap();
/// assert!(!Arc::ptr_eq(&c, &d));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub enum Lifecycle {
    /// New value on every resolution, never cached
    #[default]
    Transient,
    /// One value on the registration, shared with descendant containers
    ///
    /// The first resolution wins and the value persists until
    /// `clear_instances` or `reset`.
    Singleton,
    /// One value per container instance
    ///
    /// Child containers receive fresh copies of these registrations, so they
    /// never see the parent's cached value.
    ContainerScoped,
    /// One value per top-level resolve call
    ///
    /// Every resolution inside the same call graph (sharing one
    /// `ResolutionContext`) receives the same value.
    ResolutionScoped,
}

impl Lifecycle {
    /// Whether the value is memoized on the registration itself.
    #[inline]
    pub fn persists(self) -> bool {
        matches!(self, Lifecycle::Singleton | Lifecycle::ContainerScoped)
    }

    /// Whether the lifecycle caches anything at all.
    #[inline]
    pub fn is_cached(self) -> bool {
        !matches!(self, Lifecycle::Transient)
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lifecycle::Transient => "Transient",
            Lifecycle::Singleton => "Singleton",
            Lifecycle::ContainerScoped => "ContainerScoped",
            Lifecycle::ResolutionScoped => "ResolutionScoped",
        };
        f.write_str(name)
    }
}

/// Options accepted by [`Container::register`](crate::Container::register).
///
/// A bare [`Lifecycle`] converts into options, so most call sites pass the
/// lifecycle directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistrationOptions {
    pub lifecycle: Lifecycle,
}

impl RegistrationOptions {
    pub fn new(lifecycle: Lifecycle) -> Self {
        Self { lifecycle }
    }
}

impl From<Lifecycle> for RegistrationOptions {
    fn from(lifecycle: Lifecycle) -> Self {
        Self { lifecycle }
    }
}
