//! Provider variants: how a registration produces its value.

use std::fmt;
use std::sync::Arc;

use crate::constructor::{Constructor, Injectable};
use crate::container::Container;
use crate::error::DiResult;
use crate::token::Token;
use crate::Instance;

/// Factory signature. Factories receive the container they were resolved from.
pub type FactoryFn = Arc<dyn Fn(&Container) -> DiResult<Instance> + Send + Sync>;

/// Construction strategy attached to a registration.
///
/// The enum is closed; the resolver matches it exhaustively.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Container, Lifecycle, Provider, Token};
/// use std::sync::Arc;
///
/// let container = Container::new();
/// container.register(Token::name("port"), Provider::value(8080u16), Lifecycle::Transient).unwrap();
/// container.register(Token::name("url"), Provider::factory(|c| {
///     let port = c.resolve_as::<u16>(&Token::name("port")).unwrap();
///     format!("http://localhost:{}", port)
/// }), Lifecycle::Transient).unwrap();
/// container.register(Token::name("endpoint"), Provider::token("url"), Lifecycle::Transient).unwrap();
///
/// let url = container.resolve_as::<String>(&Token::name("endpoint")).unwrap();
/// assert_eq!(*url, "http://localhost:8080");
/// ```
#[derive(Clone)]
pub enum Provider {
    /// Literal value returned as-is
    Value(Instance),
    /// Function invoked on every resolution, never cached by the container
    Factory(FactoryFn),
    /// Alias resolved through another token
    Token(Token),
    /// Explicitly wrapped constructible token (a class or a delayed class)
    Class(Token),
    /// Bare constructor used directly, always built fresh
    Constructor(Constructor),
}

impl Provider {
    /// Value provider holding `value`.
    pub fn value<T: Send + Sync + 'static>(value: T) -> Self {
        Provider::Value(Arc::new(value))
    }

    /// Value provider from an already shared instance.
    pub fn instance(instance: Instance) -> Self {
        Provider::Value(instance)
    }

    /// Infallible factory.
    pub fn factory<T, F>(factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Container) -> T + Send + Sync + 'static,
    {
        Provider::Factory(Arc::new(move |container: &Container| -> DiResult<Instance> {
            let instance: Instance = Arc::new(factory(container));
            Ok(instance)
        }))
    }

    /// Factory that may fail; errors propagate to the caller of `resolve`.
    pub fn try_factory<T, F>(factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Container) -> DiResult<T> + Send + Sync + 'static,
    {
        Provider::Factory(Arc::new(move |container: &Container| -> DiResult<Instance> {
            let instance: Instance = Arc::new(factory(container)?);
            Ok(instance)
        }))
    }

    /// Alias to another token.
    pub fn token(token: impl Into<Token>) -> Self {
        Provider::Token(token.into())
    }

    /// Class provider for an [`Injectable`] type.
    pub fn class<T: Injectable>() -> Self {
        Provider::Class(Token::class::<T>())
    }

    /// Class provider for an explicit constructor.
    pub fn constructor(ctor: Constructor) -> Self {
        Provider::Class(Token::Class(ctor))
    }

    /// Class provider whose value is a deferred proxy for `T`.
    pub fn delayed<T: Injectable>() -> Self {
        Provider::Class(Token::delay::<T>())
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            Provider::Value(_) => ProviderKind::Value,
            Provider::Factory(_) => ProviderKind::Factory,
            Provider::Token(_) => ProviderKind::Token,
            Provider::Class(_) => ProviderKind::Class,
            Provider::Constructor(_) => ProviderKind::Constructor,
        }
    }
}

impl From<Constructor> for Provider {
    fn from(ctor: Constructor) -> Self {
        Provider::Constructor(ctor)
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Value(_) => f.write_str("Value(..)"),
            Provider::Factory(_) => f.write_str("Factory(..)"),
            Provider::Token(token) => f.debug_tuple("Token").field(token).finish(),
            Provider::Class(token) => f.debug_tuple("Class").field(token).finish(),
            Provider::Constructor(ctor) => f.debug_tuple("Constructor").field(ctor).finish(),
        }
    }
}

/// Discriminant of a [`Provider`], for errors and introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Value,
    Factory,
    Token,
    Class,
    Constructor,
}

impl ProviderKind {
    /// Value and factory providers have nothing for a caching lifecycle to hold on to.
    pub fn supports_caching(self) -> bool {
        !matches!(self, ProviderKind::Value | ProviderKind::Factory)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderKind::Value => "Value",
            ProviderKind::Factory => "Factory",
            ProviderKind::Token => "Token",
            ProviderKind::Class => "Class",
            ProviderKind::Constructor => "Constructor",
        };
        f.write_str(name)
    }
}
