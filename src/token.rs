//! Token types for registry storage and lookup.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use crate::constructor::{Constructor, Injectable};
use crate::deferred::Delay;

/// Key for registration storage and lookup.
///
/// Tokens come in two families. *Normal* tokens (`Name`, `Type`) are opaque
/// identifiers: resolving one that has no registration is an error.
/// *Constructible* tokens (`Class`, `Delayed`) carry their own way of producing
/// a value, so the container can build them even when nothing is registered.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Arguments, DiResult, Injectable, Token};
///
/// struct Clock;
/// impl Injectable for Clock {
///     fn construct(_: &mut Arguments) -> DiResult<Self> { Ok(Clock) }
/// }
///
/// let named = Token::name("clock");
/// let class = Token::class::<Clock>();
///
/// assert!(named.is_normal());
/// assert!(class.is_constructible());
/// assert_eq!(named, Token::from("clock"));
/// assert_eq!(class, Token::class::<Clock>());
/// assert_ne!(class, Token::of_type::<Clock>()); // different variants never match
/// ```
#[derive(Clone)]
pub enum Token {
    /// Opaque string identifier
    Name(Arc<str>),
    /// Type identity without a constructor (trait objects, foreign types)
    Type(TypeId, &'static str),
    /// Constructor identity
    Class(Constructor),
    /// Deferred-proxy marker wrapping another token
    Delayed(Delay),
}

impl Token {
    /// Creates a named token.
    pub fn name(name: impl Into<Arc<str>>) -> Self {
        Token::Name(name.into())
    }

    /// Creates a type-identity token for any `'static` type, including `dyn Trait`.
    pub fn of_type<T: ?Sized + 'static>() -> Self {
        Token::Type(TypeId::of::<T>(), std::any::type_name::<T>())
    }

    /// Creates a constructor token for an [`Injectable`] type.
    pub fn class<T: Injectable>() -> Self {
        Token::Class(Constructor::of::<T>())
    }

    /// Creates a deferred-proxy token that yields `Deferred<T>` for `target`.
    pub fn delayed<T: Send + Sync + 'static>(target: Token) -> Self {
        Token::Delayed(Delay::new::<T>(target))
    }

    /// Shorthand for a deferred proxy of an [`Injectable`] type's own constructor.
    pub fn delay<T: Injectable>() -> Self {
        Self::delayed::<T>(Self::class::<T>())
    }

    /// Normal tokens are plain identifiers with no construction strategy.
    #[inline]
    pub fn is_normal(&self) -> bool {
        matches!(self, Token::Name(_) | Token::Type(..))
    }

    /// Constructible tokens can be built without a registration.
    #[inline]
    pub fn is_constructible(&self) -> bool {
        !self.is_normal()
    }

    /// Human-readable name for diagnostics and error messages.
    pub fn display_name(&self) -> String {
        match self {
            Token::Name(name) => name.to_string(),
            Token::Type(_, name) => (*name).to_string(),
            Token::Class(ctor) => ctor.name().to_string(),
            Token::Delayed(delay) => format!("delay({})", delay.target().display_name()),
        }
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Token::Name(a), Token::Name(b)) => a == b,
            (Token::Type(a, _), Token::Type(b, _)) => a == b,
            (Token::Class(a), Token::Class(b)) => a.type_id() == b.type_id(),
            (Token::Delayed(a), Token::Delayed(b)) => a.target() == b.target(),
            _ => false,
        }
    }
}

impl Eq for Token {}

impl std::hash::Hash for Token {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Token::Name(name) => {
                0u8.hash(state);
                name.hash(state);
            }
            Token::Type(id, _) => {
                1u8.hash(state);
                id.hash(state);
            }
            Token::Class(ctor) => {
                2u8.hash(state);
                ctor.type_id().hash(state);
            }
            Token::Delayed(delay) => {
                3u8.hash(state);
                delay.target().hash(state);
            }
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Name(name) => f.debug_tuple("Name").field(name).finish(),
            Token::Type(_, name) => f.debug_tuple("Type").field(name).finish(),
            Token::Class(ctor) => f.debug_tuple("Class").field(&ctor.name()).finish(),
            Token::Delayed(delay) => f.debug_tuple("Delayed").field(delay.target()).finish(),
        }
    }
}

impl From<&str> for Token {
    fn from(name: &str) -> Self {
        Token::name(name)
    }
}

impl From<String> for Token {
    fn from(name: String) -> Self {
        Token::name(name)
    }
}

impl From<Constructor> for Token {
    fn from(ctor: Constructor) -> Self {
        Token::Class(ctor)
    }
}
