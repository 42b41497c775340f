//! Constructor identities and the arguments handed to them.
//!
//! A [`Constructor`] is the Rust stand-in for a class: a type identity, a
//! declared parameter count, and a function that turns resolved
//! [`Arguments`] into an instance. The parameter *descriptors* live
//! separately in [`TypeInfo`](crate::TypeInfo), recorded by whoever wires the
//! graph.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use crate::deferred::Deferred;
use crate::error::{DiError, DiResult};
use crate::Instance;

type BuildFn = dyn Fn(&mut Arguments) -> DiResult<Instance> + Send + Sync;

/// Types the container can construct.
///
/// `ARITY` is the number of parameters `construct` consumes. A zero-arity
/// type is instantiated directly; anything else needs its parameter
/// descriptors recorded in the container's [`TypeInfo`](crate::TypeInfo).
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Arguments, Container, DiResult, Injectable, Param, Token};
/// use std::sync::Arc;
///
/// struct Config { url: String }
///
/// struct Repository { config: Arc<Config> }
/// impl Injectable for Repository {
///     const ARITY: usize = 1;
///     fn construct(args: &mut Arguments) -> DiResult<Self> {
///         Ok(Repository { config: args.next()? })
///     }
/// }
///
/// let container = Container::new();
/// container.register_instance(Token::name("config"), Config { url: "sqlite::memory:".into() }).unwrap();
/// container.type_info().record::<Repository>([Param::token("config")]);
///
/// let repo = container.resolve_type::<Repository>().unwrap();
/// assert_eq!(repo.config.url, "sqlite::memory:");
/// ```
pub trait Injectable: Send + Sync + Sized + 'static {
    /// Declared parameter count.
    const ARITY: usize = 0;

    /// Builds the value from arguments resolved in declared order.
    fn construct(args: &mut Arguments) -> DiResult<Self>;
}

/// A type-erased constructor with a stable identity.
#[derive(Clone)]
pub struct Constructor {
    type_id: TypeId,
    name: &'static str,
    arity: usize,
    build: Arc<BuildFn>,
}

impl Constructor {
    /// Constructor for an [`Injectable`] type.
    pub fn of<T: Injectable>() -> Self {
        Self::new::<T, _>(T::ARITY, T::construct)
    }

    /// Constructor from a closure, for types that do not implement [`Injectable`].
    pub fn new<T, F>(arity: usize, build: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&mut Arguments) -> DiResult<T> + Send + Sync + 'static,
    {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            arity,
            build: Arc::new(move |args: &mut Arguments| -> DiResult<Instance> {
                let instance: Instance = Arc::new(build(args)?);
                Ok(instance)
            }),
        }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.arity
    }

    pub(crate) fn instantiate(&self, mut args: Arguments) -> DiResult<Instance> {
        (self.build)(&mut args)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

/// One resolved constructor parameter.
#[derive(Clone)]
pub enum Argument {
    /// Result of resolving a plain token
    Single(Instance),
    /// Every registration of a token, in registration order
    Multiple(Vec<Instance>),
}

/// Resolved parameters, consumed in declared order by a constructor.
pub struct Arguments {
    constructor: &'static str,
    values: std::vec::IntoIter<Argument>,
    position: usize,
}

impl Arguments {
    pub(crate) fn new(constructor: &'static str, values: Vec<Argument>) -> Self {
        Self {
            constructor,
            values: values.into_iter(),
            position: 0,
        }
    }

    pub(crate) fn empty(constructor: &'static str) -> Self {
        Self::new(constructor, Vec::new())
    }

    /// Number of arguments not yet consumed.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    /// Takes the next argument without interpreting it.
    pub fn next_argument(&mut self) -> DiResult<Argument> {
        let index = self.position;
        let argument = self.values.next().ok_or(DiError::ArgumentMismatch {
            constructor: self.constructor,
            index,
            reason: "no argument left",
        })?;
        self.position += 1;
        Ok(argument)
    }

    /// Takes the next single argument as an untyped instance.
    pub fn next_instance(&mut self) -> DiResult<Instance> {
        let index = self.position;
        match self.next_argument()? {
            Argument::Single(instance) => Ok(instance),
            Argument::Multiple(_) => Err(DiError::ArgumentMismatch {
                constructor: self.constructor,
                index,
                reason: "expected a single value, found a multiple parameter",
            }),
        }
    }

    /// Takes the next single argument as `Arc<T>`.
    pub fn next<T: Send + Sync + 'static>(&mut self) -> DiResult<Arc<T>> {
        self.next_instance()?
            .downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Takes the next argument and clones the value out of its `Arc`.
    ///
    /// Useful for trait objects registered as `Arc<dyn Trait>` values.
    pub fn next_cloned<T: Clone + Send + Sync + 'static>(&mut self) -> DiResult<T> {
        self.next::<T>().map(|value| (*value).clone())
    }

    /// Takes the next argument as a deferred proxy for `T`.
    pub fn next_deferred<T: Send + Sync + 'static>(&mut self) -> DiResult<Arc<Deferred<T>>> {
        self.next::<Deferred<T>>()
    }

    /// Takes the next multiple argument, downcasting every element.
    pub fn next_all<T: Send + Sync + 'static>(&mut self) -> DiResult<Vec<Arc<T>>> {
        let index = self.position;
        match self.next_argument()? {
            Argument::Multiple(values) => values
                .into_iter()
                .map(|value| {
                    value
                        .downcast::<T>()
                        .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
                })
                .collect(),
            Argument::Single(_) => Err(DiError::ArgumentMismatch {
                constructor: self.constructor,
                index,
                reason: "expected a multiple parameter, found a single value",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair {
        left: Arc<u32>,
        right: Vec<Arc<String>>,
    }

    impl Injectable for Pair {
        const ARITY: usize = 2;
        fn construct(args: &mut Arguments) -> DiResult<Self> {
            Ok(Pair {
                left: args.next()?,
                right: args.next_all()?,
            })
        }
    }

    #[test]
    fn constructor_identity_follows_type() {
        let ctor = Constructor::of::<Pair>();
        assert_eq!(ctor.type_id(), TypeId::of::<Pair>());
        assert_eq!(ctor.arity(), 2);
        assert!(ctor.name().ends_with("Pair"));
    }

    #[test]
    fn arguments_are_consumed_in_order() {
        let ctor = Constructor::of::<Pair>();
        let args = Arguments::new(
            ctor.name(),
            vec![
                Argument::Single(Arc::new(7u32)),
                Argument::Multiple(vec![Arc::new("a".to_string()), Arc::new("b".to_string())]),
            ],
        );
        let pair = ctor.instantiate(args).unwrap().downcast::<Pair>().unwrap();
        assert_eq!(*pair.left, 7);
        assert_eq!(pair.right.len(), 2);
        assert_eq!(*pair.right[1], "b");
    }

    #[test]
    fn wrong_argument_shape_is_reported() {
        let mut args = Arguments::new("Demo", vec![Argument::Single(Arc::new(1u8))]);
        match args.next_all::<u8>() {
            Err(DiError::ArgumentMismatch { constructor, index, .. }) => {
                assert_eq!(constructor, "Demo");
                assert_eq!(index, 0);
            }
            _ => panic!("Expected ArgumentMismatch"),
        }
        assert!(matches!(
            args.next::<u8>(),
            Err(DiError::ArgumentMismatch { index: 1, .. })
        ));
    }

    #[test]
    fn downcast_failure_is_type_mismatch() {
        let mut args = Arguments::new("Demo", vec![Argument::Single(Arc::new(1u8))]);
        assert!(matches!(args.next::<String>(), Err(DiError::TypeMismatch(_))));
    }
}
