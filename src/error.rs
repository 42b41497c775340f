//! Error types for the inversion-of-control container.

use thiserror::Error;

use crate::lifecycle::Lifecycle;
use crate::providers::ProviderKind;

/// Container errors
///
/// Every failure is synchronous and propagates to the original caller of
/// `resolve`/`resolve_all` (or `register` for configuration errors). The
/// container never retries and never recovers a partial graph.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Container, DiError, Token};
///
/// let container = Container::new();
/// match container.resolve(&Token::name("database")) {
///     Err(DiError::Unregistered(token)) => assert_eq!(token, "database"),
///     _ => unreachable!(),
/// }
/// ```
///
/// Construction failures nest; [`DiError::root_cause`] digs out the innermost
/// error:
///
/// ```rust
/// use ferrous_ioc::DiError;
///
/// let inner = DiError::Unregistered("logger".to_string());
/// let wrapped = DiError::Construction {
///     constructor: "app::Service",
///     index: 1,
///     source: Box::new(inner),
/// };
/// assert!(matches!(wrapped.root_cause(), DiError::Unregistered(_)));
/// assert!(wrapped.to_string().contains("position #1"));
/// ```
#[derive(Debug, Clone, Error)]
pub enum DiError {
    /// Token has no registration anywhere in the parent chain and is not constructible
    #[error("Attempted to resolve unregistered dependency token: \"{0}\"")]
    Unregistered(String),

    /// Caching lifecycle combined with a provider that has nothing to cache against
    #[error("Cannot use lifecycle \"{lifecycle}\" with {provider} providers")]
    UnsupportedLifecycle {
        lifecycle: Lifecycle,
        provider: ProviderKind,
    },

    /// Registration arguments that can never produce a value
    #[error("Invalid registration for \"{token}\": {reason}")]
    InvalidRegistration { token: String, reason: &'static str },

    /// Constructor declares parameters but no descriptors were recorded
    #[error("TypeInfo not known for \"{0}\"")]
    MissingParameterMetadata(&'static str),

    /// A constructor parameter failed to resolve
    #[error("Cannot inject the dependency at position #{index} of \"{constructor}\" constructor. Reason:\n    {source}")]
    Construction {
        constructor: &'static str,
        index: usize,
        #[source]
        source: Box<DiError>,
    },

    /// Token is neither registered nor constructible
    #[error("Attempted to construct an undefined constructor \"{0}\". Could mean a circular dependency problem. Try using a delayed token.")]
    AmbiguousConstruction(String),

    /// Constructor re-entered while it was still being built (includes path)
    #[error("Circular dependency: {}", .0.join(" -> "))]
    Circular(Vec<&'static str>),

    /// Maximum resolution depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),

    /// Resolved instance is not of the requested type
    #[error("Type mismatch for: {0}")]
    TypeMismatch(&'static str),

    /// Constructor consumed its arguments in a different shape than recorded
    #[error("Argument #{index} of \"{constructor}\": {reason}")]
    ArgumentMismatch {
        constructor: &'static str,
        index: usize,
        reason: &'static str,
    },

    /// Container configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DiError {
    /// Returns the innermost error beneath any [`DiError::Construction`] wrappers.
    pub fn root_cause(&self) -> &DiError {
        let mut current = self;
        while let DiError::Construction { source, .. } = current {
            current = source;
        }
        current
    }

    /// Constructor names from the outermost construction down to the failure.
    pub fn construction_path(&self) -> Vec<(&'static str, usize)> {
        let mut path = Vec::new();
        let mut current = self;
        while let DiError::Construction {
            constructor,
            index,
            source,
        } = current
        {
            path.push((*constructor, *index));
            current = source;
        }
        path
    }
}

/// Result type for container operations
pub type DiResult<T> = Result<T, DiError>;
