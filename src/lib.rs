//! # ferrous-ioc
//!
//! Inversion-of-control container for Rust: tokens map to providers, and a
//! resolver builds object graphs on demand while honoring per-registration
//! lifecycles and parent/child container scoping.
//!
//! ## Features
//!
//! - **Token-based registry**: names, type identities and constructors as keys,
//!   with ordered multi-registration per token
//! - **Five provider kinds**: values, factories, token aliases, classes and bare constructors
//! - **Four lifecycles**: Transient, Singleton, ContainerScoped and ResolutionScoped
//! - **Auto-wiring**: constructors receive parameters resolved from recorded descriptors
//! - **Cycle breaking**: deferred proxies resolve their target on first use
//! - **Cycle detection**: true cycles fail with the full path instead of overflowing the stack
//! - **Thread-safe**: cached lifecycles construct exactly once under contention
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_ioc::{Arguments, Container, DiResult, Injectable, Lifecycle, Param, Provider, Token};
//! use std::sync::Arc;
//!
//! struct Database {
//!     url: Arc<String>,
//! }
//!
//! impl Injectable for Database {
//!     const ARITY: usize = 1;
//!     fn construct(args: &mut Arguments) -> DiResult<Self> {
//!         Ok(Database { url: args.next()? })
//!     }
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! impl Injectable for UserService {
//!     const ARITY: usize = 1;
//!     fn construct(args: &mut Arguments) -> DiResult<Self> {
//!         Ok(UserService { db: args.next()? })
//!     }
//! }
//!
//! let container = Container::new();
//! container.register_instance(Token::name("db_url"), "postgres://localhost".to_string()).unwrap();
//! container.register_singleton(Token::class::<Database>(), None).unwrap();
//!
//! // Parameter metadata is supplied explicitly per constructor
//! container.type_info()
//!     .record::<Database>([Param::token("db_url")])
//!     .record::<UserService>([Param::token(Token::class::<Database>())]);
//!
//! let users = container.resolve_type::<UserService>().unwrap();
//! assert_eq!(*users.db.url, "postgres://localhost");
//!
//! // Database is a singleton, UserService is built fresh each time
//! let again = container.resolve_type::<UserService>().unwrap();
//! assert!(Arc::ptr_eq(&users.db, &again.db));
//! assert!(!Arc::ptr_eq(&users, &again));
//! ```
//!
//! ## Lifecycles
//!
//! - **Transient**: a fresh value on every resolution
//! - **Singleton**: one value per registration, shared by every descendant container
//! - **ContainerScoped**: one value per container; children start empty
//! - **ResolutionScoped**: one value per top-level `resolve` call
//!
//! ## Child Containers
//!
//! ```rust
//! use ferrous_ioc::{Arguments, Container, DiResult, Injectable, Lifecycle, Provider, Token};
//! use std::sync::Arc;
//!
//! struct RequestState;
//! impl Injectable for RequestState {
//!     fn construct(_: &mut Arguments) -> DiResult<Self> { Ok(RequestState) }
//! }
//!
//! let root = Container::new();
//! let token = Token::name("state");
//! root.register(token.clone(), Provider::class::<RequestState>(), Lifecycle::ContainerScoped).unwrap();
//!
//! let request_a = root.create_child_container();
//! let request_b = root.create_child_container();
//!
//! let a1 = request_a.resolve(&token).unwrap();
//! let a2 = request_a.resolve(&token).unwrap();
//! let b = request_b.resolve(&token).unwrap();
//! assert!(Arc::ptr_eq(&a1, &a2)); // same container, same instance
//! assert!(!Arc::ptr_eq(&a1, &b)); // sibling containers, different instances
//! ```

use std::any::Any;
use std::sync::Arc;

// Module declarations
pub mod config;
pub mod constructor;
pub mod container;
pub mod deferred;
pub mod descriptors;
pub mod error;
pub mod lifecycle;
pub mod observer;
pub mod providers;
pub mod token;
pub mod type_info;

// Internal modules
mod internal;
mod registration;

// Re-export core types
pub use config::ContainerConfig;
pub use constructor::{Argument, Arguments, Constructor, Injectable};
pub use container::{Container, ResolutionContext, WeakContainer};
pub use deferred::{Deferred, Delay};
pub use descriptors::RegistrationDescriptor;
pub use error::{DiError, DiResult};
pub use lifecycle::{Lifecycle, RegistrationOptions};
pub use observer::{ContainerObserver, MetricsObserver, TracingObserver};
pub use providers::{FactoryFn, Provider, ProviderKind};
pub use token::Token;
pub use type_info::{Param, TypeInfo};

/// Type-erased resolved value.
pub type Instance = Arc<dyn Any + Send + Sync>;
