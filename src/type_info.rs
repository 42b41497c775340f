//! Parameter metadata for constructors.
//!
//! The container never inspects types on its own. Before a constructor with
//! nonzero arity is first built, its ordered parameter descriptors must be
//! recorded here.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::token::Token;

/// Descriptor for one constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// Resolve the token to a single value
    Token(Token),
    /// Resolve every registration of the token, in registration order
    Multiple(Token),
}

impl Param {
    /// Plain parameter resolved singularly.
    pub fn token(token: impl Into<Token>) -> Self {
        Param::Token(token.into())
    }

    /// Parameter receiving all registrations under `token`.
    pub fn all(token: impl Into<Token>) -> Self {
        Param::Multiple(token.into())
    }

    pub fn target(&self) -> &Token {
        match self {
            Param::Token(token) | Param::Multiple(token) => token,
        }
    }
}

impl From<Token> for Param {
    fn from(token: Token) -> Self {
        Param::Token(token)
    }
}

/// Ordered parameter descriptors keyed by constructor type identity.
///
/// A `TypeInfo` is shared by a container and all of its children.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Param, Token, TypeInfo};
///
/// struct Mailer;
///
/// let info = TypeInfo::new();
/// info.record::<Mailer>([Param::token("smtp"), Param::all("plugins")]);
///
/// let params = info.params::<Mailer>().unwrap();
/// assert_eq!(params.len(), 2);
/// assert_eq!(params[1], Param::Multiple(Token::name("plugins")));
/// ```
#[derive(Debug, Default)]
pub struct TypeInfo {
    params: RwLock<HashMap<TypeId, Arc<[Param]>>>,
}

impl TypeInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records (or replaces) the descriptors for `T`.
    pub fn record<T: 'static>(&self, params: impl IntoIterator<Item = Param>) -> &Self {
        self.record_id(TypeId::of::<T>(), params)
    }

    /// Records descriptors for a raw type identity.
    pub fn record_id(&self, type_id: TypeId, params: impl IntoIterator<Item = Param>) -> &Self {
        let params: Arc<[Param]> = params.into_iter().collect();
        self.params.write().insert(type_id, params);
        self
    }

    pub fn params<T: 'static>(&self) -> Option<Arc<[Param]>> {
        self.get(TypeId::of::<T>())
    }

    pub fn get(&self, type_id: TypeId) -> Option<Arc<[Param]>> {
        self.params.read().get(&type_id).cloned()
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.params.read().contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.params.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.read().is_empty()
    }
}
