//! Resolution engine: lookup, provider dispatch, caching and construction.

use std::sync::Arc;
use std::time::Instant;

use super::{Container, ResolutionContext};
use crate::constructor::{Argument, Arguments, Constructor, Injectable};
use crate::error::{DiError, DiResult};
use crate::internal::{ConstructionGuard, DepthGuard};
use crate::lifecycle::Lifecycle;
use crate::providers::Provider;
use crate::registration::Registration;
use crate::token::Token;
use crate::type_info::Param;
use crate::Instance;

impl Container {
    /// Resolves `token` in a fresh resolution context.
    ///
    /// # Errors
    ///
    /// - [`DiError::Unregistered`] for a normal token with no registration
    /// - [`DiError::Construction`] wrapping the failure of any constructor parameter
    /// - [`DiError::MissingParameterMetadata`], [`DiError::Circular`],
    ///   [`DiError::DepthExceeded`] from construction
    pub fn resolve(&self, token: &Token) -> DiResult<Instance> {
        self.resolve_with(token, &ResolutionContext::new())
    }

    /// Resolves `token` inside an existing resolution context.
    pub fn resolve_with(&self, token: &Token, context: &ResolutionContext) -> DiResult<Instance> {
        let _depth = DepthGuard::enter(self.inner().config.max_depth)?;

        let observers = &self.inner().observers;
        if !observers.has_observers() {
            return self.resolve_inner(token, context);
        }

        let start = Instant::now();
        observers.resolving(token);
        let result = self.resolve_inner(token, context);
        match &result {
            Ok(_) => observers.resolved(token, start.elapsed()),
            Err(error) => observers.failed(token, error),
        }
        result
    }

    fn resolve_inner(&self, token: &Token, context: &ResolutionContext) -> DiResult<Instance> {
        match self.registration(token) {
            Some(registration) => self.resolve_registration(&registration, context),
            None if token.is_normal() => Err(DiError::Unregistered(token.display_name())),
            None => {
                tracing::trace!(token = %token, "implicit construction");
                self.construct(token, context)
            }
        }
    }

    /// Resolves every registration of `token` in registration order.
    ///
    /// An unregistered constructible token yields a single constructed value.
    pub fn resolve_all(&self, token: &Token) -> DiResult<Vec<Instance>> {
        self.resolve_all_with(token, &ResolutionContext::new())
    }

    pub fn resolve_all_with(&self, token: &Token, context: &ResolutionContext) -> DiResult<Vec<Instance>> {
        let _depth = DepthGuard::enter(self.inner().config.max_depth)?;

        match self.all_registrations(token) {
            Some(registrations) => registrations
                .iter()
                .map(|registration| self.resolve_registration(registration, context))
                .collect(),
            None if token.is_normal() => Err(DiError::Unregistered(token.display_name())),
            None => Ok(vec![self.construct(token, context)?]),
        }
    }

    /// Resolves `token` and downcasts the result.
    pub fn resolve_as<T: Send + Sync + 'static>(&self, token: &Token) -> DiResult<Arc<T>> {
        self.resolve(token)?
            .downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves every registration of `token` and downcasts each result.
    pub fn resolve_all_as<T: Send + Sync + 'static>(&self, token: &Token) -> DiResult<Vec<Arc<T>>> {
        self.resolve_all(token)?
            .into_iter()
            .map(|instance| {
                instance
                    .downcast::<T>()
                    .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
            })
            .collect()
    }

    /// Resolves an [`Injectable`] type through its own constructor token.
    pub fn resolve_type<T: Injectable>(&self) -> DiResult<Arc<T>> {
        self.resolve_as::<T>(&Token::class::<T>())
    }

    // ----- Lookup -----

    /// Nearest registration: local first, then up the parent chain.
    pub(crate) fn registration(&self, token: &Token) -> Option<Arc<Registration>> {
        let local = self.inner().registry.read().get(token).cloned();
        match local {
            Some(registration) => Some(registration),
            None => self.parent().and_then(|parent| parent.registration(token)),
        }
    }

    pub(crate) fn all_registrations(&self, token: &Token) -> Option<Vec<Arc<Registration>>> {
        let local = self.inner().registry.read().get_all(token).map(<[_]>::to_vec);
        match local {
            Some(registrations) => Some(registrations),
            None => self.parent().and_then(|parent| parent.all_registrations(token)),
        }
    }

    // ----- Dispatch -----

    fn resolve_registration(
        &self,
        registration: &Registration,
        context: &ResolutionContext,
    ) -> DiResult<Instance> {
        let resolution_scoped = registration.lifecycle == Lifecycle::ResolutionScoped;
        if resolution_scoped {
            if let Some(cached) = context.get(registration.id) {
                return Ok(cached);
            }
        }

        let persist = registration.lifecycle.persists();

        let resolved = match &registration.provider {
            Provider::Value(value) => return Ok(Arc::clone(value)),
            Provider::Token(target) => {
                if persist {
                    registration
                        .instance
                        .get_or_try_init(|| self.resolve_with(target, context))?
                } else {
                    self.resolve_with(target, context)?
                }
            }
            Provider::Class(target) => {
                if persist {
                    registration
                        .instance
                        .get_or_try_init(|| self.construct(target, context))?
                } else {
                    self.construct(target, context)?
                }
            }
            Provider::Factory(factory) => factory(self)?,
            Provider::Constructor(ctor) => self.build(ctor, context)?,
        };

        if resolution_scoped {
            context.insert(registration.id, Arc::clone(&resolved));
        }
        Ok(resolved)
    }

    // ----- Construction -----

    fn construct(&self, target: &Token, context: &ResolutionContext) -> DiResult<Instance> {
        match target {
            Token::Delayed(delay) => {
                tracing::trace!(target_token = %delay.target(), "deferred proxy created");
                Ok(delay.create_proxy(self.clone(), context.clone()))
            }
            Token::Class(ctor) => self.build(ctor, context),
            Token::Name(_) | Token::Type(..) => {
                Err(DiError::AmbiguousConstruction(target.display_name()))
            }
        }
    }

    fn build(&self, ctor: &Constructor, context: &ResolutionContext) -> DiResult<Instance> {
        let _guard = ConstructionGuard::enter(ctor.type_id(), ctor.name())?;

        if ctor.arity() == 0 {
            return ctor.instantiate(Arguments::empty(ctor.name()));
        }

        let params = self
            .type_info()
            .get(ctor.type_id())
            .filter(|params| !params.is_empty())
            .ok_or(DiError::MissingParameterMetadata(ctor.name()))?;

        let mut values = Vec::with_capacity(params.len());
        for (index, param) in params.iter().enumerate() {
            let value = match param {
                Param::Token(token) => self.resolve_with(token, context).map(Argument::Single),
                Param::Multiple(token) => self
                    .resolve_all_with(token, context)
                    .map(Argument::Multiple),
            }
            .map_err(|source| DiError::Construction {
                constructor: ctor.name(),
                index,
                source: Box::new(source),
            })?;
            values.push(value);
        }

        tracing::trace!(constructor = ctor.name(), params = values.len(), "constructing");
        ctor.instantiate(Arguments::new(ctor.name(), values))
    }
}
