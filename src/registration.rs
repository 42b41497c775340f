//! Registration entries and the ordered registry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::internal::Slot;
use crate::lifecycle::Lifecycle;
use crate::providers::Provider;
use crate::token::Token;

static NEXT_REGISTRATION_ID: AtomicU64 = AtomicU64::new(1);

/// Provider plus lifecycle plus cache slot
pub(crate) struct Registration {
    /// Identity used as the key in resolution contexts
    pub(crate) id: u64,
    pub(crate) provider: Provider,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) instance: Slot,
}

impl Registration {
    pub(crate) fn new(provider: Provider, lifecycle: Lifecycle) -> Self {
        Self {
            id: NEXT_REGISTRATION_ID.fetch_add(1, Ordering::Relaxed),
            provider,
            lifecycle,
            instance: Slot::new(),
        }
    }

    /// Same provider and lifecycle under a new identity with an empty slot.
    pub(crate) fn fresh_copy(&self) -> Self {
        Self::new(self.provider.clone(), self.lifecycle)
    }
}

/// Ordered multi-map from token to registrations
///
/// Single resolution takes the most recent entry; multi-resolution walks the
/// list oldest first. Entries are only ever appended or replaced wholesale.
#[derive(Default)]
pub(crate) struct Registry {
    entries: HashMap<Token, Vec<Arc<Registration>>>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends `registration` to the token's list.
    pub(crate) fn set(&mut self, token: Token, registration: Arc<Registration>) {
        self.entries.entry(token).or_default().push(registration);
    }

    /// Replaces the token's whole list.
    pub(crate) fn set_all(&mut self, token: Token, registrations: Vec<Arc<Registration>>) {
        self.entries.insert(token, registrations);
    }

    /// Most recently appended registration.
    pub(crate) fn get(&self, token: &Token) -> Option<&Arc<Registration>> {
        self.entries.get(token).and_then(|list| list.last())
    }

    pub(crate) fn get_all(&self, token: &Token) -> Option<&[Arc<Registration>]> {
        self.entries
            .get(token)
            .map(Vec::as_slice)
            .filter(|list| !list.is_empty())
    }

    #[inline]
    pub(crate) fn has(&self, token: &Token) -> bool {
        self.get_all(token).is_some()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&Token, &[Arc<Registration>])> {
        self.entries.iter().map(|(token, list)| (token, list.as_slice()))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}
