//! Memoization cell for cached instances.

use std::cell::RefCell;

use parking_lot::ReentrantMutex;

use crate::error::DiResult;
use crate::Instance;

/// Cache slot with exactly-once initialization.
///
/// Concurrent first resolutions serialize on the lock, so only one value is
/// ever constructed. The lock is re-entrant: a thread that comes back to the
/// same slot while initializing it (a true cycle) runs the initializer again
/// and lets the cycle detector report the error instead of deadlocking.
pub(crate) struct Slot {
    cell: ReentrantMutex<RefCell<Option<Instance>>>,
}

impl Slot {
    pub(crate) fn new() -> Self {
        Self {
            cell: ReentrantMutex::new(RefCell::new(None)),
        }
    }

    #[cfg(test)]
    pub(crate) fn get(&self) -> Option<Instance> {
        let guard = self.cell.lock();
        let value = guard.borrow().clone();
        value
    }

    pub(crate) fn get_or_try_init<F>(&self, init: F) -> DiResult<Instance>
    where
        F: FnOnce() -> DiResult<Instance>,
    {
        let guard = self.cell.lock();
        let cached = guard.borrow().clone();
        if let Some(value) = cached {
            return Ok(value);
        }

        // No RefCell borrow is held across `init`; it may re-enter this slot.
        let value = init()?;
        let mut slot = guard.borrow_mut();
        Ok(slot.get_or_insert(value).clone())
    }

    pub(crate) fn clear(&self) {
        let guard = self.cell.lock();
        guard.borrow_mut().take();
    }

    pub(crate) fn is_set(&self) -> bool {
        let guard = self.cell.lock();
        let set = guard.borrow().is_some();
        set
    }
}

impl Default for Slot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn initializes_once() {
        let slot = Slot::new();
        let calls = AtomicUsize::new(0);
        let make = || -> DiResult<Instance> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(5u8))
        };

        let a = slot.get_or_try_init(make).unwrap();
        let b = slot.get_or_try_init(make).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(slot.is_set());
    }

    #[test]
    fn failed_init_leaves_slot_empty() {
        let slot = Slot::new();
        let result = slot.get_or_try_init(|| Err(crate::DiError::TypeMismatch("u8")));
        assert!(result.is_err());
        assert!(!slot.is_set());
    }

    #[test]
    fn reentrant_init_keeps_first_stored_value() {
        let slot = Slot::new();
        let outer = slot
            .get_or_try_init(|| {
                let inner = slot.get_or_try_init(|| Ok(Arc::new(1u8) as Instance))?;
                assert_eq!(*inner.downcast::<u8>().unwrap(), 1);
                Ok(Arc::new(2u8) as Instance)
            })
            .unwrap();
        assert_eq!(*outer.downcast::<u8>().unwrap(), 1);
    }

    #[test]
    fn clear_resets() {
        let slot = Slot::new();
        slot.get_or_try_init(|| Ok(Arc::new(1u8) as Instance)).unwrap();
        slot.clear();
        assert!(slot.get().is_none());
    }
}
