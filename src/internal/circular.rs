//! Circular dependency and recursion depth detection.

use std::any::TypeId;
use std::cell::RefCell;

use crate::error::{DiError, DiResult};

// Thread-local resolution state; resolution never hops threads mid-call.
thread_local! {
    static RESOLUTION_TLS: RefCell<ResolutionTls> = RefCell::new(ResolutionTls::default());
}

#[derive(Default)]
struct ResolutionTls {
    constructing: Vec<(TypeId, &'static str)>,
    depth: usize,
}

/// Guard counting nested resolve calls on this thread.
pub(crate) struct DepthGuard;

impl DepthGuard {
    pub(crate) fn enter(max_depth: usize) -> DiResult<Self> {
        RESOLUTION_TLS.with(|tls| {
            let mut tls = tls.borrow_mut();
            if tls.depth >= max_depth {
                return Err(DiError::DepthExceeded(tls.depth));
            }
            tls.depth += 1;
            Ok(DepthGuard)
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        RESOLUTION_TLS.with(|tls| {
            let mut tls = tls.borrow_mut();
            tls.depth = tls.depth.saturating_sub(1);
        });
    }
}

/// Guard marking a constructor as under construction on this thread.
pub(crate) struct ConstructionGuard {
    type_id: TypeId,
}

impl ConstructionGuard {
    /// Fails with the full path when `type_id` is already being constructed.
    pub(crate) fn enter(type_id: TypeId, name: &'static str) -> DiResult<Self> {
        RESOLUTION_TLS.with(|tls| {
            let mut tls = tls.borrow_mut();
            if let Some(start) = tls.constructing.iter().position(|(id, _)| *id == type_id) {
                let mut path: Vec<&'static str> =
                    tls.constructing[start..].iter().map(|(_, n)| *n).collect();
                path.push(name);
                return Err(DiError::Circular(path));
            }
            tls.constructing.push((type_id, name));
            Ok(ConstructionGuard { type_id })
        })
    }
}

impl Drop for ConstructionGuard {
    fn drop(&mut self) {
        RESOLUTION_TLS.with(|tls| {
            let mut tls = tls.borrow_mut();
            if let Some(last) = tls.constructing.pop() {
                debug_assert_eq!(last.0, self.type_id);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct A;
    struct B;

    #[test]
    fn reentry_reports_cycle_path() {
        let _a = ConstructionGuard::enter(TypeId::of::<A>(), "A").unwrap();
        let _b = ConstructionGuard::enter(TypeId::of::<B>(), "B").unwrap();
        match ConstructionGuard::enter(TypeId::of::<A>(), "A") {
            Err(DiError::Circular(path)) => assert_eq!(path, vec!["A", "B", "A"]),
            _ => panic!("Expected Circular error"),
        }
    }

    #[test]
    fn guards_release_on_drop() {
        {
            let _a = ConstructionGuard::enter(TypeId::of::<A>(), "A").unwrap();
        }
        assert!(ConstructionGuard::enter(TypeId::of::<A>(), "A").is_ok());
    }

    #[test]
    fn depth_limit_is_enforced() {
        let first = DepthGuard::enter(2).unwrap();
        let second = DepthGuard::enter(2).unwrap();
        assert!(matches!(DepthGuard::enter(2), Err(DiError::DepthExceeded(2))));
        drop(second);
        drop(first);
        assert!(DepthGuard::enter(2).is_ok());
    }
}
