//! Internal implementation details.

pub(crate) mod circular;
pub(crate) mod slot;

pub(crate) use circular::{ConstructionGuard, DepthGuard};
pub(crate) use slot::Slot;
