//! Lifecycle state and queued reactions

use std::rc::Rc;

use crate::types::Val;

/// Lifecycle state
///
/// Transitions are one-way: Pending may become Fulfilled or Rejected, and a
/// settled future never changes state or payload again.
#[derive(Debug, Clone, PartialEq)]
pub enum FutureState {
    Pending,
    Fulfilled(Val),
    Rejected(Val),
}

impl FutureState {
    pub fn is_pending(&self) -> bool {
        matches!(self, FutureState::Pending)
    }
}

/// Settlement callbacks queued by one `then` call or internal subscription.
///
/// Exactly one of the two jobs runs, once, on the turn after settlement.
pub(crate) struct Reaction {
    pub(crate) on_fulfilled: Rc<dyn Fn(Val)>,
    pub(crate) on_rejected: Rc<dyn Fn(Val)>,
}
