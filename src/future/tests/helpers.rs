//! Shared test fixtures

use std::cell::RefCell;
use std::rc::Rc;

use crate::future::{Future, FutureState};
use crate::scheduler::{DiagnosticSink, Scheduler};
use crate::types::Val;

/// Sink recording every reported rejection reason.
pub struct CollectingSink {
    pub reasons: RefCell<Vec<Val>>,
}

impl DiagnosticSink for CollectingSink {
    fn unhandled_rejection(&self, reason: &Val) {
        self.reasons.borrow_mut().push(reason.clone());
    }
}

/// A scheduler wired to a collecting sink, plus the sink for assertions.
pub fn collected_scheduler() -> (Scheduler, Rc<CollectingSink>) {
    let sink = Rc::new(CollectingSink {
        reasons: RefCell::new(Vec::new()),
    });
    (Scheduler::with_sink(sink.clone()), sink)
}

/// Extract the fulfillment value, panicking on any other state.
pub fn fulfilled_value(future: &Future) -> Val {
    match future.state() {
        FutureState::Fulfilled(value) => value,
        other => panic!("expected fulfilled future, got {other:?}"),
    }
}

/// Extract the rejection reason, panicking on any other state.
pub fn rejected_reason(future: &Future) -> Val {
    match future.state() {
        FutureState::Rejected(reason) => reason,
        other => panic!("expected rejected future, got {other:?}"),
    }
}
