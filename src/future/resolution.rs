//! Resolution algorithm
//!
//! Settles a target future with an arbitrary value: the engine's own
//! futures are adopted, foreign thenables are relayed through one-shot
//! guarded callbacks, and anything else fulfills directly. Every handler
//! return value and the `resolve` combinator come through here.

use std::cell::Cell;
use std::rc::Rc;

use crate::types::{ErrorInfo, ForeignThenable, Val};

use super::handle::Future;

/// Settle `downstream` according to `value`.
pub(crate) fn resolve_value(downstream: &Future, value: Val) {
    match value {
        Val::Future(inner) => {
            // A future must never adopt itself.
            if inner.ptr_eq(downstream) {
                downstream.settle_reject(Val::Error(ErrorInfo::cycle()));
                return;
            }
            // Adopt the eventual settlement. The fulfillment value may again
            // be a future or thenable, so it recurses through resolution.
            let adopt = downstream.clone();
            let fail = downstream.clone();
            inner.subscribe(
                Rc::new(move |value| resolve_value(&adopt, value)),
                Rc::new(move |reason| fail.settle_reject(reason)),
            );
        }
        Val::Thenable(thenable) => {
            // The foreign member runs on its own queue turn, never inside
            // the call that handed the thenable over.
            let target = downstream.clone();
            downstream
                .scheduler()
                .defer(move || relay_thenable(&target, &thenable));
        }
        value => downstream.settle_fulfill(value),
    }
}

/// Invoke a foreign thenable's `then` member with guarded callbacks.
///
/// Both callbacks share one commit flag: only the first invocation of either
/// has any effect. A failure raised out of `then` after a commit is ignored;
/// before any commit it rejects `downstream`.
fn relay_thenable(downstream: &Future, thenable: &Rc<dyn ForeignThenable>) {
    let committed = Rc::new(Cell::new(false));

    let on_fulfilled = {
        let committed = committed.clone();
        let downstream = downstream.clone();
        Box::new(move |value: Val| {
            if committed.replace(true) {
                return;
            }
            resolve_value(&downstream, value);
        })
    };

    let on_rejected = {
        let committed = committed.clone();
        let downstream = downstream.clone();
        Box::new(move |reason: Val| {
            if committed.replace(true) {
                return;
            }
            downstream.settle_reject(reason);
        })
    };

    if let Err(reason) = thenable.then(on_fulfilled, on_rejected) {
        if !committed.replace(true) {
            downstream.settle_reject(reason);
        }
    }
}
