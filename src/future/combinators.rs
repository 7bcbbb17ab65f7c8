//! Combinators over futures
//!
//! Higher-order operations composing futures into one: `resolve`, `reject`,
//! `all`, `race`, and the deferred-pair factory that externalizes settlement
//! capabilities.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::scheduler::Scheduler;
use crate::types::Val;

use super::handle::{Future, Rejector, Resolver};
use super::resolution::resolve_value;

/// A future settling per the resolution algorithm for `value`.
///
/// Returns `value` unchanged when it is already one of this engine's
/// futures.
pub fn resolve(scheduler: &Scheduler, value: Val) -> Future {
    if let Val::Future(future) = value {
        return future;
    }
    let future = Future::pending(scheduler);
    resolve_value(&future, value);
    future
}

/// An immediately rejected future.
pub fn reject(scheduler: &Scheduler, reason: Val) -> Future {
    let future = Future::pending(scheduler);
    future.settle_reject(reason);
    future
}

/// Settlement capabilities alongside the future they settle.
pub struct DeferredPair {
    pub future: Future,
    pub resolver: Resolver,
    pub rejector: Rejector,
}

/// Externalize a future's settlement capabilities for manual,
/// externally-triggered settlement.
pub fn deferred_pair(scheduler: &Scheduler) -> DeferredPair {
    let future = Future::pending(scheduler);
    DeferredPair {
        resolver: Resolver {
            target: future.clone(),
        },
        rejector: Rejector {
            target: future.clone(),
        },
        future,
    }
}

/// Fulfill with every input's result aligned by input index, or reject with
/// the first rejection reason.
///
/// Later settlements of other inputs still run their subscriptions, but the
/// combined future's one-way transition makes them no-ops. An empty input
/// fulfills immediately with an empty list.
pub fn all(scheduler: &Scheduler, futures: Vec<Future>) -> Future {
    let combined = Future::pending(scheduler);
    if futures.is_empty() {
        combined.settle_fulfill(Val::List(Vec::new()));
        return combined;
    }

    let results: Rc<RefCell<Vec<Option<Val>>>> =
        Rc::new(RefCell::new(vec![None; futures.len()]));
    let remaining = Rc::new(Cell::new(futures.len()));

    for (index, future) in futures.iter().enumerate() {
        let on_fulfilled = {
            let results = results.clone();
            let remaining = remaining.clone();
            let combined = combined.clone();
            Rc::new(move |value: Val| {
                results.borrow_mut()[index] = Some(value);
                remaining.set(remaining.get() - 1);
                if remaining.get() == 0 {
                    let collected = results
                        .borrow_mut()
                        .iter_mut()
                        .map(|slot| slot.take().unwrap_or(Val::Null))
                        .collect();
                    combined.settle_fulfill(Val::List(collected));
                }
            })
        };
        let on_rejected = {
            let combined = combined.clone();
            Rc::new(move |reason: Val| combined.settle_reject(reason))
        };
        future.subscribe(on_fulfilled, on_rejected);
    }

    combined
}

/// Settle with whichever input settles first, fulfilled or rejected.
///
/// Every later settlement is observed but ignored by virtue of the one-way
/// transition. An empty input never settles.
pub fn race(scheduler: &Scheduler, futures: Vec<Future>) -> Future {
    let combined = Future::pending(scheduler);
    for future in &futures {
        let win = combined.clone();
        let lose = combined.clone();
        future.subscribe(
            Rc::new(move |value| win.settle_fulfill(value)),
            Rc::new(move |reason| lose.settle_reject(reason)),
        );
    }
    combined
}
