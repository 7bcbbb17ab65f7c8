//! The future handle
//!
//! Holds the shared state cell and everything that touches it: construction
//! with settlement capabilities, `then`/`catch`/`finally`, and the one-way
//! settlement transitions. Mutation happens only inside queue turns, with an
//! idempotency check before every transition, so a settled future can never
//! be re-fired.

use std::cell::RefCell;
use std::rc::Rc;

use crate::scheduler::Scheduler;
use crate::types::{ErrorInfo, Val};

use super::resolution::resolve_value;
use super::state::{FutureState, Reaction};

/* ===================== Handlers ===================== */

/// Handler attached through `then`: receives the settlement payload and
/// either produces the downstream value or raises a reason.
pub type Handler = Rc<dyn Fn(Val) -> Result<Val, Val>>;

/// Handler attached through `finally`: runs on either settlement kind, with
/// no argument. An `Err` replaces the propagated outcome.
pub type SettledHandler = Rc<dyn Fn() -> Result<(), Val>>;

/// Wrap a closure as a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(Val) -> Result<Val, Val> + 'static,
{
    Rc::new(f)
}

/* ===================== Handle ===================== */

struct FutureInner {
    state: FutureState,
    reactions: Vec<Reaction>,
}

/// Cloneable handle to a deferred value.
///
/// Clones share the same settlement state and the scheduler the future was
/// constructed against.
#[derive(Clone)]
pub struct Future {
    inner: Rc<RefCell<FutureInner>>,
    scheduler: Scheduler,
}

impl Future {
    /// Construct a future, invoking `init` synchronously with its settlement
    /// capabilities. An `Err` out of `init` rejects the future.
    pub fn new<F>(scheduler: &Scheduler, init: F) -> Future
    where
        F: FnOnce(Resolver, Rejector) -> Result<(), Val>,
    {
        let future = Future::pending(scheduler);
        let resolver = Resolver {
            target: future.clone(),
        };
        let rejector = Rejector {
            target: future.clone(),
        };
        if let Err(reason) = init(resolver, rejector) {
            future.settle_reject(reason);
        }
        future
    }

    /// A pending future bound to `scheduler`, its capabilities not yet
    /// exposed anywhere.
    pub(crate) fn pending(scheduler: &Scheduler) -> Future {
        Future {
            inner: Rc::new(RefCell::new(FutureInner {
                state: FutureState::Pending,
                reactions: Vec::new(),
            })),
            scheduler: scheduler.clone(),
        }
    }

    /// Snapshot of the current lifecycle state.
    pub fn state(&self) -> FutureState {
        self.inner.borrow().state.clone()
    }

    /// Whether two handles share the same settlement state.
    pub fn ptr_eq(&self, other: &Future) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Register settlement handlers, producing the downstream future.
    ///
    /// A missing fulfillment handler passes the value through; a missing
    /// rejection handler rethrows the reason unchanged. The applicable
    /// handler runs one queue turn after settlement, never synchronously,
    /// even when this future is already settled.
    pub fn then(&self, on_fulfilled: Option<Handler>, on_rejected: Option<Handler>) -> Future {
        let downstream = Future::pending(&self.scheduler);

        let fulfill_job: Rc<dyn Fn(Val)> = {
            let downstream = downstream.clone();
            match on_fulfilled {
                Some(h) => Rc::new(move |value: Val| match h(value) {
                    Ok(out) => resolve_value(&downstream, out),
                    Err(reason) => downstream.settle_reject(reason),
                }),
                // Identity default. The settlement value may itself be a
                // future or thenable, so it still goes through resolution.
                None => Rc::new(move |value: Val| resolve_value(&downstream, value)),
            }
        };

        let reject_job: Rc<dyn Fn(Val)> = {
            let downstream = downstream.clone();
            match on_rejected {
                Some(h) => Rc::new(move |reason: Val| match h(reason) {
                    Ok(out) => resolve_value(&downstream, out),
                    Err(next) => downstream.settle_reject(next),
                }),
                // Rethrow default: the reason propagates unchanged.
                None => Rc::new(move |reason: Val| downstream.settle_reject(reason)),
            }
        };

        self.register(Reaction {
            on_fulfilled: fulfill_job,
            on_rejected: reject_job,
        });
        downstream
    }

    /// `then` with only a rejection handler.
    pub fn catch(&self, on_rejected: Handler) -> Future {
        self.then(None, Some(on_rejected))
    }

    /// Run `on_settled` on either settlement kind, passing the original
    /// outcome through unless the handler itself raises.
    pub fn finally(&self, on_settled: SettledHandler) -> Future {
        let on_fulfilled = {
            let on_settled = on_settled.clone();
            handler(move |value| {
                on_settled()?;
                Ok(value)
            })
        };
        let on_rejected = handler(move |reason| {
            on_settled()?;
            Err(reason)
        });
        self.then(Some(on_fulfilled), Some(on_rejected))
    }

    /// Attach raw settlement callbacks without creating a downstream future.
    ///
    /// Used by the resolution algorithm, the combinators, and the coroutine
    /// executor; same deferral discipline as `then`.
    pub(crate) fn subscribe(&self, on_fulfilled: Rc<dyn Fn(Val)>, on_rejected: Rc<dyn Fn(Val)>) {
        self.register(Reaction {
            on_fulfilled,
            on_rejected,
        });
    }

    fn register(&self, reaction: Reaction) {
        let settled = {
            let mut guard = self.inner.borrow_mut();
            let cell = &mut *guard;
            match &cell.state {
                FutureState::Pending => {
                    cell.reactions.push(reaction);
                    return;
                }
                FutureState::Fulfilled(value) => Ok(value.clone()),
                FutureState::Rejected(reason) => Err(reason.clone()),
            }
        };

        // Already settled: dispatch still waits one queue turn.
        match settled {
            Ok(value) => {
                let job = reaction.on_fulfilled;
                self.scheduler.defer(move || job(value));
            }
            Err(reason) => {
                let job = reaction.on_rejected;
                self.scheduler.defer(move || job(reason));
            }
        }
    }

    /* ===================== Settlement ===================== */

    /// Fulfillment capability entry point. Deferred one queue turn; when the
    /// value is itself a future, this future chains onto it instead of
    /// fulfilling with a future-of-future.
    pub(crate) fn settle_fulfill(&self, value: Val) {
        let target = self.clone();
        self.scheduler.defer(move || match value {
            Val::Future(inner) => {
                if inner.ptr_eq(&target) {
                    target.transition(FutureState::Rejected(Val::Error(ErrorInfo::cycle())));
                    return;
                }
                let adopt = target.clone();
                let fail = target.clone();
                inner.subscribe(
                    Rc::new(move |value| adopt.settle_fulfill(value)),
                    Rc::new(move |reason| fail.settle_reject(reason)),
                );
            }
            value => target.transition(FutureState::Fulfilled(value)),
        });
    }

    /// Rejection capability entry point. Deferred one queue turn.
    pub(crate) fn settle_reject(&self, reason: Val) {
        let target = self.clone();
        self.scheduler
            .defer(move || target.transition(FutureState::Rejected(reason)));
    }

    /// One-way transition. No-op once settled. Queued reactions are
    /// scheduled independently, in registration order; a rejection with an
    /// empty reaction queue at this instant is reported to the diagnostic
    /// sink.
    fn transition(&self, settled: FutureState) {
        let reactions = {
            let mut guard = self.inner.borrow_mut();
            if !guard.state.is_pending() {
                return;
            }
            guard.state = settled.clone();
            std::mem::take(&mut guard.reactions)
        };

        match settled {
            FutureState::Fulfilled(value) => {
                for reaction in reactions {
                    let job = reaction.on_fulfilled;
                    let value = value.clone();
                    self.scheduler.defer(move || job(value));
                }
            }
            FutureState::Rejected(reason) => {
                if reactions.is_empty() {
                    self.scheduler.report_unhandled(&reason);
                }
                for reaction in reactions {
                    let job = reaction.on_rejected;
                    let reason = reason.clone();
                    self.scheduler.defer(move || job(reason));
                }
            }
            FutureState::Pending => unreachable!("transition target is always a settled state"),
        }
    }
}

/* ===================== Capabilities ===================== */

/// Fulfillment capability, captured once at construction.
#[derive(Clone)]
pub struct Resolver {
    pub(crate) target: Future,
}

impl Resolver {
    /// Resolve the owning future. No-op once it has settled.
    pub fn resolve(&self, value: Val) {
        self.target.settle_fulfill(value);
    }
}

/// Rejection capability, captured once at construction.
#[derive(Clone)]
pub struct Rejector {
    pub(crate) target: Future,
}

impl Rejector {
    /// Reject the owning future. No-op once it has settled.
    pub fn reject(&self, reason: Val) {
        self.target.settle_reject(reason);
    }
}
