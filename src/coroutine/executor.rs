//! Executor drive loop
//!
//! One step in flight at a time: request a step, normalize the yielded
//! awaitable into a future, wait for its settlement, feed the outcome back
//! into the computation. An unrecognized awaitable is raised back into the
//! computation as a type error rather than dropped.

use std::cell::RefCell;
use std::rc::Rc;

use crate::future::{resolve_value, Future};
use crate::scheduler::Scheduler;
use crate::types::{CallbackOp, ErrorInfo, Val};

use super::step::{Coroutine, CoroutineStep, Launched};

/// What feeds into the computation's next step.
enum StepInput {
    Resume(Val),
    Raise(Val),
}

struct Driver {
    computation: RefCell<Box<dyn Coroutine>>,
    result: Future,
    scheduler: Scheduler,
}

/// Drive a launched computation, producing one future for the entire run.
///
/// An immediate (non-coroutine) launch fulfills the result directly, with
/// the usual future-chaining when the value is itself a future.
pub fn co(scheduler: &Scheduler, launched: Launched) -> Future {
    let result = Future::pending(scheduler);
    match launched {
        Launched::Immediate(value) => result.settle_fulfill(value),
        Launched::Coroutine(computation) => {
            let driver = Rc::new(Driver {
                computation: RefCell::new(computation),
                result: result.clone(),
                scheduler: scheduler.clone(),
            });
            drive(&driver, StepInput::Resume(Val::Null));
        }
    }
    result
}

/// Invoke a factory with the caller's arguments, then drive what it made.
pub fn co_with<F>(scheduler: &Scheduler, factory: F, args: Vec<Val>) -> Future
where
    F: FnOnce(Vec<Val>) -> Launched,
{
    co(scheduler, factory(args))
}

fn drive(driver: &Rc<Driver>, input: StepInput) {
    let mut input = input;
    loop {
        let step = {
            let mut computation = driver.computation.borrow_mut();
            match input {
                StepInput::Resume(value) => computation.resume(value),
                StepInput::Raise(reason) => computation.throw_into(reason),
            }
        };

        match step {
            // Raised without internal recovery: reject and stop requesting
            // steps.
            Err(reason) => {
                driver.result.settle_reject(reason);
                return;
            }
            Ok(CoroutineStep::Done(value)) => {
                driver.result.settle_fulfill(value);
                return;
            }
            Ok(CoroutineStep::Yielded(awaitable)) => {
                match classify(&driver.scheduler, awaitable) {
                    Ok(step_future) => {
                        let resume = driver.clone();
                        let raise = driver.clone();
                        step_future.subscribe(
                            Rc::new(move |value| drive(&resume, StepInput::Resume(value))),
                            Rc::new(move |reason| drive(&raise, StepInput::Raise(reason))),
                        );
                        return;
                    }
                    // Unrecognized awaitable: raised into the computation at
                    // the next resumption point, so internal recovery logic
                    // gets a chance before anything is lost.
                    Err(type_error) => {
                        input = StepInput::Raise(type_error);
                    }
                }
            }
        }
    }
}

/// Normalize a yielded awaitable into a future.
///
/// Futures pass through, callback-style operations are converted, and
/// thenables and plain values go through the resolution algorithm. A bare
/// object is the one unrecognized kind: it has no `then` member to relay and
/// is not callable.
fn classify(scheduler: &Scheduler, awaitable: Val) -> Result<Future, Val> {
    match awaitable {
        Val::Future(future) => Ok(future),
        Val::Callback(op) => Ok(callback_to_future(scheduler, op)),
        Val::Obj(_) => Err(Val::Error(ErrorInfo::type_error(
            "may only yield a future, thenable, or callback operation, \
             but an object was yielded",
        ))),
        other => {
            let future = Future::pending(scheduler);
            resolve_value(&future, other);
            Ok(future)
        }
    }
}

/// Adapt a callback-style operation into a future: the completion callback's
/// error arm rejects, its value arm resolves.
pub fn callback_to_future(scheduler: &Scheduler, op: CallbackOp) -> Future {
    Future::new(scheduler, |resolver, rejector| {
        op.call(Box::new(move |outcome| match outcome {
            Ok(value) => resolver.resolve(value),
            Err(reason) => rejector.reject(reason),
        }));
        Ok(())
    })
}
