//! Shared coroutine fixtures
//!
//! Explicit state machines standing in for generator syntax, in the shapes
//! the executor tests need.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::coroutine::{Coroutine, CoroutineStep};
use crate::future::{reject, resolve, Future, FutureState};
use crate::scheduler::Scheduler;
use crate::types::Val;

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

pub fn expect_num(value: &Val) -> f64 {
    match value {
        Val::Num(n) => *n,
        other => panic!("expected number, got {other:?}"),
    }
}

/// Yields two futures resolving 1 and 2, then finishes with their sum.
pub struct SumOfTwo {
    scheduler: Scheduler,
    state: u8,
    first: f64,
}

impl SumOfTwo {
    pub fn new(scheduler: &Scheduler) -> Self {
        SumOfTwo {
            scheduler: scheduler.clone(),
            state: 0,
            first: 0.0,
        }
    }
}

impl Coroutine for SumOfTwo {
    fn resume(&mut self, value: Val) -> Result<CoroutineStep, Val> {
        match self.state {
            0 => {
                self.state = 1;
                let step = resolve(&self.scheduler, Val::Num(1.0));
                Ok(CoroutineStep::Yielded(Val::Future(step)))
            }
            1 => {
                self.first = expect_num(&value);
                self.state = 2;
                let step = resolve(&self.scheduler, Val::Num(2.0));
                Ok(CoroutineStep::Yielded(Val::Future(step)))
            }
            _ => Ok(CoroutineStep::Done(Val::Num(
                self.first + expect_num(&value),
            ))),
        }
    }

    fn throw_into(&mut self, error: Val) -> Result<CoroutineStep, Val> {
        Err(error)
    }
}

/// Yields one provided awaitable, then finishes with whatever it resumed
/// with. Raises propagate unrecovered; call counts are recorded.
pub struct YieldOnce {
    awaitable: Option<Val>,
    pub resumes: Rc<Cell<usize>>,
    pub raises: Rc<Cell<usize>>,
}

impl YieldOnce {
    pub fn new(awaitable: Val) -> Self {
        YieldOnce {
            awaitable: Some(awaitable),
            resumes: Rc::new(Cell::new(0)),
            raises: Rc::new(Cell::new(0)),
        }
    }
}

impl Coroutine for YieldOnce {
    fn resume(&mut self, value: Val) -> Result<CoroutineStep, Val> {
        self.resumes.set(self.resumes.get() + 1);
        match self.awaitable.take() {
            Some(awaitable) => Ok(CoroutineStep::Yielded(awaitable)),
            None => Ok(CoroutineStep::Done(value)),
        }
    }

    fn throw_into(&mut self, error: Val) -> Result<CoroutineStep, Val> {
        self.raises.set(self.raises.get() + 1);
        Err(error)
    }
}

/// Yields one provided awaitable and recovers from a raise at the
/// suspension point by finishing with a fallback value, recording the
/// raised reason.
pub struct RecoverToFallback {
    awaitable: Option<Val>,
    fallback: Val,
    pub recovered_from: Rc<RefCell<Option<Val>>>,
}

impl RecoverToFallback {
    pub fn new(awaitable: Val, fallback: Val) -> Self {
        RecoverToFallback {
            awaitable: Some(awaitable),
            fallback,
            recovered_from: Rc::new(RefCell::new(None)),
        }
    }
}

impl Coroutine for RecoverToFallback {
    fn resume(&mut self, value: Val) -> Result<CoroutineStep, Val> {
        match self.awaitable.take() {
            Some(awaitable) => Ok(CoroutineStep::Yielded(awaitable)),
            None => Ok(CoroutineStep::Done(value)),
        }
    }

    fn throw_into(&mut self, error: Val) -> Result<CoroutineStep, Val> {
        *self.recovered_from.borrow_mut() = Some(error);
        Ok(CoroutineStep::Done(self.fallback.clone()))
    }
}

/// Yields a rejecting future, recovers at the suspension point, yields a
/// second future, and finishes with its value.
pub struct RecoverThenContinue {
    scheduler: Scheduler,
    state: u8,
}

impl RecoverThenContinue {
    pub fn new(scheduler: &Scheduler) -> Self {
        RecoverThenContinue {
            scheduler: scheduler.clone(),
            state: 0,
        }
    }
}

impl Coroutine for RecoverThenContinue {
    fn resume(&mut self, value: Val) -> Result<CoroutineStep, Val> {
        match self.state {
            0 => {
                self.state = 1;
                let step = reject(&self.scheduler, Val::Str("first step failed".to_string()));
                Ok(CoroutineStep::Yielded(Val::Future(step)))
            }
            _ => Ok(CoroutineStep::Done(value)),
        }
    }

    fn throw_into(&mut self, _error: Val) -> Result<CoroutineStep, Val> {
        self.state = 2;
        let step = resolve(&self.scheduler, Val::Num(42.0));
        Ok(CoroutineStep::Yielded(Val::Future(step)))
    }
}

/// Fails on its first step, before yielding anything.
pub struct FailsImmediately {
    pub reason: Val,
}

impl Coroutine for FailsImmediately {
    fn resume(&mut self, _value: Val) -> Result<CoroutineStep, Val> {
        Err(self.reason.clone())
    }

    fn throw_into(&mut self, error: Val) -> Result<CoroutineStep, Val> {
        Err(error)
    }
}

/// Finishes on the first step with a future as its final value.
pub struct FinishWithFuture {
    pub value: Future,
}

impl Coroutine for FinishWithFuture {
    fn resume(&mut self, _value: Val) -> Result<CoroutineStep, Val> {
        Ok(CoroutineStep::Done(Val::Future(self.value.clone())))
    }

    fn throw_into(&mut self, error: Val) -> Result<CoroutineStep, Val> {
        Err(error)
    }
}
