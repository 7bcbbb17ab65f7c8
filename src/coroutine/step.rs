//! Suspend/resume computation interface

use crate::types::Val;

/// One step's outcome: either a yielded awaitable or the final value.
#[derive(Debug)]
pub enum CoroutineStep {
    /// The computation paused, awaiting the yielded value.
    Yielded(Val),
    /// The computation finished with its final value.
    Done(Val),
}

/// A sequential computation that pauses at designated points.
///
/// An explicit state machine in place of native coroutine syntax. The
/// executor calls `resume` with the prior awaitable's fulfillment value
/// (`Val::Null` for the first step) and `throw_into` with a raised reason at
/// the suspension point, so internal recovery logic gets a chance to run.
/// `Err` from either method means the computation raised without recovering;
/// the executor then rejects its future and requests no further steps.
pub trait Coroutine {
    fn resume(&mut self, value: Val) -> Result<CoroutineStep, Val>;
    fn throw_into(&mut self, error: Val) -> Result<CoroutineStep, Val>;
}

/// What a computation factory produced.
///
/// A produced object without the suspend/resume interface is an immediate
/// final result rather than something to drive.
pub enum Launched {
    Coroutine(Box<dyn Coroutine>),
    Immediate(Val),
}
