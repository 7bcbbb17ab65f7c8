//! Coroutine-style executor
//!
//! Drives an explicit suspend/resume state machine to completion, producing
//! one future for the entire run. The executor requests one step at a time:
//! each yielded awaitable is normalized into a future, and on its settlement
//! the computation is resumed with the value or has the reason raised into
//! it at the suspension point. At most one step is ever in flight.

pub mod executor;
pub mod step;

#[cfg(test)]
mod tests;

pub use executor::{callback_to_future, co, co_with};
pub use step::{Coroutine, CoroutineStep, Launched};
