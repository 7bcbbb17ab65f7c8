//! Deferred-value engine
//!
//! A [`Future`] is a cloneable handle to a value that settles exactly once:
//! Pending until its capabilities fulfill or reject it, then permanently
//! Fulfilled or Rejected. Reactions registered through `then` always run on
//! a later scheduling turn, never synchronously.
//!
//! Module layout:
//! - `state`: lifecycle state and queued reactions
//! - `handle`: the handle itself: construction, `then`/`catch`/`finally`,
//!   settlement capabilities and transitions
//! - `resolution`: the algorithm normalizing an arbitrary value (plain,
//!   future, or foreign thenable) into settlement of a target future
//! - `combinators`: `resolve`, `reject`, `all`, `race`, `deferred_pair`

pub mod combinators;
pub mod handle;
mod resolution;
pub mod state;

#[cfg(test)]
mod tests;

pub(crate) use resolution::resolve_value;

pub use combinators::{all, deferred_pair, race, reject, resolve, DeferredPair};
pub use handle::{handler, Future, Handler, Rejector, Resolver, SettledHandler};
pub use state::FutureState;
