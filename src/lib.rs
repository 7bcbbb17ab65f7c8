pub mod coroutine;
pub mod future;
pub mod scheduler;
pub mod types;

// Re-export main types
pub use coroutine::{callback_to_future, co, co_with, Coroutine, CoroutineStep, Launched};
pub use future::{
    all, deferred_pair, handler, race, reject, resolve, DeferredPair, Future, FutureState,
    Handler, Rejector, Resolver, SettledHandler,
};
pub use scheduler::{DiagnosticSink, Scheduler, TracingSink};
pub use types::{
    json_to_val, val_to_json, CallbackOp, Completion, ConvertError, ErrorInfo, ForeignThenable,
    ThenCallback, Val,
};
