//! Lazy, memoizing future-transform adapters.
//!
//! The central type is [`LazyTransformFuture`]. It wraps a blocking
//! asynchronous handle yielding a [`SourceOutcome`] and exposes the same
//! handle shape for the converted [`Transformed`] result. The conversion
//! runs at most once, on the first successful observation, and is cached
//! for every later observer; cancellation, completion listeners and status
//! queries pass straight through to the wrapped future.
//!
//! [`Promise`] is a settable [`FutureHandle`] producer for wiring the
//! adapter to a real asynchronous computation.

pub use {
    exec::{CallerThread, Executor, Task, WorkerExecutor},
    future::{FailureReason, FetchError, FutureHandle, Listener, WaitError},
    lazy::LazyTransformFuture,
    outcome::{ErrorInfo, Severity, SourceOutcome, Transformed},
    promise::Promise,
    transform::{ConvertError, Transform},
};

mod exec;
mod future;
mod lazy;
mod outcome;
mod promise;
mod transform;
