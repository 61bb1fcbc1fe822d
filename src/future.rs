use {
    crate::exec::Executor,
    std::{
        fmt::{self, Display, Formatter},
        sync::Arc,
        time::Duration,
    },
    thiserror::Error,
};

/// Why a source computation failed. Shared by identity via `Arc` so every
/// observer sees the same instance.
#[derive(Debug)]
pub struct FailureReason {
    message: String,
}

impl FailureReason {
    pub fn new(message: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            message: message.into(),
        })
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for FailureReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FailureReason {}

/// Everything that can end a blocking wait without a result.
#[derive(Clone, Debug, Error)]
pub enum WaitError {
    /// The computation was cancelled before it completed.
    #[error("computation was cancelled")]
    Cancelled,
    /// The computation itself failed. The original reason passes through
    /// unwrapped.
    #[error("computation failed: {0}")]
    Failed(Arc<FailureReason>),
    /// The bounded wait expired. The handle is unchanged; waiting again may
    /// still succeed.
    #[error("timed out waiting for completion")]
    TimedOut,
}

impl WaitError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut)
    }
}

/// The single flattened failure shape returned by the checked retrieval
/// variants. The underlying [`WaitError`] stays reachable through
/// [`std::error::Error::source`], so the distinction between cancellation,
/// failure and
/// timeout is preserved rather than discarded.
#[derive(Clone, Debug, Error)]
#[error("could not fetch result")]
pub struct FetchError {
    #[source]
    cause: WaitError,
}

impl FetchError {
    pub fn cause(&self) -> &WaitError {
        &self.cause
    }

    pub fn is_timeout(&self) -> bool {
        self.cause.is_timeout()
    }
}

impl From<WaitError> for FetchError {
    fn from(cause: WaitError) -> Self {
        Self { cause }
    }
}

pub type Listener = Box<dyn FnOnce() + Send>;

/// The asynchronous-result handle shape shared by source futures and the
/// adapters built on top of them.
///
/// Results are handed out as `Arc<T>` so that completion settles the value
/// once and every observer, on any thread, receives the same instance.
pub trait FutureHandle<T>: Send + Sync {
    /// Blocks the calling thread until the computation completes.
    fn wait(&self) -> Result<Arc<T>, WaitError>;

    /// Like [`FutureHandle::wait`], bounded by `timeout`.
    fn wait_timeout(&self, timeout: Duration) -> Result<Arc<T>, WaitError>;

    /// Requests cancellation. Returns whether the computation was cancelled
    /// by this call; a handle that already settled reports `false`.
    fn cancel(&self, interrupt_running: bool) -> bool;

    /// Runs `listener` on `executor` once the computation completes, or
    /// immediately if it already has.
    fn on_complete(&self, listener: Listener, executor: Arc<dyn Executor>);

    fn is_cancelled(&self) -> bool;

    fn is_done(&self) -> bool;
}
