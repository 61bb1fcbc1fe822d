use {
    crate::{
        exec::Executor,
        future::{FetchError, FutureHandle, Listener, WaitError},
        outcome::{ErrorInfo, SourceOutcome, Transformed},
        transform::Transform,
    },
    log::trace,
    once_cell::sync::OnceCell,
    std::{sync::Arc, time::Duration},
};

/// A future handle that lazily converts the outcome of a wrapped source
/// future.
///
/// The `S -> T` conversion runs at most once, on the first successful
/// observation of the source outcome, and the cached result is handed to
/// every later caller. Everything else (cancellation, completion listeners,
/// status queries) passes straight through to the source future.
///
/// A timed-out or failed wait never touches the cache, so a later wait can
/// still observe and convert the source outcome once it arrives.
pub struct LazyTransformFuture<S, T, X> {
    source: Arc<dyn FutureHandle<SourceOutcome<S>>>,
    transform: X,
    cached: OnceCell<Arc<Transformed<T>>>,
}

impl<S, T, X> LazyTransformFuture<S, T, X>
where
    S: Send + Sync + 'static,
    T: Send + Sync,
    X: Transform<S, T>,
{
    pub fn new(source: Arc<dyn FutureHandle<SourceOutcome<S>>>, transform: X) -> Self {
        Self {
            source,
            transform,
            cached: OnceCell::new(),
        }
    }

    /// The raw source future, for callers that need the untransformed
    /// outcome.
    pub fn source(&self) -> &Arc<dyn FutureHandle<SourceOutcome<S>>> {
        &self.source
    }

    /// Blocks until the source future completes, then converts and caches
    /// its outcome. Returns the cached result immediately if it is already
    /// populated.
    ///
    /// Cancellation and computation failure of the source pass through
    /// unchanged; interpreting them is the caller's business.
    pub fn wait(&self) -> Result<Arc<Transformed<T>>, WaitError> {
        if let Some(result) = self.cached.get() {
            return Ok(result.clone());
        }
        let outcome = self.source.wait()?;
        Ok(self.transform_if_necessary(&outcome))
    }

    /// Like [`Self::wait`], bounded by `timeout`. A timeout leaves the
    /// adapter untouched.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<Arc<Transformed<T>>, WaitError> {
        if let Some(result) = self.cached.get() {
            return Ok(result.clone());
        }
        let outcome = self.source.wait_timeout(timeout)?;
        Ok(self.transform_if_necessary(&outcome))
    }

    /// Like [`Self::wait`], with every failure flattened into a single
    /// [`FetchError`]. The original kind stays reachable through the error
    /// source chain.
    pub fn checked_wait(&self) -> Result<Arc<Transformed<T>>, FetchError> {
        self.wait().map_err(FetchError::from)
    }

    /// Like [`Self::wait_timeout`], flattened the same way. Use
    /// [`FetchError::is_timeout`] to tell an expired wait apart from a
    /// terminal failure.
    pub fn checked_wait_timeout(
        &self,
        timeout: Duration,
    ) -> Result<Arc<Transformed<T>>, FetchError> {
        self.wait_timeout(timeout).map_err(FetchError::from)
    }

    /// Converts under the cell's initialization lock so that the transform
    /// runs at most once, no matter how many threads race here after the
    /// source completes.
    fn transform_if_necessary(&self, outcome: &SourceOutcome<S>) -> Arc<Transformed<T>> {
        self.cached
            .get_or_init(|| {
                trace!("converting source outcome");
                Arc::new(self.transform_outcome(outcome))
            })
            .clone()
    }

    fn transform_outcome(&self, outcome: &SourceOutcome<S>) -> Transformed<T> {
        match outcome {
            SourceOutcome::Success(Some(payload)) if self.transform.recognizes(payload) => {
                match self.transform.convert(payload) {
                    Ok(value) => Transformed::Data(value),
                    Err(e) => Transformed::Failed(vec![ErrorInfo::error(e.to_string())]),
                }
            }
            // A void result, or a payload outside the converter's domain.
            SourceOutcome::Success(_) => Transformed::Empty,
            SourceOutcome::Failure(errors) => {
                Transformed::Failed(self.transform.convert_errors(errors))
            }
        }
    }
}

impl<S, T, X> FutureHandle<Transformed<T>> for LazyTransformFuture<S, T, X>
where
    S: Send + Sync + 'static,
    T: Send + Sync + 'static,
    X: Transform<S, T> + Send + Sync,
{
    fn wait(&self) -> Result<Arc<Transformed<T>>, WaitError> {
        LazyTransformFuture::wait(self)
    }

    fn wait_timeout(&self, timeout: Duration) -> Result<Arc<Transformed<T>>, WaitError> {
        LazyTransformFuture::wait_timeout(self, timeout)
    }

    fn cancel(&self, interrupt_running: bool) -> bool {
        self.source.cancel(interrupt_running)
    }

    /// Listeners observe completion of the *source* future, not of the
    /// conversion step. A listener that needs the converted value calls
    /// [`LazyTransformFuture::wait`] itself.
    fn on_complete(&self, listener: Listener, executor: Arc<dyn Executor>) {
        self.source.on_complete(listener, executor);
    }

    fn is_cancelled(&self) -> bool {
        self.source.is_cancelled()
    }

    fn is_done(&self) -> bool {
        self.source.is_done()
    }
}
