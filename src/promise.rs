use {
    crate::{
        exec::Executor,
        future::{FailureReason, FutureHandle, Listener, WaitError},
    },
    log::debug,
    parking_lot::{Condvar, Mutex},
    std::{
        mem,
        sync::Arc,
        time::{Duration, Instant},
    },
};

enum State<T> {
    Pending,
    Complete(Arc<T>),
    Failed(Arc<FailureReason>),
    Cancelled,
}

struct Inner<T> {
    state: State<T>,
    listeners: Vec<(Listener, Arc<dyn Executor>)>,
    interrupt_requested: bool,
}

struct Shared<T> {
    inner: Mutex<Inner<T>>,
    settled: Condvar,
}

/// A settable future handle.
///
/// `Promise` is the producer and the consumer side in one: clone it, hand
/// one clone to the thread doing the work, and wrap another in whatever
/// needs the result. It settles exactly once, to a value, a failure, or
/// cancellation; later settle attempts are no-ops that report `false`.
pub struct Promise<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T: Send + Sync> Default for Promise<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn result_of<T>(state: &State<T>) -> Option<Result<Arc<T>, WaitError>> {
    match state {
        State::Pending => None,
        State::Complete(value) => Some(Ok(value.clone())),
        State::Failed(reason) => Some(Err(WaitError::Failed(reason.clone()))),
        State::Cancelled => Some(Err(WaitError::Cancelled)),
    }
}

impl<T: Send + Sync> Promise<T> {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    state: State::Pending,
                    listeners: Vec::new(),
                    interrupt_requested: false,
                }),
                settled: Condvar::new(),
            }),
        }
    }

    /// Settles the promise with a value. Returns `false` if it had already
    /// settled.
    pub fn complete(&self, value: T) -> bool {
        self.settle(State::Complete(Arc::new(value)), false)
    }

    /// Settles the promise with a computation failure.
    pub fn fail(&self, reason: Arc<FailureReason>) -> bool {
        self.settle(State::Failed(reason), false)
    }

    /// Whether cancellation was requested with `interrupt_running` set.
    /// The promise has no running task of its own to interrupt; the flag is
    /// recorded for the producer to act on.
    pub fn interrupt_requested(&self) -> bool {
        self.shared.inner.lock().interrupt_requested
    }

    fn settle(&self, next: State<T>, interrupt: bool) -> bool {
        let listeners = {
            let mut inner = self.shared.inner.lock();
            if !matches!(inner.state, State::Pending) {
                return false;
            }
            inner.state = next;
            inner.interrupt_requested = interrupt;
            mem::take(&mut inner.listeners)
        };
        self.shared.settled.notify_all();
        for (listener, executor) in listeners {
            executor.execute(listener);
        }
        true
    }
}

impl<T: Send + Sync> FutureHandle<T> for Promise<T> {
    fn wait(&self) -> Result<Arc<T>, WaitError> {
        let mut inner = self.shared.inner.lock();
        loop {
            if let Some(result) = result_of(&inner.state) {
                return result;
            }
            self.shared.settled.wait(&mut inner);
        }
    }

    fn wait_timeout(&self, timeout: Duration) -> Result<Arc<T>, WaitError> {
        let deadline = Instant::now() + timeout;
        let mut inner = self.shared.inner.lock();
        loop {
            if let Some(result) = result_of(&inner.state) {
                return result;
            }
            if self
                .shared
                .settled
                .wait_until(&mut inner, deadline)
                .timed_out()
            {
                // The promise may have settled right as the deadline hit.
                return result_of(&inner.state).unwrap_or(Err(WaitError::TimedOut));
            }
        }
    }

    fn cancel(&self, interrupt_running: bool) -> bool {
        let cancelled = self.settle(State::Cancelled, interrupt_running);
        if cancelled {
            debug!("promise cancelled, interrupt_running: {interrupt_running}");
        }
        cancelled
    }

    fn on_complete(&self, listener: Listener, executor: Arc<dyn Executor>) {
        {
            let mut inner = self.shared.inner.lock();
            if matches!(inner.state, State::Pending) {
                inner.listeners.push((listener, executor));
                return;
            }
        }
        // Already settled; dispatch without holding the lock.
        executor.execute(listener);
    }

    fn is_cancelled(&self) -> bool {
        matches!(self.shared.inner.lock().state, State::Cancelled)
    }

    fn is_done(&self) -> bool {
        !matches!(self.shared.inner.lock().state, State::Pending)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::exec::CallerThread,
        std::{
            sync::atomic::{AtomicUsize, Ordering::SeqCst},
            thread,
        },
    };

    #[test]
    fn settles_exactly_once() {
        let promise = Promise::new();
        assert!(promise.complete(1));
        assert!(!promise.complete(2));
        assert!(!promise.fail(FailureReason::new("too late")));
        assert!(!promise.cancel(true));
        assert_eq!(*promise.wait().unwrap(), 1);
    }

    #[test]
    fn wait_blocks_until_completion() {
        let promise = Promise::new();
        let producer = promise.clone();
        let worker = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            producer.complete(7u32);
        });
        assert_eq!(*promise.wait().unwrap(), 7);
        worker.join().unwrap();
    }

    #[test]
    fn wait_timeout_expires_and_later_wait_succeeds() {
        let promise = Promise::<u32>::new();
        let err = promise.wait_timeout(Duration::from_millis(10)).unwrap_err();
        assert!(err.is_timeout());
        assert!(!promise.is_done());

        promise.complete(3);
        assert_eq!(*promise.wait_timeout(Duration::from_secs(1)).unwrap(), 3);
    }

    #[test]
    fn failure_reason_is_shared_by_identity() {
        let promise = Promise::<u32>::new();
        let reason = FailureReason::new("backend exploded");
        promise.fail(reason.clone());

        match promise.wait() {
            Err(WaitError::Failed(seen)) => assert!(Arc::ptr_eq(&seen, &reason)),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn cancel_wakes_waiters_and_records_interrupt_flag() {
        let promise = Promise::<u32>::new();
        let waiter = {
            let promise = promise.clone();
            thread::spawn(move || promise.wait())
        };
        thread::sleep(Duration::from_millis(20));

        assert!(promise.cancel(true));
        assert!(promise.is_cancelled());
        assert!(promise.is_done());
        assert!(promise.interrupt_requested());
        assert!(matches!(waiter.join().unwrap(), Err(WaitError::Cancelled)));
    }

    #[test]
    fn listeners_run_once_on_settlement() {
        let promise = Promise::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let exec: Arc<dyn Executor> = Arc::new(CallerThread);

        for _ in 0..2 {
            let fired = fired.clone();
            promise.on_complete(
                Box::new(move || {
                    fired.fetch_add(1, SeqCst);
                }),
                exec.clone(),
            );
        }
        assert_eq!(fired.load(SeqCst), 0);

        promise.complete(1);
        assert_eq!(fired.load(SeqCst), 2);

        // Registration after settlement dispatches immediately.
        let fired2 = fired.clone();
        promise.on_complete(
            Box::new(move || {
                fired2.fetch_add(1, SeqCst);
            }),
            exec,
        );
        assert_eq!(fired.load(SeqCst), 3);
    }
}
