use {flume::Sender, log::trace, std::thread};

pub type Task = Box<dyn FnOnce() + Send>;

/// Execution context for completion listeners, supplied by the caller.
pub trait Executor: Send + Sync {
    fn execute(&self, task: Task);
}

/// Runs tasks inline on whichever thread submits them.
pub struct CallerThread;

impl Executor for CallerThread {
    fn execute(&self, task: Task) {
        task();
    }
}

/// A single worker thread fed through an unbounded channel. Tasks run in
/// submission order. Dropping the executor closes the channel; the worker
/// drains what is left and exits.
pub struct WorkerExecutor {
    queue: Sender<Task>,
}

impl WorkerExecutor {
    pub fn new() -> Self {
        let (tx, rx) = flume::unbounded::<Task>();
        thread::spawn(move || {
            for task in rx.iter() {
                task();
            }
            trace!("worker executor queue closed, exiting");
        });
        Self { queue: tx }
    }
}

impl Default for WorkerExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor for WorkerExecutor {
    fn execute(&self, task: Task) {
        // The worker outlives every sender, so this cannot fail while the
        // executor is alive.
        let _ = self.queue.send(task);
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        parking_lot::Mutex,
        std::{sync::Arc, time::Duration},
    };

    #[test]
    fn worker_runs_tasks_in_submission_order() {
        let exec = WorkerExecutor::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (done_tx, done_rx) = flume::bounded(1);

        for i in 0..10 {
            let seen = seen.clone();
            exec.execute(Box::new(move || seen.lock().push(i)));
        }
        exec.execute(Box::new(move || {
            let _ = done_tx.send(());
        }));

        done_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("worker did not drain the queue");
        assert_eq!(*seen.lock(), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn caller_thread_runs_inline() {
        let seen = Arc::new(Mutex::new(false));
        let flag = seen.clone();
        CallerThread.execute(Box::new(move || *flag.lock() = true));
        assert!(*seen.lock());
    }
}
