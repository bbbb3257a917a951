//! Where handlers run. Without an executor a handler runs inline on whichever
//! thread seals or registers; with one, the invocation is submitted to it.
//!
use std::{
    fmt::{self, Debug},
    sync::{
        mpsc::{channel, Receiver, SendError, Sender},
        Arc,
    },
};
use thiserror::Error;

/// A handler invocation, ready to run.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Something that can run a [`Job`], possibly on another thread.
pub trait Executor: Send + Sync {
    /// Submit `job`. An executor that can no longer take work hands the job
    /// back inside [`Rejected`].
    fn execute(&self, job: Job) -> Result<(), Rejected>;
}

impl<E: Executor + ?Sized> Executor for Arc<E> {
    fn execute(&self, job: Job) -> Result<(), Rejected> {
        (**self).execute(job)
    }
}

#[derive(Error)]
#[error("executor is no longer accepting jobs")]
pub struct Rejected(pub Job);

impl Debug for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Rejected(..)")
    }
}

/// Run `job` inline, or hand it to `executor` if there is one.
///
/// A rejected job still runs, inline, so a handler is never lost to an
/// executor that shut down.
pub(crate) fn dispatch(executor: Option<&dyn Executor>, job: Job) {
    match executor {
        None => job(),
        Some(executor) => {
            if let Err(Rejected(job)) = executor.execute(job) {
                tracing::warn!("executor rejected a handler, running it inline");
                job()
            }
        }
    }
}

/// An [`Executor`] that queues jobs on a channel for a [`Worker`] to run.
///
/// # Examples
///
/// ```
/// use promise_seal::{Cell, ChannelExecutor};
/// use std::thread;
/// let (executor, worker) = ChannelExecutor::new();
/// let cell = Cell::pending();
/// cell.register_on(executor, |value: u32| println!("worker got {value}"));
/// let task1 = thread::spawn(move || worker.run());
/// cell.seal(7);
/// drop(cell);
/// assert_eq!(task1.join().expect("The task1 thread has panicked"), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ChannelExecutor {
    sender: Sender<Job>,
}

/// The receiving end of a [`ChannelExecutor`].
#[derive(Debug)]
pub struct Worker {
    receiver: Receiver<Job>,
}

impl ChannelExecutor {
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (Self, Worker) {
        let (tx, rx) = channel();
        (ChannelExecutor { sender: tx }, Worker { receiver: rx })
    }
}

impl Executor for ChannelExecutor {
    fn execute(&self, job: Job) -> Result<(), Rejected> {
        self.sender
            .send(job)
            .map_err(|SendError(job)| Rejected(job))
    }
}

impl Worker {
    /// Runs jobs on the current thread until every [`ChannelExecutor`] handle
    /// is gone. Returns how many ran.
    pub fn run(self) -> usize {
        let mut ran = 0;
        for job in self.receiver {
            job();
            ran += 1;
        }
        ran
    }

    /// Runs whatever is already queued without blocking.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.receiver.try_recv() {
            job();
            ran += 1;
        }
        ran
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::thread;

    #[test]
    fn test_dispatch_inline() {
        let ran = Arc::new(Mutex::new(None));
        let ran2 = ran.clone();
        dispatch(None, Box::new(move || *ran2.lock() = Some(thread::current().id())));
        assert_eq!(*ran.lock(), Some(thread::current().id()));
    }

    #[test]
    fn test_dispatch_queues_until_worker_runs() {
        let (executor, worker) = ChannelExecutor::new();
        let ran = Arc::new(Mutex::new(0));
        let ran2 = ran.clone();
        dispatch(Some(&executor as &dyn Executor), Box::new(move || *ran2.lock() += 1));
        assert_eq!(*ran.lock(), 0);
        assert_eq!(worker.run_pending(), 1);
        assert_eq!(*ran.lock(), 1);
        assert_eq!(worker.run_pending(), 0);
    }

    #[test]
    fn test_dispatch_rejected_runs_inline() {
        let (executor, worker) = ChannelExecutor::new();
        drop(worker);
        let ran = Arc::new(Mutex::new(0));
        let ran2 = ran.clone();
        dispatch(Some(&executor as &dyn Executor), Box::new(move || *ran2.lock() += 1));
        assert_eq!(*ran.lock(), 1);
    }

    #[test]
    fn test_worker_runs_on_its_own_thread() {
        let (executor, worker) = ChannelExecutor::new();
        let task1 = thread::spawn(move || (thread::current().id(), worker.run()));
        let seen = Arc::new(Mutex::new(None));
        let seen2 = seen.clone();
        let shared: Arc<dyn Executor> = Arc::new(executor);
        dispatch(
            Some(&shared as &dyn Executor),
            Box::new(move || *seen2.lock() = Some(thread::current().id())),
        );
        drop(shared);
        let (worker_id, ran) = task1.join().expect("The task1 thread has panicked");
        assert_eq!(ran, 1);
        assert_eq!(*seen.lock(), Some(worker_id));
    }
}
