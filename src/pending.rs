use crate::{
    executor::{dispatch, Executor},
    state::{Handler, Handlers, Sealant},
    State, Wait,
};
use parking_lot::RwLock;
use std::{
    fmt::{self, Debug},
    mem,
    panic::{self, AssertUnwindSafe},
};

/// A cell that starts out pending and can be sealed exactly once.
///
/// Every operation goes through one reader/writer lock: `seal` and `register`
/// take it exclusively, `inspect` shares it. Handlers are never run while the
/// lock is held, so a handler may touch the same cell again.
///
/// # Examples
///
/// ```
/// use promise_seal::{PendingCell, State};
/// use std::{sync::Arc, thread};
/// let cell = Arc::new(PendingCell::<String>::new());
/// cell.register(|value| println!("我等到了{:?}", value));
/// let producer = cell.clone();
/// let task1 = thread::spawn(move || producer.seal(String::from("🍓")));
/// assert!(task1.join().expect("The task1 thread has panicked"));
/// assert_eq!(cell.inspect(), State::Resolved(String::from("🍓")));
/// ```
pub struct PendingCell<R> {
    sealant: RwLock<Sealant<R>>,
}

impl<R> PendingCell<R> {
    pub fn new() -> Self {
        Self {
            sealant: RwLock::new(Sealant::Pending(Handlers::default())),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(*self.sealant.read(), Sealant::Resolved(_))
    }
}

impl<R> Default for PendingCell<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Clone + Send + 'static> PendingCell<R> {
    /// Resolve the cell with `value` and fire every handler queued so far, in
    /// the order they were registered.
    ///
    /// Only the first call wins. Later calls leave the cell untouched and
    /// return `false`.
    pub fn seal(&self, value: R) -> bool {
        let handlers = {
            let mut sealant = self.sealant.write();
            match &mut *sealant {
                Sealant::Resolved(_) => {
                    tracing::debug!("discarding seal of an already resolved cell");
                    return false;
                }
                Sealant::Pending(handlers) => {
                    let handlers = mem::take(handlers);
                    *sealant = Sealant::Resolved(value.clone());
                    handlers
                }
            }
        };

        // NOTE: the cell is already resolved here. A handler below that
        // registers on this cell fires at once, ahead of the rest of this batch.
        let handlers = handlers.into_vec();
        tracing::trace!(handlers = handlers.len(), "sealed cell");
        // A panicking handler must not cost its siblings their call: finish the
        // batch, then re-raise the first panic.
        let mut panicked = None;
        for handler in handlers {
            let value = value.clone();
            let fired = panic::catch_unwind(AssertUnwindSafe(move || handler(value)));
            if let Err(payload) = fired {
                tracing::error!("handler panicked while sealing, finishing the batch first");
                panicked.get_or_insert(payload);
            }
        }
        if let Some(payload) = panicked {
            panic::resume_unwind(payload);
        }
        true
    }

    /// Run `handler` once the cell is sealed, or right now if it already is.
    pub fn register<F>(&self, handler: F)
    where
        F: FnOnce(R) + Send + 'static,
    {
        self.register_with(None, handler)
    }

    /// Like [`PendingCell::register`], but the handler is submitted to
    /// `executor` instead of running on the sealing (or registering) thread.
    pub fn register_on<E, F>(&self, executor: E, handler: F)
    where
        E: Executor + 'static,
        F: FnOnce(R) + Send + 'static,
    {
        self.register_with(Some(Box::new(executor)), handler)
    }

    fn register_with<F>(&self, executor: Option<Box<dyn Executor>>, handler: F)
    where
        F: FnOnce(R) + Send + 'static,
    {
        let value = {
            let mut sealant = self.sealant.write();
            match &mut *sealant {
                Sealant::Pending(handlers) => {
                    // Appending under the write lock is what keeps a racing
                    // `seal` from draining past this handler.
                    let handler: Handler<R> = match executor {
                        None => Box::new(handler),
                        Some(executor) => Box::new(move |value| {
                            dispatch(Some(&*executor), Box::new(move || handler(value)))
                        }),
                    };
                    handlers.append(handler);
                    tracing::trace!("queued handler on pending cell");
                    return;
                }
                Sealant::Resolved(value) => value.clone(),
            }
        };
        dispatch(executor.as_deref(), Box::new(move || handler(value)))
    }

    pub fn inspect(&self) -> State<R> {
        self.sealant.read().snapshot()
    }

    pub fn wait(&self) -> Wait<R> {
        Wait::register_with(|handler| self.register(handler))
    }
}

impl<R: Debug> Debug for PendingCell<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingCell")
            .field("sealant", &*self.sealant.read())
            .finish()
    }
}
