use crate::{Executor, PendingCell, SealedCell, State, Wait};

/// The eventual result of some computation.
///
/// A cell is either built already resolved ([`Cell::resolved`]) or built
/// pending ([`Cell::pending`]) and sealed later, from any thread. Share it
/// between threads behind an `Arc`.
///
/// # Examples
///
/// ```
/// use promise_seal::{Cell, State};
/// let cell = Cell::pending();
/// cell.register(|value| println!("h1 {value}"));
/// cell.register(|value| println!("h2 {value}"));
/// cell.seal(42);
/// cell.seal(43);
/// assert_eq!(cell.inspect(), State::Resolved(42));
/// ```
#[derive(Debug)]
pub enum Cell<R> {
    Sealed(SealedCell<R>),
    Pending(PendingCell<R>),
}

impl<R> Cell<R> {
    pub fn resolved(value: R) -> Self {
        Cell::Sealed(SealedCell::new(value))
    }

    pub fn pending() -> Self {
        Cell::Pending(PendingCell::new())
    }

    pub fn is_resolved(&self) -> bool {
        match self {
            Cell::Sealed(_) => true,
            Cell::Pending(cell) => cell.is_resolved(),
        }
    }
}

impl<R> From<R> for Cell<R> {
    fn from(value: R) -> Self {
        Cell::resolved(value)
    }
}

impl<R: Clone + Send + 'static> Cell<R> {
    /// Resolve the cell. Returns `false`, and changes nothing, if it was
    /// already resolved.
    pub fn seal(&self, value: R) -> bool {
        match self {
            Cell::Sealed(_) => {
                tracing::debug!("discarding seal of a pre-resolved cell");
                false
            }
            Cell::Pending(cell) => cell.seal(value),
        }
    }

    /// Run `handler` with the value once sealed. If the cell is already
    /// resolved, `handler` runs before this returns.
    pub fn register<F>(&self, handler: F)
    where
        F: FnOnce(R) + Send + 'static,
    {
        match self {
            Cell::Sealed(cell) => cell.register(handler),
            Cell::Pending(cell) => cell.register(handler),
        }
    }

    /// Like [`Cell::register`], but the handler is submitted to `executor`
    /// instead of running on the sealing (or registering) thread.
    pub fn register_on<E, F>(&self, executor: E, handler: F)
    where
        E: Executor + 'static,
        F: FnOnce(R) + Send + 'static,
    {
        match self {
            Cell::Sealed(cell) => cell.register_on(executor, handler),
            Cell::Pending(cell) => cell.register_on(executor, handler),
        }
    }

    pub fn inspect(&self) -> State<R> {
        match self {
            Cell::Sealed(cell) => cell.inspect(),
            Cell::Pending(cell) => cell.inspect(),
        }
    }

    /// A future for the value, see [`Wait`].
    pub fn wait(&self) -> Wait<R> {
        Wait::register_with(|handler| self.register(handler))
    }
}
