use crate::{
    executor::{dispatch, Executor},
    State, Wait,
};

/// A cell that was resolved the moment it was built.
///
/// The value never changes, so nothing here takes a lock and nothing is ever
/// stored: every handler fires straight away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedCell<R> {
    value: R,
}

impl<R> SealedCell<R> {
    pub fn new(value: R) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &R {
        &self.value
    }

    pub fn into_value(self) -> R {
        self.value
    }
}

impl<R: Clone + Send + 'static> SealedCell<R> {
    pub fn inspect(&self) -> State<R> {
        State::Resolved(self.value.clone())
    }

    /// Fires `handler` with the value before returning.
    pub fn register<F>(&self, handler: F)
    where
        F: FnOnce(R) + Send + 'static,
    {
        handler(self.value.clone())
    }

    /// Submits `handler` to `executor` instead of running it here.
    pub fn register_on<E, F>(&self, executor: E, handler: F)
    where
        E: Executor + 'static,
        F: FnOnce(R) + Send + 'static,
    {
        let value = self.value.clone();
        dispatch(Some(&executor as &dyn Executor), Box::new(move || handler(value)))
    }

    pub fn wait(&self) -> Wait<R> {
        Wait::register_with(|handler| self.register(handler))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChannelExecutor;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_register_fires_before_return() {
        let cell = SealedCell::new(String::from("x"));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen2 = seen.clone();
        cell.register(move |value| seen2.lock().push(value));
        assert_eq!(*seen.lock(), vec![String::from("x")]);
        assert_eq!(cell.inspect(), State::Resolved(String::from("x")));
    }

    #[test]
    fn test_register_on_waits_for_worker() {
        let (executor, worker) = ChannelExecutor::new();
        let cell = SealedCell::new(3);
        let seen = Arc::new(Mutex::new(None));
        let seen2 = seen.clone();
        cell.register_on(executor, move |value| *seen2.lock() = Some(value));
        assert_eq!(*seen.lock(), None);
        assert_eq!(worker.run_pending(), 1);
        assert_eq!(*seen.lock(), Some(3));
    }
}
