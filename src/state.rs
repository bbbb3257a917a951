use parking_lot::Mutex;
use std::fmt::{self, Debug};

pub(crate) type Handler<R> = Box<dyn FnOnce(R) + Send + 'static>;

/// Ordered one-shot callbacks waiting on a pending cell.
pub(crate) struct Handlers<R> {
    // Only reached through `&mut self` or by value, so it is never locked.
    // The mutex just makes the list `Sync` without asking handlers to be.
    bodies: Mutex<Vec<Handler<R>>>,
}

impl<R> Handlers<R> {
    pub(crate) fn append(&mut self, handler: Handler<R>) {
        self.bodies.get_mut().push(handler)
    }

    pub(crate) fn into_vec(self) -> Vec<Handler<R>> {
        self.bodies.into_inner()
    }
}

impl<R> Default for Handlers<R> {
    fn default() -> Self {
        Self {
            bodies: Mutex::new(Vec::new()),
        }
    }
}

impl<R> Debug for Handlers<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers").finish_non_exhaustive()
    }
}

/// What a pending cell actually holds. Never goes back to `Pending`.
#[derive(Debug)]
pub(crate) enum Sealant<R> {
    Pending(Handlers<R>),
    Resolved(R),
}

impl<R: Clone> Sealant<R> {
    pub(crate) fn snapshot(&self) -> State<R> {
        match self {
            Sealant::Pending(_) => State::Pending,
            Sealant::Resolved(value) => State::Resolved(value.clone()),
        }
    }
}

/// A snapshot of a cell, as returned by `inspect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State<R> {
    Pending,
    Resolved(R),
}

impl<R> State<R> {
    pub fn is_pending(&self) -> bool {
        matches!(self, State::Pending)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, State::Resolved(_))
    }

    pub fn value(&self) -> Option<&R> {
        match self {
            State::Pending => None,
            State::Resolved(value) => Some(value),
        }
    }

    pub fn into_value(self) -> Option<R> {
        match self {
            State::Pending => None,
            State::Resolved(value) => Some(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_pending() {
        let sealant = Sealant::<u8>::Pending(Handlers::default());
        let state = sealant.snapshot();
        assert!(state.is_pending());
        assert_eq!(state.value(), None);
    }

    #[test]
    fn test_snapshot_resolved() {
        let sealant = Sealant::Resolved(String::from("🍓"));
        let state = sealant.snapshot();
        assert!(state.is_resolved());
        assert_eq!(state.value().map(String::as_str), Some("🍓"));
        assert_eq!(state.into_value(), Some(String::from("🍓")));
    }

    #[test]
    fn test_handlers_keep_append_order() {
        let seen = std::sync::Arc::new(Mutex::new(Vec::new()));
        let mut handlers = Handlers::default();
        for i in 0..3 {
            let seen = seen.clone();
            handlers.append(Box::new(move |value: u32| seen.lock().push(value + i)));
        }
        for handler in handlers.into_vec() {
            handler(10);
        }
        assert_eq!(*seen.lock(), vec![10, 11, 12]);
    }
}
