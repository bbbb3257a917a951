//! A future for a cell's value, built on nothing but [`crate::Cell::register`].
//!
use crate::{state::Handler, Error};
use parking_lot::Mutex;
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll, Waker},
};

/// Resolves to the cell's value, or to [`Error::Abandoned`] if the cell is
/// dropped before anyone seals it.
///
/// # Examples
///
/// ```
/// use promise_seal::Cell;
/// use futures::executor::block_on;
/// use std::{sync::Arc, thread};
/// let cell = Arc::new(Cell::<String>::pending());
/// let waiter = cell.wait();
/// let task1 = thread::spawn(move || block_on(async {
///     println!("我等到了{:?}", waiter.await.unwrap());
/// }));
/// cell.seal(String::from("🍓"));
/// task1.join().expect("The task1 thread has panicked");
/// ```
#[derive(Debug)]
pub struct Wait<R> {
    inner: Arc<Mutex<Inner<R>>>,
}

#[derive(Debug)]
struct Inner<R> {
    value: Option<Result<R, Error>>,
    waker: Option<Waker>,
}

impl<R> Inner<R> {
    fn complete(inner: &Mutex<Self>, value: Result<R, Error>) {
        let waker = {
            let mut inner = inner.lock();
            inner.value = Some(value);
            inner.waker.take()
        };
        if let Some(waker) = waker {
            waker.wake()
        }
    }
}

/// Held by the registered handler. Dropping it unfired means the cell went
/// away while still pending.
struct Notify<R> {
    inner: Option<Arc<Mutex<Inner<R>>>>,
}

impl<R> Notify<R> {
    fn fire(mut self, value: R) {
        if let Some(inner) = self.inner.take() {
            Inner::complete(&inner, Ok(value))
        }
    }
}

impl<R> Drop for Notify<R> {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.take() {
            Inner::complete(&inner, Err(Error::Abandoned))
        }
    }
}

impl<R: Clone + Send + 'static> Wait<R> {
    /// `register` hands the notifying handler to whichever cell is waited on.
    pub(crate) fn register_with(register: impl FnOnce(Handler<R>)) -> Self {
        let inner = Arc::new(Mutex::new(Inner {
            value: None,
            waker: None,
        }));
        let notify = Notify {
            inner: Some(inner.clone()),
        };
        register(Box::new(move |value| notify.fire(value)));
        Wait { inner }
    }
}

impl<R> Future for Wait<R> {
    type Output = Result<R, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut inner = self.inner.lock();
        match inner.value.take() {
            Some(value) => Poll::Ready(value),
            None => {
                inner.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}
