//! A thread-safe, single-assignment cell: the piece of a promise that holds
//! its eventual result.
//!
//! A [`Cell`] is sealed with a value at most once. Handlers registered before
//! that fire exactly once, in registration order, when it happens; handlers
//! registered afterwards fire immediately. Sealing and registering may race
//! freely across threads.
//!
//! ```
//! use promise_seal::Cell;
//! use std::{sync::Arc, thread};
//! let cell = Arc::new(Cell::pending());
//! let consumer = cell.clone();
//! let task1 = thread::spawn(move || consumer.register(|value: u32| println!("got {value}")));
//! let task2 = thread::spawn(move || cell.seal(42));
//! task1.join().expect("The task1 thread has panicked");
//! assert!(task2.join().expect("The task2 thread has panicked"));
//! ```
//!
//! There is no rejected state. To carry failures, seal the cell with a
//! `Result`.
use thiserror::Error;

mod cell;
pub mod executor;
mod pending;
mod sealed;
mod state;
mod wait;

pub use cell::Cell;
pub use executor::{ChannelExecutor, Executor, Job, Rejected, Worker};
pub use pending::PendingCell;
pub use sealed::SealedCell;
pub use state::State;
pub use wait::Wait;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("cell was dropped before it was sealed")]
    Abandoned,
}
