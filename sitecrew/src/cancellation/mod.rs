//! Cooperative cancellation.
//!
//! A single [`CancellationToken`] is shared between the binary's Ctrl-C
//! handler and the pipeline runner.

mod token;

pub use token::{CancelCallback, CancellationToken};
