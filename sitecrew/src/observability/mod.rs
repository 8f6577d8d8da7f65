//! Logging setup.
//!
//! Library code only emits `tracing` events. The binary installs a
//! subscriber once at startup with [`init_logging`].

mod logging;

pub use logging::{init_logging, LogFormat, LoggingConfig};
