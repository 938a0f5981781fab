//! Observability support.
//!
//! The client emits `tracing` events and spans on its own; installing a
//! subscriber is left to the application. [`init_logging`] is a convenience
//! for applications that do not have one.

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
