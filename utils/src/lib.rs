//! Shared utilities for the tangle client crates.

pub mod logging;

pub use logging::{init_logging, try_init_logging, LogFormat, LoggingError};
