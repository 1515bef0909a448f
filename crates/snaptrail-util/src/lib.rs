//! Shared utilities for snaptrail.
//!
//! Path resolution for the start directory, the log and config
//! locations, and tracing setup used by the binary.

pub mod error;
pub mod log;
pub mod path;

pub use error::{Error, ErrorKind, Result};
pub use log::{LogConfig, LogLevel};
