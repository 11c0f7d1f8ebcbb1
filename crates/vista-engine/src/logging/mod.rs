//! Logging setup.
//!
//! Engine code only talks to the `log` facade; this module installs
//! `env_logger` behind it for binaries that want it.

mod init;

pub use init::{init_logging, LoggingConfig, LOG_ENV};
