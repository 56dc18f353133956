//! Cadence CLI Library
//!
//! Configuration, the clock-driven engine, the logging now-playing sink and
//! the interactive player shell behind the `cadence` binary.
//!
//! This library exposes the components for testing purposes.

pub mod config;
pub mod engine;
pub mod error;
pub mod shell;
pub mod sink;

// Re-export commonly used types for convenience
pub use config::CadenceConfig;
pub use engine::ClockEngine;
pub use error::{CliError, Result};
pub use shell::{Reply, Shell, ShellCommand};
pub use sink::LogSink;
