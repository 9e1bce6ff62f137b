//! logging
//!
//! Explicit logging handle for the process.
//!
//! # Design
//!
//! The entry point builds a [`Logger`] from the verbosity flags and runs the
//! dispatch inside [`Logger::in_scope`]. Nothing is installed as a global
//! default, so tests can build their own logger around a buffer and observe
//! exactly what a run emitted.
//!
//! The `SAPP_LOG` environment variable, when set, replaces the level derived
//! from the flags with an `EnvFilter` directive (e.g. `SAPP_LOG=sapp=trace`).

use std::io::{self, IsTerminal};

use tracing::Dispatch;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a filter directive override.
pub const LOG_ENV: &str = "SAPP_LOG";

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - errors only
    Quiet,
    /// Normal mode - warnings and errors
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }

    /// Default filter directive for this level.
    pub fn directive(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Debug => "debug",
        }
    }
}

/// Logging handle passed to the entry point.
pub struct Logger {
    dispatch: Dispatch,
}

impl Logger {
    /// Logger writing to stderr.
    pub fn stderr(verbosity: Verbosity) -> Self {
        Self::build(verbosity, io::stderr, io::stderr().is_terminal())
    }

    /// Logger writing plain text to a custom writer.
    pub fn with_writer<W>(verbosity: Verbosity, writer: W) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        Self::build(verbosity, writer, false)
    }

    fn build<W>(verbosity: Verbosity, writer: W, ansi: bool) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

        let subscriber = tracing_subscriber::fmt()
            .with_writer(writer)
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(ansi)
            .without_time()
            .finish();

        Self {
            dispatch: Dispatch::new(subscriber),
        }
    }

    /// Run `f` with this logger as the active subscriber.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}
