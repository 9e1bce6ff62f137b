//! cli::commands
//!
//! Command definitions and handlers.
//!
//! # Architecture
//!
//! Each command module declares:
//! 1. Its own clap `Args` struct (no options are shared between commands)
//! 2. A handler taking `&Context` plus those args
//! 3. A `descriptor()` used to register it
//!
//! [`all`] is the generic collection of context-bound commands. `lint` is
//! registered on its own by [`registry`] because it runs without a context.

mod analyze;
mod info;
mod lint;
mod query;

// Re-export command functions for testing and direct invocation
pub use analyze::{analyze, AnalyzeArgs};
pub use info::{info, InfoArgs};
pub use lint::{check_file, lint, Finding, LintArgs};
pub use query::{query, QueryArgs};

use super::registry::{CommandDescriptor, CommandRegistry, RegistryBuilder, RegistryError};

/// The generic command collection, in help order.
pub fn all() -> Vec<CommandDescriptor> {
    vec![analyze::descriptor(), info::descriptor(), query::descriptor()]
}

/// Assemble the full registry: the generic collection plus `lint`.
pub fn registry() -> Result<CommandRegistry, RegistryError> {
    RegistryBuilder::new()
        .register_all(all())
        .register(lint::descriptor())
        .build()
}
