//! cli::registry
//!
//! The fixed set of subcommands known to the dispatcher.
//!
//! # Design
//!
//! Each subcommand is described by a [`CommandDescriptor`]: a name, its own
//! clap option schema and a handler. Descriptors are collected once by a
//! [`RegistryBuilder`] and frozen into a [`CommandRegistry`], which can be
//! inspected but not changed.
//!
//! Handlers come in two shapes:
//!
//! - [`Handler::WithContext`] receives the shared [`Context`], which the
//!   entry point builds only after the subcommand has been resolved
//! - [`Handler::Standalone`] receives only its own arguments; no context and
//!   therefore no storage backend is created for it
//!
//! # Example
//!
//! ```
//! use sapp::cli::registry::{CommandDescriptor, RegistryBuilder};
//!
//! #[derive(clap::Args, Debug)]
//! struct PingArgs {}
//!
//! let registry = RegistryBuilder::new()
//!     .register(CommandDescriptor::standalone("ping", "Reply with pong", |_: PingArgs| {
//!         println!("pong");
//!         Ok(())
//!     }))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(registry.names(), vec!["ping"]);
//! assert!(registry.get("pin").is_none());
//! ```

use std::collections::HashSet;
use std::fmt;

use anyhow::Result;
use clap::{ArgMatches, Args, Command};
use thiserror::Error;

use crate::context::Context;

/// Errors from assembling the registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Two descriptors share a name.
    #[error("command '{0}' is registered more than once")]
    DuplicateName(&'static str),

    /// A descriptor uses a name clap reserves for itself.
    #[error("command name '{0}' is reserved")]
    ReservedName(&'static str),
}

/// Names clap generates on its own.
const RESERVED_NAMES: &[&str] = &["help"];

type ContextHandler = Box<dyn Fn(&Context, &ArgMatches) -> Result<()>>;
type StandaloneHandler = Box<dyn Fn(&ArgMatches) -> Result<()>>;

/// How a command is invoked.
pub enum Handler {
    /// Needs the shared execution context.
    WithContext(ContextHandler),
    /// Runs on its own arguments only.
    Standalone(StandaloneHandler),
}

/// A single registered subcommand.
pub struct CommandDescriptor {
    name: &'static str,
    about: &'static str,
    after_help: Option<&'static str>,
    augment: fn(Command) -> Command,
    handler: Handler,
}

impl CommandDescriptor {
    /// Describe a command that runs against the shared context.
    pub fn with_context<A, F>(name: &'static str, about: &'static str, run: F) -> Self
    where
        A: Args + 'static,
        F: Fn(&Context, A) -> Result<()> + 'static,
    {
        let handler = move |ctx: &Context, matches: &ArgMatches| {
            let args = A::from_arg_matches(matches)?;
            run(ctx, args)
        };

        Self {
            name,
            about,
            after_help: None,
            augment: A::augment_args,
            handler: Handler::WithContext(Box::new(handler)),
        }
    }

    /// Describe a command that does not need the shared context.
    pub fn standalone<A, F>(name: &'static str, about: &'static str, run: F) -> Self
    where
        A: Args + 'static,
        F: Fn(A) -> Result<()> + 'static,
    {
        let handler = move |matches: &ArgMatches| {
            let args = A::from_arg_matches(matches)?;
            run(args)
        };

        Self {
            name,
            about,
            after_help: None,
            augment: A::augment_args,
            handler: Handler::Standalone(Box::new(handler)),
        }
    }

    /// Attach text shown after the command's option list in `--help`.
    pub fn after_help(mut self, text: &'static str) -> Self {
        self.after_help = Some(text);
        self
    }

    /// Command name as typed on the command line.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether dispatching this command builds the execution context.
    pub fn needs_context(&self) -> bool {
        matches!(self.handler, Handler::WithContext(_))
    }

    /// The command's handler.
    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    /// The clap definition for this command, including its own options.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(self.name).about(self.about);
        if let Some(text) = self.after_help {
            cmd = cmd.after_help(text);
        }
        (self.augment)(cmd)
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("needs_context", &self.needs_context())
            .finish()
    }
}

/// Collects descriptors before freezing them.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    commands: Vec<CommandDescriptor>,
}

impl RegistryBuilder {
    /// Start an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one descriptor.
    pub fn register(mut self, descriptor: CommandDescriptor) -> Self {
        self.commands.push(descriptor);
        self
    }

    /// Add every descriptor from a collection, preserving order.
    pub fn register_all(
        mut self,
        descriptors: impl IntoIterator<Item = CommandDescriptor>,
    ) -> Self {
        self.commands.extend(descriptors);
        self
    }

    /// Freeze the registry.
    ///
    /// # Errors
    ///
    /// - `DuplicateName` if two descriptors share a name
    /// - `ReservedName` if a descriptor is named like a clap built-in
    pub fn build(self) -> Result<CommandRegistry, RegistryError> {
        let mut seen = HashSet::new();
        for descriptor in &self.commands {
            if RESERVED_NAMES.contains(&descriptor.name) {
                return Err(RegistryError::ReservedName(descriptor.name));
            }
            if !seen.insert(descriptor.name) {
                return Err(RegistryError::DuplicateName(descriptor.name));
            }
        }

        Ok(CommandRegistry {
            commands: self.commands,
        })
    }
}

/// Frozen, enumerable set of subcommands.
#[derive(Debug)]
pub struct CommandRegistry {
    commands: Vec<CommandDescriptor>,
}

impl CommandRegistry {
    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.commands.iter().map(|c| c.name).collect()
    }

    /// Look up a command by exact name.
    pub fn get(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// Iterate over descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.commands.iter()
    }

    /// The complete root command: global options plus every registered
    /// command.
    pub fn build_cli(&self) -> Command {
        self.attach(super::args::root_command())
    }

    /// Add every registered command as a subcommand of `root`.
    pub fn attach(&self, root: Command) -> Command {
        self.commands
            .iter()
            .fold(root, |root, descriptor| root.subcommand(descriptor.command()))
    }
}
