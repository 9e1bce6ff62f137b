//! cli
//!
//! Command-line interface layer and composition root.
//!
//! # Responsibilities
//!
//! - Parse global options and resolve them against config and defaults
//! - Build the execution context, once, for commands that need it
//! - Dispatch to exactly one registered command
//!
//! # Lifecycle
//!
//! ```text
//! UNCONFIGURED -> parse options -> resolve command -> build Context -> CONFIGURED -> handler
//! ```
//!
//! Option errors (including an unknown `--database-engine` value) and unknown
//! command names are reported by clap before any storage backend exists.
//! Standalone commands such as `lint` never trigger context construction.

pub mod args;
pub mod commands;
pub mod registry;

pub use args::{GlobalArgs, Settings};
pub use registry::{CommandDescriptor, CommandRegistry, Handler, RegistryBuilder};

use std::ffi::OsString;

use anyhow::{anyhow, Context as _, Result};
use clap::{ArgMatches, FromArgMatches};

use crate::context::Context;
use crate::logging::Logger;
use crate::parser::{JsonLinesParser, ParserBinding};
use crate::storage::create_database;

/// Internal consistency checks are always on for CLI sessions.
pub const ASSERTIONS: bool = true;

/// A parsed command line, not yet dispatched.
#[derive(Debug)]
pub struct Invocation {
    /// Global options as given.
    pub globals: GlobalArgs,
    matches: ArgMatches,
}

impl Invocation {
    /// Name of the requested command.
    pub fn command_name(&self) -> Option<&str> {
        self.matches.subcommand_name()
    }
}

/// Parse a command line against a registry.
///
/// # Errors
///
/// Returns clap's error for help/version requests, unknown commands and
/// invalid option values.
pub fn parse<I, T>(registry: &CommandRegistry, args: I) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = registry.build_cli().try_get_matches_from(args)?;
    let globals = GlobalArgs::from_arg_matches(&matches)?;
    Ok(Invocation { globals, matches })
}

/// Build the execution context from global options.
///
/// # Errors
///
/// Fails if the options cannot be resolved or the backend cannot be opened.
pub fn build_context(globals: &GlobalArgs) -> Result<Context> {
    let settings = globals.resolve()?;
    let database = create_database(
        settings.database_engine,
        &settings.database_name,
        ASSERTIONS,
    )
    .with_context(|| {
        format!(
            "Failed to open {} database '{}'",
            settings.database_engine, settings.database_name
        )
    })?;

    Ok(Context::new(
        settings.repository,
        database,
        ParserBinding::of::<JsonLinesParser>(),
    ))
}

/// Dispatch a parsed invocation to its handler under `logger`.
pub fn execute(
    registry: &CommandRegistry,
    invocation: &Invocation,
    logger: &Logger,
) -> Result<()> {
    logger.in_scope(|| {
        let (name, sub_matches) = invocation
            .matches
            .subcommand()
            .ok_or_else(|| anyhow!("no command given"))?;
        let descriptor = registry
            .get(name)
            .ok_or_else(|| anyhow!("unknown command '{}'", name))?;

        match descriptor.handler() {
            Handler::Standalone(run) => {
                tracing::debug!(command = name, "dispatching without context");
                run(sub_matches)
            }
            Handler::WithContext(run) => {
                let ctx = build_context(&invocation.globals)?;
                tracing::debug!(command = name, context = ?ctx, "built context");
                run(&ctx, sub_matches)
            }
        }
    })
}

/// Parse `args` and dispatch them under an already built `logger`.
///
/// # Errors
///
/// Returns clap's error (wrapped) for usage problems, otherwise whatever
/// context construction or the handler reported.
pub fn run_with<I, T>(args: I, registry: &CommandRegistry, logger: &Logger) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let invocation = parse(registry, args)?;
    execute(registry, &invocation, logger)
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`. Unlike [`run_with`],
/// the logger is built from the parsed `--debug`/`--quiet` flags.
pub fn run() -> Result<()> {
    let registry = commands::registry()?;
    let invocation = parse(&registry, std::env::args_os())?;
    let logger = Logger::stderr(invocation.globals.verbosity());
    execute(&registry, &invocation, &logger)
}
