//! sapp - Post-processor for static taint-flow analysis results
//!
//! sapp reads the output of a taint-flow analyzer, stores it, and exposes a
//! set of subcommands that work over the stored results. This crate is the
//! tool's composition root: it assembles the shared dependencies once and
//! hands them to whichever subcommand was invoked.
//!
//! # Architecture
//!
//! - [`cli`] - Global options, command registry, dispatch
//! - [`context`] - Immutable execution context shared by all subcommands
//! - [`storage`] - Storage backends and engine selection
//! - [`parser`] - Analysis output parsers and the session parser binding
//! - [`config`] - Optional config file supplying option defaults
//! - [`logging`] - Explicit tracing handle for a run
//!
//! # Invariants
//!
//! 1. The execution context is built at most once per process, and only
//!    after every global option has been validated
//! 2. Subcommands read the context; none can replace its parts
//! 3. Exactly one subcommand runs per invocation
//! 4. Storage consistency checks are on for every CLI session

pub mod cli;
pub mod config;
pub mod context;
pub mod logging;
pub mod parser;
pub mod storage;
