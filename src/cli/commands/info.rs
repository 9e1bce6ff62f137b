//! info command - Show the session's repository, storage and parser

use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;

use crate::cli::registry::CommandDescriptor;
use crate::context::Context;

/// Arguments for `info`.
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Print machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

pub(super) fn descriptor() -> CommandDescriptor {
    CommandDescriptor::with_context(
        "info",
        "Show the repository, database and parser in use",
        info,
    )
}

#[derive(Debug, Serialize)]
struct InfoReport<'a> {
    repository: String,
    engine: &'static str,
    database: &'a str,
    parser: &'static str,
    assertions: bool,
    records: u64,
}

fn report(ctx: &Context) -> Result<InfoReport<'_>> {
    let database = ctx.database();
    let records = database
        .record_count()
        .context("Failed to count stored records")?;

    Ok(InfoReport {
        repository: ctx.repository().display().to_string(),
        engine: database.engine().name(),
        database: database.name(),
        parser: ctx.parser().name(),
        assertions: database.assertions_enabled(),
        records,
    })
}

/// Display the session's configuration.
pub fn info(ctx: &Context, args: InfoArgs) -> Result<()> {
    let report = report(ctx)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("repository: {}", report.repository);
    println!("engine:     {}", report.engine);
    println!("database:   {}", report.database);
    println!("parser:     {}", report.parser);
    println!(
        "assertions: {}",
        if report.assertions { "on" } else { "off" }
    );
    println!("records:    {}", report.records);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParserBinding;
    use crate::storage::{create_database, DatabaseEngine};
    use std::path::PathBuf;

    #[test]
    fn report_reflects_context() {
        let database = create_database(DatabaseEngine::Memory, "test", true).unwrap();
        let ctx = Context::new(PathBuf::from("/tmp/repo"), database, ParserBinding::default());

        let report = report(&ctx).unwrap();
        assert_eq!(report.repository, "/tmp/repo");
        assert_eq!(report.engine, "memory");
        assert_eq!(report.database, "test");
        assert_eq!(report.parser, "json-lines");
        assert!(report.assertions);
        assert_eq!(report.records, 0);
    }

    #[test]
    fn report_serializes() {
        let database = create_database(DatabaseEngine::Memory, "test", true).unwrap();
        let ctx = Context::new(PathBuf::from("/tmp/repo"), database, ParserBinding::default());

        let value = serde_json::to_value(report(&ctx).unwrap()).unwrap();
        assert_eq!(value["engine"], "memory");
        assert_eq!(value["records"], 0);
    }
}
