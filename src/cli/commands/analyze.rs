//! analyze command - Parse analysis output and store its records

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::Args;

use crate::cli::registry::CommandDescriptor;
use crate::context::Context;
use crate::parser::TraceRecord;

/// Arguments for `analyze`.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Analysis output files to read
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Parse and validate without storing anything
    #[arg(long)]
    pub dry_run: bool,
}

pub(super) fn descriptor() -> CommandDescriptor {
    CommandDescriptor::with_context(
        "analyze",
        "Parse analysis output and store its records",
        analyze,
    )
    .after_help(
        "\
EXAMPLES:
    # Store results in the default database (./sapp.db)
    sapp analyze taint-output.json

    # Check that output parses without touching the database
    sapp analyze --dry-run taint-output.json

    # Scratch run against an in-memory database
    sapp --database-engine memory analyze taint-output.json",
    )
}

/// Make absolute record filenames relative to the repository root.
fn relativize(repository: &Path, record: &mut TraceRecord) {
    if let Some(filename) = &record.filename {
        if let Ok(relative) = Path::new(filename).strip_prefix(repository) {
            record.filename = Some(relative.to_string_lossy().into_owned());
        }
    }
}

/// Parse every file with the session's parser and persist the records.
///
/// # Arguments
///
/// * `ctx` - Execution context
/// * `args` - Input files and flags
pub fn analyze(ctx: &Context, args: AnalyzeArgs) -> Result<()> {
    let repository = ctx.repository().canonicalize().with_context(|| {
        format!("Failed to resolve repository '{}'", ctx.repository().display())
    })?;
    let mut parser = ctx.parser().instantiate();
    let mut records = Vec::new();

    for file in &args.files {
        let handle =
            File::open(file).with_context(|| format!("Failed to open '{}'", file.display()))?;
        let mut reader = BufReader::new(handle);
        let parsed = parser
            .parse(&mut reader)
            .with_context(|| format!("Failed to parse '{}'", file.display()))?;

        tracing::debug!(
            file = %file.display(),
            records = parsed.len(),
            parser = parser.name(),
            "parsed analysis output"
        );
        records.extend(parsed);
    }

    for record in &mut records {
        relativize(&repository, record);
    }

    if args.dry_run {
        println!(
            "Parsed {} record(s) from {} file(s); nothing stored (dry run)",
            records.len(),
            args.files.len()
        );
        return Ok(());
    }

    let database = ctx.database();
    let stored = database
        .persist(&records)
        .context("Failed to store records")?;

    println!(
        "Stored {} record(s) from {} file(s) in {} database '{}'",
        stored,
        args.files.len(),
        database.engine(),
        database.name()
    );

    Ok(())
}
