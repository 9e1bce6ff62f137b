//! query command - Run SQL against the session database

use anyhow::{Context as _, Result};
use clap::Args;

use crate::cli::registry::CommandDescriptor;
use crate::context::Context;
use crate::storage::QueryResult;

/// Arguments for `query`.
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// SQL statement to execute
    #[arg(value_name = "SQL")]
    pub sql: String,

    /// Omit the header line
    #[arg(long)]
    pub no_header: bool,
}

pub(super) fn descriptor() -> CommandDescriptor {
    CommandDescriptor::with_context("query", "Run a SQL statement against the database", query)
        .after_help(
            "\
EXAMPLES:
    # Count stored records by kind
    sapp query 'SELECT kind, COUNT(*) FROM trace_records GROUP BY kind'",
        )
}

fn format_rows(result: &QueryResult, header: bool) -> Vec<String> {
    let mut lines = Vec::with_capacity(result.rows.len() + 1);
    if header && !result.columns.is_empty() {
        lines.push(result.columns.join("\t"));
    }
    lines.extend(result.rows.iter().map(|row| row.join("\t")));
    lines
}

/// Execute a statement and print its rows tab-separated.
pub fn query(ctx: &Context, args: QueryArgs) -> Result<()> {
    let result = ctx
        .database()
        .query(&args.sql)
        .with_context(|| format!("Failed to run query: {}", args.sql))?;

    tracing::debug!(rows = result.rows.len(), "query finished");
    for line in format_rows(&result, !args.no_header) {
        println!("{}", line);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> QueryResult {
        QueryResult {
            columns: vec!["kind".to_string(), "n".to_string()],
            rows: vec![
                vec!["issue".to_string(), "2".to_string()],
                vec!["model".to_string(), "1".to_string()],
            ],
        }
    }

    #[test]
    fn rows_with_header() {
        assert_eq!(
            format_rows(&result(), true),
            vec!["kind\tn", "issue\t2", "model\t1"]
        );
    }

    #[test]
    fn rows_without_header() {
        assert_eq!(format_rows(&result(), false), vec!["issue\t2", "model\t1"]);
    }

    #[test]
    fn statement_without_columns_prints_nothing() {
        assert!(format_rows(&QueryResult::default(), true).is_empty());
    }
}
