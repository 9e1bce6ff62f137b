//! lint command - Check analysis output files for malformed records
//!
//! Registered outside the generic command collection: it reads files
//! directly and never touches the repository, the database or the session
//! parser, so the entry point builds no context for it.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use clap::Args;

use crate::cli::registry::CommandDescriptor;
use crate::parser::{parse_line, ParseError};

/// Arguments for `lint`.
#[derive(Args, Debug)]
pub struct LintArgs {
    /// Analysis output files to check
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

pub(super) fn descriptor() -> CommandDescriptor {
    CommandDescriptor::standalone(
        "lint",
        "Check analysis output files for malformed records",
        lint,
    )
}

/// A single problem found in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub path: PathBuf,
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.path.display(), self.line, self.message)
    }
}

/// Check one file, collecting every problem rather than stopping at the first.
pub fn check_file(path: &Path) -> Result<Vec<Finding>> {
    let file = File::open(path).with_context(|| format!("Failed to open '{}'", path.display()))?;
    let mut findings = Vec::new();

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read '{}'", path.display()))?;
        let (line, message) = match parse_line(&line, index + 1) {
            Ok(_) => continue,
            Err(ParseError::InvalidJson { line, message }) => {
                (line, format!("invalid JSON: {}", message))
            }
            Err(ParseError::InvalidRecord { line, message }) => (line, message),
            Err(err @ ParseError::Io(_)) => return Err(err.into()),
        };
        findings.push(Finding {
            path: path.to_path_buf(),
            line,
            message,
        });
    }

    Ok(findings)
}

/// Lint every file and fail if any problem was found.
pub fn lint(args: LintArgs) -> Result<()> {
    let mut total = 0;

    for path in &args.files {
        let findings = check_file(path)?;
        tracing::debug!(file = %path.display(), findings = findings.len(), "linted");
        for finding in &findings {
            println!("{}", finding);
        }
        total += findings.len();
    }

    if total > 0 {
        bail!("{} problem(s) found in {} file(s)", total, args.files.len());
    }

    println!("No problems found in {} file(s)", args.files.len());
    Ok(())
}
