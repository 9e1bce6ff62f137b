//! parser
//!
//! Analysis output parsers and the session's parser binding.
//!
//! # Design
//!
//! A [`ParserBinding`] records *which* parser every subcommand must use,
//! without creating one. Subcommands call [`ParserBinding::instantiate`]
//! when (and if) they need to read analysis output, so all of them agree on
//! a single input format for the lifetime of the process.
//!
//! # Example
//!
//! ```
//! use sapp::parser::{JsonLinesParser, ParserBinding};
//!
//! let binding = ParserBinding::of::<JsonLinesParser>();
//! assert_eq!(binding.name(), "json-lines");
//!
//! let mut parser = binding.instantiate();
//! let records = parser.parse(&mut "{\"kind\": \"issue\"}\n".as_bytes()).unwrap();
//! assert_eq!(records.len(), 1);
//! ```

mod json_lines;

pub use json_lines::JsonLinesParser;
pub(crate) use json_lines::parse_line;

use std::fmt;
use std::io::BufRead;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from parsing analysis output.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Reading the input failed.
    #[error("failed to read analysis output: {0}")]
    Io(#[from] std::io::Error),

    /// A line is not valid JSON.
    #[error("line {line}: invalid JSON: {message}")]
    InvalidJson { line: usize, message: String },

    /// A record is missing a required field or has the wrong shape.
    #[error("line {line}: {message}")]
    InvalidRecord { line: usize, message: String },
}

/// A single structured record produced by a parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    /// Record kind (e.g. "issue", "model").
    pub kind: String,
    /// Callable the record belongs to, if any.
    pub callable: Option<String>,
    /// Source file the record refers to, if any.
    pub filename: Option<String>,
    /// The full record as emitted by the analysis tool.
    pub payload: serde_json::Value,
}

/// Trait for analysis output parsers.
pub trait TraceParser {
    /// Stable name of this parser implementation.
    fn name(&self) -> &'static str;

    /// Parse an entire input stream into records.
    fn parse(&mut self, reader: &mut dyn BufRead) -> Result<Vec<TraceRecord>, ParseError>;
}

/// Parser types that can be bound to a session.
pub trait BindableParser: TraceParser + Default + 'static {
    /// Name reported by the binding before any instance exists.
    const NAME: &'static str;
}

fn construct<P: BindableParser>() -> Box<dyn TraceParser> {
    Box::new(P::default())
}

/// Reference to a parser implementation, not an instance of it.
#[derive(Clone, Copy)]
pub struct ParserBinding {
    name: &'static str,
    constructor: fn() -> Box<dyn TraceParser>,
}

impl ParserBinding {
    /// Bind the parser type `P`.
    pub fn of<P: BindableParser>() -> Self {
        Self {
            name: P::NAME,
            constructor: construct::<P>,
        }
    }

    /// Name of the bound parser.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Create a fresh parser instance.
    pub fn instantiate(&self) -> Box<dyn TraceParser> {
        (self.constructor)()
    }
}

impl Default for ParserBinding {
    fn default() -> Self {
        Self::of::<JsonLinesParser>()
    }
}

impl PartialEq for ParserBinding {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ParserBinding {}

impl fmt::Debug for ParserBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ParserBinding").field(&self.name).finish()
    }
}

impl fmt::Display for ParserBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct NullParser;

    impl TraceParser for NullParser {
        fn name(&self) -> &'static str {
            Self::NAME
        }

        fn parse(&mut self, _reader: &mut dyn BufRead) -> Result<Vec<TraceRecord>, ParseError> {
            Ok(Vec::new())
        }
    }

    impl BindableParser for NullParser {
        const NAME: &'static str = "null";
    }

    #[test]
    fn binding_reports_type_name() {
        let binding = ParserBinding::of::<NullParser>();
        assert_eq!(binding.name(), "null");
        assert_eq!(binding.instantiate().name(), "null");
    }

    #[test]
    fn default_binding_is_json_lines() {
        assert_eq!(ParserBinding::default(), ParserBinding::of::<JsonLinesParser>());
        assert_ne!(ParserBinding::default(), ParserBinding::of::<NullParser>());
    }

    #[test]
    fn binding_debug_shows_name() {
        let rendered = format!("{:?}", ParserBinding::of::<JsonLinesParser>());
        assert_eq!(rendered, "ParserBinding(\"json-lines\")");
    }

    #[test]
    fn each_instantiation_is_fresh() {
        let binding = ParserBinding::of::<JsonLinesParser>();
        let mut first = binding.instantiate();
        let mut second = binding.instantiate();

        let a = first.parse(&mut "{\"kind\": \"issue\"}".as_bytes()).unwrap();
        let b = second.parse(&mut "".as_bytes()).unwrap();
        assert_eq!(a.len(), 1);
        assert!(b.is_empty());
    }
}
