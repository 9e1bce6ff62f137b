//! parser::json_lines
//!
//! Newline-delimited JSON reader for analysis output.
//!
//! Each non-blank line holds one JSON object with a string `kind`, and
//! optionally string `callable` and `filename` fields. Everything else on the
//! object is carried through untouched as the record payload.

use std::io::BufRead;

use serde_json::Value;

use super::{BindableParser, ParseError, TraceParser, TraceRecord};

/// Parser for newline-delimited JSON analysis output.
#[derive(Debug, Default)]
pub struct JsonLinesParser;

fn optional_string(
    object: &serde_json::Map<String, Value>,
    key: &str,
    line: usize,
) -> Result<Option<String>, ParseError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ParseError::InvalidRecord {
            line,
            message: format!("'{}' must be a string", key),
        }),
    }
}

/// Convert one parsed JSON value into a record.
fn record_from_value(value: Value, line: usize) -> Result<TraceRecord, ParseError> {
    let object = value.as_object().ok_or_else(|| ParseError::InvalidRecord {
        line,
        message: "expected a JSON object".to_string(),
    })?;

    let kind = match object.get("kind") {
        Some(Value::String(kind)) if !kind.is_empty() => kind.clone(),
        Some(Value::String(_)) => {
            return Err(ParseError::InvalidRecord {
                line,
                message: "'kind' must not be empty".to_string(),
            })
        }
        Some(_) => {
            return Err(ParseError::InvalidRecord {
                line,
                message: "'kind' must be a string".to_string(),
            })
        }
        None => {
            return Err(ParseError::InvalidRecord {
                line,
                message: "missing required field 'kind'".to_string(),
            })
        }
    };

    let callable = optional_string(object, "callable", line)?;
    let filename = optional_string(object, "filename", line)?;

    Ok(TraceRecord {
        kind,
        callable,
        filename,
        payload: value,
    })
}

/// Parse a single line, returning `None` for blank lines.
///
/// Shared with the `lint` command so both report the same problems.
pub(crate) fn parse_line(text: &str, line: usize) -> Result<Option<TraceRecord>, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(trimmed).map_err(|e| ParseError::InvalidJson {
        line,
        message: e.to_string(),
    })?;

    record_from_value(value, line).map(Some)
}

impl TraceParser for JsonLinesParser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(&mut self, reader: &mut dyn BufRead) -> Result<Vec<TraceRecord>, ParseError> {
        let mut records = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if let Some(record) = parse_line(&line, index + 1)? {
                records.push(record);
            }
        }

        tracing::trace!(records = records.len(), "parsed analysis output");
        Ok(records)
    }
}

impl BindableParser for JsonLinesParser {
    const NAME: &'static str = "json-lines";
}
