//! Splitting a content file into its front matter and markup body.
//!
//! Two fence styles are recognized on the first line of a file:
//! `---` for YAML and `+++` for TOML. A file with no opening fence has an
//! empty front matter and its whole text as the body.

use crate::error::{Error, Result};
use crate::types::RawRecord;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontMatterFormat {
    Yaml,
    Toml,
    /// No front matter block present
    None,
}

impl FrontMatterFormat {
    fn fence(self) -> Option<&'static str> {
        match self {
            FrontMatterFormat::Yaml => Some("---"),
            FrontMatterFormat::Toml => Some("+++"),
            FrontMatterFormat::None => None,
        }
    }
}

/// A content file split into parsed front matter and body
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    pub format: FrontMatterFormat,
    pub front_matter: RawRecord,
    pub body: String,
}

/// Parse a content file's text
pub fn parse_document(source: &str) -> Result<SourceDocument> {
    let (format, block, body) = split_front_matter(source)?;

    let front_matter = match format {
        FrontMatterFormat::Yaml => parse_yaml(block)?,
        FrontMatterFormat::Toml => parse_toml(block)?,
        FrontMatterFormat::None => RawRecord::new(),
    };

    Ok(SourceDocument {
        format,
        front_matter,
        body: body.to_string(),
    })
}

/// Split a file into (format, front matter block, body) without parsing
pub fn split_front_matter(source: &str) -> Result<(FrontMatterFormat, &str, &str)> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    let (first_line, rest) = next_line(source);
    let format = match first_line.trim_end() {
        "---" => FrontMatterFormat::Yaml,
        "+++" => FrontMatterFormat::Toml,
        _ => return Ok((FrontMatterFormat::None, "", source)),
    };
    let Some(fence) = format.fence() else {
        return Ok((FrontMatterFormat::None, "", source));
    };

    let mut offset = 0;
    let mut remaining = rest;
    while !remaining.is_empty() {
        let (line, after) = next_line(remaining);
        if line.trim_end() == fence {
            let block = &rest[..offset];
            return Ok((format, block, after));
        }
        offset += remaining.len() - after.len();
        remaining = after;
    }

    Err(Error::FrontMatter(format!(
        "front matter opened with '{}' is never closed",
        fence
    )))
}

/// Returns the first line (without its terminator) and everything after it
fn next_line(s: &str) -> (&str, &str) {
    match s.find('\n') {
        Some(idx) => (s[..idx].trim_end_matches('\r'), &s[idx + 1..]),
        None => (s, ""),
    }
}

fn parse_yaml(block: &str) -> Result<RawRecord> {
    if block.trim().is_empty() {
        return Ok(RawRecord::new());
    }

    let value: Value = serde_yaml_ng::from_str(block)
        .map_err(|e| Error::FrontMatter(format!("invalid YAML: {}", e)))?;

    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(RawRecord::new()),
        _ => Err(Error::FrontMatter(
            "front matter must be a mapping of field names to values".to_string(),
        )),
    }
}

fn parse_toml(block: &str) -> Result<RawRecord> {
    let table: toml::Table = toml::from_str(block)
        .map_err(|e| Error::FrontMatter(format!("invalid TOML: {}", e)))?;

    Ok(table
        .into_iter()
        .map(|(key, value)| (key, toml_to_json(value)))
        .collect())
}

/// TOML datetimes become strings so they go through the same date coercion
/// as YAML values
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, toml_to_json(value)))
                .collect(),
        ),
    }
}
