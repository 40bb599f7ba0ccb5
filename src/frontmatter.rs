//! Splitting and normalizing YAML front-matter.
//!
//! Source files optionally begin with a front-matter block delimited by
//! lines of `---`. The YAML inside is heterogeneous (tags may be a list, a
//! single string, or missing entirely; titles may not be strings at all),
//! so every coercion lives here, in one place, and downstream code only
//! ever sees the canonical [`Frontmatter`] shape.

use std::collections::HashSet;
use std::fmt;

use serde_json::Value;
use serde_yaml::Value as Yaml;

use crate::sanitize::{self, JsonMap};

const FENCE: &str = "---";

/// Splits a source file's text into its front-matter block and body.
///
/// The block is delimited by a first line of exactly `---` and a later line
/// of `---`; the body starts on the line after the closing fence. A file
/// with no opening fence has no front-matter and the entire text is the
/// body. An opening fence without a closing fence is an error.
pub fn split(input: &str) -> Result<(Option<&str>, &str)> {
    let first = match input.find('\n') {
        Some(i) => &input[..i],
        None => input,
    };
    if !is_fence(first) {
        return Ok((None, input));
    }

    let rest = &input[first.len()..];
    let rest = rest.strip_prefix("\n").unwrap_or(rest);
    let mut consumed = 0;
    while consumed < rest.len() {
        let remaining = &rest[consumed..];
        let (line, line_len) = match remaining.find('\n') {
            Some(i) => (&remaining[..i], i + 1),
            None => (remaining, remaining.len()),
        };
        if is_fence(line) {
            return Ok((Some(&rest[..consumed]), &rest[consumed + line_len..]));
        }
        consumed += line_len;
    }
    Err(Error::MissingEndFence)
}

fn is_fence(line: &str) -> bool {
    line.trim_end_matches('\r') == FENCE
}

/// The canonical front-matter record. Every article carries one of these; no
/// field is ever a surprise shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    /// The article title; empty when absent or not a string.
    pub title: String,

    /// Free-text description, if any. Scalars are stringified.
    pub description: Option<String>,

    /// The raw `date` scalar, preserved for date derivation.
    pub date: Option<String>,

    /// Image identifier for the article card, if any.
    pub featured_image: Option<String>,

    /// Alt text for the featured image, if any.
    pub alt: Option<String>,

    /// Tags, always a list: trimmed, non-empty, deduplicated by first
    /// occurrence. A bare `tags: paleo` becomes `["paleo"]`.
    pub tags: Vec<String>,

    /// Categories; same rules as tags.
    pub categories: Vec<String>,

    /// All remaining fields, converted to JSON-safe values verbatim.
    pub extra: JsonMap,
}

/// Parses a front-matter block into a [`Frontmatter`]. An empty block yields
/// the default record; invalid YAML is an error (which the pipeline absorbs
/// into a placeholder article).
pub fn parse(yaml: &str) -> Result<Frontmatter> {
    if yaml.trim().is_empty() {
        return Ok(Frontmatter::default());
    }
    let value: Yaml = serde_yaml::from_str(yaml)?;
    Ok(normalize(value))
}

/// Coerces a parsed YAML value into the canonical record. Never fails: junk
/// fields degrade to their defaults instead.
pub fn normalize(value: Yaml) -> Frontmatter {
    let mut fields = sanitize::from_yaml_mapping(&value);

    let title = match fields.remove("title") {
        Some(Value::String(s)) => s,
        _ => String::new(),
    };
    let description = fields.remove("description").and_then(stringify);
    let date = fields.remove("date").and_then(stringify);
    let featured_image = fields.remove("featured_image").and_then(string_only);
    let alt = fields.remove("alt").and_then(string_only);
    let tags = string_list(fields.remove("tags"));
    let categories = string_list(fields.remove("categories"));

    Frontmatter {
        title,
        description,
        date,
        featured_image,
        alt,
        tags,
        categories,
        extra: fields,
    }
}

fn stringify(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Null => None,
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => serde_json::to_string(&other).ok(),
    }
}

fn string_only(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        _ => None,
    }
}

fn string_list(value: Option<Value>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in sanitize::ensure_list(value.as_ref()) {
        if let Value::String(s) = item {
            let trimmed = s.trim();
            if !trimmed.is_empty() && seen.insert(trimmed.to_owned()) {
                out.push(trimmed.to_owned());
            }
        }
    }
    out
}

/// Represents the result of a front-matter operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error splitting or parsing front-matter.
#[derive(Debug)]
pub enum Error {
    /// Returned when a source file opens a front-matter fence (`---`) but
    /// never closes it.
    MissingEndFence,

    /// Returned when the front-matter block is not valid YAML.
    Yaml(serde_yaml::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingEndFence => write!(f, "Missing closing `---`"),
            Error::Yaml(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MissingEndFence => None,
            Error::Yaml(err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::Yaml(err)
    }
}
