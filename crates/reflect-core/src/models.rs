//! Data models for Reflect
//!
//! Defines the journal `Entry`, the caller-supplied `EntryDraft`, and the
//! `Placement` policy used when a new entry joins the collection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Title given to entries created without one
pub const DEFAULT_TITLE: &str = "New Entry";

/// Source tag for entries written by the command-line tool
pub const CLI_SOURCE: &str = "cli";

/// Source tag for entries written through the HTTP API
pub const SERVER_SOURCE: &str = "server";

/// Entry identifier: milliseconds since the Unix epoch at creation
///
/// Stored as a JSON number. Numeric strings are accepted on read so that ids
/// written by hand or by older tools compare equal to their numeric form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(pub i64);

impl EntryId {
    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EntryId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Error returned when text is not a valid entry id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEntryIdError(String);

impl fmt::Display for ParseEntryIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid entry id: '{}'", self.0)
    }
}

impl std::error::Error for ParseEntryIdError {}

impl FromStr for EntryId {
    type Err = ParseEntryIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(EntryId)
            .map_err(|_| ParseEntryIdError(s.to_string()))
    }
}

impl Serialize for EntryId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for EntryId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Float(f64),
            Text(String),
            Null(()),
        }

        // Anything that isn't a usable number reads as 0, like a missing id.
        let id = match RawId::deserialize(deserializer)? {
            RawId::Int(n) => n,
            RawId::Float(f) => f as i64,
            RawId::Text(s) => s.parse::<EntryId>().map(|id| id.0).unwrap_or(0),
            RawId::Null(()) => 0,
        };
        Ok(EntryId(id))
    }
}

/// A single journal entry
///
/// Missing, null or non-text fields read as empty values; numbers and
/// booleans read as their text. Fields this version doesn't know
/// about are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    /// Creation time in milliseconds, used as the identifier
    #[serde(default)]
    pub id: EntryId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub content: String,
    /// Calendar date captured at creation, already formatted
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: String,
    /// Clock time captured at creation, already formatted
    #[serde(default, deserialize_with = "lenient_text")]
    pub time: String,
    /// Which access path created the entry
    #[serde(default, deserialize_with = "lenient_text")]
    pub source: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Read a text field without rejecting the whole entry over its type
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

/// Caller-supplied fields for a new entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDraft {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl EntryDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: Some(content.into()),
        }
    }

    /// Title to store, falling back to `DEFAULT_TITLE`
    pub fn title_or_default(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_string())
    }

    /// Content to store; a missing body is an empty string
    pub fn content_or_default(&self) -> String {
        self.content.clone().unwrap_or_default()
    }
}

/// Where a newly appended entry goes in the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Most recent first
    Front,
    /// Most recent last
    Back,
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placement::Front => write!(f, "front"),
            Placement::Back => write!(f, "back"),
        }
    }
}

impl FromStr for Placement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front" => Ok(Placement::Front),
            "back" => Ok(Placement::Back),
            other => Err(format!(
                "invalid placement '{}': expected 'front' or 'back'",
                other
            )),
        }
    }
}
