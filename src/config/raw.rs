//! Loosely-typed input values as they arrive from fact and parameter files.
use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

/// A single untyped value from a facts or parameters file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// `true` / `false`.
    Bool(bool),
    /// Whole number.
    Integer(i64),
    /// Floating point number (e.g. an unquoted `10.04` release).
    Float(f64),
    /// Any string.
    Text(String),
    /// Ordered sequence of values.
    List(Vec<Self>),
    /// Nested key-value table.
    Table(BTreeMap<String, Self>),
}

/// An unstructured key-value input, ordered by key.
pub type RawInput = BTreeMap<String, RawValue>;

impl RawValue {
    /// Return the scalar rendering of this value, or `None` for lists and tables.
    #[must_use]
    pub fn scalar(&self) -> Option<String> {
        match self {
            Self::Bool(b) => Some(b.to_string()),
            Self::Integer(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::Text(s) => Some(s.clone()),
            Self::List(_) | Self::Table(_) => None,
        }
    }

    /// Return the string content if this value is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Interpret the value as a boolean.
    ///
    /// Accepts real booleans and the literal strings `"true"` / `"false"`;
    /// truthy spellings such as `"yes"` are rejected.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Text(s) if s == "true" => Some(true),
            Self::Text(s) if s == "false" => Some(false),
            _ => None,
        }
    }

    /// Coerce a scalar-or-sequence value into an ordered list of strings.
    ///
    /// A bare string becomes a one-element list (an empty string becomes an
    /// empty list); list order and duplicates are kept. Returns `None` if the
    /// value or any element is not a string.
    #[must_use]
    pub fn to_string_list(&self) -> Option<Vec<String>> {
        match self {
            Self::Text(s) if s.is_empty() => Some(Vec::new()),
            Self::Text(s) => Some(vec![s.clone()]),
            Self::List(items) => items
                .iter()
                .map(|item| item.as_text().map(String::from))
                .collect(),
            _ => None,
        }
    }

    /// Return the nested table if this value is one.
    #[must_use]
    pub const fn as_table(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Table(t) => Some(t),
            _ => None,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Self::Table(_) => write!(f, "{{table}}"),
            other => write!(f, "{}", other.scalar().unwrap_or_default()),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<&str>> for RawValue {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(Self::from).collect())
    }
}
