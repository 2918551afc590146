//! Loosely typed attribute values and their text form.

use std::collections::BTreeMap;
use std::fmt;

/// Attribute name to value mapping, used for both frame and track attributes.
pub type Attributes = BTreeMap<String, AttributeValue>;

/// A coerced attribute value.
///
/// Serializes untagged, so JSON sees a plain boolean, number or string.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl AttributeValue {
    /// Infer the value type of a token.
    ///
    /// The exact literals `true` and `false` become booleans, anything that
    /// parses as a float becomes a number, everything else stays text.
    pub fn coerce(token: &str) -> Self {
        match token {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => match token.trim().parse::<f64>() {
                Ok(number) => Self::Number(number),
                Err(_) => Self::Text(token.to_string()),
            },
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Renders the token that [`AttributeValue::coerce`] reads back.
impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => f.write_str("true"),
            Self::Bool(false) => f.write_str("false"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}
