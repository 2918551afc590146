//! Tagged columns following the confidence pairs.

use std::sync::OnceLock;

use regex::Regex;

use crate::codec::detection::Keypoint;
use crate::codec::error::RowError;
use crate::codec::value::AttributeValue;

pub const KEYPOINT_TAG: &str = "(kp)";
pub const ATTRIBUTE_TAG: &str = "(atr)";
pub const TRACK_ATTRIBUTE_TAG: &str = "(trk-atr)";

/// First byte of every tagged column; ends the confidence pairs.
pub const TAG_OPEN: char = '(';

/// One column of the tagged region.
#[derive(Debug, Clone, PartialEq)]
pub enum TailToken {
    Keypoint {
        kind: Keypoint,
        x: String,
        y: String,
    },
    Attribute {
        name: String,
        value: AttributeValue,
    },
    TrackAttribute {
        name: String,
        value: AttributeValue,
    },
    /// Unknown shapes and keypoints that do not match are dropped.
    Ignored,
}

impl TailToken {
    /// Classify a column by its tag prefix.
    ///
    /// Only attribute columns can fail: a tag without both a name and a
    /// value is a [`RowError::MalformedTag`].
    pub fn parse(token: &str) -> Result<Self, RowError> {
        if token.starts_with(KEYPOINT_TAG) {
            Ok(parse_keypoint(token))
        } else if let Some(rest) = token.strip_prefix(ATTRIBUTE_TAG) {
            let (name, value) = split_attribute(token, rest)?;
            Ok(Self::Attribute { name, value })
        } else if let Some(rest) = token.strip_prefix(TRACK_ATTRIBUTE_TAG) {
            let (name, value) = split_attribute(token, rest)?;
            Ok(Self::TrackAttribute { name, value })
        } else {
            Ok(Self::Ignored)
        }
    }
}

fn keypoint_regex() -> &'static Regex {
    static KEYPOINT: OnceLock<Regex> = OnceLock::new();
    KEYPOINT.get_or_init(|| {
        Regex::new(r"^\(kp\) (head|tail) ([0-9]+) ([0-9]+)")
            .expect("keypoint regex must compile")
    })
}

fn parse_keypoint(token: &str) -> TailToken {
    let Some(caps) = keypoint_regex().captures(token) else {
        return TailToken::Ignored;
    };
    let kind = match &caps[1] {
        "head" => Keypoint::Head,
        _ => Keypoint::Tail,
    };
    TailToken::Keypoint {
        kind,
        x: caps[2].to_string(),
        y: caps[3].to_string(),
    }
}

/// Split `<tag> <name> <value...>`; the value keeps its inner words.
fn split_attribute(token: &str, rest: &str) -> Result<(String, AttributeValue), RowError> {
    let malformed = || RowError::MalformedTag {
        token: token.to_string(),
    };
    if !rest.starts_with(char::is_whitespace) {
        return Err(malformed());
    }
    let mut words = rest.split_whitespace();
    let name = words.next().ok_or_else(malformed)?;
    let value = words.collect::<Vec<_>>().join(" ");
    if value.is_empty() {
        return Err(malformed());
    }
    Ok((name.to_string(), AttributeValue::coerce(&value)))
}
