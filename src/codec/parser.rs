//! Rows to detections.

use std::str::FromStr;

use crate::codec::ROW_PREFIX_LEN;
use crate::codec::bounds::Bounds;
use crate::codec::detection::{Detection, Features};
use crate::codec::error::{CodecError, RowError};
use crate::codec::tail::{TAG_OPEN, TailToken};
use crate::codec::value::Attributes;

/// Lines starting with this are comments.
const COMMENT_PREFIX: char = '#';

/// Parse a whole annotation blob into detections, in row order.
///
/// Comment lines starting with `#` and blank lines are skipped. The first
/// bad row aborts the parse. Each line is one row; quoted columns may
/// contain commas but not line breaks.
pub fn parse(text: &str) -> Result<Vec<Detection>, CodecError> {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(false).flexible(true);

    let mut detections = Vec::new();
    let mut record = csv::StringRecord::new();
    for (idx, raw) in text.split('\n').enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
            continue;
        }
        let mut reader = builder.from_reader(line.as_bytes());
        if !reader.read_record(&mut record)? {
            continue;
        }
        let fields: Vec<&str> = record.iter().collect();
        let detection = parse_row(&fields).map_err(|source| CodecError::Row {
            line: idx as u64 + 1,
            source,
        })?;
        detections.push(detection);
    }
    Ok(detections)
}

/// Decode one row that has already been split into columns.
pub fn parse_row(fields: &[&str]) -> Result<Detection, RowError> {
    if fields.len() < ROW_PREFIX_LEN {
        return Err(RowError::TooShort {
            found: fields.len(),
        });
    }

    // Column 1 is reserved and ignored.
    let track = parse_number(fields, 0, "track")?;
    let frame = parse_number(fields, 2, "frame")?;
    let bounds = Bounds::from_wire([
        parse_number(fields, 3, "min x")?,
        parse_number(fields, 4, "max x")?,
        parse_number(fields, 5, "min y")?,
        parse_number(fields, 6, "max y")?,
    ]);
    let confidence = parse_number(fields, 7, "confidence")?;
    let fish_length = parse_number(fields, 8, "fish length")?;

    let (confidence_pairs, tag_start) = scan_pairs(fields, ROW_PREFIX_LEN)?;

    let mut features = Features::new();
    let mut attributes = Attributes::new();
    let mut track_attributes = Attributes::new();
    for token in &fields[tag_start..] {
        match TailToken::parse(token)? {
            TailToken::Keypoint { kind, x, y } => {
                features.insert(kind, (x, y));
            }
            TailToken::Attribute { name, value } => {
                attributes.insert(name, value);
            }
            TailToken::TrackAttribute { name, value } => {
                track_attributes.insert(name, value);
            }
            TailToken::Ignored => {}
        }
    }

    Ok(Detection {
        track,
        frame,
        bounds,
        confidence,
        fish_length,
        confidence_pairs,
        features,
        attributes: (!attributes.is_empty()).then_some(attributes),
        track_attributes: (!track_attributes.is_empty()).then_some(track_attributes),
    })
}

/// Collect `(label, score)` pairs from `start` until the first tagged
/// column or the end of the row. Returns the pairs and the stop index.
fn scan_pairs(fields: &[&str], start: usize) -> Result<(Vec<(String, f64)>, usize), RowError> {
    let mut pairs = Vec::new();
    let mut index = start;
    while index < fields.len() && !fields[index].starts_with(TAG_OPEN) {
        let score = parse_number(fields, index + 1, "score")?;
        pairs.push((fields[index].to_string(), score));
        index += 2;
    }
    Ok((pairs, index))
}

fn parse_number<T: FromStr>(
    fields: &[&str],
    index: usize,
    field: &'static str,
) -> Result<T, RowError> {
    let value = fields.get(index).copied().unwrap_or_default();
    value.trim().parse().map_err(|_| RowError::NumberFormat {
        index,
        field,
        value: value.to_string(),
    })
}
