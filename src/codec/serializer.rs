//! Detections to rows.

use std::collections::BTreeMap;

use crate::codec::detection::Detection;
use crate::codec::error::CodecError;
use crate::codec::tail::{ATTRIBUTE_TAG, KEYPOINT_TAG, TRACK_ATTRIBUTE_TAG};
use crate::codec::value::Attributes;

/// Track attributes supplied separately from the detections, keyed by track.
pub type TrackAttributes = BTreeMap<u64, Attributes>;

/// Rough row width used to pre-size the output buffer.
const ROW_SIZE_HINT: usize = 64;

/// Serialize detections into newline-terminated rows.
///
/// Rows are written in ascending track order; detections sharing a track
/// keep their relative input order. Track attributes are written only on
/// the last row of each track, taken from `track_attributes` when it has an
/// entry for the track and from that row's own `track_attributes`
/// otherwise.
///
/// Values are written as is, so some detections do not read back intact:
/// an empty text attribute value fails to parse as `MalformedTag`, a name
/// containing whitespace splits differently, and a confidence label
/// starting with `(` ends the pairs early.
pub fn serialize(
    detections: &[Detection],
    track_attributes: &TrackAttributes,
) -> Result<String, CodecError> {
    if detections.is_empty() {
        return Err(CodecError::EmptyInput);
    }

    let mut ordered: Vec<&Detection> = detections.iter().collect();
    ordered.sort_by_key(|d| d.track);

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::with_capacity(detections.len() * ROW_SIZE_HINT));

    let mut record = csv::StringRecord::new();
    for (idx, det) in ordered.iter().enumerate() {
        let last_of_track = ordered
            .get(idx + 1)
            .is_none_or(|next| next.track != det.track);
        let trailing = if last_of_track {
            track_attributes
                .get(&det.track)
                .filter(|a| !a.is_empty())
                .or_else(|| det.track_attributes())
        } else {
            None
        };

        fill_record(&mut record, det, trailing);
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CodecError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Serialize using only the track attributes carried by the detections.
pub fn serialize_detections(detections: &[Detection]) -> Result<String, CodecError> {
    serialize(detections, &TrackAttributes::new())
}

fn fill_record(
    record: &mut csv::StringRecord,
    det: &Detection,
    track_attributes: Option<&Attributes>,
) {
    record.clear();
    record.push_field(&det.track.to_string());
    record.push_field("");
    record.push_field(&det.frame.to_string());
    for value in det.bounds.to_wire() {
        record.push_field(&value.to_string());
    }
    record.push_field(&det.confidence.to_string());
    record.push_field(&det.fish_length.to_string());

    for (label, score) in &det.confidence_pairs {
        record.push_field(label);
        record.push_field(&score.to_string());
    }
    for (kind, (x, y)) in &det.features {
        record.push_field(&format!("{KEYPOINT_TAG} {kind} {x} {y}"));
    }
    if let Some(attributes) = det.attributes() {
        for (name, value) in attributes {
            record.push_field(&format!("{ATTRIBUTE_TAG} {name} {value}"));
        }
    }
    if let Some(attributes) = track_attributes {
        for (name, value) in attributes {
            record.push_field(&format!("{TRACK_ATTRIBUTE_TAG} {name} {value}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::bounds::Bounds;
    use crate::codec::detection::Keypoint;
    use crate::codec::value::AttributeValue;

    fn det(track: u64, frame: u64) -> Detection {
        Detection::new(track, frame, Bounds::new(1.0, 2.0, 3.0, 4.0), 0.9, 0.0)
    }

    fn attrs(name: &str, value: impl Into<AttributeValue>) -> Attributes {
        let mut attributes = Attributes::new();
        attributes.insert(name.to_string(), value.into());
        attributes
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            serialize(&[], &TrackAttributes::new()),
            Err(CodecError::EmptyInput)
        ));
    }

    #[test]
    fn test_bounds_written_in_wire_order() {
        let text = serialize_detections(&[det(0, 0)]).unwrap();
        assert_eq!(text, "0,,0,1,3,2,4,0.9,0\n");
    }

    #[test]
    fn test_track_attributes_on_last_row_only() {
        let mut dets = vec![det(1, 0), det(1, 1), det(2, 0)];
        for d in &mut dets {
            d.track_attributes = Some(attrs("species", "cod"));
        }
        let text = serialize_detections(&dets).unwrap();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 3);
        assert!(!rows[0].contains("(trk-atr)"));
        assert!(rows[1].ends_with(",(trk-atr) species cod"));
        assert!(rows[2].ends_with(",(trk-atr) species cod"));
    }

    #[test]
    fn test_sort_is_stable_by_track() {
        let dets = vec![det(5, 0), det(2, 9), det(5, 1), det(2, 3)];
        let text = serialize_detections(&dets).unwrap();
        let order: Vec<(&str, &str)> = text
            .lines()
            .map(|row| {
                let mut cols = row.split(',');
                let track = cols.next().unwrap();
                let frame = cols.nth(1).unwrap();
                (track, frame)
            })
            .collect();
        assert_eq!(order, vec![("2", "9"), ("2", "3"), ("5", "0"), ("5", "1")]);
    }

    #[test]
    fn test_supplied_track_attributes_win() {
        let mut d = det(7, 0);
        d.track_attributes = Some(attrs("species", "cod"));
        let mut supplied = TrackAttributes::new();
        supplied.insert(7, attrs("species", "haddock"));

        let text = serialize(&[d], &supplied).unwrap();
        assert!(text.contains("(trk-atr) species haddock"));
        assert!(!text.contains("cod"));
    }

    #[test]
    fn test_tail_columns() {
        let mut d = det(0, 0);
        d.confidence_pairs = vec![("catB".into(), 0.3), ("catA".into(), 0.5)];
        d.features.insert(Keypoint::Tail, ("9".into(), "8".into()));
        d.features.insert(Keypoint::Head, ("1".into(), "2".into()));
        d.attributes = Some(attrs("schooling", true));

        let text = serialize_detections(&[d]).unwrap();
        assert_eq!(
            text,
            "0,,0,1,3,2,4,0.9,0,catB,0.3,catA,0.5,(kp) head 1 2,(kp) tail 9 8,(atr) schooling true\n"
        );
    }

    #[test]
    fn test_empty_attribute_maps_are_skipped() {
        let mut d = det(0, 0);
        d.attributes = Some(Attributes::new());
        d.track_attributes = Some(Attributes::new());
        assert_eq!(serialize_detections(&[d]).unwrap(), "0,,0,1,3,2,4,0.9,0\n");
    }

    #[test]
    fn test_quotes_columns_with_delimiter() {
        let mut d = det(0, 0);
        d.attributes = Some(attrs("note", "a, b"));
        let text = serialize_detections(&[d]).unwrap();
        assert!(text.ends_with(",\"(atr) note a, b\"\n"));
    }

    #[test]
    fn test_values_that_do_not_read_back() {
        use crate::codec::error::RowError;
        use crate::codec::parser::parse;

        let mut d = det(0, 0);
        d.attributes = Some(attrs("note", ""));
        let text = serialize_detections(&[d]).unwrap();
        assert!(text.ends_with(",(atr) note \n"));
        assert!(matches!(
            parse(&text),
            Err(CodecError::Row {
                source: RowError::MalformedTag { .. },
                ..
            })
        ));

        let mut d = det(0, 0);
        d.confidence_pairs = vec![("(x)".into(), 0.5)];
        let parsed = parse(&serialize_detections(&[d]).unwrap()).unwrap();
        assert!(parsed[0].confidence_pairs.is_empty());

        let mut d = det(0, 0);
        d.attributes = Some(attrs("fin colour", "red"));
        let parsed = parse(&serialize_detections(&[d]).unwrap()).unwrap();
        assert_eq!(
            parsed[0].attributes.as_ref().unwrap()["fin"],
            AttributeValue::Text("colour red".into())
        );
    }
}
