mod bounds;
mod builder;
mod detection;
mod error;
mod parser;
mod serializer;
mod tail;
mod value;

/// Positional columns every row carries before the confidence pairs.
pub const ROW_PREFIX_LEN: usize = 9;

pub use bounds::Bounds;
pub use builder::DetectionBuilder;
pub use detection::{Detection, Features, Keypoint, bounds_matrix};
pub use error::{CodecError, RowError};
pub use parser::{parse, parse_row};
pub use serializer::{TrackAttributes, serialize, serialize_detections};
pub use tail::TailToken;
pub use value::{AttributeValue, Attributes};
