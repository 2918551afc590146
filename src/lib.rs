//! Reader and writer for VIAME-style track detection CSV.
//!
//! Each row holds one detection: nine positional columns, classifier
//! `(label, score)` pairs, then tagged keypoint and attribute columns.
//! [`parse`] turns a text blob into [`Detection`] values and [`serialize`]
//! writes them back, grouping rows by track.

pub mod codec;
pub mod store;

pub use codec::{
    AttributeValue, Attributes, Bounds, CodecError, Detection, DetectionBuilder, Keypoint,
    RowError, TrackAttributes, parse, serialize,
};
pub use store::{AnnotationService, AnnotationStore, MemoryStore, ServiceConfig};
