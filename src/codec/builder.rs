//! Builder for creating Detection values field by field.

use crate::codec::bounds::Bounds;
use crate::codec::detection::{Detection, Keypoint};
use crate::codec::value::{AttributeValue, Attributes};

/// Builder for creating `Detection` values.
#[derive(Debug, Clone, Default)]
pub struct DetectionBuilder {
    detection: Detection,
}

impl DetectionBuilder {
    /// Create a new detection builder.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(mut self, track: u64) -> Self {
        self.detection.track = track;
        self
    }

    pub fn frame(mut self, frame: u64) -> Self {
        self.detection.frame = frame;
        self
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        self.detection.bounds = Bounds::new(x1, y1, x2, y2);
        self
    }

    /// Set bounding box in TLWH format (x, y, width, height).
    pub fn tlwh(mut self, x: f64, y: f64, w: f64, h: f64) -> Self {
        self.detection.bounds = Bounds::new(x, y, x + w, y + h);
        self
    }

    /// Set the overall confidence score.
    pub fn confidence(mut self, confidence: f64) -> Self {
        self.detection.confidence = confidence;
        self
    }

    pub fn fish_length(mut self, fish_length: f64) -> Self {
        self.detection.fish_length = fish_length;
        self
    }

    /// Append a classifier pair; pairs keep insertion order.
    pub fn pair(mut self, label: impl Into<String>, score: f64) -> Self {
        self.detection.confidence_pairs.push((label.into(), score));
        self
    }

    pub fn keypoint(mut self, kind: Keypoint, x: u32, y: u32) -> Self {
        self.detection
            .features
            .insert(kind, (x.to_string(), y.to_string()));
        self
    }

    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.detection
            .attributes
            .get_or_insert_with(Attributes::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn track_attribute(
        mut self,
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.detection
            .track_attributes
            .get_or_insert_with(Attributes::new)
            .insert(name.into(), value.into());
        self
    }

    /// Build the final `Detection`.
    pub fn build(self) -> Detection {
        self.detection
    }
}
