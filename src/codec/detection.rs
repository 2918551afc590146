//! In-memory detection model.

use std::collections::BTreeMap;
use std::fmt;

use ndarray::Array2;

use crate::codec::bounds::Bounds;
use crate::codec::value::Attributes;

/// Named keypoints a detection may carry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Keypoint {
    Head,
    Tail,
}

impl Keypoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Tail => "tail",
        }
    }
}

impl fmt::Display for Keypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keypoint coordinates, kept as the integer-like text found on the row.
pub type Features = BTreeMap<Keypoint, (String, String)>;

/// One observation of one tracked object in one frame.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    /// Track identifier, shared by every frame of the same object
    pub track: u64,
    /// Frame index
    pub frame: u64,
    /// Bounding box in TLBR format (x1, y1, x2, y2)
    pub bounds: Bounds,
    /// Overall detection confidence
    pub confidence: f64,
    /// Domain scalar, passed through untouched
    pub fish_length: f64,
    /// Classifier `(label, score)` pairs in row order
    #[serde(default)]
    pub confidence_pairs: Vec<(String, f64)>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub features: Features,
    /// Frame-scoped attributes, `None` when the row had none
    #[serde(default)]
    pub attributes: Option<Attributes>,
    /// Track-scoped attributes, `None` when the row had none
    #[serde(default)]
    pub track_attributes: Option<Attributes>,
}

impl Detection {
    /// Create a detection with no pairs, keypoints or attributes.
    pub fn new(track: u64, frame: u64, bounds: Bounds, confidence: f64, fish_length: f64) -> Self {
        Self {
            track,
            frame,
            bounds,
            confidence,
            fish_length,
            confidence_pairs: Vec::new(),
            features: Features::new(),
            attributes: None,
            track_attributes: None,
        }
    }

    /// Frame attributes, treating an empty map like an absent one.
    pub fn attributes(&self) -> Option<&Attributes> {
        self.attributes.as_ref().filter(|a| !a.is_empty())
    }

    /// Track attributes, treating an empty map like an absent one.
    pub fn track_attributes(&self) -> Option<&Attributes> {
        self.track_attributes.as_ref().filter(|a| !a.is_empty())
    }

    /// Highest scoring confidence pair, if any.
    pub fn best_pair(&self) -> Option<(&str, f64)> {
        self.confidence_pairs
            .iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(label, score)| (label.as_str(), *score))
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Features, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let features: Option<Features> = serde::Deserialize::deserialize(deserializer)?;
    Ok(features.unwrap_or_default())
}

/// Stack the bounds of `detections` into an (N, 4) matrix of TLBR rows.
pub fn bounds_matrix(detections: &[Detection]) -> Array2<f64> {
    let mut matrix = Array2::zeros((detections.len(), 4));
    for (i, det) in detections.iter().enumerate() {
        for (j, value) in det.bounds.to_tlbr().into_iter().enumerate() {
            matrix[[i, j]] = value;
        }
    }
    matrix
}
