/// Axis-aligned bounding box of a detection.
///
/// Held in TLBR order `[x1, y1, x2, y2]`. The CSV rows store the same four
/// numbers in a different order, see [`Bounds::from_wire`] and
/// [`Bounds::to_wire`].
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Bounds {
    /// Top-left x coordinate
    pub x1: f64,
    /// Top-left y coordinate
    pub y1: f64,
    /// Bottom-right x coordinate
    pub x2: f64,
    /// Bottom-right y coordinate
    pub y2: f64,
}

impl Bounds {
    /// Create bounds from TLBR coordinates.
    #[inline]
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create bounds from the wire column order: min-x, max-x, min-y, max-y.
    #[inline]
    pub fn from_wire(columns: [f64; 4]) -> Self {
        let [min_x, max_x, min_y, max_y] = columns;
        Self::new(min_x, min_y, max_x, max_y)
    }

    /// Columns in wire order: min-x, max-x, min-y, max-y.
    #[inline]
    pub fn to_wire(&self) -> [f64; 4] {
        [self.x1, self.x2, self.y1, self.y2]
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [f64; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    /// Convert to TLWH format: (x, y, width, height).
    #[inline]
    pub fn to_tlwh(&self) -> [f64; 4] {
        [self.x1, self.y1, self.width(), self.height()]
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Get the center point of the bounding box.
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// Get the area of the bounding box. Inverted boxes are not rejected.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}

impl From<[f64; 4]> for Bounds {
    fn from(tlbr: [f64; 4]) -> Self {
        let [x1, y1, x2, y2] = tlbr;
        Self::new(x1, y1, x2, y2)
    }
}

impl From<Bounds> for [f64; 4] {
    fn from(bounds: Bounds) -> Self {
        bounds.to_tlbr()
    }
}
