/// Axis-aligned rectangle in page-pixel coordinates.
///
/// Coordinates use a top-left origin:
/// - `left`: left edge
/// - `top`: top edge (distance from top of page)
/// - `right`: right edge
/// - `bottom`: bottom edge (distance from top of page)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl Rect {
    pub fn new(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Width of the rectangle.
    pub fn width(&self) -> i64 {
        self.right.saturating_sub(self.left)
    }

    /// Height of the rectangle.
    pub fn height(&self) -> i64 {
        self.bottom.saturating_sub(self.top)
    }

    /// Area in square pixels. Degenerate or inverted rectangles have zero area.
    ///
    /// Saturates at `i64::MAX`; use [`area_f64`](Self::area_f64) when the
    /// magnitude matters.
    pub fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.width().saturating_mul(self.height())
        }
    }

    /// Area as a float, exact up to 2^53 and never overflowing.
    pub fn area_f64(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.width() as f64 * self.height() as f64
        }
    }

    /// Returns `true` when the rectangle encloses no area.
    pub fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    /// Compute the intersection of two rectangles, or `None` if they do not overlap.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let r = Rect {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        };
        if r.is_empty() { None } else { Some(r) }
    }

    /// Area shared by the two rectangles (zero when disjoint).
    pub fn intersection_area(&self, other: &Rect) -> i64 {
        self.intersection(other).map_or(0, |r| r.area())
    }

    /// Returns `true` if the rectangles share a non-empty area.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection(other).is_some()
    }

    /// Compute the union (bounding rectangle) of two rectangles.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Clamp the rectangle to `[0, width] x [0, height]`.
    pub fn clip_to(&self, width: i64, height: i64) -> Rect {
        Rect {
            left: self.left.clamp(0, width),
            top: self.top.clamp(0, height),
            right: self.right.clamp(0, width),
            bottom: self.bottom.clamp(0, height),
        }
    }
}
