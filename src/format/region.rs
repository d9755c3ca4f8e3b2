//! Normalized bounding regions stored with each annotation.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in normalized XYWH form.
///
/// `(x, y)` is the top-left corner and `width`/`height` the extent, all as
/// fractions of the image dimensions. A well-formed region lies inside the
/// unit square.
///
/// Note: This type does NOT enforce the unit-square constraint in its
/// constructors. Decoding applies the configured
/// [`AnnotationPolicy`](super::AnnotationPolicy) and validation reports the
/// rest, so out-of-range regions can still be represented and inspected.
#[derive(Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Region {
    /// Number of bytes a region occupies on disk.
    pub const ENCODED_LEN: usize = 16;

    /// Creates a region from its top-left corner and extent.
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a region from corner coordinates (xmin, ymin, xmax, ymax).
    #[inline]
    pub fn from_xyxy(xmin: f32, ymin: f32, xmax: f32, ymax: f32) -> Self {
        Self::new(xmin, ymin, xmax - xmin, ymax - ymin)
    }

    /// Returns the maximum x coordinate.
    #[inline]
    pub fn xmax(&self) -> f32 {
        self.x + self.width
    }

    /// Returns the maximum y coordinate.
    #[inline]
    pub fn ymax(&self) -> f32 {
        self.y + self.height
    }

    /// Returns the area of the region.
    ///
    /// May be negative if the region is malformed.
    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Returns true if all components are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }

    /// Returns how far the region strays outside the unit square.
    ///
    /// Zero for a well-formed region. Negative extents count as excess too.
    /// Only meaningful for finite regions.
    pub fn range_excess(&self) -> f32 {
        let below = [-self.x, -self.y, -self.width, -self.height];
        let above = [self.x - 1.0, self.y - 1.0, self.xmax() - 1.0, self.ymax() - 1.0];

        below
            .into_iter()
            .chain(above)
            .fold(0.0_f32, f32::max)
    }

    /// Returns true if the region lies entirely inside the unit square.
    #[inline]
    pub fn is_within_unit_square(&self) -> bool {
        self.is_finite() && self.range_excess() == 0.0
    }

    pub(crate) fn to_bytes(self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        for (chunk, value) in out
            .chunks_exact_mut(4)
            .zip([self.x, self.y, self.width, self.height])
        {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        out
    }
}

impl std::fmt::Debug for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Region")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("w", &self.width)
            .field("h", &self.height)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_from_xyxy() {
        let region = Region::from_xyxy(0.25, 0.5, 0.75, 1.0);
        assert_eq!(region.x, 0.25);
        assert_eq!(region.y, 0.5);
        assert_eq!(region.width, 0.5);
        assert_eq!(region.height, 0.5);
        assert_eq!(region.xmax(), 0.75);
        assert_eq!(region.ymax(), 1.0);
        assert_eq!(region.area(), 0.25);
    }

    #[test]
    fn test_range_excess() {
        assert_eq!(Region::new(0.1, 0.1, 0.5, 0.5).range_excess(), 0.0);
        assert_eq!(Region::new(0.0, 0.0, 1.0, 1.0).range_excess(), 0.0);

        let negative_width = Region::new(0.5, 0.5, -0.25, 0.1);
        assert_eq!(negative_width.range_excess(), 0.25);

        let overflowing = Region::new(0.5, 0.5, 0.75, 0.25);
        assert_eq!(overflowing.range_excess(), 0.25);
        assert!(!overflowing.is_within_unit_square());
    }

    #[test]
    fn test_non_finite_region() {
        let region = Region::new(f32::NAN, 0.0, 0.5, 0.5);
        assert!(!region.is_finite());
        assert!(!region.is_within_unit_square());
    }

    #[test]
    fn test_to_bytes_layout() {
        let bytes = Region::new(1.0, 0.0, 0.5, 0.25).to_bytes();
        assert_eq!(&bytes[0..4], &1.0f32.to_le_bytes());
        assert_eq!(&bytes[8..12], &0.5f32.to_le_bytes());
        assert_eq!(&bytes[12..16], &0.25f32.to_le_bytes());
    }
}
