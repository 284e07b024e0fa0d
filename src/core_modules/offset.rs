// THEORY:
// The `OffsetFeature` samples a spatial neighbor. For sample `i` it asks "what is the
// value of channel `j` at the pixel `(offset_x, offset_y)` away from me?" This lets a
// per-pixel classifier see context without anyone building a shifted copy of the
// data.
//
// Key architectural principles:
// 1.  **Local Coordinates**: The sample index is first reduced to its stacked image
//     and local (x, y), so the shift happens on the 2D grid rather than in the flat
//     row order.
// 2.  **Clamp, Don't Fail**: A neighbor beyond the border resolves to the nearest
//     border pixel. This is a deliberate simplification.
// 3.  **Never Cross Images**: The shifted target is recomposed inside the same
//     image block as the source sample.

use crate::core_modules::feature::{FeatureBase, FeatureScalar, FeatureView};
use crate::core_modules::image_shape::ImageShape;
use ndarray::ArrayView2;

/// Reads the value at a fixed spatial offset from each sample.
#[derive(Debug, Clone, Copy)]
pub struct OffsetFeature<'a, T> {
    base: FeatureBase<'a, T>,
    /// Horizontal displacement in pixels. Positive is to the right.
    pub offset_x: isize,
    /// Vertical displacement in pixels. Positive is downward.
    pub offset_y: isize,
}

impl<'a, T: FeatureScalar> OffsetFeature<'a, T> {
    pub fn new(
        original: ArrayView2<'a, T>,
        image_shape: ImageShape,
        offset_x: isize,
        offset_y: isize,
    ) -> Self {
        Self {
            base: FeatureBase::new(original, image_shape),
            offset_x,
            offset_y,
        }
    }

    /// The row actually read for sample `i`.
    #[inline]
    pub fn target_index(&self, i: usize) -> usize {
        self.base
            .image_shape
            .offset_index(i, self.offset_x, self.offset_y)
    }
}

impl<T: FeatureScalar> FeatureView<T> for OffsetFeature<'_, T> {
    fn shape(&self) -> (usize, usize) {
        self.base.shape()
    }

    fn image_shape(&self) -> ImageShape {
        self.base.image_shape
    }

    #[inline]
    fn value(&self, i: usize, j: usize) -> T {
        self.base.get(self.target_index(i), j)
    }
}

#[cfg(test)]
mod tests {
    use super::OffsetFeature;
    use crate::core_modules::feature::FeatureView;
    use crate::core_modules::identity::IdentityFeature;
    use crate::core_modules::image_shape::ImageShape;
    use ndarray::Array2;

    fn ramp(rows: usize, cols: usize) -> Array2<f64> {
        Array2::from_shape_fn((rows, cols), |(i, j)| (i * cols + j) as f64)
    }

    #[test]
    fn zero_offset_is_identity() {
        let data = ramp(32, 2);
        let shape = ImageShape::new(4, 4);
        let offset = OffsetFeature::new(data.view(), shape, 0, 0);
        let identity = IdentityFeature::new(data.view(), shape);

        for i in 0..32 {
            for j in 0..2 {
                assert_eq!(offset.value(i, j), identity.value(i, j));
            }
        }
    }

    #[test]
    fn interior_offset_reads_neighbor() {
        let data = ramp(16, 1);
        let feature = OffsetFeature::new(data.view(), ImageShape::new(4, 4), 1, 1);
        // (1, 1) -> (2, 2)
        assert_eq!(feature.target_index(5), 10);
        assert_eq!(feature.value(5, 0), 10.0);
    }

    #[test]
    fn clamps_right_border() {
        let data = ramp(16, 1);
        let feature = OffsetFeature::new(data.view(), ImageShape::new(4, 4), 10, 0);
        assert_eq!(feature.target_index(15), 15);
        assert_eq!(feature.target_index(12), 15);
    }

    #[test]
    fn clamps_negative_offsets() {
        let data = ramp(16, 1);
        let feature = OffsetFeature::new(data.view(), ImageShape::new(4, 4), -3, -3);
        assert_eq!(feature.target_index(5), 0);
        assert_eq!(feature.target_index(15), 0);
    }

    #[test]
    fn stays_within_stacked_image() {
        let data = ramp(32, 1);
        let shape = ImageShape::new(4, 4);

        let right = OffsetFeature::new(data.view(), shape, 1, 0);
        let target = right.target_index(15);
        assert!(target < 16);
        assert_eq!(target, 15);

        let left = OffsetFeature::new(data.view(), shape, -1, 0);
        let target = left.target_index(16);
        assert!((16..32).contains(&target));
        assert_eq!(target, 16);

        let down = OffsetFeature::new(data.view(), shape, 0, 1);
        assert_eq!(down.target_index(13), 13);
        assert_eq!(down.target_index(17), 21);
    }
}
