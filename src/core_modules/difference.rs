// THEORY:
// The `DifferenceFeature` measures local contrast: the neighbor's value minus the
// sample's own value. It re-derives the neighbor index itself instead of wrapping an
// `OffsetFeature` and an `IdentityFeature`, which keeps evaluation to one index
// transform and two direct reads.

use crate::core_modules::feature::{FeatureBase, FeatureScalar, FeatureView};
use crate::core_modules::image_shape::ImageShape;
use ndarray::ArrayView2;

/// `value(i, j) = original(offset(i), j) - original(i, j)`.
#[derive(Debug, Clone, Copy)]
pub struct DifferenceFeature<'a, T> {
    base: FeatureBase<'a, T>,
    pub offset_x: isize,
    pub offset_y: isize,
}

impl<'a, T: FeatureScalar> DifferenceFeature<'a, T> {
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
}

impl<T: FeatureScalar> FeatureView<T> for DifferenceFeature<'_, T> {
    fn shape(&self) -> (usize, usize) {
        self.base.shape()
    }

    fn image_shape(&self) -> ImageShape {
        self.base.image_shape
    }

    #[inline]
    fn value(&self, i: usize, j: usize) -> T {
        let ip = self
            .base
            .image_shape
            .offset_index(i, self.offset_x, self.offset_y);
        self.base.get(ip, j) - self.base.get(i, j)
    }
}
