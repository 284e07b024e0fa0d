// THEORY:
// The `IdentityFeature` is the unmodified baseline: it reads the sample matrix
// exactly as it is. It exists so that raw channels can be offered to a learner
// through the same contract as every derived feature, and it serves as the
// right-hand operand when reasoning about differences.

use crate::core_modules::feature::{FeatureBase, FeatureScalar, FeatureView};
use crate::core_modules::image_shape::ImageShape;
use ndarray::ArrayView2;

/// Pass-through view over the sample matrix.
#[derive(Debug, Clone, Copy)]
pub struct IdentityFeature<'a, T> {
    base: FeatureBase<'a, T>,
}

impl<'a, T: FeatureScalar> IdentityFeature<'a, T> {
    pub fn new(original: ArrayView2<'a, T>, image_shape: ImageShape) -> Self {
        Self {
            base: FeatureBase::new(original, image_shape),
        }
    }
}

impl<T: FeatureScalar> FeatureView<T> for IdentityFeature<'_, T> {
    fn shape(&self) -> (usize, usize) {
        self.base.shape()
    }

    fn image_shape(&self) -> ImageShape {
        self.base.image_shape
    }

    #[inline]
    fn value(&self, i: usize, j: usize) -> T {
        self.base.get(i, j)
    }
}

#[cfg(test)]
mod tests {
    use super::IdentityFeature;
    use crate::core_modules::feature::FeatureView;
    use crate::core_modules::image_shape::ImageShape;
    use ndarray::Array2;

    #[test]
    fn reads_matrix_unchanged() {
        let data = Array2::from_shape_fn((8, 2), |(i, j)| (i * 10 + j) as i32);
        let feature = IdentityFeature::new(data.view(), ImageShape::new(4, 2));

        assert_eq!(feature.shape(), (8, 2));
        assert_eq!(feature.shape_along(0), 8);
        assert_eq!(feature.shape_along(1), 2);
        for i in 0..8 {
            for j in 0..2 {
                assert_eq!(feature.value(i, j), data[[i, j]]);
            }
        }
    }

    #[test]
    #[should_panic]
    fn out_of_range_sample_is_caller_error() {
        let data = Array2::<f32>::zeros((4, 1));
        let feature = IdentityFeature::new(data.view(), ImageShape::new(2, 2));
        feature.value(4, 0);
    }
}
