// THEORY:
// The `feature` module defines the contract every feature view honors and the small
// amount of state they all share. A feature view is a lazy function over
// `(sample, channel)` pairs: it never materializes a transformed array, it only
// rewrites *which* row of the borrowed sample matrix is read.
//
// Key architectural principles:
// 1.  **Borrowed, Never Owned**: `FeatureBase` holds an `ArrayView2` whose lifetime is
//     tied to the caller's matrix. A view cannot outlive its data and cannot mutate it.
// 2.  **Same Shape In, Same Shape Out**: A feature view reinterprets what a row
//     *means*; it never changes how many rows or channels there are.
// 3.  **Pure Access**: `value` depends only on `(i, j)` and the construction
//     parameters. No caching, no interior mutability, so every view is `Send + Sync`
//     whenever the scalar type is.
// 4.  **Caller Contract**: Indices outside the matrix are not validated here; the
//     underlying array view panics. The view must also hold a whole number of
//     images, which `SampleMatrix` guarantees. Spatial out-of-bounds inside an image
//     is handled by the variants through clamping.

use crate::core_modules::image_shape::ImageShape;
use ndarray::ArrayView2;
use std::fmt::Debug;
use std::ops::Sub;

/// Numeric element types a sample matrix may hold.
///
/// Differencing needs a closed subtraction, so unsigned types are left out.
///
/// # Panics
/// Difference features subtract with the type's own `Sub`. For the integer types a
/// difference that overflows panics in debug builds and wraps in release builds.
pub trait FeatureScalar: Copy + Debug + PartialEq + Send + Sync + Sub<Output = Self> + 'static {
    /// The additive identity.
    fn zero() -> Self;

    /// Lossy conversion used to read a scale value.
    fn to_f64(self) -> f64;
}

macro_rules! impl_feature_scalar {
    ($($ty:ty => $zero:expr),* $(,)?) => {
        $(
            impl FeatureScalar for $ty {
                #[inline]
                fn zero() -> Self {
                    $zero
                }

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_feature_scalar!(f32 => 0.0, f64 => 0.0, i16 => 0, i32 => 0, i64 => 0);

/// Shape and value access shared by every feature variant.
pub trait FeatureView<T: FeatureScalar> {
    /// `(rows, cols)` of the underlying sample matrix.
    fn shape(&self) -> (usize, usize);

    /// Extent along one axis: `0` for samples, `1` for channels.
    ///
    /// # Panics
    /// Panics when `axis > 1`.
    fn shape_along(&self, axis: usize) -> usize {
        let (rows, cols) = self.shape();
        match axis {
            0 => rows,
            1 => cols,
            _ => panic!("feature views are two-dimensional, got axis {axis}"),
        }
    }

    /// The image shape used to interpret sample indices.
    fn image_shape(&self) -> ImageShape;

    /// The feature value for sample `i`, channel `j`.
    fn value(&self, i: usize, j: usize) -> T;
}

/// The borrowed matrix and image geometry every variant is built on.
#[derive(Debug, Clone, Copy)]
pub struct FeatureBase<'a, T> {
    /// Read-only `(sample, channel)` view. Owned by the caller.
    pub original: ArrayView2<'a, T>,
    /// The `(width, height)` of each stacked image.
    pub image_shape: ImageShape,
}

impl<'a, T: FeatureScalar> FeatureBase<'a, T> {
    pub fn new(original: ArrayView2<'a, T>, image_shape: ImageShape) -> Self {
        debug_assert!(
            !image_shape.is_empty(),
            "image shape must have non-zero width and height"
        );
        Self {
            original,
            image_shape,
        }
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.original.nrows(), self.original.ncols())
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        self.original[[i, j]]
    }
}

#[cfg(test)]
mod tests {
    use super::{FeatureBase, FeatureScalar};
    use crate::core_modules::image_shape::ImageShape;
    use ndarray::Array2;

    #[test]
    fn base_reports_matrix_shape() {
        let data = Array2::<f32>::zeros((32, 3));
        let base = FeatureBase::new(data.view(), ImageShape::new(4, 4));
        assert_eq!(base.shape(), (32, 3));
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn integer_difference_overflow_panics_in_debug() {
        let data = ndarray::array![[i16::MIN], [i16::MAX]];
        let base = FeatureBase::new(data.view(), ImageShape::new(1, 2));
        let _ = base.get(0, 0) - base.get(1, 0);
    }

    #[test]
    fn scalar_conversions() {
        assert_eq!(<i32 as FeatureScalar>::zero(), 0);
        assert_eq!(2.5f32.to_f64(), 2.5);
        assert_eq!((-7i16).to_f64(), -7.0);
    }
}
