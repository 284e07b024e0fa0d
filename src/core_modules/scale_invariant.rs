// THEORY:
// The `ScaleInvariantDifferenceFeature` compares two neighbors of a sample, where the
// distance to each neighbor adapts to a per-sample "scale" stored in channel 0 of the
// matrix (for example a distance-to-boundary map or an object-size estimate).
//
// Key architectural principles:
// 1.  **Scale From The Data**: The scale is read at the *source* row `i`, before any
//     offset is applied. Both configured offsets are divided by it, so a large scale
//     shrinks the probe and a small scale stretches it. The same pair of offsets then
//     looks at proportionally similar neighborhoods everywhere.
// 2.  **Explicit Rounding**: Division is floating point and the scaled offset is
//     truncated toward zero. Truncating the offset (not the shifted coordinate) keeps
//     positive and negative probes symmetric around the source pixel.
// 3.  **Zero-Scale Guard**: A scale of exactly zero collapses both probes onto the
//     source pixel, so the feature is zero instead of a division fault. A NaN scale
//     yields NaN offsets, which truncate to a zero displacement as well.
// 4.  **Independent Clamping**: Each probe is clamped to the image on its own, and
//     both stay inside the source sample's stacked image.

use crate::core_modules::feature::{FeatureBase, FeatureScalar, FeatureView};
use crate::core_modules::image_shape::{ImageShape, PixelLocation};
use ndarray::ArrayView2;

/// Channel holding the per-sample scale reading.
pub const SCALE_CHANNEL: usize = 0;

/// `value(i, j) = original(probe1(i), j) - original(probe2(i), j)` with both probes
/// rescaled by `original(i, SCALE_CHANNEL)`.
#[derive(Debug, Clone, Copy)]
pub struct ScaleInvariantDifferenceFeature<'a, T> {
    base: FeatureBase<'a, T>,
    pub offset_x1: isize,
    pub offset_y1: isize,
    pub offset_x2: isize,
    pub offset_y2: isize,
}

impl<'a, T: FeatureScalar> ScaleInvariantDifferenceFeature<'a, T> {
    pub fn new(
        original: ArrayView2<'a, T>,
        image_shape: ImageShape,
        offset_x1: isize,
        offset_y1: isize,
        offset_x2: isize,
        offset_y2: isize,
    ) -> Self {
        Self {
            base: FeatureBase::new(original, image_shape),
            offset_x1,
            offset_y1,
            offset_x2,
            offset_y2,
        }
    }

    /// The two rows read for sample `i`, in operand order.
    pub fn target_indices(&self, i: usize) -> (usize, usize) {
        let shape = self.base.image_shape;
        let mut source = shape.locate(i);
        source.y %= shape.height;

        let scale = self.base.get(i, SCALE_CHANNEL).to_f64();
        if scale == 0.0 {
            let ip = shape.index_of(source);
            return (ip, ip);
        }

        let first = self.probe(source, scale, self.offset_x1, self.offset_y1);
        let second = self.probe(source, scale, self.offset_x2, self.offset_y2);
        (shape.index_of(first), shape.index_of(second))
    }

    #[inline]
    fn probe(&self, source: PixelLocation, scale: f64, dx: isize, dy: isize) -> PixelLocation {
        self.base
            .image_shape
            .shift(source, scaled_offset(dx, scale), scaled_offset(dy, scale))
    }
}

/// `trunc(offset / scale)`; NaN maps to zero and infinities saturate.
#[inline]
fn scaled_offset(offset: isize, scale: f64) -> isize {
    (offset as f64 / scale).trunc() as isize
}

impl<T: FeatureScalar> FeatureView<T> for ScaleInvariantDifferenceFeature<'_, T> {
    fn shape(&self) -> (usize, usize) {
        self.base.shape()
    }

    fn image_shape(&self) -> ImageShape {
        self.base.image_shape
    }

    /// Zero when the scale at `i` is zero, even for non-finite data. Otherwise the
    /// plain difference, so probes that clamp onto the same NaN or infinite cell
    /// still yield NaN.
    #[inline]
    fn value(&self, i: usize, j: usize) -> T {
        if self.base.get(i, SCALE_CHANNEL).to_f64() == 0.0 {
            return T::zero();
        }
        let (ip1, ip2) = self.target_indices(i);
        self.base.get(ip1, j) - self.base.get(ip2, j)
    }
}
