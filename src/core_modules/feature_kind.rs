// THEORY:
// The feature variants are siblings, not a hierarchy. This module closes the set:
// `FeatureSpec` is an owned, serializable description of "which feature with which
// offsets", and `Feature` is that description bound to a borrowed sample matrix.
//
// Key architectural principles:
// 1.  **Closed Dispatch**: `Feature::value` is a single `match` over the four
//     variants. A trainer can hold a `Vec<Feature>` of split candidates without
//     boxing or virtual calls.
// 2.  **Describe, Then Bind**: Specs carry no lifetimes, so they can be stored in a
//     config file, cloned across threads, or recorded in a trained model, and bound
//     to whatever matrix is at hand when evaluation starts.
// 3.  **Candidate Generation**: `offset_candidates` enumerates every offset and
//     difference feature within a square neighborhood, the usual way to seed
//     split candidates for a pixel classifier.

use crate::core_modules::difference::DifferenceFeature;
use crate::core_modules::feature::{FeatureScalar, FeatureView};
use crate::core_modules::identity::IdentityFeature;
use crate::core_modules::image_shape::ImageShape;
use crate::core_modules::offset::OffsetFeature;
use crate::core_modules::scale_invariant::ScaleInvariantDifferenceFeature;
use crate::error::{FeatureError, Result};
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest neighborhood radius `offset_candidates` enumerates (about 8.4M specs).
pub const MAX_CANDIDATE_RADIUS: usize = 1024;

/// Owned description of one feature view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureSpec {
    Identity,
    Offset { x: isize, y: isize },
    Difference { x: isize, y: isize },
    ScaleInvariantDifference { x1: isize, y1: isize, x2: isize, y2: isize },
}

impl FeatureSpec {
    /// Binds this description to a sample matrix.
    pub fn bind<'a, T: FeatureScalar>(
        &self,
        original: ArrayView2<'a, T>,
        image_shape: ImageShape,
    ) -> Feature<'a, T> {
        match *self {
            FeatureSpec::Identity => Feature::Identity(IdentityFeature::new(original, image_shape)),
            FeatureSpec::Offset { x, y } => {
                Feature::Offset(OffsetFeature::new(original, image_shape, x, y))
            }
            FeatureSpec::Difference { x, y } => {
                Feature::Difference(DifferenceFeature::new(original, image_shape, x, y))
            }
            FeatureSpec::ScaleInvariantDifference { x1, y1, x2, y2 } => {
                Feature::ScaleInvariantDifference(ScaleInvariantDifferenceFeature::new(
                    original,
                    image_shape,
                    x1,
                    y1,
                    x2,
                    y2,
                ))
            }
        }
    }

    /// Whether evaluation reads the scale channel.
    pub fn uses_scale(&self) -> bool {
        matches!(self, FeatureSpec::ScaleInvariantDifference { .. })
    }

    /// Every non-zero `Offset` and `Difference` spec with `|x|, |y| <= radius`,
    /// in row-major order of the offset grid.
    ///
    /// Radii above `MAX_CANDIDATE_RADIUS` are rejected.
    pub fn offset_candidates(radius: usize) -> Result<Vec<FeatureSpec>> {
        if radius > MAX_CANDIDATE_RADIUS {
            return Err(FeatureError::RadiusTooLarge {
                radius,
                max: MAX_CANDIDATE_RADIUS,
            });
        }
        let r = radius as isize;
        let side = 2 * radius + 1;
        let mut candidates = Vec::with_capacity(2 * (side * side - 1));

        for y in -r..=r {
            for x in -r..=r {
                if x == 0 && y == 0 {
                    continue;
                }
                candidates.push(FeatureSpec::Offset { x, y });
                candidates.push(FeatureSpec::Difference { x, y });
            }
        }
        Ok(candidates)
    }
}

impl fmt::Display for FeatureSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => write!(f, "identity"),
            Self::Offset { x, y } => write!(f, "offset({x}, {y})"),
            Self::Difference { x, y } => write!(f, "difference({x}, {y})"),
            Self::ScaleInvariantDifference { x1, y1, x2, y2 } => {
                write!(f, "scale_invariant_difference({x1}, {y1}; {x2}, {y2})")
            }
        }
    }
}

/// A feature view of any variant, bound to a borrowed sample matrix.
#[derive(Debug, Clone, Copy)]
pub enum Feature<'a, T> {
    Identity(IdentityFeature<'a, T>),
    Offset(OffsetFeature<'a, T>),
    Difference(DifferenceFeature<'a, T>),
    ScaleInvariantDifference(ScaleInvariantDifferenceFeature<'a, T>),
}

impl<T: FeatureScalar> FeatureView<T> for Feature<'_, T> {
    fn shape(&self) -> (usize, usize) {
        match self {
            Feature::Identity(f) => f.shape(),
            Feature::Offset(f) => f.shape(),
            Feature::Difference(f) => f.shape(),
            Feature::ScaleInvariantDifference(f) => f.shape(),
        }
    }

    fn image_shape(&self) -> ImageShape {
        match self {
            Feature::Identity(f) => f.image_shape(),
            Feature::Offset(f) => f.image_shape(),
            Feature::Difference(f) => f.image_shape(),
            Feature::ScaleInvariantDifference(f) => f.image_shape(),
        }
    }

    #[inline]
    fn value(&self, i: usize, j: usize) -> T {
        match self {
            Feature::Identity(f) => f.value(i, j),
            Feature::Offset(f) => f.value(i, j),
            Feature::Difference(f) => f.value(i, j),
            Feature::ScaleInvariantDifference(f) => f.value(i, j),
        }
    }
}
