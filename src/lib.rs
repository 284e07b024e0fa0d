// THEORY:
// This file is the main entry point for the `pixel_features` library crate. It
// exposes a family of lazy per-pixel feature views over a stacked-image sample
// matrix, plus the pipelines that turn a list of feature descriptions into a dense
// design matrix for a pixel classifier.
//
// The views themselves live in `core_modules` and borrow the matrix; they never
// allocate or mutate. `pipeline` and `parallel_pipeline` are the only places that
// materialize anything, and `config` describes what they should materialize.

pub mod config;
pub mod core_modules;
pub mod error;
pub mod parallel_pipeline;
pub mod pipeline;

pub use config::FeatureConfig;
pub use core_modules::difference::DifferenceFeature;
pub use core_modules::feature::{FeatureBase, FeatureScalar, FeatureView};
pub use core_modules::feature_kind::{Feature, FeatureSpec, MAX_CANDIDATE_RADIUS};
pub use core_modules::identity::IdentityFeature;
pub use core_modules::image_shape::{ImageShape, PixelLocation};
pub use core_modules::offset::OffsetFeature;
pub use core_modules::sample_matrix::SampleMatrix;
pub use core_modules::scale_invariant::{SCALE_CHANNEL, ScaleInvariantDifferenceFeature};
pub use error::{FeatureError, Result};
pub use parallel_pipeline::ParallelFeaturePipeline;
pub use pipeline::FeaturePipeline;
