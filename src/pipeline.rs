// THEORY:
// The `pipeline` module is the top-level API a trainer uses when it wants a dense
// design matrix instead of lazy views. It takes a `FeatureConfig`, binds every
// configured `FeatureSpec` to a `SampleMatrix` and evaluates them row by row.
//
// The output has one row per sample and `features.len() * channels` columns.
// Column `k * channels + j` holds feature `k` evaluated on channel `j`. Views are
// still lazy; only this module decides to materialize them.

use crate::config::FeatureConfig;
use crate::core_modules::feature::{FeatureScalar, FeatureView};
use crate::core_modules::feature_kind::{Feature, FeatureSpec};
use crate::core_modules::sample_matrix::SampleMatrix;
use crate::error::{FeatureError, Result};
use ndarray::{Array2, ArrayViewMut2};
use std::time::Instant;
use tracing::{debug, info};

/// Sequential materialization of configured features.
#[derive(Debug, Clone)]
pub struct FeaturePipeline {
    config: FeatureConfig,
}

impl FeaturePipeline {
    pub fn new(config: FeatureConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Binds every configured feature to `matrix`.
    pub fn bind<'a, T: FeatureScalar>(&self, matrix: &'a SampleMatrix<T>) -> Result<Vec<Feature<'a, T>>> {
        check_matrix(&self.config, matrix)?;
        Ok(bind_all(&self.config.features, matrix))
    }

    /// Evaluates every configured feature on every sample and channel.
    pub fn materialize<T: FeatureScalar>(&self, matrix: &SampleMatrix<T>) -> Result<Array2<T>> {
        let started = Instant::now();
        let features = self.bind(matrix)?;
        let n_channels = matrix.n_channels();

        let mut out = Array2::from_elem(
            (matrix.n_samples(), features.len() * n_channels),
            T::zero(),
        );
        evaluate_rows(&features, n_channels, 0, out.view_mut());

        info!(
            samples = matrix.n_samples(),
            columns = out.ncols(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "materialized features"
        );
        Ok(out)
    }

    /// Human-readable names for the output columns.
    pub fn column_names(&self, n_channels: usize) -> Vec<String> {
        column_names(&self.config.features, n_channels)
    }
}

pub(crate) fn column_names(features: &[FeatureSpec], n_channels: usize) -> Vec<String> {
    features
        .iter()
        .flat_map(|spec| (0..n_channels).map(move |j| format!("{spec}[c{j}]")))
        .collect()
}

pub(crate) fn check_matrix<T: FeatureScalar>(config: &FeatureConfig, matrix: &SampleMatrix<T>) -> Result<()> {
    if matrix.image_shape() != config.image_shape() {
        return Err(FeatureError::ImageShapeMismatch {
            expected: config.image_shape(),
            actual: matrix.image_shape(),
        });
    }
    if config.needs_scale_channel() && matrix.n_channels() == 0 {
        return Err(FeatureError::ChannelCount {
            expected: 1,
            actual: 0,
        });
    }
    Ok(())
}

pub(crate) fn bind_all<'a, T: FeatureScalar>(
    specs: &[FeatureSpec],
    matrix: &'a SampleMatrix<T>,
) -> Vec<Feature<'a, T>> {
    let features: Vec<_> = specs
        .iter()
        .map(|spec| spec.bind(matrix.view(), matrix.image_shape()))
        .collect();
    debug!(count = features.len(), "bound feature views");
    features
}

/// Fills `out` with feature values for samples `first_row..first_row + out.nrows()`.
pub(crate) fn evaluate_rows<T: FeatureScalar>(
    features: &[Feature<'_, T>],
    n_channels: usize,
    first_row: usize,
    mut out: ArrayViewMut2<'_, T>,
) {
    for (local, mut row) in out.rows_mut().into_iter().enumerate() {
        let i = first_row + local;
        for (k, feature) in features.iter().enumerate() {
            for j in 0..n_channels {
                row[k * n_channels + j] = feature.value(i, j);
            }
        }
    }
}
