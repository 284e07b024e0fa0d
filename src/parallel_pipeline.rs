use crate::config::FeatureConfig;
use crate::core_modules::feature::FeatureScalar;
use crate::core_modules::feature_kind::FeatureSpec;
use crate::core_modules::sample_matrix::SampleMatrix;
use crate::error::{FeatureError, Result};
use crate::pipeline::{bind_all, check_matrix, column_names, evaluate_rows};
use futures::future::join_all;
use ndarray::{Array2, s};
use std::ops::Range;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Materializes features across a pool of blocking tokio tasks.
///
/// The matrix is shared through an `Arc`; each worker binds its own views and fills
/// a disjoint block of rows, so no locking is needed anywhere.
#[derive(Debug, Clone)]
pub struct ParallelFeaturePipeline {
    config: FeatureConfig,
    specs: Arc<[FeatureSpec]>,
    workers: usize,
}

impl ParallelFeaturePipeline {
    pub fn new(config: FeatureConfig) -> Result<Self> {
        config.validate()?;
        let workers = config.worker_count();
        let specs = config.features.clone().into();
        Ok(Self {
            config,
            specs,
            workers,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    pub fn column_names(&self, n_channels: usize) -> Vec<String> {
        column_names(&self.specs, n_channels)
    }

    pub async fn materialize<T: FeatureScalar>(&self, matrix: Arc<SampleMatrix<T>>) -> Result<Array2<T>> {
        check_matrix(&self.config, &*matrix)?;
        let started = Instant::now();

        let n_samples = matrix.n_samples();
        let n_channels = matrix.n_channels();
        let n_columns = self.specs.len() * n_channels;

        let ranges = partition_rows(n_samples, self.workers);
        let tasks: Vec<JoinHandle<Array2<T>>> = ranges
            .iter()
            .cloned()
            .map(|rows| {
                let matrix = Arc::clone(&matrix);
                let specs = Arc::clone(&self.specs);
                tokio::task::spawn_blocking(move || {
                    let features = bind_all(&specs, &*matrix);
                    let mut block = Array2::from_elem((rows.len(), n_columns), T::zero());
                    evaluate_rows(&features, n_channels, rows.start, block.view_mut());
                    block
                })
            })
            .collect();
        debug!(tasks = tasks.len(), samples = n_samples, "dispatched feature workers");

        let mut out = Array2::from_elem((n_samples, n_columns), T::zero());
        for (rows, joined) in ranges.into_iter().zip(join_all(tasks).await) {
            let block = joined.map_err(|e| FeatureError::Worker(e.to_string()))?;
            out.slice_mut(s![rows, ..]).assign(&block);
        }

        info!(
            samples = n_samples,
            columns = n_columns,
            workers = self.workers,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "materialized features in parallel"
        );
        Ok(out)
    }
}

/// Splits `0..n` into at most `parts` contiguous, non-empty ranges.
fn partition_rows(n: usize, parts: usize) -> Vec<Range<usize>> {
    if n == 0 {
        return Vec::new();
    }
    let step = n.div_ceil(parts.max(1));
    (0..n).step_by(step).map(|start| start..(start + step).min(n)).collect()
}

#[cfg(test)]
mod tests {
    use super::{ParallelFeaturePipeline, partition_rows};
    use crate::config::FeatureConfig;
    use crate::core_modules::feature_kind::FeatureSpec;
    use crate::core_modules::image_shape::ImageShape;
    use crate::core_modules::sample_matrix::SampleMatrix;
    use crate::pipeline::FeaturePipeline;
    use ndarray::Array2;
    use std::sync::Arc;

    #[test]
    fn partitions_cover_every_row_once() {
        assert_eq!(partition_rows(10, 3), vec![0..4, 4..8, 8..10]);
        assert_eq!(partition_rows(2, 8), vec![0..1, 1..2]);
        assert_eq!(partition_rows(5, 0), vec![0..5]);
        assert!(partition_rows(0, 4).is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn matches_sequential_pipeline() {
        let shape = ImageShape::new(5, 3);
        let data = Array2::from_shape_fn((45, 2), |(i, j)| {
            if j == 0 { ((i % 3) + 1) as f64 } else { (i * i % 17) as f64 }
        });
        let matrix = SampleMatrix::from_array(data, shape).expect("valid");

        let mut features = FeatureSpec::offset_candidates(1).expect("small radius");
        features.push(FeatureSpec::Identity);
        features.push(FeatureSpec::ScaleInvariantDifference {
            x1: 2,
            y1: 1,
            x2: -2,
            y2: 0,
        });
        let config = FeatureConfig {
            image_width: 5,
            image_height: 3,
            features,
            workers: Some(4),
        };

        let sequential = FeaturePipeline::new(config.clone())
            .and_then(|p| p.materialize(&matrix))
            .expect("sequential");
        let parallel = ParallelFeaturePipeline::new(config)
            .expect("valid config")
            .materialize(Arc::new(matrix))
            .await
            .expect("parallel");

        assert_eq!(parallel, sequential);
    }

    #[tokio::test]
    async fn empty_matrix_yields_empty_output() {
        let matrix = SampleMatrix::from_array(Array2::<f32>::zeros((0, 3)), ImageShape::new(2, 2))
            .expect("valid");
        let config = FeatureConfig {
            image_width: 2,
            image_height: 2,
            features: vec![FeatureSpec::Identity, FeatureSpec::Offset { x: 1, y: 1 }],
            workers: Some(2),
        };
        let out = ParallelFeaturePipeline::new(config)
            .expect("valid config")
            .materialize(Arc::new(matrix))
            .await
            .expect("materialized");
        assert_eq!(out.dim(), (0, 6));
    }
}
