//! Feature views are shared read-only across threads without any locking.

use std::sync::Arc;

use ndarray::Array2;
use pixel_features::{
    FeatureConfig, FeaturePipeline, FeatureSpec, FeatureView, ImageShape,
    ParallelFeaturePipeline, SampleMatrix,
};

fn matrix() -> SampleMatrix<f32> {
    let shape = ImageShape::new(6, 5);
    let data = Array2::from_shape_fn((shape.pixels_per_image() * 3, 2), |(i, j)| {
        if j == 0 { 1.0 + (i % 4) as f32 } else { (i * 31 % 23) as f32 }
    });
    SampleMatrix::from_array(data, shape).expect("valid matrix")
}

#[test]
fn one_view_read_from_many_threads() {
    let matrix = matrix();
    let feature = FeatureSpec::ScaleInvariantDifference {
        x1: 3,
        y1: -2,
        x2: -1,
        y2: 4,
    }
    .bind(matrix.view(), matrix.image_shape());

    let expected: Vec<f32> = (0..matrix.n_samples()).map(|i| feature.value(i, 1)).collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    (0..matrix.n_samples())
                        .map(|i| feature.value(i, 1))
                        .collect::<Vec<f32>>()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().expect("reader thread"), expected);
        }
    });
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_pipeline_agrees_for_any_worker_count() {
    let matrix = Arc::new(matrix());
    let mut features = FeatureSpec::offset_candidates(2).expect("small radius");
    features.push(FeatureSpec::ScaleInvariantDifference {
        x1: 2,
        y1: 2,
        x2: -2,
        y2: -2,
    });

    let base = FeatureConfig {
        image_width: 6,
        image_height: 5,
        features,
        workers: Some(1),
    };
    let expected = FeaturePipeline::new(base.clone())
        .and_then(|p| p.materialize(&*matrix))
        .expect("sequential");

    for workers in [1, 2, 3, 7, 200] {
        let config = FeatureConfig {
            workers: Some(workers),
            ..base.clone()
        };
        let out = ParallelFeaturePipeline::new(config)
            .expect("valid config")
            .materialize(Arc::clone(&matrix))
            .await
            .expect("parallel");
        assert_eq!(out, expected, "workers = {workers}");
    }
}
