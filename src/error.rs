use crate::core_modules::image_shape::ImageShape;
use thiserror::Error;

/// Errors raised at the fallible edges of the crate: matrix construction,
/// configuration and pipeline execution. Feature evaluation itself never fails.
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("image shape must be non-zero, got {width}x{height}")]
    EmptyImageShape { width: usize, height: usize },

    #[error("image {index} has {actual} pixels, expected {expected}")]
    ImageSizeMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("buffer of {actual} elements does not fit units of {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("{samples} samples is not a whole number of {pixels_per_image}-pixel images")]
    PartialImage {
        pixels_per_image: usize,
        samples: usize,
    },

    #[error("expected {expected} channels, got {actual}")]
    ChannelCount { expected: usize, actual: usize },

    #[error("sample matrix holds {actual:?} images, pipeline expects {expected:?}")]
    ImageShapeMismatch {
        expected: ImageShape,
        actual: ImageShape,
    },

    #[error("no images supplied")]
    NoImages,

    #[error("feature configuration lists no features")]
    NoFeatures,

    #[error("candidate radius {radius} exceeds the maximum of {max}")]
    RadiusTooLarge { radius: usize, max: usize },

    #[error("array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("feature worker failed: {0}")]
    Worker(String),
}

pub type Result<T> = std::result::Result<T, FeatureError>;

#[cfg(test)]
mod tests {
    use super::FeatureError;

    #[test]
    fn messages_name_the_problem() {
        let err = FeatureError::ImageSizeMismatch {
            index: 2,
            expected: 16,
            actual: 12,
        };
        assert_eq!(err.to_string(), "image 2 has 12 pixels, expected 16");

        let err = FeatureError::EmptyImageShape {
            width: 0,
            height: 4,
        };
        assert_eq!(err.to_string(), "image shape must be non-zero, got 0x4");

        let err = FeatureError::PartialImage {
            pixels_per_image: 16,
            samples: 20,
        };
        assert_eq!(err.to_string(), "20 samples is not a whole number of 16-pixel images");
    }
}
