// THEORY:
// `FeatureConfig` is the tunable surface of the crate: the geometry of the images
// being stacked, the list of features to evaluate, and how many workers the
// parallel pipeline should use. It is a plain data struct handed to the pipeline
// constructors, and it round-trips through JSON so a trained model can record the
// exact features it was grown on.

use crate::core_modules::feature_kind::FeatureSpec;
use crate::core_modules::image_shape::ImageShape;
use crate::error::{FeatureError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the feature pipelines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureConfig {
    pub image_width: usize,
    pub image_height: usize,
    /// Features evaluated for every channel, in output column order.
    pub features: Vec<FeatureSpec>,
    /// Worker count for the parallel pipeline. `None` uses every logical CPU.
    #[serde(default)]
    pub workers: Option<usize>,
}

impl FeatureConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.image_shape().is_empty() {
            return Err(FeatureError::EmptyImageShape {
                width: self.image_width,
                height: self.image_height,
            });
        }
        if self.features.is_empty() {
            return Err(FeatureError::NoFeatures);
        }
        Ok(())
    }

    pub fn image_shape(&self) -> ImageShape {
        ImageShape::new(self.image_width, self.image_height)
    }

    /// Effective worker count, never zero.
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get).max(1)
    }

    /// Whether any configured feature reads the scale channel.
    pub fn needs_scale_channel(&self) -> bool {
        self.features.iter().any(FeatureSpec::uses_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::FeatureConfig;
    use crate::core_modules::feature_kind::FeatureSpec;
    use crate::error::FeatureError;

    const SAMPLE: &str = r#"{
        "image_width": 64,
        "image_height": 48,
        "features": [
            { "kind": "identity" },
            { "kind": "offset", "x": 2, "y": -1 },
            { "kind": "difference", "x": 0, "y": 3 },
            { "kind": "scale_invariant_difference", "x1": 4, "y1": 0, "x2": -4, "y2": 0 }
        ],
        "workers": 3
    }"#;

    #[test]
    fn parses_feature_list() {
        let config = FeatureConfig::from_json_str(SAMPLE).expect("valid config");
        assert_eq!(config.image_shape().pixels_per_image(), 64 * 48);
        assert_eq!(config.features.len(), 4);
        assert_eq!(config.features[1], FeatureSpec::Offset { x: 2, y: -1 });
        assert_eq!(config.worker_count(), 3);
        assert!(config.needs_scale_channel());
    }

    #[test]
    fn round_trips_through_json() {
        let config = FeatureConfig::from_json_str(SAMPLE).expect("valid config");
        let json = config.to_json().expect("serializable");
        assert_eq!(FeatureConfig::from_json_str(&json).expect("reparse"), config);
    }

    #[test]
    fn workers_default_to_cpu_count() {
        let config = FeatureConfig::from_json_str(
            r#"{ "image_width": 4, "image_height": 4, "features": [{ "kind": "identity" }] }"#,
        )
        .expect("valid config");
        assert_eq!(config.workers, None);
        assert!(config.worker_count() >= 1);
    }

    #[test]
    fn rejects_invalid_configs() {
        let empty = r#"{ "image_width": 4, "image_height": 4, "features": [] }"#;
        assert!(matches!(
            FeatureConfig::from_json_str(empty),
            Err(FeatureError::NoFeatures)
        ));

        let flat = r#"{ "image_width": 0, "image_height": 4, "features": [{ "kind": "identity" }] }"#;
        assert!(matches!(
            FeatureConfig::from_json_str(flat),
            Err(FeatureError::EmptyImageShape { .. })
        ));

        let unknown = r#"{ "image_width": 4, "image_height": 4, "features": [{ "kind": "blur" }] }"#;
        assert!(matches!(
            FeatureConfig::from_json_str(unknown),
            Err(FeatureError::Config(_))
        ));
    }
}
