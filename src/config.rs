//! Evaluation settings.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::matching::DEFAULT_IOU_THRESHOLD;
use crate::threshold::validate_threshold;

/// Settings shared by every scoring call.
///
/// Missing fields take their defaults, so `{}` is a valid config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// IoU a prediction has to exceed to match a ground truth.
    pub iou_threshold: f64,
    /// Predictions below this confidence are dropped before matching.
    pub min_confidence: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            min_confidence: 0.0,
        }
    }
}

impl EvaluationConfig {
    /// Load a config from a JSON file and validate it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config from a JSON string and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.iou_threshold)?;
        validate_threshold(self.min_confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EvaluationConfig::from_json("{}").unwrap();
        assert_eq!(config, EvaluationConfig::default());
        assert_eq!(config.iou_threshold, 0.5);
        assert_eq!(config.min_confidence, 0.0);
    }

    #[test]
    fn test_partial_override() {
        let config = EvaluationConfig::from_json(r#"{"min_confidence": 0.25}"#).unwrap();
        assert_eq!(config.iou_threshold, 0.5);
        assert_eq!(config.min_confidence, 0.25);
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(EvaluationConfig::from_json(r#"{"iou_threshold": 2.0}"#).is_err());
    }
}
