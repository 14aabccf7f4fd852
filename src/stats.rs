/// Counting of detected products per class.
///
/// Tracks how many predictions survived the confidence filter and how they
/// split across classes, for reporting product counts on a shelf image.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::threshold::validate_threshold;
use crate::types::PredictedAnnotation;

/// Statistics collected while counting predictions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionStats {
    /// Total number of predictions seen
    pub total_predictions: usize,

    /// Number of predictions skipped for falling below the confidence threshold
    pub skipped_low_confidence: usize,

    /// Per-class counts of kept predictions, in first-seen order
    pub class_counts: Vec<(String, usize)>,
}

impl DetectionStats {
    /// Create a new `DetectionStats` with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Count predictions with confidence >= `min_confidence`.
    ///
    /// # Example
    ///
    /// ```
    /// use shelf_eval::stats::DetectionStats;
    /// use shelf_eval::types::{BoundingBox, PredictedAnnotation};
    ///
    /// let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    /// let predictions = vec![
    ///     PredictedAnnotation::new("milk", bbox, 0.9),
    ///     PredictedAnnotation::new("milk", bbox, 0.8),
    ///     PredictedAnnotation::new("bread", bbox, 0.1),
    /// ];
    ///
    /// let stats = DetectionStats::from_predictions(&predictions, 0.25).unwrap();
    /// assert_eq!(stats.detected(), 2);
    /// assert_eq!(stats.count("milk"), 2);
    /// ```
    pub fn from_predictions(
        predictions: &[PredictedAnnotation],
        min_confidence: f64,
    ) -> Result<Self> {
        validate_threshold(min_confidence)?;

        let mut stats = Self::new();
        for prediction in predictions {
            stats.total_predictions += 1;
            if prediction.confidence < min_confidence {
                stats.skipped_low_confidence += 1;
                continue;
            }
            stats.add_detection(&prediction.class);
        }
        Ok(stats)
    }

    /// Record one kept detection of `class`
    pub fn add_detection(&mut self, class: &str) {
        match self.class_counts.iter_mut().find(|(name, _)| name == class) {
            Some((_, count)) => *count += 1,
            None => self.class_counts.push((class.to_string(), 1)),
        }
    }

    /// Number of kept detections of `class`
    pub fn count(&self, class: &str) -> usize {
        self.class_counts
            .iter()
            .find(|(name, _)| name == class)
            .map_or(0, |(_, count)| *count)
    }

    /// Number of detections that passed the confidence filter
    pub fn detected(&self) -> usize {
        self.total_predictions
            .saturating_sub(self.skipped_low_confidence)
    }

    /// Get a formatted string summary of the statistics
    pub fn summary_string(&self) -> String {
        format!(
            "DetectionStats {{ total: {}, detected: {}, skipped: {}, classes: {} }}",
            self.total_predictions,
            self.detected(),
            self.skipped_low_confidence,
            self.class_counts.len()
        )
    }
}

impl fmt::Display for DetectionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Products detected: {}", self.detected())?;
        for (class, count) in &self.class_counts {
            write!(f, "\n{class}: {count}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundingBox;

    fn prediction(class: &str, confidence: f64) -> PredictedAnnotation {
        PredictedAnnotation::new(class, BoundingBox::new(0.0, 0.0, 10.0, 10.0), confidence)
    }

    #[test]
    fn test_new_stats_are_zero() {
        let stats = DetectionStats::new();
        assert_eq!(stats.total_predictions, 0);
        assert_eq!(stats.detected(), 0);
        assert!(stats.class_counts.is_empty());
    }

    #[test]
    fn test_counts_in_first_seen_order() {
        let predictions = vec![
            prediction("soda", 0.9),
            prediction("chips", 0.9),
            prediction("soda", 0.6),
        ];
        let stats = DetectionStats::from_predictions(&predictions, 0.0).unwrap();
        assert_eq!(
            stats.class_counts,
            vec![("soda".to_string(), 2), ("chips".to_string(), 1)]
        );
    }

    #[test]
    fn test_low_confidence_skipped() {
        let predictions = vec![prediction("soda", 0.9), prediction("soda", 0.1)];
        let stats = DetectionStats::from_predictions(&predictions, 0.25).unwrap();
        assert_eq!(stats.total_predictions, 2);
        assert_eq!(stats.skipped_low_confidence, 1);
        assert_eq!(stats.detected(), 1);
        assert_eq!(stats.count("chips"), 0);
    }

    #[test]
    fn test_display() {
        let predictions = vec![prediction("soda", 0.9), prediction("chips", 0.9)];
        let stats = DetectionStats::from_predictions(&predictions, 0.0).unwrap();
        assert_eq!(stats.to_string(), "Products detected: 2\nsoda: 1\nchips: 1");
    }

    #[test]
    fn test_summary_string() {
        let stats = DetectionStats::from_predictions(&[prediction("soda", 0.9)], 0.0).unwrap();
        let summary = stats.summary_string();
        assert!(summary.contains("total: 1"));
        assert!(summary.contains("classes: 1"));
    }
}
