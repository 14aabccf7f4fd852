//! Confidence score thresholding utilities.

use crate::error::{Result, ShelfEvalError};
use crate::types::PredictedAnnotation;

/// Filter predictions by confidence score threshold.
///
/// # Arguments
///
/// * `predictions` - Predictions to filter
/// * `threshold` - Minimum confidence score (0.0 to 1.0)
///
/// # Returns
///
/// Returns a new vector containing only predictions with confidence >= threshold,
/// in their original order.
///
/// # Errors
///
/// Returns an error if the threshold is not in the valid range [0.0, 1.0].
///
/// # Example
///
/// ```
/// use shelf_eval::threshold::filter_by_confidence;
/// use shelf_eval::types::{BoundingBox, PredictedAnnotation};
///
/// let predictions = vec![
///     PredictedAnnotation::new("cereal", BoundingBox::new(10.0, 20.0, 30.0, 40.0), 0.9),
///     PredictedAnnotation::new("cereal", BoundingBox::new(50.0, 60.0, 70.0, 80.0), 0.2),
/// ];
///
/// let filtered = filter_by_confidence(&predictions, 0.25).unwrap();
/// assert_eq!(filtered.len(), 1);
/// ```
pub fn filter_by_confidence(
    predictions: &[PredictedAnnotation],
    threshold: f64,
) -> Result<Vec<PredictedAnnotation>> {
    validate_threshold(threshold)?;

    Ok(predictions
        .iter()
        .filter(|pred| pred.confidence >= threshold)
        .cloned()
        .collect())
}

/// Validate that a threshold is in the valid range [0.0, 1.0].
pub fn validate_threshold(threshold: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(ShelfEvalError::InvalidThreshold(format!(
            "Threshold must be between 0.0 and 1.0, got {threshold}"
        )));
    }
    Ok(())
}
