//! F1 Score calculation.

use crate::metrics::precision_recall::PrecisionRecall;

/// Calculate F1 score from precision and recall.
///
/// F1 score is the harmonic mean of precision and recall:
/// F1 = 2 × (Precision × Recall) / (Precision + Recall)
///
/// Returns 0.0 if both precision and recall are 0.
///
/// # Example
///
/// ```
/// use shelf_eval::metrics::f1_score::calculate_f1_score;
///
/// let f1 = calculate_f1_score(0.8, 0.6);
/// assert!((f1 - 0.6857).abs() < 0.001);
/// ```
pub fn calculate_f1_score(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        return 0.0;
    }

    2.0 * (precision * recall) / (precision + recall)
}

/// F1 for one class, from its precision and recall.
///
/// # Example
///
/// ```
/// use shelf_eval::metrics::f1_score::calculate_f1_from_pr;
/// use shelf_eval::metrics::precision_recall::calculate_precision_recall;
///
/// let pr = calculate_precision_recall(8, 2, 3);
/// assert!((calculate_f1_from_pr(&pr) - 0.7619).abs() < 0.001);
/// ```
pub fn calculate_f1_from_pr(pr: &PrecisionRecall) -> f64 {
    calculate_f1_score(pr.precision, pr.recall)
}
