//! Precision and Recall calculation.

/// Container for precision and recall values.
#[derive(Debug, Clone)]
pub struct PrecisionRecall {
    pub precision: f64,
    pub recall: f64,
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

/// Calculate precision from confusion matrix values
///
/// Precision = TP / (TP + FP), 0.0 when there are no positive predictions.
///
/// # Examples
///
/// ```
/// # use shelf_eval::metrics::precision_recall::calculate_precision;
/// let precision = calculate_precision(80, 20);
/// assert_eq!(precision, 0.8);
/// assert_eq!(calculate_precision(0, 0), 0.0);
/// ```
#[must_use]
pub fn calculate_precision(tp: usize, fp: usize) -> f64 {
    let denominator = tp + fp;
    if denominator == 0 {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let precision = (tp as f64) / (denominator as f64);

    debug_assert!(
        (0.0..=1.0).contains(&precision),
        "Precision must be between 0 and 1, got {precision}"
    );

    precision
}

/// Calculate recall from confusion matrix values
///
/// Recall = TP / (TP + FN), 0.0 when there is nothing to recall.
///
/// # Examples
///
/// ```
/// # use shelf_eval::metrics::precision_recall::calculate_recall;
/// let recall = calculate_recall(80, 20);
/// assert_eq!(recall, 0.8);
/// ```
#[must_use]
pub fn calculate_recall(tp: usize, fn_: usize) -> f64 {
    let denominator = tp + fn_;
    if denominator == 0 {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let recall = (tp as f64) / (denominator as f64);

    debug_assert!(
        (0.0..=1.0).contains(&recall),
        "Recall must be between 0 and 1, got {recall}"
    );

    recall
}

/// Calculate precision and recall from TP, FP, and FN counts.
///
/// # Example
///
/// ```
/// use shelf_eval::metrics::precision_recall::calculate_precision_recall;
///
/// let pr = calculate_precision_recall(8, 2, 3);
/// assert_eq!(pr.precision, 0.8); // 8 / (8 + 2)
/// assert!((pr.recall - 0.7272).abs() < 0.001); // 8 / (8 + 3)
/// ```
pub fn calculate_precision_recall(
    true_positives: usize,
    false_positives: usize,
    false_negatives: usize,
) -> PrecisionRecall {
    PrecisionRecall {
        precision: calculate_precision(true_positives, false_positives),
        recall: calculate_recall(true_positives, false_negatives),
        true_positives,
        false_positives,
        false_negatives,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_precision_recall() {
        let pr = calculate_precision_recall(10, 0, 0);
        assert_eq!(pr.precision, 1.0);
        assert_eq!(pr.recall, 1.0);
    }

    #[test]
    fn test_zero_precision() {
        let pr = calculate_precision_recall(0, 10, 5);
        assert_eq!(pr.precision, 0.0);
        assert_eq!(pr.recall, 0.0);
    }

    #[test]
    fn test_zero_division_is_safe() {
        let pr = calculate_precision_recall(0, 0, 0);
        assert_eq!(pr.precision, 0.0);
        assert_eq!(pr.recall, 0.0);
    }

    #[test]
    fn test_precision_recall_values() {
        let pr = calculate_precision_recall(8, 2, 3);
        assert!((pr.precision - 0.8).abs() < 1e-10);
        assert!((pr.recall - 8.0 / 11.0).abs() < 1e-10);
    }
}
