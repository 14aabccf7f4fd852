//! Greedy best-IoU matching of ground truth against predictions.

use crate::error::Result;
use crate::metrics::iou::calculate_iou;
use crate::threshold::validate_threshold;
use crate::types::{GroundTruthAnnotation, MatchResult, MatchedLabel, PredictedAnnotation};

/// Default IoU a match has to exceed.
pub const DEFAULT_IOU_THRESHOLD: f64 = 0.5;

/// Match every ground truth to the prediction it overlaps most.
///
/// For each ground truth the full prediction list is scanned and the
/// prediction with the strictly greatest IoU is kept. On equal IoU the
/// earliest prediction in `predictions` wins, so results depend only on input
/// order. The ground truth is matched to that prediction's class only if the
/// IoU strictly exceeds `iou_threshold`.
///
/// Predictions are never removed from the pool: one prediction can be the
/// best match of several ground truths.
///
/// # Arguments
///
/// * `ground_truths` - Ground truth annotations for one image
/// * `predictions` - Predictions for the same image
/// * `iou_threshold` - IoU a match has to exceed, in [0.0, 1.0]
///
/// # Returns
///
/// One `MatchResult` per ground truth, in ground-truth order.
///
/// # Example
///
/// ```
/// use shelf_eval::matching::match_ground_truths;
/// use shelf_eval::types::{BoundingBox, GroundTruthAnnotation, MatchedLabel, PredictedAnnotation};
///
/// let gt = vec![GroundTruthAnnotation::new("cat", BoundingBox::new(0.0, 0.0, 10.0, 10.0))];
/// let preds = vec![PredictedAnnotation::new("cat", BoundingBox::new(0.0, 0.0, 10.0, 10.0), 0.9)];
///
/// let matches = match_ground_truths(&gt, &preds, 0.5).unwrap();
/// assert_eq!(matches[0].matched, MatchedLabel::Class("cat".to_string()));
/// ```
pub fn match_ground_truths(
    ground_truths: &[GroundTruthAnnotation],
    predictions: &[PredictedAnnotation],
    iou_threshold: f64,
) -> Result<Vec<MatchResult>> {
    validate_threshold(iou_threshold)?;

    let matches = ground_truths
        .iter()
        .map(|gt| {
            let mut best_iou = 0.0;
            let mut best_idx: Option<usize> = None;

            for (pred_idx, pred) in predictions.iter().enumerate() {
                let iou = calculate_iou(&gt.bbox, &pred.bbox);
                if iou > best_iou {
                    best_iou = iou;
                    best_idx = Some(pred_idx);
                }
            }

            let matched = match best_idx {
                Some(idx) if best_iou > iou_threshold => {
                    MatchedLabel::Class(predictions[idx].class.clone())
                }
                _ => MatchedLabel::Unmatched,
            };

            MatchResult {
                ground_truth_class: gt.class.clone(),
                matched,
                iou: best_iou,
                prediction_index: best_idx,
            }
        })
        .collect();

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundingBox;

    fn gt(class: &str, bbox: [f64; 4]) -> GroundTruthAnnotation {
        GroundTruthAnnotation::new(class, BoundingBox::new(bbox[0], bbox[1], bbox[2], bbox[3]))
    }

    fn pred(class: &str, bbox: [f64; 4]) -> PredictedAnnotation {
        PredictedAnnotation::new(
            class,
            BoundingBox::new(bbox[0], bbox[1], bbox[2], bbox[3]),
            0.9,
        )
    }

    #[test]
    fn test_perfect_match() {
        let matches = match_ground_truths(
            &[gt("cat", [10.0, 10.0, 50.0, 50.0])],
            &[pred("cat", [10.0, 10.0, 50.0, 50.0])],
            0.5,
        )
        .unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].matched, MatchedLabel::Class("cat".to_string()));
        assert!((matches[0].iou - 1.0).abs() < 1e-10);
        assert_eq!(matches[0].prediction_index, Some(0));
    }

    #[test]
    fn test_no_match() {
        let matches = match_ground_truths(
            &[gt("cat", [0.0, 0.0, 10.0, 10.0])],
            &[pred("dog", [100.0, 100.0, 110.0, 110.0])],
            0.5,
        )
        .unwrap();

        assert!(matches[0].matched.is_unmatched());
        assert_eq!(matches[0].iou, 0.0);
        assert_eq!(matches[0].prediction_index, None);
    }

    #[test]
    fn test_threshold_is_strict() {
        // Two 10x10 boxes offset by 5 rows: IoU = 50 / 150 = 1/3
        let ground_truths = [gt("cat", [0.0, 0.0, 9.0, 9.0])];
        let predictions = [pred("cat", [0.0, 5.0, 9.0, 14.0])];

        let at = match_ground_truths(&ground_truths, &predictions, 1.0 / 3.0).unwrap();
        assert!(at[0].matched.is_unmatched());

        let below = match_ground_truths(&ground_truths, &predictions, 0.3).unwrap();
        assert_eq!(below[0].matched, MatchedLabel::Class("cat".to_string()));
    }

    #[test]
    fn test_first_prediction_wins_ties() {
        let matches = match_ground_truths(
            &[gt("cat", [0.0, 0.0, 10.0, 10.0])],
            &[
                pred("dog", [0.0, 0.0, 10.0, 10.0]),
                pred("cat", [0.0, 0.0, 10.0, 10.0]),
            ],
            0.5,
        )
        .unwrap();

        assert_eq!(matches[0].matched, MatchedLabel::Class("dog".to_string()));
        assert_eq!(matches[0].prediction_index, Some(0));
    }

    #[test]
    fn test_prediction_can_match_several_ground_truths() {
        let matches = match_ground_truths(
            &[
                gt("cat", [0.0, 0.0, 10.0, 10.0]),
                gt("cat", [0.0, 0.0, 10.0, 9.0]),
            ],
            &[pred("cat", [0.0, 0.0, 10.0, 10.0])],
            0.5,
        )
        .unwrap();

        assert_eq!(matches[0].prediction_index, Some(0));
        assert_eq!(matches[1].prediction_index, Some(0));
        assert!(!matches[0].matched.is_unmatched());
        assert!(!matches[1].matched.is_unmatched());
    }

    #[test]
    fn test_invalid_threshold() {
        assert!(match_ground_truths(&[], &[], 1.5).is_err());
        assert!(match_ground_truths(&[], &[], -0.1).is_err());
    }

    #[test]
    fn test_empty_inputs() {
        assert!(match_ground_truths(&[], &[pred("cat", [0.0, 0.0, 1.0, 1.0])], 0.5)
            .unwrap()
            .is_empty());

        let matches = match_ground_truths(&[gt("cat", [0.0, 0.0, 1.0, 1.0])], &[], 0.5).unwrap();
        assert!(matches[0].matched.is_unmatched());
    }
}
