//! Property-based tests using proptest
//!
//! These tests verify mathematical properties and invariants that should
//! always hold regardless of the input values.

use proptest::prelude::*;
use shelf_eval::evaluator::evaluate;
use shelf_eval::matching::match_ground_truths;
use shelf_eval::metrics::{calculate_f1_score, calculate_iou, calculate_precision, calculate_recall};
use shelf_eval::types::{BoundingBox, GroundTruthAnnotation, PredictedAnnotation};

fn bbox_strategy() -> impl Strategy<Value = BoundingBox> {
    (0.0f64..100.0, 0.0f64..100.0, 0.0f64..50.0, 0.0f64..50.0)
        .prop_map(|(x, y, w, h)| BoundingBox::new(x, y, x + w, y + h))
}

fn class_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["milk", "bread", "soda", "chips"]).prop_map(str::to_string)
}

fn ground_truth_strategy() -> impl Strategy<Value = Vec<GroundTruthAnnotation>> {
    prop::collection::vec(
        (class_strategy(), bbox_strategy()).prop_map(|(c, b)| GroundTruthAnnotation::new(c, b)),
        0..12,
    )
}

fn prediction_strategy() -> impl Strategy<Value = Vec<PredictedAnnotation>> {
    prop::collection::vec(
        (class_strategy(), bbox_strategy(), 0.0f64..=1.0)
            .prop_map(|(c, b, conf)| PredictedAnnotation::new(c, b, conf)),
        0..12,
    )
}

// Property: IoU is symmetric
proptest! {
    #[test]
    fn prop_iou_symmetric(bbox1 in bbox_strategy(), bbox2 in bbox_strategy()) {
        let iou1 = calculate_iou(&bbox1, &bbox2);
        let iou2 = calculate_iou(&bbox2, &bbox1);

        prop_assert!((iou1 - iou2).abs() < 1e-10,
                "IoU should be symmetric: {} vs {}", iou1, iou2);
    }

    #[test]
    fn prop_iou_range(bbox1 in bbox_strategy(), bbox2 in bbox_strategy()) {
        let iou = calculate_iou(&bbox1, &bbox2);
        prop_assert!((0.0..=1.0).contains(&iou), "IoU should be in [0,1], got {}", iou);
    }

    #[test]
    fn prop_iou_identical(bbox in bbox_strategy()) {
        let iou = calculate_iou(&bbox, &bbox);
        prop_assert!((iou - 1.0).abs() < 1e-10,
                "Identical boxes should have IoU=1.0, got {}", iou);
    }

    #[test]
    fn prop_iou_disjoint_is_zero(bbox in bbox_strategy(), gap in 2.0f64..100.0) {
        let shifted = BoundingBox::new(
            bbox.x_max + gap,
            bbox.y_min,
            bbox.x_max + gap + 10.0,
            bbox.y_max,
        );
        prop_assert_eq!(calculate_iou(&bbox, &shifted), 0.0);
    }
}

// Property: Precision, recall and F1 stay in range
proptest! {
    #[test]
    fn prop_precision_recall_range(tp in 0usize..1000, fp in 0usize..1000, fn_ in 0usize..1000) {
        let precision = calculate_precision(tp, fp);
        let recall = calculate_recall(tp, fn_);
        let f1 = calculate_f1_score(precision, recall);

        prop_assert!((0.0..=1.0).contains(&precision));
        prop_assert!((0.0..=1.0).contains(&recall));
        prop_assert!((0.0..=1.0).contains(&f1));
    }
}

// Property: Matching and scoring behave as pure functions
proptest! {
    #[test]
    fn prop_one_result_per_ground_truth(
        ground_truths in ground_truth_strategy(),
        predictions in prediction_strategy(),
        threshold in 0.0f64..=1.0,
    ) {
        let matches = match_ground_truths(&ground_truths, &predictions, threshold).unwrap();
        prop_assert_eq!(matches.len(), ground_truths.len());

        for (m, gt) in matches.iter().zip(&ground_truths) {
            prop_assert_eq!(&m.ground_truth_class, &gt.class);
            if !m.matched.is_unmatched() {
                prop_assert!(m.iou > threshold);
            }
        }
    }

    #[test]
    fn prop_matching_deterministic(
        ground_truths in ground_truth_strategy(),
        predictions in prediction_strategy(),
    ) {
        let first = match_ground_truths(&ground_truths, &predictions, 0.5).unwrap();
        let second = match_ground_truths(&ground_truths, &predictions, 0.5).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_scores_in_range(
        ground_truths in ground_truth_strategy(),
        predictions in prediction_strategy(),
    ) {
        let report = evaluate(&ground_truths, &predictions).unwrap();
        prop_assert!((0.0..=1.0).contains(&report.precision));
        prop_assert!((0.0..=1.0).contains(&report.recall));
        prop_assert!((0.0..=1.0).contains(&report.f1));
    }

    #[test]
    fn prop_self_evaluation_is_perfect(ground_truths in ground_truth_strategy()) {
        prop_assume!(!ground_truths.is_empty());

        // Exact copies as predictions; only overlapping duplicates of a
        // different class could steal a match, so keep one class.
        let ground_truths: Vec<GroundTruthAnnotation> = ground_truths
            .into_iter()
            .map(|g| GroundTruthAnnotation::new("milk", g.bbox))
            .collect();
        let predictions: Vec<PredictedAnnotation> = ground_truths
            .iter()
            .map(|g| PredictedAnnotation::new(g.class.clone(), g.bbox, 0.9))
            .collect();

        let report = evaluate(&ground_truths, &predictions).unwrap();
        prop_assert!((report.f1 - 1.0).abs() < 1e-10);
    }
}
