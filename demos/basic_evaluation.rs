//! Basic evaluation example demonstrating core functionality.

use shelf_eval::{
    calculate_iou, evaluator::Scorer, loader::load_ground_truth_from_string,
    loader::load_predictions_from_string, stats::DetectionStats, BoundingBox,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Shelf Detection Evaluation Example ===\n");

    // Example 1: IoU Calculation
    println!("1. IoU Calculation");
    let bbox1 = BoundingBox::try_new(10.0, 10.0, 59.0, 59.0)?;
    let bbox2 = BoundingBox::try_new(30.0, 30.0, 79.0, 79.0)?;
    println!("   IoU between overlapping boxes: {:.4}", calculate_iou(&bbox1, &bbox2));
    println!();

    // Example 2: Load ground truth from an annotation export
    println!("2. Loading Ground Truth");
    let export = r#"{"data_row": {"external_id": "shelf_01.jpg"}, "media_attributes": {"width": 640, "height": 480}, "projects": {"p1": {"labels": [{"annotations": {"objects": [
        {"name": "cereal", "bounding_box": {"left": 100, "top": 100, "width": 80, "height": 150}},
        {"name": "cereal", "bounding_box": {"left": 190, "top": 100, "width": 80, "height": 150}},
        {"name": "soda", "bounding_box": {"left": 350, "top": 200, "width": 40, "height": 100}}
    ]}}]}}}"#
        .replace('\n', "");
    let ground_truths = load_ground_truth_from_string(&export)?;
    println!("   Loaded {} ground truth boxes", ground_truths.len());
    println!();

    // Example 3: Load predictions
    println!("3. Loading Predictions");
    let predictions = load_predictions_from_string(
        r#"[
            {"class": "cereal", "bbox": [102, 98, 181, 252], "confidence": 0.93},
            {"class": "soda", "bbox": [192, 101, 268, 249], "confidence": 0.71},
            {"class": "soda", "bbox": [351, 203, 389, 301], "confidence": 0.88},
            {"class": "chips", "bbox": [500, 20, 600, 120], "confidence": 0.15}
        ]"#,
    )?;
    println!("   Loaded {} predictions", predictions.len());
    println!();

    // Example 4: Product counts
    println!("4. Product Counts (confidence >= 0.25)");
    let stats = DetectionStats::from_predictions(&predictions, 0.25)?;
    for line in stats.to_string().lines() {
        println!("   {line}");
    }
    println!();

    // Example 5: Scoring
    println!("5. Scoring at IoU > 0.5");
    let report = Scorer::default().evaluate(&ground_truths, &predictions)?;
    for m in &report.matches {
        println!(
            "   {:<8} -> {:<12} (IoU {:.3})",
            m.ground_truth_class, m.matched, m.iou
        );
    }
    println!();
    println!("   Per-Class Scores:");
    for class in &report.per_class {
        println!(
            "   ├─ {}: P={:.2} R={:.2} F1={:.2}",
            class.class, class.precision, class.recall, class.f1
        );
    }
    println!();
    println!("{}", report.scores);
    println!();

    println!("=== Example Complete ===");

    Ok(())
}
