//! Scoring many shelf images, per image and pooled.

use shelf_eval::{BoundingBox, GroundTruthAnnotation, ImageAnnotations, PredictedAnnotation, Scorer};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let images: Vec<ImageAnnotations> = (0..8u32)
        .map(|i| {
            let shift = f64::from(i) * 4.0;
            ImageAnnotations {
                image: format!("shelf_{i:02}.jpg"),
                ground_truths: vec![
                    GroundTruthAnnotation::new("milk", BoundingBox::new(10.0, 10.0, 60.0, 120.0)),
                    GroundTruthAnnotation::new("bread", BoundingBox::new(80.0, 10.0, 180.0, 70.0)),
                ],
                predictions: vec![
                    PredictedAnnotation::new(
                        "milk",
                        BoundingBox::new(10.0 + shift, 10.0, 60.0 + shift, 120.0),
                        0.9,
                    ),
                    PredictedAnnotation::new(
                        "bread",
                        BoundingBox::new(80.0 + shift, 10.0, 180.0 + shift, 70.0),
                        0.8,
                    ),
                ],
            }
        })
        .collect();

    let scorer = Scorer::with_iou_threshold(0.6)?;

    println!("Image        | Precision | Recall | F1");
    println!("-------------|-----------|--------|------");
    for (image, report) in images.iter().zip(scorer.score_images(&images)?) {
        println!(
            "{:<12} | {:>9.2} | {:>6.2} | {:>4.2}",
            image.image, report.precision, report.recall, report.f1
        );
    }
    println!();

    let pooled = scorer.score_pooled(&images)?;
    println!("Pooled over {} ground truth boxes:", pooled.matches.len());
    println!("{}", pooled.scores);

    Ok(())
}
