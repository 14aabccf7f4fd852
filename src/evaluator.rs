//! Scoring entry points: one image, many images, or many images pooled.

use rayon::prelude::*;
use tracing::debug;

use crate::config::EvaluationConfig;
use crate::error::Result;
use crate::matching::match_ground_truths;
use crate::metrics::macro_average::{macro_average, per_class_scores};
use crate::threshold::filter_by_confidence;
use crate::types::{
    EvaluationReport, GroundTruthAnnotation, ImageAnnotations, MatchResult, PredictedAnnotation,
    ScoreReport,
};

/// Scores predictions against ground truth.
///
/// Holds only its configuration; every call is a pure function of its inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer {
    config: EvaluationConfig,
}

impl Scorer {
    /// Create a scorer, rejecting out-of-range thresholds.
    pub fn new(config: EvaluationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a scorer with the given IoU threshold and no confidence filter.
    pub fn with_iou_threshold(iou_threshold: f64) -> Result<Self> {
        Self::new(EvaluationConfig {
            iou_threshold,
            ..EvaluationConfig::default()
        })
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Compute macro-averaged precision, recall and F1 for one image.
    ///
    /// # Example
    ///
    /// ```
    /// use shelf_eval::evaluator::Scorer;
    /// use shelf_eval::types::{BoundingBox, GroundTruthAnnotation, PredictedAnnotation};
    ///
    /// let gt = vec![GroundTruthAnnotation::new("cat", BoundingBox::new(0.0, 0.0, 10.0, 10.0))];
    /// let preds = vec![PredictedAnnotation::new("cat", BoundingBox::new(0.0, 0.0, 10.0, 10.0), 0.9)];
    ///
    /// let report = Scorer::default().score(&gt, &preds).unwrap();
    /// assert_eq!(report.f1, 1.0);
    /// ```
    pub fn score(
        &self,
        ground_truths: &[GroundTruthAnnotation],
        predictions: &[PredictedAnnotation],
    ) -> Result<ScoreReport> {
        Ok(self.evaluate(ground_truths, predictions)?.scores)
    }

    /// Like [`Scorer::score`], but also returns per-class scores and match results.
    pub fn evaluate(
        &self,
        ground_truths: &[GroundTruthAnnotation],
        predictions: &[PredictedAnnotation],
    ) -> Result<EvaluationReport> {
        let matches = self.match_image(ground_truths, predictions)?;
        let per_class = per_class_scores(&matches);
        let scores = macro_average(&per_class);

        debug!(
            ground_truths = ground_truths.len(),
            predictions = predictions.len(),
            classes = per_class.len(),
            precision = scores.precision,
            recall = scores.recall,
            f1 = scores.f1,
            "scored image"
        );

        Ok(EvaluationReport {
            scores,
            per_class,
            matches,
        })
    }

    /// Score each image independently, in parallel.
    ///
    /// Reports come back in the same order as `images`.
    pub fn score_images(&self, images: &[ImageAnnotations]) -> Result<Vec<ScoreReport>> {
        images
            .par_iter()
            .map(|image| self.score(&image.ground_truths, &image.predictions))
            .collect()
    }

    /// Match every image separately, then aggregate all match results at once.
    ///
    /// Predictions of one image never match ground truth of another.
    pub fn score_pooled(&self, images: &[ImageAnnotations]) -> Result<EvaluationReport> {
        let per_image = images
            .par_iter()
            .map(|image| self.match_image(&image.ground_truths, &image.predictions))
            .collect::<Result<Vec<_>>>()?;

        let matches: Vec<MatchResult> = per_image.into_iter().flatten().collect();
        let per_class = per_class_scores(&matches);
        let scores = macro_average(&per_class);

        debug!(
            images = images.len(),
            ground_truths = matches.len(),
            f1 = scores.f1,
            "scored pooled images"
        );

        Ok(EvaluationReport {
            scores,
            per_class,
            matches,
        })
    }

    fn match_image(
        &self,
        ground_truths: &[GroundTruthAnnotation],
        predictions: &[PredictedAnnotation],
    ) -> Result<Vec<MatchResult>> {
        for gt in ground_truths {
            gt.validate()?;
        }
        for pred in predictions {
            pred.validate()?;
        }

        let predictions = filter_by_confidence(predictions, self.config.min_confidence)?;
        match_ground_truths(ground_truths, &predictions, self.config.iou_threshold)
    }
}

/// Score one image with the default configuration (IoU threshold 0.5).
pub fn evaluate(
    ground_truths: &[GroundTruthAnnotation],
    predictions: &[PredictedAnnotation],
) -> Result<ScoreReport> {
    Scorer::default().score(ground_truths, predictions)
}
