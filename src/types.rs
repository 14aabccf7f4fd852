//! Core data types for annotations, match results and score reports.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShelfEvalError};

/// An axis-aligned bounding box in pixel coordinates.
///
/// Coordinates are in XYXY (corner) format where:
/// - x_min, y_min: top-left corner
/// - x_max, y_max: bottom-right corner
///
/// Widths and heights follow the pixel-inclusive convention: a box spanning
/// `x_min..=x_max` covers `x_max - x_min + 1` pixels.
///
/// Serialized as a JSON array `[x_min, y_min, x_max, y_max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl BoundingBox {
    /// Create a new bounding box without validation.
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Create a new bounding box, rejecting invalid coordinates.
    ///
    /// # Example
    ///
    /// ```
    /// use shelf_eval::types::BoundingBox;
    ///
    /// assert!(BoundingBox::try_new(0.0, 0.0, 10.0, 10.0).is_ok());
    /// assert!(BoundingBox::try_new(10.0, 0.0, 0.0, 10.0).is_err());
    /// ```
    pub fn try_new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Result<Self> {
        let bbox = Self::new(x_min, y_min, x_max, y_max);
        bbox.validate()?;
        Ok(bbox)
    }

    /// Build a box from a left/top corner and a width/height.
    pub fn from_ltwh(left: f64, top: f64, width: f64, height: f64) -> Result<Self> {
        Self::try_new(left, top, left + width, top + height)
    }

    /// Pixel-inclusive width (`x_max - x_min + 1`).
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min + 1.0
    }

    /// Pixel-inclusive height (`y_max - y_min + 1`).
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min + 1.0
    }

    /// Pixel-inclusive area.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Check if the bounding box is valid.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Validate coordinates, returning a descriptive error for invalid boxes.
    pub fn validate(&self) -> Result<()> {
        let coords = [self.x_min, self.y_min, self.x_max, self.y_max];
        if coords.iter().any(|c| !c.is_finite()) {
            return Err(ShelfEvalError::InvalidBoundingBox(format!(
                "non-finite coordinates {coords:?}"
            )));
        }
        if self.x_min > self.x_max || self.y_min > self.y_max {
            return Err(ShelfEvalError::InvalidBoundingBox(format!(
                "min corner exceeds max corner in {coords:?}"
            )));
        }
        if self.width() <= 0.0 || self.height() <= 0.0 {
            return Err(ShelfEvalError::InvalidBoundingBox(format!(
                "non-positive area in {coords:?}"
            )));
        }
        if !self.area().is_finite() {
            return Err(ShelfEvalError::InvalidBoundingBox(format!(
                "area overflows in {coords:?}"
            )));
        }
        Ok(())
    }
}

impl TryFrom<[f64; 4]> for BoundingBox {
    type Error = ShelfEvalError;

    fn try_from(coords: [f64; 4]) -> Result<Self> {
        Self::try_new(coords[0], coords[1], coords[2], coords[3])
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(bbox: BoundingBox) -> Self {
        [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max]
    }
}

/// A human-labelled box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundTruthAnnotation {
    pub class: String,
    pub bbox: BoundingBox,
}

impl GroundTruthAnnotation {
    pub fn new(class: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            class: class.into(),
            bbox,
        }
    }

    /// Validate the class label and the box.
    pub fn validate(&self) -> Result<()> {
        validate_class(&self.class)?;
        self.bbox.validate()
    }
}

/// A box produced by a detection model.
///
/// The confidence is carried along for filtering and reporting; scoring itself
/// ignores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedAnnotation {
    pub class: String,
    pub bbox: BoundingBox,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

fn default_confidence() -> f64 {
    1.0
}

impl PredictedAnnotation {
    pub fn new(class: impl Into<String>, bbox: BoundingBox, confidence: f64) -> Self {
        Self {
            class: class.into(),
            bbox,
            confidence,
        }
    }

    /// Validate the class label, the confidence and the box.
    pub fn validate(&self) -> Result<()> {
        validate_class(&self.class)?;
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(ShelfEvalError::InvalidInput(format!(
                "confidence must be between 0.0 and 1.0, got {}",
                self.confidence
            )));
        }
        self.bbox.validate()
    }
}

fn validate_class(class: &str) -> Result<()> {
    if class.is_empty() {
        return Err(ShelfEvalError::InvalidInput(
            "class label must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Outcome of matching one ground truth against the prediction pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchedLabel {
    /// The best-IoU prediction exceeded the threshold and carried this class.
    Class(String),
    /// No prediction exceeded the IoU threshold.
    Unmatched,
}

impl MatchedLabel {
    /// The matched class name, or `None` for [`MatchedLabel::Unmatched`].
    pub fn class(&self) -> Option<&str> {
        match self {
            MatchedLabel::Class(name) => Some(name),
            MatchedLabel::Unmatched => None,
        }
    }

    pub fn is_unmatched(&self) -> bool {
        matches!(self, MatchedLabel::Unmatched)
    }
}

impl fmt::Display for MatchedLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchedLabel::Class(name) => f.pad(name),
            MatchedLabel::Unmatched => f.pad("<unmatched>"),
        }
    }
}

/// Match result for a single ground-truth annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Class of the ground truth this result belongs to.
    pub ground_truth_class: String,
    /// Matched predicted class, or unmatched.
    pub matched: MatchedLabel,
    /// Best IoU found against any prediction (0.0 if none overlapped).
    pub iou: f64,
    /// Index of the best-IoU prediction in the input order, if any overlapped.
    pub prediction_index: Option<usize>,
}

/// Macro-averaged precision, recall and F1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl fmt::Display for ScoreReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Precision: {:.2}", self.precision)?;
        writeln!(f, "Recall: {:.2}", self.recall)?;
        write!(f, "F1-Score: {:.2}", self.f1)
    }
}

/// Per-class scores and confusion counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassScore {
    pub class: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

/// Full evaluation output: the macro scores, their per-class breakdown and the
/// per-ground-truth match results they were computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub scores: ScoreReport,
    pub per_class: Vec<ClassScore>,
    pub matches: Vec<MatchResult>,
}

/// Annotations for one image, used for batch evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageAnnotations {
    pub image: String,
    pub ground_truths: Vec<GroundTruthAnnotation>,
    pub predictions: Vec<PredictedAnnotation>,
}
