//! # shelf-eval
//!
//! Evaluation of retail shelf product detection against labelled ground truth.
//!
//! The core is a scorer that matches every ground-truth box to its best-IoU
//! prediction and reports macro-averaged precision, recall and F1 over the
//! product classes. Around it sit the pieces of an evaluation workflow:
//! - loading ground truth from an NDJSON annotation export
//! - loading detector output from JSON
//! - confidence filtering and per-class product counts
//! - writing YOLO label files and assembling a training dataset
//!
//! ## Quick Start
//!
//! ```rust
//! use shelf_eval::evaluator::Scorer;
//! use shelf_eval::types::{BoundingBox, GroundTruthAnnotation, PredictedAnnotation};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let ground_truths = vec![
//!     GroundTruthAnnotation::new("cereal", BoundingBox::try_new(10.0, 10.0, 60.0, 90.0)?),
//! ];
//! let predictions = vec![
//!     PredictedAnnotation::new("cereal", BoundingBox::try_new(12.0, 10.0, 60.0, 88.0)?, 0.91),
//! ];
//!
//! let report = Scorer::default().score(&ground_truths, &predictions)?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Box convention
//!
//! Boxes are `[x_min, y_min, x_max, y_max]` in pixels. Widths and heights are
//! pixel-inclusive: `x_max - x_min + 1`.

pub mod error;
pub mod types;
pub mod config;
pub mod loader;
pub mod threshold;
pub mod metrics;
pub mod matching;
pub mod evaluator;
pub mod stats;
pub mod dataset;

// Re-export commonly used types and functions
pub use config::EvaluationConfig;
pub use error::{Result, ShelfEvalError};
pub use evaluator::{evaluate, Scorer};
pub use loader::{load_ground_truth_from_file, load_predictions_from_file};
pub use matching::match_ground_truths;
pub use metrics::iou::calculate_iou;
pub use threshold::filter_by_confidence;
pub use types::{
    BoundingBox, ClassScore, EvaluationReport, GroundTruthAnnotation, ImageAnnotations,
    MatchResult, MatchedLabel, PredictedAnnotation, ScoreReport,
};
