//! Metrics calculation modules for shelf detection evaluation.

pub mod iou;
pub mod precision_recall;
pub mod f1_score;
pub mod macro_average;

pub use iou::{calculate_iou, calculate_iou_matrix};
pub use precision_recall::{calculate_precision, calculate_precision_recall, calculate_recall, PrecisionRecall};
pub use f1_score::{calculate_f1_from_pr, calculate_f1_score};
pub use macro_average::{macro_average, per_class_scores, ClassRegistry};
