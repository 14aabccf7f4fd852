//! Error types for the shelf-eval library.

use thiserror::Error;

/// Result type for shelf-eval operations.
pub type Result<T> = std::result::Result<T, ShelfEvalError>;

/// Error types that can occur while loading annotations or scoring detections.
#[derive(Error, Debug)]
pub enum ShelfEvalError {
    /// Error during JSON parsing or serialization.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error during I/O operations.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Invalid annotation data (empty class label, confidence out of range, ...).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid bounding box coordinates.
    ///
    /// This is the invalid-input error for box geometry: non-finite
    /// coordinates, an inverted corner pair or an area too large to represent.
    /// It is kept apart from [`ShelfEvalError::InvalidInput`], which covers
    /// class labels, confidences and image sizes.
    #[error("Invalid bounding box: {0}")]
    InvalidBoundingBox(String),

    /// Missing required field in an annotation export.
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Empty dataset provided where at least one row is required.
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    /// Invalid IoU or confidence threshold.
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),
}
