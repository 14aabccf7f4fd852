//! Loading ground truth from annotation exports and predictions from JSON.
//!
//! Ground truth comes from an NDJSON export, one data row per line:
//!
//! ```json
//! {"data_row": {"external_id": "shelf_01.jpg"},
//!  "media_attributes": {"width": 640, "height": 480},
//!  "projects": {"p1": {"labels": [{"annotations": {"objects": [
//!     {"name": "cereal", "bounding_box": {"left": 10, "top": 20, "width": 30, "height": 40}}
//!  ]}}]}}}
//! ```
//!
//! Predictions are a JSON array of `{"class", "bbox": [x_min, y_min, x_max, y_max], "confidence"}`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, ShelfEvalError};
use crate::types::{BoundingBox, GroundTruthAnnotation, PredictedAnnotation};

/// One line of an annotation export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_row: Option<DataRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_attributes: Option<MediaAttributes>,
    #[serde(default)]
    pub projects: BTreeMap<String, ExportProject>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MediaAttributes {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportProject {
    #[serde(default)]
    pub labels: Vec<ExportLabel>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportLabel {
    #[serde(default)]
    pub annotations: ExportAnnotations,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportAnnotations {
    #[serde(default)]
    pub objects: Vec<ExportObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportObject {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<ExportBox>,
}

/// Box in left/top/width/height form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExportBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ExportRow {
    /// Image file name for this row: the external id, else the last path
    /// segment of the row data.
    pub fn image_name(&self) -> Option<&str> {
        let data_row = self.data_row.as_ref()?;
        data_row.external_id.as_deref().or_else(|| {
            data_row
                .row_data
                .as_deref()
                .and_then(|url| url.rsplit('/').next())
                .filter(|name| !name.is_empty())
        })
    }

    /// All box objects of every project and label, as ground truth.
    ///
    /// Objects without a bounding box (polygons, points, ...) are skipped.
    pub fn ground_truths(&self) -> Result<Vec<GroundTruthAnnotation>> {
        let mut ground_truths = Vec::new();

        for project in self.projects.values() {
            for label in &project.labels {
                for object in &label.annotations.objects {
                    let Some(b) = object.bounding_box else {
                        warn!(class = %object.name, "skipping export object without bounding box");
                        continue;
                    };
                    let bbox = BoundingBox::from_ltwh(b.left, b.top, b.width, b.height)?;
                    let annotation = GroundTruthAnnotation::new(object.name.clone(), bbox);
                    annotation.validate()?;
                    ground_truths.push(annotation);
                }
            }
        }

        Ok(ground_truths)
    }
}

/// Load every row of an NDJSON export file.
pub fn load_export_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<ExportRow>> {
    let reader = BufReader::new(File::open(path)?);
    parse_export(reader)
}

/// Parse every row of an NDJSON export held in memory.
pub fn load_export_from_string(ndjson: &str) -> Result<Vec<ExportRow>> {
    parse_export(ndjson.as_bytes())
}

fn parse_export<R: BufRead>(reader: R) -> Result<Vec<ExportRow>> {
    let mut rows = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        rows.push(serde_json::from_str(&line)?);
    }
    Ok(rows)
}

/// Load ground truth from the first row of an NDJSON export file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, has no rows, or
/// contains an invalid box.
///
/// # Example
///
/// ```no_run
/// use shelf_eval::loader::load_ground_truth_from_file;
///
/// let ground_truths = load_ground_truth_from_file("export.ndjson").unwrap();
/// println!("Loaded {} ground truth boxes", ground_truths.len());
/// ```
pub fn load_ground_truth_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<GroundTruthAnnotation>> {
    first_row_ground_truths(&load_export_from_file(path)?)
}

/// Load ground truth from the first row of an NDJSON export string.
///
/// # Example
///
/// ```
/// use shelf_eval::loader::load_ground_truth_from_string;
///
/// let ndjson = r#"{"projects": {"p": {"labels": [{"annotations": {"objects": [
///     {"name": "cereal", "bounding_box": {"left": 10, "top": 20, "width": 30, "height": 40}}
/// ]}}]}}}"#;
/// let ground_truths = load_ground_truth_from_string(ndjson).unwrap();
/// assert_eq!(ground_truths[0].bbox.x_max, 40.0);
/// assert_eq!(ground_truths[0].bbox.y_max, 60.0);
/// ```
pub fn load_ground_truth_from_string(ndjson: &str) -> Result<Vec<GroundTruthAnnotation>> {
    first_row_ground_truths(&load_export_from_string(ndjson)?)
}

fn first_row_ground_truths(rows: &[ExportRow]) -> Result<Vec<GroundTruthAnnotation>> {
    let row = rows.first().ok_or_else(|| {
        ShelfEvalError::EmptyDataset("Export must contain at least one row".to_string())
    })?;
    row.ground_truths()
}

/// Load predictions from a JSON array file.
pub fn load_predictions_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<PredictedAnnotation>> {
    let mut json = String::new();
    File::open(path)?.read_to_string(&mut json)?;
    load_predictions_from_string(&json)
}

/// Load predictions from a JSON array string.
pub fn load_predictions_from_string(json: &str) -> Result<Vec<PredictedAnnotation>> {
    let predictions: Vec<PredictedAnnotation> = serde_json::from_str(json)?;
    for prediction in &predictions {
        prediction.validate()?;
    }
    Ok(predictions)
}
