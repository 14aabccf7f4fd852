//! YOLO label conversion and training dataset assembly.
//!
//! An assembled dataset looks like:
//!
//! ```text
//! output/
//!   images/shelf_01.jpg
//!   labels/shelf_01.txt   one "class_id x_center y_center width height" line per box
//!   classes.txt           class names, line number = class id
//! ```

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, ShelfEvalError};
use crate::loader::ExportRow;
use crate::metrics::macro_average::ClassRegistry;
use crate::types::{BoundingBox, GroundTruthAnnotation};

const IMAGE_EXTENSIONS: [&str; 2] = ["jpg", "png"];

/// One normalized YOLO label line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YoloLabel {
    pub class_id: usize,
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

impl YoloLabel {
    /// Normalize a corner box against the image size.
    ///
    /// Width and height here are plain coordinate differences, not the
    /// pixel-inclusive extents used for IoU.
    ///
    /// # Example
    ///
    /// ```
    /// use shelf_eval::dataset::YoloLabel;
    /// use shelf_eval::types::BoundingBox;
    ///
    /// let label = YoloLabel::from_box(3, &BoundingBox::new(0.0, 0.0, 320.0, 240.0), 640, 480).unwrap();
    /// assert_eq!(label.to_string(), "3 0.25 0.25 0.5 0.5");
    /// ```
    pub fn from_box(
        class_id: usize,
        bbox: &BoundingBox,
        image_width: u32,
        image_height: u32,
    ) -> Result<Self> {
        if image_width == 0 || image_height == 0 {
            return Err(ShelfEvalError::InvalidInput(format!(
                "image size must be positive, got {image_width}x{image_height}"
            )));
        }
        bbox.validate()?;

        let image_width = f64::from(image_width);
        let image_height = f64::from(image_height);
        let width = bbox.x_max - bbox.x_min;
        let height = bbox.y_max - bbox.y_min;

        Ok(Self {
            class_id,
            x_center: (bbox.x_min + width / 2.0) / image_width,
            y_center: (bbox.y_min + height / 2.0) / image_height,
            width: width / image_width,
            height: height / image_height,
        })
    }
}

impl fmt::Display for YoloLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.class_id, self.x_center, self.y_center, self.width, self.height
        )
    }
}

/// Convert ground truth to labels, registering unseen classes.
pub fn to_yolo_labels(
    ground_truths: &[GroundTruthAnnotation],
    registry: &mut ClassRegistry,
    image_width: u32,
    image_height: u32,
) -> Result<Vec<YoloLabel>> {
    ground_truths
        .iter()
        .map(|gt| {
            let class_id = registry.register(&gt.class);
            YoloLabel::from_box(class_id, &gt.bbox, image_width, image_height)
        })
        .collect()
}

/// Label file name for an image: `shelf.jpg` -> `shelf.txt`.
pub fn label_file_name(image_name: &str) -> String {
    let path = Path::new(image_name);
    match path.file_stem() {
        Some(stem) => format!("{}.txt", stem.to_string_lossy()),
        None => format!("{image_name}.txt"),
    }
}

/// Write one label per line. An empty slice produces an empty file.
pub fn write_label_file<P: AsRef<Path>>(path: P, labels: &[YoloLabel]) -> Result<()> {
    let mut writer = BufWriter::new(fs::File::create(path)?);
    for label in labels {
        writeln!(writer, "{label}")?;
    }
    writer.flush()?;
    Ok(())
}

/// What [`assemble_dataset`] produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub images: usize,
    pub labels: usize,
    pub images_without_annotations: usize,
    /// Export rows dropped because they held an invalid box.
    pub rows_skipped: usize,
    pub classes: Vec<String>,
}

/// Copy images and write YOLO labels for every `.jpg`/`.png` in `images_dir`.
///
/// Annotations are looked up by image name in `rows`. Images without a row,
/// or whose row lacks media attributes, get an empty label file. A row with an
/// invalid box is skipped as a whole and counted in
/// [`DatasetSummary::rows_skipped`]; the rest of the dataset is still written.
pub fn assemble_dataset(
    rows: &[ExportRow],
    images_dir: &Path,
    output_dir: &Path,
) -> Result<DatasetSummary> {
    let out_images = output_dir.join("images");
    let out_labels = output_dir.join("labels");
    fs::create_dir_all(&out_images)?;
    fs::create_dir_all(&out_labels)?;

    let mut rows_by_image: HashMap<&str, Vec<&ExportRow>> = HashMap::new();
    for row in rows {
        match row.image_name() {
            Some(name) => rows_by_image.entry(name).or_default().push(row),
            None => warn!("skipping export row without an image name"),
        }
    }

    let mut registry = ClassRegistry::new();
    let mut summary = DatasetSummary::default();

    for image_path in list_images(images_dir)? {
        let Some(image_name) = image_path.file_name().and_then(|n| n.to_str()) else {
            warn!(path = %image_path.display(), "skipping image with a non-UTF-8 name");
            continue;
        };

        fs::copy(&image_path, out_images.join(image_name))?;
        summary.images += 1;

        let mut labels = Vec::new();
        for row in rows_by_image.get(image_name).into_iter().flatten() {
            let ground_truths = match row.ground_truths() {
                Ok(ground_truths) => ground_truths,
                Err(err) => {
                    warn!(
                        image = image_name,
                        error = %err,
                        "invalid annotation in export row, labels skipped"
                    );
                    summary.rows_skipped += 1;
                    continue;
                }
            };
            if ground_truths.is_empty() {
                continue;
            }
            let Some(media) = row.media_attributes else {
                warn!(image = image_name, "no image size in export row, labels skipped");
                continue;
            };
            labels.extend(to_yolo_labels(
                &ground_truths,
                &mut registry,
                media.width,
                media.height,
            )?);
        }

        if labels.is_empty() {
            summary.images_without_annotations += 1;
        }
        summary.labels += labels.len();
        write_label_file(out_labels.join(label_file_name(image_name)), &labels)?;
    }

    let mut classes = BufWriter::new(fs::File::create(output_dir.join("classes.txt"))?);
    for name in registry.names() {
        writeln!(classes, "{name}")?;
    }
    classes.flush()?;

    summary.classes = registry.names().to_vec();
    info!(
        images = summary.images,
        labels = summary.labels,
        classes = summary.classes.len(),
        "dataset assembled"
    );

    Ok(summary)
}

fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_image = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
        if path.is_file() && is_image {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}
