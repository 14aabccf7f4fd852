//! Intersection over Union (IoU) calculation.

use crate::types::BoundingBox;

/// Calculate the Intersection over Union (IoU) between two bounding boxes.
///
/// Widths and heights are pixel-inclusive (`max - min + 1`), so two boxes
/// sharing a single edge row still overlap by one pixel. Label data produced
/// for this workflow relies on that convention.
///
/// # Arguments
///
/// * `bbox1` - First bounding box
/// * `bbox2` - Second bounding box
///
/// # Returns
///
/// Returns a value between 0.0 (no overlap) and 1.0 (identical boxes).
///
/// # Example
///
/// ```
/// use shelf_eval::metrics::iou::calculate_iou;
/// use shelf_eval::types::BoundingBox;
///
/// let bbox1 = BoundingBox::new(0.0, 0.0, 9.0, 9.0);
/// let bbox2 = BoundingBox::new(5.0, 5.0, 14.0, 14.0);
/// let iou = calculate_iou(&bbox1, &bbox2);
/// assert!(iou > 0.0 && iou < 1.0);
/// ```
pub fn calculate_iou(bbox1: &BoundingBox, bbox2: &BoundingBox) -> f64 {
    let x_left = bbox1.x_min.max(bbox2.x_min);
    let y_top = bbox1.y_min.max(bbox2.y_min);
    let x_right = bbox1.x_max.min(bbox2.x_max);
    let y_bottom = bbox1.y_max.min(bbox2.y_max);

    let intersection_area =
        (x_right - x_left + 1.0).max(0.0) * (y_bottom - y_top + 1.0).max(0.0);

    let union_area = bbox1.area() + bbox2.area() - intersection_area;

    // Avoid division by zero; overflowing areas give no usable ratio either
    if !union_area.is_finite() || union_area <= 0.0 {
        return 0.0;
    }

    intersection_area / union_area
}

/// Calculate IoU matrix between two sets of bounding boxes.
///
/// Returns a 2D vector where `result[i][j]` is the IoU between `bboxes1[i]` and `bboxes2[j]`.
///
/// # Example
///
/// ```
/// use shelf_eval::metrics::iou::calculate_iou_matrix;
/// use shelf_eval::types::BoundingBox;
///
/// let bboxes1 = vec![BoundingBox::new(0.0, 0.0, 10.0, 10.0)];
/// let bboxes2 = vec![BoundingBox::new(5.0, 5.0, 15.0, 15.0)];
/// let iou_matrix = calculate_iou_matrix(&bboxes1, &bboxes2);
/// assert_eq!(iou_matrix.len(), 1);
/// assert_eq!(iou_matrix[0].len(), 1);
/// ```
pub fn calculate_iou_matrix(bboxes1: &[BoundingBox], bboxes2: &[BoundingBox]) -> Vec<Vec<f64>> {
    bboxes1
        .iter()
        .map(|bbox1| {
            bboxes2
                .iter()
                .map(|bbox2| calculate_iou(bbox1, bbox2))
                .collect()
        })
        .collect()
}
