//! Confidence ordering for suppression.

use crate::geometry::BoundingBox;
use std::cmp::Ordering;

fn confidence_cmp_desc(a: &BoundingBox, b: &BoundingBox) -> Ordering {
    b.confidence().total_cmp(&a.confidence())
}

/// Returns indices of `boxes` sorted by descending confidence.
///
/// The sort is stable: equal confidences keep their input order.
pub fn confidence_order(boxes: &[BoundingBox]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..boxes.len()).collect();
    order.sort_by(|&a, &b| confidence_cmp_desc(&boxes[a], &boxes[b]));
    order
}
