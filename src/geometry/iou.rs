//! Intersection-over-union.

use crate::geometry::BoundingBox;

/// Intersection-over-union of two boxes.
///
/// The intersection comes from the corner coordinates, the areas from the
/// stored width and height. When the union is not positive (two zero-area
/// boxes that do not overlap) the result is `0.0` instead of `NaN`, which
/// never suppresses anything under a non-negative threshold.
pub fn iou(a: &BoundingBox, b: &BoundingBox) -> f32 {
    let ix1 = a.x1().max(b.x1());
    let iy1 = a.y1().max(b.y1());
    let ix2 = a.x2().min(b.x2());
    let iy2 = a.y2().min(b.y2());

    let inter = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
    let union = a.area() + b.area() - inter;
    if union <= 0.0 {
        return 0.0;
    }
    inter / union
}
