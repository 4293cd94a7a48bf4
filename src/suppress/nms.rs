//! IoU-based non-maximum suppression.

use crate::geometry::{iou, BoundingBox};
use crate::suppress::order::confidence_order;
use crate::suppress::SuppressionMode;
use crate::trace::{trace_event, trace_span};

/// Runs greedy suppression and returns the kept input indices.
///
/// Indices come back in output order (highest confidence first). A box is
/// suppressed when its IoU with an already-kept box is strictly greater than
/// `iou_threshold`.
pub fn suppress_indices(
    boxes: &[BoundingBox],
    iou_threshold: f32,
    mode: SuppressionMode,
) -> Vec<usize> {
    let _span = trace_span!("suppress", candidates = boxes.len()).entered();

    let order = confidence_order(boxes);
    let mut suppressed = vec![false; order.len()];
    let mut kept = Vec::new();

    for (rank, &idx) in order.iter().enumerate() {
        if suppressed[rank] {
            continue;
        }
        kept.push(idx);
        let anchor = &boxes[idx];

        for (later, &other) in order.iter().enumerate().skip(rank + 1) {
            if suppressed[later] {
                continue;
            }
            let candidate = &boxes[other];
            if mode == SuppressionMode::PerClass
                && candidate.class_index() != anchor.class_index()
            {
                continue;
            }
            if iou(anchor, candidate) > iou_threshold {
                suppressed[later] = true;
            }
        }
    }

    trace_event!("suppressed", kept = kept.len(), dropped = boxes.len() - kept.len());
    kept
}

/// Suppresses with an explicit [`SuppressionMode`].
pub fn suppress_with_mode(
    boxes: Vec<BoundingBox>,
    iou_threshold: f32,
    mode: SuppressionMode,
) -> Vec<BoundingBox> {
    let kept = suppress_indices(&boxes, iou_threshold, mode);
    let mut slots: Vec<Option<BoundingBox>> = boxes.into_iter().map(Some).collect();
    kept.into_iter().filter_map(|idx| slots[idx].take()).collect()
}

/// Class-agnostic greedy suppression.
///
/// Returns the surviving boxes ordered by descending confidence. Overlapping
/// boxes of different classes still suppress each other.
pub fn suppress(boxes: Vec<BoundingBox>, iou_threshold: f32) -> Vec<BoundingBox> {
    suppress_with_mode(boxes, iou_threshold, SuppressionMode::ClassAgnostic)
}

/// Greedy suppression restricted to boxes of the same class.
pub fn suppress_per_class(boxes: Vec<BoundingBox>, iou_threshold: f32) -> Vec<BoundingBox> {
    suppress_with_mode(boxes, iou_threshold, SuppressionMode::PerClass)
}
