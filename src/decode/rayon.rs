//! Rayon-parallel decoding (feature-gated).
//!
//! Cells are independent, so they are decoded across the rayon pool and
//! collected back in cell order. Output matches [`super::decode_view`]
//! exactly.

use crate::decode::{check_labels, decode_cell};
use crate::geometry::BoundingBox;
use crate::tensor::TensorView;
use crate::trace::{trace_event, trace_span};
use crate::util::DetPostResult;
use rayon::prelude::*;

/// Parallel counterpart of [`super::decode`].
pub fn decode_par<S: AsRef<str> + Sync>(
    tensor: &[f32],
    num_channels: usize,
    num_elements: usize,
    labels: &[S],
    confidence_threshold: f32,
) -> DetPostResult<Vec<BoundingBox>> {
    let view = TensorView::channel_major(tensor, num_channels, num_elements)?;
    decode_view_par(view, labels, confidence_threshold)
}

/// Parallel counterpart of [`super::decode_view`].
pub fn decode_view_par<S: AsRef<str> + Sync>(
    view: TensorView<'_>,
    labels: &[S],
    confidence_threshold: f32,
) -> DetPostResult<Vec<BoundingBox>> {
    check_labels(&view, labels)?;

    let _span = trace_span!(
        "decode",
        elements = view.num_elements(),
        classes = view.num_classes(),
        parallel = true
    )
    .entered();

    let boxes: Vec<BoundingBox> = (0..view.num_elements())
        .into_par_iter()
        .filter_map(|element| decode_cell(&view, labels, element, confidence_threshold))
        .collect();

    trace_event!("decoded_candidates", count = boxes.len());
    Ok(boxes)
}
