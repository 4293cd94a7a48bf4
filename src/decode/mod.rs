//! Decoding of raw prediction tensors into candidate boxes.
//!
//! Each cell picks its best class, is kept when that score clears the
//! confidence threshold, and is dropped when its box leaves the unit frame.
//! Dimension and label checks run before any cell is read; per-cell
//! rejections are filtering, not errors.

#[cfg(feature = "rayon")]
pub mod rayon;

use crate::geometry::BoundingBox;
use crate::tensor::TensorView;
use crate::trace::{trace_event, trace_span};
use crate::util::{DetPostError, DetPostResult};

/// Returns the index and value of the highest score.
///
/// Comparison is strict, so the lowest index wins ties. `NaN` never wins;
/// an iterator that is empty or all `NaN` yields `None`.
pub fn best_class<I>(scores: I) -> Option<(usize, f32)>
where
    I: IntoIterator<Item = f32>,
{
    let mut best: Option<(usize, f32)> = None;
    for (idx, score) in scores.into_iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((idx, score)),
        }
    }
    best
}

pub(crate) fn check_labels<S>(view: &TensorView<'_>, labels: &[S]) -> DetPostResult<()> {
    let expected = view.num_classes();
    if labels.len() != expected {
        return Err(DetPostError::LabelCountMismatch {
            expected,
            got: labels.len(),
        });
    }
    Ok(())
}

/// Decodes a single cell, or `None` if it is filtered out.
pub(crate) fn decode_cell<S: AsRef<str>>(
    view: &TensorView<'_>,
    labels: &[S],
    element: usize,
    confidence_threshold: f32,
) -> Option<BoundingBox> {
    let (class_index, confidence) = best_class(view.class_scores(element)?)?;
    if confidence <= confidence_threshold || confidence_threshold.is_nan() {
        return None;
    }
    let label = labels.get(class_index)?;
    BoundingBox::new(
        view.center_box(element)?,
        confidence,
        class_index,
        label.as_ref(),
    )
}

/// Decodes a channel-major tensor of `num_channels * num_elements` values.
///
/// `labels` must hold one entry per class channel (`num_channels - 4`).
/// Boxes come back in cell order; an empty result is a normal outcome.
pub fn decode<S: AsRef<str>>(
    tensor: &[f32],
    num_channels: usize,
    num_elements: usize,
    labels: &[S],
    confidence_threshold: f32,
) -> DetPostResult<Vec<BoundingBox>> {
    let view = TensorView::channel_major(tensor, num_channels, num_elements)?;
    decode_view(view, labels, confidence_threshold)
}

/// Decodes every cell of a validated view.
pub fn decode_view<S: AsRef<str>>(
    view: TensorView<'_>,
    labels: &[S],
    confidence_threshold: f32,
) -> DetPostResult<Vec<BoundingBox>> {
    check_labels(&view, labels)?;

    let _span = trace_span!(
        "decode",
        elements = view.num_elements(),
        classes = view.num_classes()
    )
    .entered();

    let boxes: Vec<BoundingBox> = (0..view.num_elements())
        .filter_map(|element| decode_cell(&view, labels, element, confidence_threshold))
        .collect();

    trace_event!("decoded_candidates", count = boxes.len());
    Ok(boxes)
}

#[cfg(test)]
mod tests {
    use super::{best_class, decode};
    use crate::util::DetPostError;

    #[test]
    fn best_class_prefers_first_maximum() {
        assert_eq!(best_class([0.2, 0.7, 0.7, 0.1]), Some((1, 0.7)));
        assert_eq!(best_class([f32::NAN, 0.3]), Some((1, 0.3)));
        assert_eq!(best_class([f32::NAN]), None);
        assert_eq!(best_class(std::iter::empty()), None);
    }

    #[test]
    fn decode_checks_labels_before_reading() {
        let tensor = [0.0f32; 12];
        let err = decode(&tensor, 6, 2, &["a"], 0.3).unwrap_err();
        assert_eq!(err, DetPostError::LabelCountMismatch { expected: 2, got: 1 });
    }

    #[test]
    fn decode_reports_shape_before_labels() {
        let tensor = [0.0f32; 11];
        let err = decode(&tensor, 6, 2, &["a"], 0.3).unwrap_err();
        assert!(matches!(err, DetPostError::TensorShapeMismatch { .. }));
    }
}
