//! Configured decode-then-suppress pipeline.
//!
//! `PostProcessor` owns a label list and a [`PostProcessConfig`] and turns a
//! prediction tensor into final detections in one call. The free functions
//! in [`crate::decode`] and [`crate::suppress`] remain available for callers
//! that want to run the stages separately.

use crate::decode::decode_view;
#[cfg(feature = "rayon")]
use crate::decode::rayon::decode_view_par;
use crate::geometry::BoundingBox;
use crate::suppress::nms::suppress_with_mode;
use crate::suppress::SuppressionMode;
use crate::tensor::{TensorLayout, TensorView};
use crate::trace::trace_span;
use crate::util::{DetPostError, DetPostResult};

/// Thresholds and options for [`PostProcessor`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PostProcessConfig {
    /// Minimum class score; a cell is kept only when its best score is
    /// strictly greater.
    pub confidence_threshold: f32,
    /// Overlap above which a lower-confidence box is suppressed.
    pub iou_threshold: f32,
    /// Memory order of incoming tensors.
    pub layout: TensorLayout,
    /// Which pairs of boxes may suppress each other.
    pub suppression: SuppressionMode,
    /// Decode cells on the rayon pool. Requires the `rayon` feature.
    pub parallel: bool,
}

impl Default for PostProcessConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.3,
            iou_threshold: 0.5,
            layout: TensorLayout::ChannelMajor,
            suppression: SuppressionMode::ClassAgnostic,
            parallel: false,
        }
    }
}

impl PostProcessConfig {
    /// Checks that the thresholds are finite and that parallel decoding is
    /// available when requested.
    pub fn validate(&self) -> DetPostResult<()> {
        if !self.confidence_threshold.is_finite() {
            return Err(DetPostError::InvalidConfig {
                reason: "confidence_threshold must be finite",
            });
        }
        if !self.iou_threshold.is_finite() {
            return Err(DetPostError::InvalidConfig {
                reason: "iou_threshold must be finite",
            });
        }
        if self.parallel && !cfg!(feature = "rayon") {
            return Err(DetPostError::InvalidConfig {
                reason: "parallel decoding requires the `rayon` feature",
            });
        }
        Ok(())
    }
}

/// Decoder and suppressor bound to a fixed label list.
///
/// The label list is read-only, so one processor can serve several threads
/// as long as each call brings its own tensor.
#[derive(Clone, Debug)]
pub struct PostProcessor {
    labels: Vec<String>,
    cfg: PostProcessConfig,
}

impl PostProcessor {
    /// Creates a processor with the default configuration.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            cfg: PostProcessConfig::default(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, cfg: PostProcessConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &PostProcessConfig {
        &self.cfg
    }

    /// Returns the label list.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Decodes and suppresses a flat tensor laid out per the configured
    /// [`TensorLayout`].
    pub fn process(
        &self,
        tensor: &[f32],
        num_channels: usize,
        num_elements: usize,
    ) -> DetPostResult<Vec<BoundingBox>> {
        let view = TensorView::new(tensor, num_channels, num_elements, self.cfg.layout)?;
        self.process_view(view)
    }

    /// Decodes and suppresses an already validated view.
    ///
    /// The view's own layout wins over the configured one.
    pub fn process_view(&self, view: TensorView<'_>) -> DetPostResult<Vec<BoundingBox>> {
        self.cfg.validate()?;
        let _span = trace_span!("post_process", parallel = self.cfg.parallel).entered();

        let candidates = self.decode_candidates(view)?;
        Ok(suppress_with_mode(
            candidates,
            self.cfg.iou_threshold,
            self.cfg.suppression,
        ))
    }

    fn decode_candidates(&self, view: TensorView<'_>) -> DetPostResult<Vec<BoundingBox>> {
        #[cfg(feature = "rayon")]
        if self.cfg.parallel {
            return decode_view_par(view, self.labels.as_slice(), self.cfg.confidence_threshold);
        }
        decode_view(view, self.labels.as_slice(), self.cfg.confidence_threshold)
    }
}
