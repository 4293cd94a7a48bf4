//! detpost turns raw object-detection tensors into labeled, non-overlapping
//! boxes.
//!
//! The pipeline has two stages. Decoding reads a flat `[channel][element]`
//! prediction tensor, picks the best class per cell, filters by confidence
//! and drops boxes that leave the normalized frame. Suppression then runs
//! greedy IoU-based non-maximum suppression and returns the survivors,
//! highest confidence first. Both stages are pure functions; the optional
//! `rayon` feature decodes cells in parallel and the `tracing` feature emits
//! spans for each stage.

pub mod decode;
pub mod geometry;
pub mod lowlevel;
pub mod pipeline;
pub mod suppress;
pub mod tensor;
mod trace;
pub mod util;

pub use decode::{decode, decode_view};
pub use geometry::{iou, BoundingBox, CenterBox, PixelRect};
pub use pipeline::{PostProcessConfig, PostProcessor};
pub use suppress::nms::{suppress, suppress_per_class, suppress_with_mode};
pub use suppress::SuppressionMode;
pub use tensor::{TensorLayout, TensorView, GEOMETRY_CHANNELS};
pub use util::{DetPostError, DetPostResult};

#[cfg(feature = "rayon")]
pub use decode::rayon::{decode_par, decode_view_par};
