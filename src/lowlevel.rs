//! Building blocks behind the high-level pipeline.
//!
//! These expose the per-cell class scan and the index-based suppression
//! helpers for callers that keep detections in their own parallel arrays.
//! Most users should prefer [`crate::decode`], [`crate::suppress`] and
//! [`crate::PostProcessor`].

pub use crate::decode::best_class;
pub use crate::suppress::nms::suppress_indices;
pub use crate::suppress::order::confidence_order;
