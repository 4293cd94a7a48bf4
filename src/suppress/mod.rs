//! Greedy non-maximum suppression over decoded boxes.
//!
//! Boxes are visited in descending confidence order. Each surviving box is
//! kept and marks every lower-ranked box overlapping it by more than the IoU
//! threshold as suppressed. Suppression state lives in a flag per rank; the
//! input is never mutated while it is scanned.

pub(crate) mod nms;
pub(crate) mod order;

/// Which box pairs are allowed to suppress each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SuppressionMode {
    /// Any two boxes compete, whatever their class.
    #[default]
    ClassAgnostic,
    /// Only boxes sharing a class index compete.
    PerClass,
}
