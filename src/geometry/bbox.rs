//! Validated detection boxes.

use crate::geometry::{CenterBox, PixelRect};

/// A labeled detection in normalized frame coordinates.
///
/// Construction goes through [`BoundingBox::new`], which refuses boxes that
/// leave the unit frame, so every value satisfies `0 <= x1 <= x2 <= 1` and
/// `0 <= y1 <= y2 <= 1`. Fields are read-only after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundingBox {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    center: CenterBox,
    confidence: f32,
    class_index: usize,
    class_name: String,
}

impl BoundingBox {
    /// Builds a detection from center/size geometry.
    ///
    /// Returns `None` when the box is not fully inside the unit frame; such
    /// boxes are discarded rather than clamped.
    pub fn new(
        center: CenterBox,
        confidence: f32,
        class_index: usize,
        class_name: impl Into<String>,
    ) -> Option<Self> {
        let (x1, y1, x2, y2) = center.corners_in_unit_frame()?;
        Some(Self {
            x1,
            y1,
            x2,
            y2,
            center,
            confidence,
            class_index,
            class_name: class_name.into(),
        })
    }

    /// Left edge.
    pub fn x1(&self) -> f32 {
        self.x1
    }

    /// Top edge.
    pub fn y1(&self) -> f32 {
        self.y1
    }

    /// Right edge.
    pub fn x2(&self) -> f32 {
        self.x2
    }

    /// Bottom edge.
    pub fn y2(&self) -> f32 {
        self.y2
    }

    /// Center x.
    pub fn cx(&self) -> f32 {
        self.center.cx
    }

    /// Center y.
    pub fn cy(&self) -> f32 {
        self.center.cy
    }

    /// Width.
    pub fn w(&self) -> f32 {
        self.center.w
    }

    /// Height.
    pub fn h(&self) -> f32 {
        self.center.h
    }

    /// The center/size geometry this box was built from.
    pub fn center(&self) -> CenterBox {
        self.center
    }

    /// Area computed from the stored width and height.
    pub fn area(&self) -> f32 {
        self.center.area()
    }

    /// Winning class score.
    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    /// Index into the label list used at decode time.
    pub fn class_index(&self) -> usize {
        self.class_index
    }

    /// Resolved label.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Scales the box to an image of `width` x `height` pixels.
    pub fn to_pixels(&self, width: u32, height: u32) -> PixelRect {
        let width = width as f32;
        let height = height as f32;
        PixelRect {
            left: self.x1 * width,
            top: self.y1 * height,
            right: self.x2 * width,
            bottom: self.y2 * height,
        }
    }
}
