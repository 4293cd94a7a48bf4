//! Box geometry in normalized frame coordinates.
//!
//! A model emits boxes as center/size quadruples (`cx, cy, w, h`) expressed
//! as fractions of its input frame. [`CenterBox`] carries that raw form,
//! [`BoundingBox`] is the validated detection built from it, and
//! [`PixelRect`] is the same box scaled to a concrete image.

mod bbox;
mod iou;

pub use bbox::BoundingBox;
pub use iou::iou;

/// Raw center/size geometry of one candidate cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CenterBox {
    /// Center x, normalized.
    pub cx: f32,
    /// Center y, normalized.
    pub cy: f32,
    /// Width, normalized.
    pub w: f32,
    /// Height, normalized.
    pub h: f32,
}

impl CenterBox {
    /// Creates a center/size box.
    pub fn new(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self { cx, cy, w, h }
    }

    /// Returns `(x1, y1, x2, y2)` corner coordinates.
    pub fn corners(&self) -> (f32, f32, f32, f32) {
        let half_w = self.w / 2.0;
        let half_h = self.h / 2.0;
        (
            self.cx - half_w,
            self.cy - half_h,
            self.cx + half_w,
            self.cy + half_h,
        )
    }

    /// Returns `w * h`.
    pub fn area(&self) -> f32 {
        self.w * self.h
    }

    /// Returns the corners if the box lies fully inside the unit frame.
    ///
    /// Boxes with a negative extent or any non-finite coordinate are
    /// rejected along with boxes crossing the frame edge.
    pub fn corners_in_unit_frame(&self) -> Option<(f32, f32, f32, f32)> {
        if !(self.w >= 0.0 && self.h >= 0.0) {
            return None;
        }
        let (x1, y1, x2, y2) = self.corners();
        // Written as positive checks so NaN fails every comparison.
        let inside = x1 >= 0.0 && y1 >= 0.0 && x2 <= 1.0 && y2 <= 1.0;
        inside.then_some((x1, y1, x2, y2))
    }
}

/// Axis-aligned rectangle in pixel units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelRect {
    /// Left edge in pixels.
    pub left: f32,
    /// Top edge in pixels.
    pub top: f32,
    /// Right edge in pixels.
    pub right: f32,
    /// Bottom edge in pixels.
    pub bottom: f32,
}

impl PixelRect {
    /// Rectangle width in pixels.
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Rectangle height in pixels.
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}
