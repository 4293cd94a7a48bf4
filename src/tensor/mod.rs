//! Borrowed views over flat prediction tensors.
//!
//! A detection head emits a `[channel][element]` grid flattened into one
//! `f32` buffer. Channels `0..4` hold `cx, cy, w, h` for each candidate cell
//! and every further channel holds one class score. `TensorView` validates the
//! buffer length once at construction so later accessors never index out of
//! bounds, and hides whether the buffer is channel-major (`[1, C, N]`, the
//! usual export) or element-major (`[1, N, C]`, a transposed export).

use crate::geometry::CenterBox;
use crate::util::{DetPostError, DetPostResult};

/// Number of leading geometry channels (`cx, cy, w, h`).
pub const GEOMETRY_CHANNELS: usize = 4;

/// Memory order of the flat tensor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TensorLayout {
    /// `(channel, element)` at `element + num_elements * channel`.
    #[default]
    ChannelMajor,
    /// `(channel, element)` at `channel + num_channels * element`.
    ElementMajor,
}

/// Borrowed prediction tensor with validated dimensions.
#[derive(Copy, Clone, Debug)]
pub struct TensorView<'a> {
    data: &'a [f32],
    num_channels: usize,
    num_elements: usize,
    layout: TensorLayout,
}

impl<'a> TensorView<'a> {
    /// Creates a channel-major view.
    pub fn channel_major(
        data: &'a [f32],
        num_channels: usize,
        num_elements: usize,
    ) -> DetPostResult<Self> {
        Self::new(data, num_channels, num_elements, TensorLayout::ChannelMajor)
    }

    /// Creates a view with an explicit layout.
    ///
    /// Fails when fewer than four channels are declared or when the buffer
    /// length is not exactly `num_channels * num_elements`.
    pub fn new(
        data: &'a [f32],
        num_channels: usize,
        num_elements: usize,
        layout: TensorLayout,
    ) -> DetPostResult<Self> {
        if num_channels < GEOMETRY_CHANNELS {
            return Err(DetPostError::TooFewChannels { num_channels });
        }
        let expected = num_channels.checked_mul(num_elements);
        if expected != Some(data.len()) {
            return Err(DetPostError::TensorShapeMismatch {
                expected: num_channels.saturating_mul(num_elements),
                got: data.len(),
                num_channels,
                num_elements,
            });
        }
        Ok(Self {
            data,
            num_channels,
            num_elements,
            layout,
        })
    }

    /// Total channel count, geometry included.
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    /// Number of candidate cells.
    pub fn num_elements(&self) -> usize {
        self.num_elements
    }

    /// Number of class-score channels.
    pub fn num_classes(&self) -> usize {
        self.num_channels - GEOMETRY_CHANNELS
    }

    /// Memory order of the backing buffer.
    pub fn layout(&self) -> TensorLayout {
        self.layout
    }

    /// Returns the backing buffer.
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    fn offset(&self, channel: usize, element: usize) -> usize {
        match self.layout {
            TensorLayout::ChannelMajor => element + self.num_elements * channel,
            TensorLayout::ElementMajor => channel + self.num_channels * element,
        }
    }

    fn channel_stride(&self) -> usize {
        match self.layout {
            TensorLayout::ChannelMajor => self.num_elements,
            TensorLayout::ElementMajor => 1,
        }
    }

    /// Returns the value at `(channel, element)` if it is within bounds.
    pub fn get(&self, channel: usize, element: usize) -> Option<f32> {
        if channel >= self.num_channels || element >= self.num_elements {
            return None;
        }
        self.data.get(self.offset(channel, element)).copied()
    }

    /// Returns the raw `cx, cy, w, h` of a cell.
    pub fn center_box(&self, element: usize) -> Option<CenterBox> {
        Some(CenterBox::new(
            self.get(0, element)?,
            self.get(1, element)?,
            self.get(2, element)?,
            self.get(3, element)?,
        ))
    }

    /// Iterates the class scores of a cell in class-index order.
    pub fn class_scores(&self, element: usize) -> Option<impl Iterator<Item = f32> + 'a> {
        if element >= self.num_elements {
            return None;
        }
        let data = self.data;
        let num_classes = self.num_classes();
        let start = self.offset(GEOMETRY_CHANNELS, element).min(data.len());
        Some(
            data[start..]
                .iter()
                .step_by(self.channel_stride())
                .take(num_classes)
                .copied(),
        )
    }
}
