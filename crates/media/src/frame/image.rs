//! Declares [ImageFrame], one decoded frame of raw video.

use std::borrow::Cow;
use std::slice::ChunksExact;

use thiserror::Error;

use super::{BYTES_PER_PIXEL, ChannelOrder, Dimensions, PixelLayout};

/// A `height × width × 3` grid of bytes: rows of pixels top to bottom, pixels
/// left to right, each pixel being 3 contiguous channel bytes in
/// [Self::channel_order].
///
/// Every frame owns its own storage. Cloning copies the bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageFrame {
    data: Box<[u8]>,
    dimensions: Dimensions,
    channel_order: ChannelOrder,
}

impl ImageFrame {
    /// Copy one raw frame out of `raw` (bytes arranged in `layout`, channels
    /// in `source` order), interleave it, and convert it to `target` channel
    /// order.
    ///
    /// An error is returned if `raw.len()` isn't exactly
    /// [Dimensions::frame_byte_size].
    ///
    /// ```
    /// use media::frame::{ChannelOrder, ImageFrame, PixelLayout};
    ///
    /// let (rgb, bgr) = (ChannelOrder::Rgb, ChannelOrder::Bgr);
    ///
    /// // An R plane, a G plane, then a B plane.
    /// let planar = [1, 2, 3, 4, 5, 6];
    /// let frame = ImageFrame::from_raw(&planar, (2, 1).into(), PixelLayout::Planar, rgb, bgr)
    ///     .unwrap();
    /// assert_eq!(frame.as_bytes(), &[5, 3, 1, 6, 4, 2]);
    /// assert_eq!(frame.pixel(0, 1), [6, 4, 2]);
    ///
    /// let interleaved = [1, 2, 3, 4, 5, 6];
    /// let frame =
    ///     ImageFrame::from_raw(&interleaved, (2, 1).into(), PixelLayout::Interleaved, rgb, bgr)
    ///         .unwrap();
    /// assert_eq!(frame.as_bytes(), &[3, 2, 1, 6, 5, 4]);
    /// ```
    pub fn from_raw(
        raw: &[u8],
        dimensions: Dimensions,
        layout: PixelLayout,
        source: ChannelOrder,
        target: ChannelOrder,
    ) -> Result<Self, FrameSizeError> {
        Self::from_raw_owned(raw.into(), dimensions, layout, source, target)
    }

    /// Like [Self::from_raw], but takes ownership of an already-copied buffer
    /// so no second copy is made.
    pub fn from_raw_owned(
        data: Box<[u8]>,
        dimensions: Dimensions,
        layout: PixelLayout,
        source: ChannelOrder,
        target: ChannelOrder,
    ) -> Result<Self, FrameSizeError> {
        if data.len() != dimensions.frame_byte_size() {
            return Err(FrameSizeError {
                expected: dimensions.frame_byte_size(),
                actual: data.len(),
            });
        }

        let mut data = layout.interleave(data, dimensions);
        source.convert_in_place(target, &mut data);

        Ok(Self {
            data,
            dimensions,
            channel_order: target,
        })
    }

    /// The dimensions of this frame.
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// The order the channels of each pixel are stored in.
    pub const fn channel_order(&self) -> ChannelOrder {
        self.channel_order
    }

    /// All of the frame's bytes (row-major, 3 bytes per pixel).
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The frame's bytes in the channel order `order`. Borrowed if the frame is
    /// already in that order, otherwise a converted copy.
    pub fn bytes_in_order(&self, order: ChannelOrder) -> Cow<'_, [u8]> {
        if order == self.channel_order {
            Cow::Borrowed(&self.data)
        } else {
            let mut converted = self.data.to_vec();
            self.channel_order.convert_in_place(order, &mut converted);
            Cow::Owned(converted)
        }
    }

    /// An iterator over the rows of the frame, top to bottom.
    pub fn rows(&self) -> ChunksExact<'_, u8> {
        self.data.chunks_exact(self.dimensions.row_byte_size())
    }

    /// The channel bytes of the pixel at `row`, `col` (in
    /// [Self::channel_order]).
    ///
    /// This function panics if the coordinates are out of bounds.
    pub fn pixel(&self, row: usize, col: usize) -> [u8; BYTES_PER_PIXEL] {
        assert!(
            row < self.dimensions.height() && col < self.dimensions.width(),
            "Pixel ({row}, {col}) is outside of a {} frame.",
            self.dimensions
        );

        let start = (row * self.dimensions.width() + col) * BYTES_PER_PIXEL;
        [
            self.data[start],
            self.data[start + 1],
            self.data[start + 2],
        ]
    }

    /// Consume the frame, returning its bytes.
    pub fn into_bytes(self) -> Box<[u8]> {
        self.data
    }
}

/// Returned when a buffer doesn't hold exactly one frame's worth of bytes.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("A raw frame must be exactly {expected} bytes (got {actual}).")]
pub struct FrameSizeError {
    pub expected: usize,
    pub actual: usize,
}
