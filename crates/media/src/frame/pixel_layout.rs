//! Declares [PixelLayout], how the channel bytes of a raw frame are arranged.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use super::{BYTES_PER_PIXEL, Dimensions};

/// How a raw frame's bytes are arranged.
///
/// [Planar](PixelLayout::Planar) frames hold a whole plane for the first
/// channel, then one for the second, then one for the third (each plane being
/// `width * height` bytes, row-major). [Interleaved](PixelLayout::Interleaved)
/// frames hold each pixel's 3 channel bytes next to each other.
///
/// Loaded frames are always interleaved.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PixelLayout {
    #[default]
    Planar,
    Interleaved,
}

impl PixelLayout {
    /// Rearrange one raw frame in this layout into interleaved pixels. The
    /// buffer is handed back untouched if it's already interleaved.
    ///
    /// `raw` must be exactly [Dimensions::frame_byte_size] bytes long.
    ///
    /// ```
    /// use media::frame::PixelLayout;
    ///
    /// // A 2x1 frame: the red plane, then green, then blue.
    /// let planar = vec![1, 2, 3, 4, 5, 6].into_boxed_slice();
    /// let pixels = PixelLayout::Planar.interleave(planar, (2, 1).into());
    /// assert_eq!(&*pixels, &[1, 3, 5, 2, 4, 6]);
    /// ```
    pub fn interleave(self, raw: Box<[u8]>, dimensions: Dimensions) -> Box<[u8]> {
        debug_assert_eq!(raw.len(), dimensions.frame_byte_size());

        match self {
            Self::Interleaved => raw,

            Self::Planar => {
                let area = dimensions.area();
                let mut pixels = vec![0; raw.len()].into_boxed_slice();

                for (channel, plane) in raw.chunks_exact(area).enumerate() {
                    for (pixel, &byte) in plane.iter().enumerate() {
                        pixels[pixel * BYTES_PER_PIXEL + channel] = byte;
                    }
                }

                pixels
            }
        }
    }
}

/// Displays as `planar` or `interleaved`.
impl Display for PixelLayout {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Planar => write!(f, "planar"),
            Self::Interleaved => write!(f, "interleaved"),
        }
    }
}
