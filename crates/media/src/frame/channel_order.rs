//! Declares [ChannelOrder], the order the 3 color channels of a raw pixel are
//! stored in.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use super::BYTES_PER_PIXEL;

/// The order of the 3 one-byte color channels of a pixel.
///
/// Raw video usually comes in as [Rgb](ChannelOrder::Rgb) while a lot of
/// display backends want [Bgr](ChannelOrder::Bgr). Converting between the two
/// is a swap of the first and last byte of every pixel.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    Rgb,
    Bgr,
}

impl ChannelOrder {
    /// The byte offset of the red channel within a pixel.
    pub const fn red_offset(self) -> usize {
        match self {
            Self::Rgb => 0,
            Self::Bgr => 2,
        }
    }

    /// The byte offset of the blue channel within a pixel.
    pub const fn blue_offset(self) -> usize {
        match self {
            Self::Rgb => 2,
            Self::Bgr => 0,
        }
    }

    /// Rewrite `pixels` (tightly packed 3 byte pixels in `self` order) in place
    /// so they're in `target` order. Nothing happens if the orders match.
    ///
    /// Any trailing bytes that don't make up a whole pixel are left alone.
    pub fn convert_in_place(self, target: Self, pixels: &mut [u8]) {
        if self != target {
            swap_red_and_blue(pixels);
        }
    }
}

/// Swap the first and last channel of every pixel in a buffer of tightly packed
/// 3 byte pixels. Doing this twice gives back the original bytes.
///
/// ```
/// use media::frame::swap_red_and_blue;
///
/// let mut pixels = [1, 2, 3, 4, 5, 6];
/// swap_red_and_blue(&mut pixels);
/// assert_eq!(pixels, [3, 2, 1, 6, 5, 4]);
/// ```
pub fn swap_red_and_blue(pixels: &mut [u8]) {
    for pixel in pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
        pixel.swap(0, 2);
    }
}

/// Displays as `rgb` or `bgr`.
impl Display for ChannelOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb => write!(f, "rgb"),
            Self::Bgr => write!(f, "bgr"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swapping_twice_is_a_no_op() {
        let original: Vec<u8> = (0..=254).collect();
        let mut pixels = original.clone();

        swap_red_and_blue(&mut pixels);
        assert_ne!(pixels, original);
        swap_red_and_blue(&mut pixels);
        assert_eq!(pixels, original);
    }

    #[test]
    fn partial_pixels_are_untouched() {
        let mut pixels = [10, 20, 30, 40, 50];
        swap_red_and_blue(&mut pixels);
        assert_eq!(pixels, [30, 20, 10, 40, 50]);
    }

    #[test]
    fn same_order_conversion_does_nothing() {
        let mut pixels = [1, 2, 3];
        ChannelOrder::Bgr.convert_in_place(ChannelOrder::Bgr, &mut pixels);
        assert_eq!(pixels, [1, 2, 3]);

        ChannelOrder::Rgb.convert_in_place(ChannelOrder::Bgr, &mut pixels);
        assert_eq!(pixels, [3, 2, 1]);
    }

    #[test]
    fn offsets_point_at_the_right_channel() {
        let rgb = [0xAA, 0xBB, 0xCC];
        let mut bgr = rgb;
        ChannelOrder::Rgb.convert_in_place(ChannelOrder::Bgr, &mut bgr);

        assert_eq!(rgb[ChannelOrder::Rgb.red_offset()], bgr[ChannelOrder::Bgr.red_offset()]);
        assert_eq!(rgb[ChannelOrder::Rgb.blue_offset()], bgr[ChannelOrder::Bgr.blue_offset()]);
    }
}
