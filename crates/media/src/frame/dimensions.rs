//! Declares the [Dimensions] type, the width and height every frame of a raw
//! video stream shares.

use std::fmt::{self, Display, Formatter};
use std::num::NonZeroUsize;

/// A width and a height, both guaranteed to be non-zero.
///
/// # Example
///
/// [From<(usize, usize)>] is implemented for [Dimensions]. If either side is
/// `0`, the thread will panic. [Into::into] should really only be used if
/// you're providing the side lengths as literals (e.g. `(1920, 1080).into()`).
///
/// ```
/// use media::frame::Dimensions;
///
/// let d: Dimensions = (1920, 1080).into();
/// assert_eq!(d.width(), 1920);
/// assert_eq!(d.height(), 1080);
/// assert_eq!(d.frame_byte_size(), 1920 * 1080 * 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    width: NonZeroUsize,
    height: NonZeroUsize,
}

impl Dimensions {
    /// Construct from a width and a height.
    ///
    /// This function will return [None] if the width or height are 0. Also see
    /// [Self::from_non_zero].
    pub const fn new(width: usize, height: usize) -> Option<Self> {
        let Some(width) = NonZeroUsize::new(width) else {
            return None;
        };
        let Some(height) = NonZeroUsize::new(height) else {
            return None;
        };

        Some(Self::from_non_zero(width, height))
    }

    /// Construct from a non-zero width and a height.
    pub const fn from_non_zero(width: NonZeroUsize, height: NonZeroUsize) -> Self {
        Self { width, height }
    }

    /// The dimensions' width. This will never be `0`.
    pub const fn width(&self) -> usize {
        self.width.get()
    }

    /// The dimensions' height. This will never be `0`.
    pub const fn height(&self) -> usize {
        self.height.get()
    }

    /// The number of pixels in a frame with these dimensions. This will never
    /// be `0`.
    pub const fn area(&self) -> usize {
        self.width.get() * self.height.get()
    }

    /// The number of bytes one raw frame with these dimensions takes up
    /// (3 bytes per pixel).
    pub const fn frame_byte_size(&self) -> usize {
        self.area() * BYTES_PER_PIXEL
    }

    /// The number of bytes in one row of a raw frame.
    pub const fn row_byte_size(&self) -> usize {
        self.width.get() * BYTES_PER_PIXEL
    }

    /// How many whole frames fit in `byte_len` bytes of raw video. Trailing
    /// bytes that don't make up a whole frame aren't counted.
    ///
    /// ```
    /// use media::frame::Dimensions;
    ///
    /// let d: Dimensions = (2, 2).into();
    /// assert_eq!(d.whole_frames_in(36), 3);
    /// assert_eq!(d.whole_frames_in(36 + 5), 3);
    /// assert_eq!(d.whole_frames_in(11), 0);
    /// ```
    pub const fn whole_frames_in(&self, byte_len: usize) -> usize {
        byte_len / self.frame_byte_size()
    }
}

/// The number of bytes (channels) that make up one pixel of raw video.
pub const BYTES_PER_PIXEL: usize = 3;

/// When displayed, [Dimensions] will look like `WxH` (e.g. `1920x1080`).
impl Display for Dimensions {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// If either side is `0`, the thread will panic. [Into::into] should really
/// only be used if you're providing the side lengths as literals (e.g.
/// `(1920, 1080).into()`).
impl From<(usize, usize)> for Dimensions {
    fn from(dimensions: (usize, usize)) -> Self {
        Self::new(dimensions.0, dimensions.1).expect("Both sides must be non-zero.")
    }
}

impl From<Dimensions> for (usize, usize) {
    fn from(dimensions: Dimensions) -> Self {
        (dimensions.width(), dimensions.height())
    }
}
