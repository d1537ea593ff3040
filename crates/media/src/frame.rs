//! This module exports everything that has to do with video frames: their
//! [Dimensions], [ChannelOrder], the decoded [ImageFrame] grid, and the
//! [CombinedFrame] that pairs an image with the audio played alongside it.

mod channel_order;
mod dimensions;
mod image;
mod pixel_layout;

pub use channel_order::*;
pub use dimensions::*;
pub use image::*;
pub use pixel_layout::*;

use crate::audio::AudioChunk;

/// One step of playback: a video frame and the chunk of audio that plays while
/// it's on screen.
///
/// Immutable once built; the [crate::PlaybackSequence] holding it owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedFrame {
    image: ImageFrame,
    audio: AudioChunk,
}

impl CombinedFrame {
    /// Pair an image with its audio.
    pub fn new(image: ImageFrame, audio: AudioChunk) -> Self {
        Self { image, audio }
    }

    /// The video frame.
    pub fn image(&self) -> &ImageFrame {
        &self.image
    }

    /// The audio that plays while [Self::image] is shown.
    pub fn audio(&self) -> &AudioChunk {
        &self.audio
    }

    /// Split into the image and audio.
    pub fn into_parts(self) -> (ImageFrame, AudioChunk) {
        (self.image, self.audio)
    }
}
