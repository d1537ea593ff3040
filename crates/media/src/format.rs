//! Declares [FormatConfig], the caller-supplied description of a raw video +
//! PCM audio pair, and [Format], its validated form.

use std::num::NonZeroU32;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audio::{AudioChunker, AudioChunking};
use crate::frame::{ChannelOrder, Dimensions, PixelLayout};

/// The format configuration exactly as a caller (or a config file) provides
/// it. Nothing here has been checked yet, see [Format::new].
///
/// ```
/// use media::FormatConfig;
///
/// let config: FormatConfig = serde_json::from_str(
///     r#"{ "video_width": 480, "video_height": 270, "video_fps": 30, "audio_rate": 44100 }"#,
/// )
/// .unwrap();
/// assert_eq!(config.video_fps, 30);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatConfig {
    pub video_width: i64,
    pub video_height: i64,
    pub video_fps: i64,
    pub audio_rate: i64,

    /// How the bytes of each raw frame are arranged on disk.
    #[serde(default)]
    pub pixel_layout: PixelLayout,

    /// The channel order of the raw video bytes on disk.
    #[serde(default = "default_source_channel_order")]
    pub source_channel_order: ChannelOrder,

    /// The channel order loaded frames are converted to (what the display
    /// wants).
    #[serde(default = "default_display_channel_order")]
    pub display_channel_order: ChannelOrder,

    #[serde(default)]
    pub audio_chunking: AudioChunking,
}

impl FormatConfig {
    /// A config with the defaults: planar frames, RGB on disk, BGR for display,
    /// and [AudioChunking::Truncate].
    pub fn new(video_width: i64, video_height: i64, video_fps: i64, audio_rate: i64) -> Self {
        Self {
            video_width,
            video_height,
            video_fps,
            audio_rate,
            pixel_layout: PixelLayout::default(),
            source_channel_order: default_source_channel_order(),
            display_channel_order: default_display_channel_order(),
            audio_chunking: AudioChunking::default(),
        }
    }
}

fn default_source_channel_order() -> ChannelOrder {
    ChannelOrder::Rgb
}

fn default_display_channel_order() -> ChannelOrder {
    ChannelOrder::Bgr
}

/// A validated [FormatConfig]: every dimension and rate is known to be
/// non-zero and in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Format {
    dimensions: Dimensions,
    video_fps: NonZeroU32,
    audio_rate: NonZeroU32,
    pixel_layout: PixelLayout,
    source_channel_order: ChannelOrder,
    display_channel_order: ChannelOrder,
    audio_chunking: AudioChunking,
}

impl Format {
    /// Validate `config`. Any width, height, frame rate, or audio rate that is
    /// `0` or negative (or too large to work with) is an error.
    pub fn new(config: FormatConfig) -> Result<Self, FormatError> {
        let width = positive("video_width", config.video_width)?;
        let height = positive("video_height", config.video_height)?;
        let video_fps = positive("video_fps", config.video_fps)?;
        let audio_rate = positive("audio_rate", config.audio_rate)?;

        let dimensions = Dimensions::new(width.get() as usize, height.get() as usize)
            .expect("Both sides were checked to be non-zero.");

        // The frame size has to fit in memory math.
        dimensions
            .area()
            .checked_mul(3)
            .ok_or(FormatError::FrameTooLarge { dimensions })?;

        if config.audio_chunking == AudioChunking::Truncate && audio_rate.get() % video_fps != 0 {
            util::debug_log_warning!(
                "An audio rate of {audio_rate} isn't a multiple of {video_fps} fps, {} audio \
                frame(s) will be dropped every second.",
                audio_rate.get() % video_fps
            );
        }

        Ok(Self {
            dimensions,
            video_fps,
            audio_rate,
            pixel_layout: config.pixel_layout,
            source_channel_order: config.source_channel_order,
            display_channel_order: config.display_channel_order,
            audio_chunking: config.audio_chunking,
        })
    }

    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub const fn video_fps(&self) -> NonZeroU32 {
        self.video_fps
    }

    /// Audio frames per second.
    pub const fn audio_rate(&self) -> NonZeroU32 {
        self.audio_rate
    }

    pub const fn pixel_layout(&self) -> PixelLayout {
        self.pixel_layout
    }

    pub const fn source_channel_order(&self) -> ChannelOrder {
        self.source_channel_order
    }

    pub const fn display_channel_order(&self) -> ChannelOrder {
        self.display_channel_order
    }

    pub const fn audio_chunking(&self) -> AudioChunking {
        self.audio_chunking
    }

    /// `width * height * 3`, the size of one raw frame.
    pub const fn frame_byte_size(&self) -> usize {
        self.dimensions.frame_byte_size()
    }

    /// `1 / video_fps`, the target time between the start of two frames.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.video_fps.get()
    }

    /// `floor(audio_rate / video_fps)`, the number of audio frames that go with
    /// each video frame when truncating.
    ///
    /// ```
    /// use media::{Format, FormatConfig};
    ///
    /// let format = Format::new(FormatConfig::new(2, 2, 25, 48_000)).unwrap();
    /// assert_eq!(format.audio_frames_per_video_frame(), 1920);
    /// ```
    pub fn audio_frames_per_video_frame(&self) -> usize {
        self.audio_chunker().truncated_chunk_len()
    }

    /// A fresh iterator over the audio chunk sizes for this format, starting at
    /// the first video frame.
    pub fn audio_chunker(&self) -> AudioChunker {
        AudioChunker::new(self.audio_rate, self.video_fps, self.audio_chunking)
    }
}

impl TryFrom<FormatConfig> for Format {
    type Error = FormatError;

    fn try_from(config: FormatConfig) -> Result<Self, Self::Error> {
        Self::new(config)
    }
}

impl From<Format> for FormatConfig {
    fn from(format: Format) -> Self {
        Self {
            video_width: format.dimensions.width() as i64,
            video_height: format.dimensions.height() as i64,
            video_fps: format.video_fps.get().into(),
            audio_rate: format.audio_rate.get().into(),
            pixel_layout: format.pixel_layout,
            source_channel_order: format.source_channel_order,
            display_channel_order: format.display_channel_order,
            audio_chunking: format.audio_chunking,
        }
    }
}

fn positive(field: &'static str, value: i64) -> Result<NonZeroU32, FormatError> {
    if value <= 0 {
        return Err(FormatError::NotPositive { field, value });
    }

    u32::try_from(value)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or(FormatError::OutOfRange { field, value })
}

/// Indicates that a [FormatConfig] can't be used.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    #[error("`{field}` must be greater than 0 (got {value}).")]
    NotPositive { field: &'static str, value: i64 },
    #[error("`{field}` is too large (got {value}).")]
    OutOfRange { field: &'static str, value: i64 },
    #[error("A {dimensions} frame is too large to load.")]
    FrameTooLarge { dimensions: Dimensions },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_config() {
        let format = Format::new(FormatConfig::new(2, 2, 10, 100)).unwrap();

        assert_eq!(format.dimensions(), (2, 2).into());
        assert_eq!(format.frame_byte_size(), 12);
        assert_eq!(format.audio_frames_per_video_frame(), 10);
        assert_eq!(format.frame_interval(), Duration::from_millis(100));
        assert_eq!(format.pixel_layout(), PixelLayout::Planar);
        assert_eq!(format.source_channel_order(), ChannelOrder::Rgb);
        assert_eq!(format.display_channel_order(), ChannelOrder::Bgr);
    }

    #[test]
    fn non_positive_values_name_the_field() {
        let cases = [
            (FormatConfig::new(0, 2, 10, 100), "video_width", 0),
            (FormatConfig::new(2, -1, 10, 100), "video_height", -1),
            (FormatConfig::new(2, 2, 0, 100), "video_fps", 0),
            (FormatConfig::new(2, 2, 10, -44_100), "audio_rate", -44_100),
        ];

        for (config, field, value) in cases {
            assert_eq!(
                Format::new(config),
                Err(FormatError::NotPositive { field, value })
            );
        }
    }

    #[test]
    fn huge_values_are_out_of_range() {
        let config = FormatConfig::new(2, 2, 10, i64::from(u32::MAX) + 1);
        assert!(matches!(
            Format::new(config),
            Err(FormatError::OutOfRange {
                field: "audio_rate",
                ..
            })
        ));
    }

    #[test]
    fn optional_fields_use_defaults() {
        let config: FormatConfig = serde_json::from_str(
            r#"{ "video_width": 4, "video_height": 3, "video_fps": 24, "audio_rate": 44100 }"#,
        )
        .unwrap();
        assert_eq!(config, FormatConfig::new(4, 3, 24, 44_100));

        let config: FormatConfig = serde_json::from_str(
            r#"{
                "video_width": 4, "video_height": 3, "video_fps": 24, "audio_rate": 44100,
                "pixel_layout": "interleaved",
                "source_channel_order": "bgr",
                "display_channel_order": "rgb",
                "audio_chunking": "carry"
            }"#,
        )
        .unwrap();
        assert_eq!(config.pixel_layout, PixelLayout::Interleaved);
        assert_eq!(config.source_channel_order, ChannelOrder::Bgr);
        assert_eq!(config.display_channel_order, ChannelOrder::Rgb);
        assert_eq!(config.audio_chunking, AudioChunking::Carry);
    }

    #[test]
    fn format_converts_back_to_config() {
        let config = FormatConfig::new(640, 360, 30, 48_000);
        let format = Format::try_from(config).unwrap();
        assert_eq!(FormatConfig::from(format), config);
    }
}
