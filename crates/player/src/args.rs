//! Contains [Args], which are parsed command-line flags.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use media::PauseMode;
use media::audio::AudioChunking;
use media::frame::{ChannelOrder, PixelLayout};

/// Parsed command line arguments.
#[derive(Parser, Debug, Clone, PartialEq, Eq, Hash)]
#[command(about = "Plays a raw RGB video file alongside a WAV file.")]
pub struct Args {
    /// The raw video file (frames of packed 3 byte pixels, no header).
    pub video: PathBuf,

    /// The WAV file to play alongside the video.
    pub audio: PathBuf,

    /// A JSON file with the video/audio format (`video_width`, `video_height`,
    /// `video_fps`, `audio_rate`, and optionally `pixel_layout`,
    /// `source_channel_order`, `display_channel_order`, and `audio_chunking`).
    #[arg(long, value_name = "JSON")]
    pub format: Option<PathBuf>,

    /// Overrides `video_width`.
    #[arg(long, allow_hyphen_values = true)]
    pub width: Option<i64>,

    /// Overrides `video_height`.
    #[arg(long, allow_hyphen_values = true)]
    pub height: Option<i64>,

    /// Overrides `video_fps`.
    #[arg(long, allow_hyphen_values = true)]
    pub fps: Option<i64>,

    /// Overrides `audio_rate` (audio frames per second).
    #[arg(long, allow_hyphen_values = true)]
    pub audio_rate: Option<i64>,

    /// Overrides `pixel_layout`, how the bytes of each frame are arranged.
    #[arg(long, value_enum)]
    pub pixel_layout: Option<PixelLayoutArg>,

    /// Overrides `source_channel_order`, the channel order of the video file.
    #[arg(long, value_enum)]
    pub source_order: Option<ChannelOrderArg>,

    /// Overrides `display_channel_order`.
    #[arg(long, value_enum)]
    pub display_order: Option<ChannelOrderArg>,

    /// Overrides `audio_chunking`.
    #[arg(long, value_enum)]
    pub audio_chunking: Option<AudioChunkingArg>,

    /// Load frames while playing instead of loading everything first.
    #[arg(long)]
    pub stream: bool,

    /// How many frames to load ahead when streaming.
    #[arg(long, default_value = "8", requires = "stream")]
    pub lookahead: NonZeroUsize,

    /// What pausing does to the playback position.
    #[arg(long, value_enum, default_value_t = PauseModeArg::Skip)]
    pub pause_mode: PauseModeArg,

    /// Fail if the video can't hold a single frame.
    #[arg(long)]
    pub strict: bool,

    /// Play without a window (stop with Ctrl+C).
    #[arg(long)]
    pub headless: bool,

    /// Write every shown frame to this directory as a PNG.
    #[arg(long, value_name = "DIR", requires = "headless")]
    pub dump_frames: Option<PathBuf>,

    /// Don't open an audio device.
    #[arg(long)]
    pub mute: bool,

    #[cfg(debug_assertions)]
    /// Disable debug logging. This option only exists if `debug_assertions` are
    /// enabled.
    #[arg(long)]
    pub no_debug_logging: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self::parse()
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelLayoutArg {
    /// A whole plane per channel.
    Planar,
    /// 3 channel bytes per pixel, side by side.
    Interleaved,
}

impl From<PixelLayoutArg> for PixelLayout {
    fn from(arg: PixelLayoutArg) -> Self {
        match arg {
            PixelLayoutArg::Planar => Self::Planar,
            PixelLayoutArg::Interleaved => Self::Interleaved,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelOrderArg {
    Rgb,
    Bgr,
}

impl From<ChannelOrderArg> for ChannelOrder {
    fn from(arg: ChannelOrderArg) -> Self {
        match arg {
            ChannelOrderArg::Rgb => Self::Rgb,
            ChannelOrderArg::Bgr => Self::Bgr,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioChunkingArg {
    /// Every video frame gets `audio_rate / fps` audio frames, rounded down.
    Truncate,
    /// Carry the remainder forward so audio never drifts.
    Carry,
}

impl From<AudioChunkingArg> for AudioChunking {
    fn from(arg: AudioChunkingArg) -> Self {
        match arg {
            AudioChunkingArg::Truncate => Self::Truncate,
            AudioChunkingArg::Carry => Self::Carry,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PauseModeArg {
    /// Frames keep passing while paused, they just aren't shown.
    Skip,
    /// Playback holds its position while paused.
    Hold,
}

impl From<PauseModeArg> for PauseMode {
    fn from(arg: PauseModeArg) -> Self {
        match arg {
            PauseModeArg::Skip => Self::SkipFrames,
            PauseModeArg::Hold => Self::Hold,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["player", "video.rgb", "audio.wav"]).unwrap();

        assert_eq!(args.video, PathBuf::from("video.rgb"));
        assert_eq!(args.audio, PathBuf::from("audio.wav"));
        assert_eq!(args.format, None);
        assert!(!args.stream);
        assert_eq!(args.lookahead.get(), 8);
        assert_eq!(PauseMode::from(args.pause_mode), PauseMode::SkipFrames);
        assert!(!args.headless);
    }

    #[test]
    fn overrides() {
        let args = Args::try_parse_from([
            "player",
            "video.rgb",
            "audio.wav",
            "--width",
            "-4",
            "--fps",
            "24",
            "--pixel-layout",
            "interleaved",
            "--source-order",
            "bgr",
            "--audio-chunking",
            "carry",
            "--pause-mode",
            "hold",
        ])
        .unwrap();

        assert_eq!(args.width, Some(-4));
        assert_eq!(args.fps, Some(24));
        assert_eq!(
            args.pixel_layout.map(PixelLayout::from),
            Some(PixelLayout::Interleaved)
        );
        assert_eq!(args.source_order.map(ChannelOrder::from), Some(ChannelOrder::Bgr));
        assert_eq!(
            args.audio_chunking.map(AudioChunking::from),
            Some(AudioChunking::Carry)
        );
        assert_eq!(PauseMode::from(args.pause_mode), PauseMode::Hold);
    }

    #[test]
    fn lookahead_needs_streaming() {
        let result =
            Args::try_parse_from(["player", "video.rgb", "audio.wav", "--lookahead", "4"]);
        assert!(result.is_err());

        let args = Args::try_parse_from([
            "player",
            "video.rgb",
            "audio.wav",
            "--stream",
            "--lookahead",
            "4",
        ])
        .unwrap();
        assert_eq!(args.lookahead.get(), 4);
    }

    #[test]
    fn dumping_frames_needs_headless() {
        let result =
            Args::try_parse_from(["player", "v.rgb", "a.wav", "--dump-frames", "frames"]);
        assert!(result.is_err());
    }
}
