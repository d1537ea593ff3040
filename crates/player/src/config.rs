//! Builds the [FormatConfig] to play with out of the `--format` file and the
//! command line overrides.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use media::FormatConfig;
use media::audio::AudioChunking;
use media::frame::{ChannelOrder, PixelLayout};

use crate::args::Args;

/// A format file. Any field can be left out as long as the command line
/// provides it.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct PartialFormatConfig {
    video_width: Option<i64>,
    video_height: Option<i64>,
    video_fps: Option<i64>,
    audio_rate: Option<i64>,
    pixel_layout: Option<PixelLayout>,
    source_channel_order: Option<ChannelOrder>,
    display_channel_order: Option<ChannelOrder>,
    audio_chunking: Option<AudioChunking>,
}

impl PartialFormatConfig {
    fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;

        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    fn apply_overrides(&mut self, args: &Args) {
        fn set<T>(field: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *field = value;
            }
        }

        set(&mut self.video_width, args.width);
        set(&mut self.video_height, args.height);
        set(&mut self.video_fps, args.fps);
        set(&mut self.audio_rate, args.audio_rate);
        set(&mut self.pixel_layout, args.pixel_layout.map(Into::into));
        set(
            &mut self.source_channel_order,
            args.source_order.map(Into::into),
        );
        set(
            &mut self.display_channel_order,
            args.display_order.map(Into::into),
        );
        set(&mut self.audio_chunking, args.audio_chunking.map(Into::into));
    }

    fn complete(self) -> Result<FormatConfig, ConfigError> {
        let required =
            |value: Option<i64>, key: &'static str| value.ok_or(ConfigError::Missing(key));

        let mut config = FormatConfig::new(
            required(self.video_width, "video_width")?,
            required(self.video_height, "video_height")?,
            required(self.video_fps, "video_fps")?,
            required(self.audio_rate, "audio_rate")?,
        );

        if let Some(layout) = self.pixel_layout {
            config.pixel_layout = layout;
        }
        if let Some(order) = self.source_channel_order {
            config.source_channel_order = order;
        }
        // Both the window and the PNG dumps take RGB, so frames are loaded as
        // RGB unless asked otherwise.
        config.display_channel_order = self.display_channel_order.unwrap_or(ChannelOrder::Rgb);
        if let Some(chunking) = self.audio_chunking {
            config.audio_chunking = chunking;
        }

        Ok(config)
    }
}

/// The format described by `args`: the `--format` file (if any) with the
/// command line overrides on top.
pub fn format_config(args: &Args) -> Result<FormatConfig, ConfigError> {
    let mut partial = match &args.format {
        Some(path) => PartialFormatConfig::read(path)?,
        None => PartialFormatConfig::default(),
    };

    partial.apply_overrides(args);
    partial.complete()
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Couldn't read `{}`: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("`{}` isn't a valid format file: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("No `{0}` was given (set it in the format file or with its flag).")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["player", "video.rgb", "audio.wav"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    fn partial(json: &str) -> PartialFormatConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn flags_alone() {
        let args = args(&[
            "--width", "4", "--height", "3", "--fps", "25", "--audio-rate", "48000",
        ]);

        let expected = FormatConfig {
            display_channel_order: ChannelOrder::Rgb,
            ..FormatConfig::new(4, 3, 25, 48_000)
        };
        assert_eq!(format_config(&args).unwrap(), expected);
    }

    #[test]
    fn frames_are_loaded_as_rgb_by_default() {
        let config = partial(
            r#"{ "video_width": 4, "video_height": 3, "video_fps": 25, "audio_rate": 8000 }"#,
        )
        .complete()
        .unwrap();
        assert_eq!(config.display_channel_order, ChannelOrder::Rgb);
        assert_eq!(config.pixel_layout, PixelLayout::Planar);

        let mut config = partial(r#"{ "display_channel_order": "bgr" }"#);
        config.apply_overrides(&args(&[
            "--width", "4", "--height", "3", "--fps", "25", "--audio-rate", "8000",
        ]));
        assert_eq!(config.complete().unwrap().display_channel_order, ChannelOrder::Bgr);
    }

    #[test]
    fn flags_override_the_file() {
        let mut config = partial(
            r#"{
                "video_width": 480, "video_height": 270, "video_fps": 30, "audio_rate": 44100,
                "display_channel_order": "rgb"
            }"#,
        );
        config.apply_overrides(&args(&[
            "--fps",
            "15",
            "--audio-chunking",
            "carry",
            "--pixel-layout",
            "interleaved",
        ]));
        let config = config.complete().unwrap();

        assert_eq!(config.video_width, 480);
        assert_eq!(config.video_fps, 15);
        assert_eq!(config.display_channel_order, ChannelOrder::Rgb);
        assert_eq!(config.source_channel_order, ChannelOrder::Rgb);
        assert_eq!(config.audio_chunking, AudioChunking::Carry);
        assert_eq!(config.pixel_layout, PixelLayout::Interleaved);
    }

    #[test]
    fn missing_keys_are_named() {
        let config = partial(r#"{ "video_width": 4, "video_height": 3, "video_fps": 25 }"#);

        assert!(matches!(
            config.complete(),
            Err(ConfigError::Missing("audio_rate"))
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = serde_json::from_str::<PartialFormatConfig>(r#"{ "video_widht": 4 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn missing_file() {
        let path = std::env::temp_dir().join("player-config-test-missing.json");
        let args = args(&["--format", path.to_str().unwrap()]);

        assert!(matches!(
            format_config(&args),
            Err(ConfigError::Read { .. })
        ));
    }
}
