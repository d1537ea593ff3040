//! Loads the media and runs the [PlaybackScheduler] against whatever display
//! the caller provides.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use thiserror::Error;

use media::audio::PcmSpec;
use media::{
    AudioOutput, Display, Format, FrameLoader, LoadError, NullAudioOutput, PauseMode,
    PlaybackControl, PlaybackError, PlaybackReport, PlaybackScheduler, StopReason,
};

use crate::args::Args;
use crate::audio_device::SpeakerOutput;
use crate::config::ConfigError;

/// Everything needed to play, taken out of [Args].
#[derive(Debug, Clone)]
pub struct PlaybackJob {
    video: PathBuf,
    audio: PathBuf,
    format: Format,
    /// The lookahead when streaming, [None] to load everything up front.
    lookahead: Option<NonZeroUsize>,
    pause_mode: PauseMode,
    strict: bool,
    mute: bool,
}

impl PlaybackJob {
    pub fn new(args: &Args, format: Format) -> Self {
        Self {
            video: args.video.clone(),
            audio: args.audio.clone(),
            format,
            lookahead: args.stream.then_some(args.lookahead),
            pause_mode: args.pause_mode.into(),
            strict: args.strict,
            mute: args.mute,
        }
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Load everything, open the audio device, and play on `display` until
    /// playback ends. The audio device is closed before this returns.
    pub fn run<D>(
        &self,
        control: PlaybackControl,
        display: &mut D,
    ) -> Result<PlaybackReport, PlayerError>
    where
        D: Display + ?Sized,
    {
        let loader = FrameLoader::new(self.format).strict(self.strict);
        let scheduler = PlaybackScheduler::new(self.format.frame_interval())
            .with_control(control)
            .with_pause_mode(self.pause_mode);

        let report = match self.lookahead {
            Some(lookahead) => {
                let (producer, audio_spec) =
                    loader.stream_files(&self.video, &self.audio, lookahead)?;
                let mut audio = self.open_audio(audio_spec)?;
                scheduler.play(producer, &mut *audio, display)?
            }

            None => {
                let (sequence, audio_spec) = loader.load_files(&self.video, &self.audio)?;
                let mut audio = self.open_audio(audio_spec)?;
                scheduler.play(sequence.cursor(), &mut *audio, display)?
            }
        };

        if report.stop_reason != StopReason::Finished {
            util::debug_log_info!("Playback was ended early ({:?}).", report.stop_reason);
        }

        Ok(report)
    }

    fn open_audio(&self, audio_spec: PcmSpec) -> Result<Box<dyn AudioOutput>, PlaybackError> {
        if self.mute {
            Ok(Box::new(NullAudioOutput))
        } else {
            Ok(Box::new(SpeakerOutput::open(audio_spec)?))
        }
    }
}

/// Anything that can make the player fail.
#[derive(Error, Debug)]
pub enum PlayerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Playback(#[from] PlaybackError),
    #[error("The window failed: {0}")]
    Window(String),
    #[error("Couldn't start the playback thread: {0}")]
    Thread(std::io::Error),
    #[error("Couldn't listen for stop signals: {0}")]
    StopSignals(std::io::Error),
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;

    use media::FormatConfig;
    use media::frame::ImageFrame;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        shown: Vec<Vec<u8>>,
    }

    impl Display for Recorder {
        fn show(&mut self, image: &ImageFrame) -> Result<(), PlaybackError> {
            self.shown.push(image.as_bytes().to_vec());
            Ok(())
        }

        fn stop_requested(&mut self) -> bool {
            false
        }
    }

    fn write_media(name: &str) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(format!("player-test-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let video = dir.join("video.rgb");
        fs::write(&video, [1, 2, 3, 4, 5, 6, 7, 8, 9]).unwrap();

        let audio = dir.join("audio.wav");
        let spec = hound_spec();
        let mut writer = hound::WavWriter::create(&audio, spec).unwrap();
        for _ in 0..30 {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();

        (video, audio)
    }

    fn hound_spec() -> hound::WavSpec {
        hound::WavSpec {
            channels: 1,
            sample_rate: 1000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        }
    }

    fn job(video: &PathBuf, audio: &PathBuf, extra: &[&str]) -> PlaybackJob {
        let mut argv = vec![
            "player",
            video.to_str().unwrap(),
            audio.to_str().unwrap(),
            "--mute",
        ];
        argv.extend_from_slice(extra);
        let args = Args::try_parse_from(argv).unwrap();

        let format = Format::new(FormatConfig::new(1, 1, 100, 1000)).unwrap();
        PlaybackJob::new(&args, format)
    }

    #[test]
    fn plays_loaded_media() {
        let (video, audio) = write_media("loaded");
        let mut display = Recorder::default();

        let report = job(&video, &audio, &[])
            .run(PlaybackControl::new(), &mut display)
            .unwrap();

        assert_eq!(report.frames_shown, 3);
        assert_eq!(display.shown, [vec![3, 2, 1], vec![6, 5, 4], vec![9, 8, 7]]);
    }

    #[test]
    fn plays_streamed_media() {
        let (video, audio) = write_media("streamed");
        let mut display = Recorder::default();

        let report = job(&video, &audio, &["--stream", "--lookahead", "1"])
            .run(PlaybackControl::new(), &mut display)
            .unwrap();

        assert_eq!(report.frames_shown, 3);
        assert_eq!(display.shown[2], [9, 8, 7]);
    }

    #[test]
    fn missing_video() {
        let (_, audio) = write_media("missing");
        let video = audio.with_file_name("nope.rgb");

        let result = job(&video, &audio, &[]).run(PlaybackControl::new(), &mut Recorder::default());
        assert!(matches!(
            result,
            Err(PlayerError::Load(LoadError::ResourceUnavailable { .. }))
        ));
    }
}
