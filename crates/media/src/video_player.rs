use std::path::Path;
use std::time::Duration;

use super::audio::{PcmSource, PcmSpec};
use super::{
    AudioOutput, Display, Format, FormatConfig, FrameLoader, LoadError, PauseMode,
    PlaybackControl, PlaybackError, PlaybackReport, PlaybackScheduler, PlaybackSequence,
    PlaybackState,
};

/// Loads a raw video + WAV pair into memory, then plays it back in real time.
///
/// ```
/// use media::audio::{MemoryPcm, PcmSpec, SampleFormat};
/// use media::{FormatConfig, VideoPlayer};
///
/// let mut player = VideoPlayer::from_config(FormatConfig::new(2, 2, 10, 100)).unwrap();
///
/// let spec = PcmSpec::new(2, 1, 100, SampleFormat::Int).unwrap();
/// player
///     .load_from(&[0; 12 * 3], MemoryPcm::new(spec, vec![0; 60]))
///     .unwrap();
///
/// assert_eq!(player.sequence().len(), 3);
/// assert_eq!(player.audio_spec(), Some(spec));
/// ```
pub struct VideoPlayer {
    loader: FrameLoader,
    scheduler: PlaybackScheduler,
    sequence: PlaybackSequence,
    audio_spec: Option<PcmSpec>,
}

impl VideoPlayer {
    /// A player with nothing loaded yet.
    pub fn new(format: Format) -> Self {
        Self {
            loader: FrameLoader::new(format),
            scheduler: PlaybackScheduler::new(format.frame_interval()),
            sequence: PlaybackSequence::default(),
            audio_spec: None,
        }
    }

    pub fn from_config(config: FormatConfig) -> Result<Self, LoadError> {
        Ok(Self::new(Format::new(config)?))
    }

    /// See [FrameLoader::strict].
    pub fn strict(mut self, strict: bool) -> Self {
        self.loader = self.loader.strict(strict);
        self
    }

    pub fn with_pause_mode(mut self, pause_mode: PauseMode) -> Self {
        self.scheduler = self.scheduler.with_pause_mode(pause_mode);
        self
    }

    /// Load the raw video at `video_path` and the WAV file at `audio_path`,
    /// replacing anything loaded before. If loading fails, what was loaded
    /// before stays.
    pub fn load(
        &mut self,
        video_path: impl AsRef<Path>,
        audio_path: impl AsRef<Path>,
    ) -> Result<(), LoadError> {
        let (sequence, audio_spec) = self.loader.load_files(video_path, audio_path)?;
        self.sequence = sequence;
        self.audio_spec = Some(audio_spec);
        Ok(())
    }

    /// Like [Self::load], but from a buffer and a PCM source that are already
    /// open.
    pub fn load_from<S: PcmSource>(
        &mut self,
        video_bytes: &[u8],
        audio: S,
    ) -> Result<(), LoadError> {
        let audio_spec = audio.spec();
        self.sequence = self.loader.load(video_bytes, audio)?;
        self.audio_spec = Some(audio_spec);
        Ok(())
    }

    /// Play everything that's loaded (see [PlaybackScheduler::play]). Playing
    /// doesn't use the frames up, so this can be called again.
    pub fn play<A, D>(
        &self,
        audio: &mut A,
        display: &mut D,
    ) -> Result<PlaybackReport, PlaybackError>
    where
        A: AudioOutput + ?Sized,
        D: Display + ?Sized,
    {
        self.scheduler.play(self.sequence.cursor(), audio, display)
    }

    /// A handle for pausing, resuming, and stopping playback from another
    /// thread.
    pub fn control(&self) -> PlaybackControl {
        self.scheduler.control().clone()
    }

    pub fn pause(&self) -> bool {
        self.scheduler.control().pause()
    }

    pub fn resume(&self) -> bool {
        self.scheduler.control().resume()
    }

    pub fn toggle_play_pause(&self) -> PlaybackState {
        self.scheduler.control().toggle_pause()
    }

    pub fn sequence(&self) -> &PlaybackSequence {
        &self.sequence
    }

    /// The layout of the loaded audio. [None] until something is loaded.
    pub fn audio_spec(&self) -> Option<PcmSpec> {
        self.audio_spec
    }

    pub fn format(&self) -> Format {
        self.loader.format()
    }

    /// The target time between the start of two frames.
    pub fn frame_interval(&self) -> Duration {
        self.scheduler.frame_interval()
    }
}
