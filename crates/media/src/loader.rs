//! Contains [FrameLoader], which cuts a raw video buffer into frames and pairs
//! each one with its chunk of PCM audio.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;

use crate::audio::{AudioChunk, AudioChunker, AudioError, PcmSource, PcmSpec, WavSource};
use crate::format::{Format, FormatConfig, FormatError};
use crate::frame::{CombinedFrame, ImageFrame};
use crate::producer::FrameProducer;
use crate::sequence::PlaybackSequence;

/// Builds [PlaybackSequence]s (or [FrameProducer]s) for one [Format].
///
/// # Example
///
/// ```
/// use media::audio::{MemoryPcm, PcmSpec, SampleFormat};
/// use media::{Format, FormatConfig, FrameLoader};
///
/// let format = Format::new(FormatConfig::new(2, 2, 10, 100)).unwrap();
/// let spec = PcmSpec::new(2, 1, 100, SampleFormat::Int).unwrap();
///
/// let video = vec![0u8; 36];
/// let audio = MemoryPcm::new(spec, vec![0; 2 * 100]);
///
/// let sequence = FrameLoader::new(format).load(&video, audio).unwrap();
/// assert_eq!(sequence.len(), 3);
/// assert_eq!(sequence[0].audio().frames(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLoader {
    format: Format,
    strict: bool,
}

impl FrameLoader {
    /// A lenient loader: a video buffer too short to hold a single frame
    /// results in an empty sequence (see [Self::strict]).
    pub fn new(format: Format) -> Self {
        Self {
            format,
            strict: false,
        }
    }

    /// Validate `config` and create a loader for it.
    pub fn from_config(config: FormatConfig) -> Result<Self, LoadError> {
        Ok(Self::new(Format::new(config)?))
    }

    /// In strict mode, a video buffer that can't hold even one frame is a
    /// [LoadError::MalformedInput] instead of an empty sequence.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Cut `video_bytes` into frames and pair every frame with the next chunk
    /// of audio from `audio`.
    ///
    /// Bytes at the end of `video_bytes` that don't make up a whole frame are
    /// dropped. If the audio runs out first, the remaining frames get shorter
    /// (or empty) chunks. The audio stream is left positioned after the last
    /// audio frame that was read.
    ///
    /// Nothing is returned unless every frame loads.
    pub fn load<S: PcmSource>(
        &self,
        video_bytes: &[u8],
        mut audio: S,
    ) -> Result<PlaybackSequence, LoadError> {
        let start = Instant::now();

        let frame_byte_size = self.format.frame_byte_size();
        let frame_count = self.format.dimensions().whole_frames_in(video_bytes.len());
        let leftover = video_bytes.len() % frame_byte_size;

        if frame_count == 0 {
            if self.strict {
                return Err(LoadError::MalformedInput {
                    len: video_bytes.len(),
                    frame_byte_size,
                });
            }

            util::debug_log_warning!(
                "The video ({} bytes) is too short to hold a single {frame_byte_size} byte \
                frame.",
                video_bytes.len()
            );
        } else if leftover != 0 {
            util::debug_log_warning!(
                "Dropping {leftover} byte(s) at the end of the video (not a whole frame)."
            );
        }

        let mut assembler = FrameAssembler::new(self.format, audio.spec());
        let sequence = video_bytes
            .chunks_exact(frame_byte_size)
            .map(|raw_frame| assembler.assemble(raw_frame.into(), &mut audio))
            .collect::<Result<PlaybackSequence, _>>()?;

        util::debug_log_info!(
            "Loaded {} frame(s) of {} video in {:.3}s.",
            sequence.len(),
            self.format.dimensions(),
            start.elapsed().as_secs_f64()
        );

        Ok(sequence)
    }

    /// Read the raw video file at `video_path` and the WAV file at
    /// `audio_path`, then [Self::load] them. Both files are closed before this
    /// function returns.
    ///
    /// The WAV header decides the PCM layout, which is returned along with the
    /// sequence so an audio device can be opened for it.
    pub fn load_files(
        &self,
        video_path: impl AsRef<Path>,
        audio_path: impl AsRef<Path>,
    ) -> Result<(PlaybackSequence, PcmSpec), LoadError> {
        let video_path = video_path.as_ref();
        let video_bytes = fs::read(video_path).map_err(|source| LoadError::ResourceUnavailable {
            path: video_path.to_owned(),
            source,
        })?;

        let audio = self.open_wav(audio_path.as_ref())?;
        let spec = audio.spec();

        Ok((self.load(&video_bytes, audio)?, spec))
    }

    /// Like [Self::load_files], but frames are loaded on a worker thread at
    /// most `lookahead` frames ahead of playback instead of all up front. See
    /// [FrameProducer].
    pub fn stream_files(
        &self,
        video_path: impl AsRef<Path>,
        audio_path: impl AsRef<Path>,
        lookahead: NonZeroUsize,
    ) -> Result<(FrameProducer, PcmSpec), LoadError> {
        let video_path = video_path.as_ref();
        let resource_unavailable = |source| LoadError::ResourceUnavailable {
            path: video_path.to_owned(),
            source,
        };

        let video = File::open(video_path).map_err(resource_unavailable)?;

        if self.strict {
            let len = video.metadata().map_err(resource_unavailable)?.len();
            let frame_byte_size = self.format.frame_byte_size();

            if len < frame_byte_size as u64 {
                return Err(LoadError::MalformedInput {
                    len: len as usize,
                    frame_byte_size,
                });
            }
        }

        let audio = self.open_wav(audio_path.as_ref())?;
        let spec = audio.spec();

        let producer = FrameProducer::spawn(self.format, BufReader::new(video), audio, lookahead);
        Ok((producer, spec))
    }

    fn open_wav(&self, path: &Path) -> Result<WavSource<BufReader<File>>, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::ResourceUnavailable {
            path: path.to_owned(),
            source,
        })?;

        let wav = WavSource::from_reader(BufReader::new(file))?;

        if wav.spec().frame_rate() != self.format.audio_rate().get() {
            util::debug_log_warning!(
                "`{}` plays at {} Hz but the format says {} Hz. The audio won't be resampled.",
                path.display(),
                wav.spec().frame_rate(),
                self.format.audio_rate()
            );
        }

        Ok(wav)
    }
}

/// Turns raw frames into [CombinedFrame]s one at a time, keeping track of how
/// much audio goes with the next one.
#[derive(Debug, Clone)]
pub(crate) struct FrameAssembler {
    format: Format,
    audio_spec: PcmSpec,
    chunk_lens: AudioChunker,
}

impl FrameAssembler {
    pub(crate) fn new(format: Format, audio_spec: PcmSpec) -> Self {
        Self {
            format,
            audio_spec,
            chunk_lens: format.audio_chunker(),
        }
    }

    /// `raw_frame` must be exactly one frame (in the format's pixel layout and
    /// source channel order).
    pub(crate) fn assemble<S: PcmSource>(
        &mut self,
        raw_frame: Box<[u8]>,
        audio: &mut S,
    ) -> Result<CombinedFrame, LoadError> {
        let image = ImageFrame::from_raw_owned(
            raw_frame,
            self.format.dimensions(),
            self.format.pixel_layout(),
            self.format.source_channel_order(),
            self.format.display_channel_order(),
        )
        .expect("Raw frames are always cut to the frame size.");

        let chunk_len = self.chunk_lens.next().unwrap_or_default();
        let audio = AudioChunk::new(audio.read_frames(chunk_len)?, self.audio_spec);

        Ok(CombinedFrame::new(image, audio))
    }
}

/// An error loading frames. No frames are produced when this is returned from
/// [FrameLoader::load].
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Invalid format: {0}")]
    InvalidFormat(#[from] FormatError),
    #[error("Couldn't read `{}`: {source}", path.display())]
    ResourceUnavailable { path: PathBuf, source: io::Error },
    #[error("The video is {len} byte(s), not even one {frame_byte_size} byte frame.")]
    MalformedInput { len: usize, frame_byte_size: usize },
    #[error("The audio couldn't be read: {0}")]
    Audio(#[from] AudioError),
    #[error("The video stream couldn't be read: {0}")]
    VideoStream(io::Error),
    #[error("The frame producer's worker thread stopped unexpectedly.")]
    ProducerDisconnected,
}
