//! Everything to do with the PCM audio that gets paired with video frames: the
//! [PcmSource] trait for sequential readers, the [AudioChunk]s cut out of them,
//! and the [AudioChunker] that decides how big each chunk is.

mod chunking;
mod memory;
mod samples;
mod wav;

pub use chunking::*;
pub use memory::*;
pub use samples::*;
pub use wav::*;

use std::fmt::{self, Display, Formatter};

use thiserror::Error;

/// How the samples in a PCM stream are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleFormat {
    /// Signed little-endian integers, except for 1 byte samples which are
    /// unsigned (centered on `128`) like in WAV files.
    Int,
    /// Little-endian IEEE 754 floats (always 4 bytes).
    Float,
}

/// The layout of a PCM stream: what one audio *frame* (one sample for every
/// channel) looks like and how many of them play per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PcmSpec {
    sample_width: u16,
    channels: u16,
    frame_rate: u32,
    sample_format: SampleFormat,
}

impl PcmSpec {
    /// Describe a PCM layout. `sample_width` is in bytes.
    ///
    /// An error is returned for layouts that can't be played back: zero
    /// channels or frame rate, integer samples wider than 4 bytes, or float
    /// samples that aren't 4 bytes.
    pub fn new(
        sample_width: u16,
        channels: u16,
        frame_rate: u32,
        sample_format: SampleFormat,
    ) -> Result<Self, AudioError> {
        let width_ok = match sample_format {
            SampleFormat::Int => (1..=4).contains(&sample_width),
            SampleFormat::Float => sample_width == 4,
        };

        if !width_ok || channels == 0 || frame_rate == 0 {
            return Err(AudioError::UnsupportedLayout {
                sample_width,
                channels,
                frame_rate,
                sample_format,
            });
        }

        Ok(Self {
            sample_width,
            channels,
            frame_rate,
            sample_format,
        })
    }

    /// The width of one sample in bytes.
    pub const fn sample_width(&self) -> u16 {
        self.sample_width
    }

    /// The number of interleaved channels.
    pub const fn channels(&self) -> u16 {
        self.channels
    }

    /// Audio frames per second.
    pub const fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    pub const fn sample_format(&self) -> SampleFormat {
        self.sample_format
    }

    /// The number of bytes in one audio frame.
    pub const fn frame_size(&self) -> usize {
        self.sample_width as usize * self.channels as usize
    }
}

/// Displays like `16-bit int, 2 ch @ 48000 Hz`.
impl Display for PcmSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let format = match self.sample_format {
            SampleFormat::Int => "int",
            SampleFormat::Float => "float",
        };
        write!(
            f,
            "{}-bit {format}, {} ch @ {} Hz",
            self.sample_width * 8,
            self.channels,
            self.frame_rate
        )
    }
}

/// A sequential reader of PCM audio frames. Reading consumes the stream; there
/// is no seeking.
pub trait PcmSource {
    /// The layout of the frames this source produces. Never changes.
    fn spec(&self) -> PcmSpec;

    /// Read the next `frames` audio frames as raw bytes in [Self::spec]'s
    /// layout.
    ///
    /// Fewer frames (possibly none) are returned once the stream runs out.
    /// Running out is not an error. The returned buffer always holds a whole
    /// number of frames.
    fn read_frames(&mut self, frames: usize) -> Result<Vec<u8>, AudioError>;
}

impl<S: PcmSource + ?Sized> PcmSource for &mut S {
    fn spec(&self) -> PcmSpec {
        (**self).spec()
    }

    fn read_frames(&mut self, frames: usize) -> Result<Vec<u8>, AudioError> {
        (**self).read_frames(frames)
    }
}

impl<S: PcmSource + ?Sized> PcmSource for Box<S> {
    fn spec(&self) -> PcmSpec {
        (**self).spec()
    }

    fn read_frames(&mut self, frames: usize) -> Result<Vec<u8>, AudioError> {
        (**self).read_frames(frames)
    }
}

/// A block of raw PCM bytes: the audio for one video frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AudioChunk {
    bytes: Box<[u8]>,
    frames: usize,
}

impl AudioChunk {
    /// Wrap bytes read from a source with the layout `spec`. Trailing bytes
    /// that don't make up a whole audio frame aren't counted as a frame.
    pub fn new(bytes: impl Into<Box<[u8]>>, spec: PcmSpec) -> Self {
        let bytes = bytes.into();
        let frames = bytes.len() / spec.frame_size();
        Self { bytes, frames }
    }

    /// A chunk with no audio in it.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The raw PCM bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// How many audio frames the chunk holds.
    pub const fn frames(&self) -> usize {
        self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Something went wrong reading or interpreting PCM audio.
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Couldn't read the WAV stream: {0}")]
    Wav(#[from] hound::Error),
    #[error(
        "Unsupported PCM layout: {sample_width} byte {sample_format:?} samples, \
        {channels} channel(s) at {frame_rate} Hz."
    )]
    UnsupportedLayout {
        sample_width: u16,
        channels: u16,
        frame_rate: u32,
        sample_format: SampleFormat,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_validation() {
        assert!(PcmSpec::new(2, 2, 48_000, SampleFormat::Int).is_ok());
        assert!(PcmSpec::new(4, 1, 44_100, SampleFormat::Float).is_ok());

        assert!(PcmSpec::new(0, 2, 48_000, SampleFormat::Int).is_err());
        assert!(PcmSpec::new(5, 2, 48_000, SampleFormat::Int).is_err());
        assert!(PcmSpec::new(2, 2, 48_000, SampleFormat::Float).is_err());
        assert!(PcmSpec::new(2, 0, 48_000, SampleFormat::Int).is_err());
        assert!(PcmSpec::new(2, 2, 0, SampleFormat::Int).is_err());
    }

    #[test]
    fn chunk_counts_whole_frames() {
        let spec = PcmSpec::new(2, 2, 48_000, SampleFormat::Int).unwrap();
        assert_eq!(spec.frame_size(), 4);

        assert_eq!(AudioChunk::new(vec![0; 16], spec).frames(), 4);
        assert_eq!(AudioChunk::new(vec![0; 18], spec).frames(), 4);
        assert!(AudioChunk::empty().is_empty());
        assert_eq!(AudioChunk::empty().frames(), 0);
    }

    #[test]
    fn spec_display() {
        let spec = PcmSpec::new(2, 2, 48_000, SampleFormat::Int).unwrap();
        assert_eq!(spec.to_string(), "16-bit int, 2 ch @ 48000 Hz");
    }
}
