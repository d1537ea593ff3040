//! Contains [MemoryPcm], a [PcmSource] over bytes already in memory.

use super::{AudioError, PcmSource, PcmSpec};

/// A [PcmSource] that reads from a buffer of raw PCM bytes.
///
/// ```
/// use media::audio::{MemoryPcm, PcmSource, PcmSpec, SampleFormat};
///
/// let spec = PcmSpec::new(2, 1, 8_000, SampleFormat::Int).unwrap();
/// let mut pcm = MemoryPcm::new(spec, vec![1, 0, 2, 0, 3, 0]);
///
/// assert_eq!(pcm.read_frames(2).unwrap(), [1, 0, 2, 0]);
/// assert_eq!(pcm.read_frames(2).unwrap(), [3, 0]);
/// assert!(pcm.read_frames(2).unwrap().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct MemoryPcm {
    spec: PcmSpec,
    data: Vec<u8>,
    position: usize,
}

impl MemoryPcm {
    /// Trailing bytes in `data` that don't make up a whole audio frame are
    /// never read.
    pub fn new(spec: PcmSpec, data: Vec<u8>) -> Self {
        Self {
            spec,
            data,
            position: 0,
        }
    }

    /// The number of whole audio frames that haven't been read yet.
    pub fn frames_remaining(&self) -> usize {
        (self.data.len() - self.position) / self.spec.frame_size()
    }
}

impl PcmSource for MemoryPcm {
    fn spec(&self) -> PcmSpec {
        self.spec
    }

    fn read_frames(&mut self, frames: usize) -> Result<Vec<u8>, AudioError> {
        let frames = frames.min(self.frames_remaining());
        let end = self.position + frames * self.spec.frame_size();

        let bytes = self.data[self.position..end].to_vec();
        self.position = end;

        Ok(bytes)
    }
}
