//! Decides how many audio frames go with each video frame.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// What to do with the remainder when the audio rate isn't a multiple of the
/// video frame rate.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AudioChunking {
    /// Every chunk is `audio_rate / video_fps` frames (integer division). The
    /// remainder is never played, so audio slowly falls behind video when the
    /// rates don't divide evenly.
    #[default]
    Truncate,
    /// The remainder is carried forward so that after `n` video frames exactly
    /// `n * audio_rate / video_fps` (rounded down) audio frames have been
    /// handed out. Chunk sizes alternate between two neighboring values.
    Carry,
}

/// An endless iterator over chunk sizes (in audio frames), one per video frame.
///
/// ```
/// use std::num::NonZeroU32;
/// use media::audio::{AudioChunker, AudioChunking};
///
/// let rate = NonZeroU32::new(100).unwrap();
/// let fps = NonZeroU32::new(30).unwrap();
///
/// let truncated: Vec<usize> = AudioChunker::new(rate, fps, AudioChunking::Truncate)
///     .take(3)
///     .collect();
/// assert_eq!(truncated, [3, 3, 3]);
///
/// let carried: Vec<usize> = AudioChunker::new(rate, fps, AudioChunking::Carry)
///     .take(3)
///     .collect();
/// assert_eq!(carried, [3, 3, 4]);
/// ```
#[derive(Debug, Clone)]
pub struct AudioChunker {
    audio_rate: u128,
    video_fps: u128,
    chunking: AudioChunking,
    video_frames_done: u128,
}

impl AudioChunker {
    pub fn new(audio_rate: NonZeroU32, video_fps: NonZeroU32, chunking: AudioChunking) -> Self {
        Self {
            audio_rate: audio_rate.get().into(),
            video_fps: video_fps.get().into(),
            chunking,
            video_frames_done: 0,
        }
    }

    /// `floor(audio_rate / video_fps)`, the chunk size [AudioChunking::Truncate]
    /// always uses.
    pub fn truncated_chunk_len(&self) -> usize {
        (self.audio_rate / self.video_fps) as usize
    }

    /// The total number of audio frames handed out after `video_frames` chunks.
    fn frames_after(&self, video_frames: u128) -> u128 {
        video_frames * self.audio_rate / self.video_fps
    }
}

impl Iterator for AudioChunker {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let len = match self.chunking {
            AudioChunking::Truncate => self.truncated_chunk_len(),
            AudioChunking::Carry => {
                let before = self.frames_after(self.video_frames_done);
                let after = self.frames_after(self.video_frames_done + 1);
                (after - before) as usize
            }
        };

        self.video_frames_done += 1;
        Some(len)
    }
}
