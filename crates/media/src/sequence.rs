//! Contains [PlaybackSequence], the fully loaded list of frames to play, and
//! [SequenceCursor], the [FrameSource] that walks it.

use std::borrow::Cow;
use std::ops::Index;
use std::slice;

use crate::frame::CombinedFrame;
use crate::loader::LoadError;
use crate::source::FrameSource;

/// Every [CombinedFrame] of a video, in playback order. Built once by a
/// [FrameLoader](crate::FrameLoader) and only read after that.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackSequence {
    frames: Vec<CombinedFrame>,
}

impl PlaybackSequence {
    pub fn new(frames: Vec<CombinedFrame>) -> Self {
        Self { frames }
    }

    /// The number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The frame at position `index`, if there is one.
    pub fn get(&self, index: usize) -> Option<&CombinedFrame> {
        self.frames.get(index)
    }

    pub fn frames(&self) -> &[CombinedFrame] {
        &self.frames
    }

    pub fn iter(&self) -> slice::Iter<'_, CombinedFrame> {
        self.frames.iter()
    }

    /// A [FrameSource] that hands out this sequence's frames from the start.
    pub fn cursor(&self) -> SequenceCursor<'_> {
        SequenceCursor {
            frames: self.frames.iter(),
        }
    }

    pub fn into_frames(self) -> Vec<CombinedFrame> {
        self.frames
    }
}

impl Index<usize> for PlaybackSequence {
    type Output = CombinedFrame;

    fn index(&self, index: usize) -> &CombinedFrame {
        &self.frames[index]
    }
}

impl FromIterator<CombinedFrame> for PlaybackSequence {
    fn from_iter<I: IntoIterator<Item = CombinedFrame>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PlaybackSequence {
    type Item = &'a CombinedFrame;
    type IntoIter = slice::Iter<'a, CombinedFrame>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrows a [PlaybackSequence], lending out its frames front to back without
/// copying them.
#[derive(Debug, Clone)]
pub struct SequenceCursor<'a> {
    frames: slice::Iter<'a, CombinedFrame>,
}

impl SequenceCursor<'_> {
    /// The number of frames that haven't been handed out yet.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for SequenceCursor<'_> {
    fn next_frame(&mut self) -> Result<Option<Cow<'_, CombinedFrame>>, LoadError> {
        Ok(self.frames.next().map(Cow::Borrowed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioChunk;
    use crate::frame::{ChannelOrder, ImageFrame, PixelLayout};

    fn frame(fill: u8) -> CombinedFrame {
        let image = ImageFrame::from_raw(
            &[fill; 3],
            (1, 1).into(),
            PixelLayout::Interleaved,
            ChannelOrder::Rgb,
            ChannelOrder::Rgb,
        )
        .unwrap();
        CombinedFrame::new(image, AudioChunk::empty())
    }

    #[test]
    fn cursor_walks_in_order() {
        let sequence: PlaybackSequence = (0..3).map(frame).collect();
        let mut cursor = sequence.cursor();

        for i in 0..3 {
            assert_eq!(cursor.remaining(), 3 - i as usize);
            let next = cursor.next_frame().unwrap().unwrap();
            assert_eq!(next.image().as_bytes(), &[i; 3]);
            assert!(matches!(next, Cow::Borrowed(_)));
        }

        assert!(cursor.next_frame().unwrap().is_none());
        assert!(cursor.next_frame().unwrap().is_none());
    }

    #[test]
    fn indexing() {
        let sequence: PlaybackSequence = (0..2).map(frame).collect();
        assert_eq!(sequence.len(), 2);
        assert_eq!(sequence[1], frame(1));
        assert!(sequence.get(2).is_none());
        assert!(PlaybackSequence::default().is_empty());
    }
}
