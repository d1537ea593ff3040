//! Contains the [FrameSource] trait, anything playback can pull frames from.

use std::borrow::Cow;

use crate::frame::CombinedFrame;
use crate::loader::LoadError;

/// A front-to-back supply of [CombinedFrame]s: either a loaded
/// [PlaybackSequence](crate::PlaybackSequence) (see
/// [PlaybackSequence::cursor](crate::PlaybackSequence::cursor)) or a
/// [FrameProducer](crate::FrameProducer) loading frames as it goes.
///
/// # Contract
///
/// Frames are returned in playback order, each exactly once. Once [None] or an
/// error has been returned, no more frames will ever be returned.
pub trait FrameSource {
    /// The next frame, or [None] when there aren't any left. Sources that own
    /// their frames hand them out as [Cow::Owned], ones that borrow them as
    /// [Cow::Borrowed].
    fn next_frame(&mut self) -> Result<Option<Cow<'_, CombinedFrame>>, LoadError>;
}

impl<S: FrameSource + ?Sized> FrameSource for &mut S {
    fn next_frame(&mut self) -> Result<Option<Cow<'_, CombinedFrame>>, LoadError> {
        (**self).next_frame()
    }
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> Result<Option<Cow<'_, CombinedFrame>>, LoadError> {
        (**self).next_frame()
    }
}
