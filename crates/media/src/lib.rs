//! This library contains everything for turning a raw RGB video and a PCM
//! audio stream into paired frames and playing them back in real time.
//!
//! The usual flow is [FrameLoader::load_files] (or [FrameLoader::stream_files]
//! for a bounded lookahead instead of loading everything up front) followed by
//! [PlaybackScheduler::play]. [VideoPlayer] wraps both.

pub mod audio;
pub mod frame;

mod clock;
mod control;
mod format;
mod loader;
mod producer;
mod scheduler;
mod sequence;
mod source;
mod video_player;

pub use clock::{Clock, SystemClock};
pub use control::{PlaybackControl, PlaybackState};
pub use format::{Format, FormatConfig, FormatError};
pub use loader::{FrameLoader, LoadError};
pub use producer::FrameProducer;
pub use scheduler::{
    AudioOutput, Display, NullAudioOutput, PauseMode, PlaybackError, PlaybackReport,
    PlaybackScheduler, StopReason,
};
pub use sequence::{PlaybackSequence, SequenceCursor};
pub use source::FrameSource;
pub use video_player::VideoPlayer;
