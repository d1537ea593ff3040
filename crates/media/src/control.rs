//! Contains [PlaybackControl], a handle for pausing, resuming, and stopping
//! playback from outside the playback loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// Where playback is at (see [PlaybackControl]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PlaybackState {
    Running = 0,
    Paused = 1,
    /// Final. Nothing moves playback out of this state.
    Stopped = 2,
}

impl PlaybackState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Running,
            1 => Self::Paused,
            _ => Self::Stopped,
        }
    }
}

/// A shared playback state cell. Clones all refer to the same state, so one
/// can be handed to a UI thread or a signal handler while the
/// [PlaybackScheduler](crate::PlaybackScheduler) polls another once per frame.
///
/// ```
/// use media::{PlaybackControl, PlaybackState};
///
/// let control = PlaybackControl::new();
/// let remote = control.clone();
///
/// remote.pause();
/// assert_eq!(control.state(), PlaybackState::Paused);
///
/// remote.stop();
/// control.resume();
/// assert_eq!(control.state(), PlaybackState::Stopped);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PlaybackControl(Arc<AtomicU8>);

impl PlaybackControl {
    /// A new control in the [PlaybackState::Running] state.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub fn is_paused(&self) -> bool {
        self.state() == PlaybackState::Paused
    }

    pub fn is_stopped(&self) -> bool {
        self.state() == PlaybackState::Stopped
    }

    /// Pause (unless stopped). Returns whether the state changed.
    pub fn pause(&self) -> bool {
        self.transition(PlaybackState::Running, PlaybackState::Paused)
    }

    /// Resume (unless stopped). Returns whether the state changed.
    pub fn resume(&self) -> bool {
        self.transition(PlaybackState::Paused, PlaybackState::Running)
    }

    /// Pause if running, resume if paused. The resulting state is returned.
    pub fn toggle_pause(&self) -> PlaybackState {
        let previous = self.0.fetch_update(Ordering::AcqRel, Ordering::Acquire, |state| {
            match PlaybackState::from_u8(state) {
                PlaybackState::Running => Some(PlaybackState::Paused as u8),
                PlaybackState::Paused => Some(PlaybackState::Running as u8),
                PlaybackState::Stopped => None,
            }
        });

        match previous.map(PlaybackState::from_u8) {
            Ok(PlaybackState::Running) => PlaybackState::Paused,
            Ok(PlaybackState::Paused) => PlaybackState::Running,
            _ => PlaybackState::Stopped,
        }
    }

    /// Stop for good. Playback ends before the next frame.
    pub fn stop(&self) {
        self.0.store(PlaybackState::Stopped as u8, Ordering::Release);
    }

    fn transition(&self, from: PlaybackState, to: PlaybackState) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
