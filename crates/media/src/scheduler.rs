//! Contains [PlaybackScheduler], the real-time loop that shows frames and
//! plays their audio at the video's frame rate, along with the [Display] and
//! [AudioOutput] traits it plays through.

use std::time::Duration;

use thiserror::Error;

use crate::clock::{Clock, SystemClock};
use crate::control::{PlaybackControl, PlaybackState};
use crate::frame::ImageFrame;
use crate::loader::LoadError;
use crate::source::FrameSource;

/// Somewhere frames get shown (e.g. a window).
pub trait Display {
    /// Show `image` until the next call. Rendering time counts against the
    /// frame's time budget.
    fn show(&mut self, image: &ImageFrame) -> Result<(), PlaybackError>;

    /// Whether the viewer asked for playback to end (e.g. closed the window).
    /// Polled once after every frame is shown and every frame interval while
    /// paused.
    fn stop_requested(&mut self) -> bool;
}

/// Somewhere audio chunks get played (e.g. speakers). Whatever device is
/// behind an implementation should be released when it's dropped.
pub trait AudioOutput {
    /// Queue `chunk` (raw PCM bytes) to be played. This is allowed to block
    /// until the device has room.
    fn write(&mut self, chunk: &[u8]) -> Result<(), PlaybackError>;

    /// Block until everything written has been played. Only called when
    /// playback reaches the end of the video.
    fn drain(&mut self) -> Result<(), PlaybackError> {
        Ok(())
    }
}

impl<D: Display + ?Sized> Display for &mut D {
    fn show(&mut self, image: &ImageFrame) -> Result<(), PlaybackError> {
        (**self).show(image)
    }

    fn stop_requested(&mut self) -> bool {
        (**self).stop_requested()
    }
}

impl<A: AudioOutput + ?Sized> AudioOutput for &mut A {
    fn write(&mut self, chunk: &[u8]) -> Result<(), PlaybackError> {
        (**self).write(chunk)
    }

    fn drain(&mut self) -> Result<(), PlaybackError> {
        (**self).drain()
    }
}

impl<A: AudioOutput + ?Sized> AudioOutput for Box<A> {
    fn write(&mut self, chunk: &[u8]) -> Result<(), PlaybackError> {
        (**self).write(chunk)
    }

    fn drain(&mut self) -> Result<(), PlaybackError> {
        (**self).drain()
    }
}

/// An [AudioOutput] that throws everything away (for muted playback).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullAudioOutput;

impl AudioOutput for NullAudioOutput {
    fn write(&mut self, _chunk: &[u8]) -> Result<(), PlaybackError> {
        Ok(())
    }
}

/// What happens to the playback position while paused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PauseMode {
    /// Frames keep getting consumed at the frame rate, just without being
    /// shown or heard. Resuming picks up wherever playback would have been.
    #[default]
    SkipFrames,
    /// Playback holds its position until resumed.
    Hold,
}

/// Why playback ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// Every frame was consumed.
    #[default]
    Finished,
    /// The [Display] asked to stop.
    Cancelled,
    /// The [PlaybackControl] was stopped.
    Stopped,
}

/// A summary of one run of [PlaybackScheduler::play].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackReport {
    pub frames_shown: usize,
    /// Frames consumed while paused (see [PauseMode::SkipFrames]).
    pub frames_skipped: usize,
    pub audio_chunks_written: usize,
    /// Chunks thrown away because showing their frame took the whole frame
    /// interval.
    pub audio_chunks_dropped: usize,
    pub stop_reason: StopReason,
}

/// Plays frames in real time.
///
/// For every frame the scheduler shows the image, then spends whatever is left
/// of the frame interval writing the frame's audio and sleeping. If showing the
/// image used up the whole interval, the frame's audio is dropped and the next
/// frame starts right away so video never falls further behind.
///
/// Only the time spent showing a frame is subtracted from the sleep. Time spent
/// writing audio isn't, so an audio device that blocks on writes slows
/// playback down.
///
/// The [PlaybackControl] is checked once before every frame.
#[derive(Debug, Clone)]
pub struct PlaybackScheduler<C = SystemClock> {
    frame_interval: Duration,
    control: PlaybackControl,
    pause_mode: PauseMode,
    clock: C,
}

impl PlaybackScheduler {
    /// A scheduler for the real clock that starts a new frame every
    /// `frame_interval`.
    pub fn new(frame_interval: Duration) -> Self {
        Self {
            frame_interval,
            control: PlaybackControl::new(),
            pause_mode: PauseMode::default(),
            clock: SystemClock,
        }
    }
}

impl<C: Clock> PlaybackScheduler<C> {
    /// Pace playback against `clock` instead.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> PlaybackScheduler<C2> {
        PlaybackScheduler {
            frame_interval: self.frame_interval,
            control: self.control,
            pause_mode: self.pause_mode,
            clock,
        }
    }

    /// Use an existing control (e.g. one that's already been handed out).
    pub fn with_control(mut self, control: PlaybackControl) -> Self {
        self.control = control;
        self
    }

    pub fn with_pause_mode(mut self, pause_mode: PauseMode) -> Self {
        self.pause_mode = pause_mode;
        self
    }

    /// The control this scheduler obeys. Clone it to pause or stop playback
    /// from somewhere else.
    pub fn control(&self) -> &PlaybackControl {
        &self.control
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    pub fn pause_mode(&self) -> PauseMode {
        self.pause_mode
    }

    /// Play every frame from `source` on `display`, sending their audio to
    /// `audio`. Returns once the source runs out, the display asks to stop,
    /// or the control is stopped.
    ///
    /// `audio` is only drained when the source runs out.
    pub fn play<S, A, D>(
        &self,
        mut source: S,
        audio: &mut A,
        display: &mut D,
    ) -> Result<PlaybackReport, PlaybackError>
    where
        S: FrameSource,
        A: AudioOutput + ?Sized,
        D: Display + ?Sized,
    {
        let mut report = PlaybackReport::default();

        report.stop_reason = loop {
            match self.control.state() {
                PlaybackState::Running => {}
                PlaybackState::Stopped => break StopReason::Stopped,

                PlaybackState::Paused => {
                    if self.pause_mode == PauseMode::SkipFrames {
                        if source.next_frame()?.is_none() {
                            break StopReason::Finished;
                        }
                        report.frames_skipped += 1;
                    }

                    if display.stop_requested() {
                        break StopReason::Cancelled;
                    }

                    self.clock.sleep(self.frame_interval);
                    continue;
                }
            }

            let Some(frame) = source.next_frame()? else {
                break StopReason::Finished;
            };

            let start_time = self.clock.now();

            display.show(frame.image())?;
            report.frames_shown += 1;

            if display.stop_requested() {
                break StopReason::Cancelled;
            }

            let render_time = self.clock.now().saturating_duration_since(start_time);

            match self.frame_interval.checked_sub(render_time) {
                Some(wait_time) if !wait_time.is_zero() => {
                    audio.write(frame.audio().bytes())?;
                    report.audio_chunks_written += 1;

                    self.clock.sleep(wait_time);
                }

                _ => report.audio_chunks_dropped += 1,
            }
        };

        if report.stop_reason == StopReason::Finished {
            audio.drain()?;
        }

        util::debug_log_info!(
            "Playback ended ({:?}): {} frame(s) shown, {} skipped, {} audio chunk(s) dropped.",
            report.stop_reason,
            report.frames_shown,
            report.frames_skipped,
            report.audio_chunks_dropped
        );

        Ok(report)
    }
}

/// An error that ended playback.
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// A display or audio device failed (or couldn't be opened).
    #[error("A playback device is unavailable: {0}")]
    ResourceUnavailable(String),
    #[error("Couldn't get the next frame: {0}")]
    Source(#[from] LoadError),
}
