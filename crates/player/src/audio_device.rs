//! Contains [SpeakerOutput], an [AudioOutput] that plays through the default
//! output device with `rodio`.

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};

use media::audio::{PcmSpec, decode_to_f32};
use media::{AudioOutput, PlaybackError};

/// Plays raw PCM chunks on the default output device. The device is opened
/// once and released (with anything still queued cut off) when this is
/// dropped.
///
/// The output stream can't be moved between threads, so this has to be opened
/// on the thread that plays.
pub struct SpeakerOutput {
    spec: PcmSpec,
    sink: Sink,
    _handle: OutputStreamHandle,
    _stream: OutputStream,
}

impl SpeakerOutput {
    /// Open the default output device for audio laid out like `spec`.
    pub fn open(spec: PcmSpec) -> Result<Self, PlaybackError> {
        let (stream, handle) = OutputStream::try_default().map_err(|e| {
            PlaybackError::ResourceUnavailable(format!("Couldn't open an audio device: {e}"))
        })?;

        let sink = Sink::try_new(&handle).map_err(|e| {
            PlaybackError::ResourceUnavailable(format!("Couldn't start audio playback: {e}"))
        })?;

        util::debug_log_info!("Opened the default audio device for {spec} audio.");

        Ok(Self {
            spec,
            sink,
            _handle: handle,
            _stream: stream,
        })
    }
}

impl AudioOutput for SpeakerOutput {
    fn write(&mut self, chunk: &[u8]) -> Result<(), PlaybackError> {
        if chunk.is_empty() {
            return Ok(());
        }

        let samples = decode_to_f32(self.spec, chunk);
        self.sink.append(SamplesBuffer::new(
            self.spec.channels(),
            self.spec.frame_rate(),
            samples,
        ));

        Ok(())
    }

    fn drain(&mut self) -> Result<(), PlaybackError> {
        self.sink.sleep_until_end();
        Ok(())
    }
}

impl Drop for SpeakerOutput {
    fn drop(&mut self) {
        self.sink.stop();
    }
}
