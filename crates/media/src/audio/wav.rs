//! Contains [WavSource], a [PcmSource] that reads WAV files using `hound`.

use std::io::Read;

use hound::WavReader;

use super::{AudioError, PcmSource, PcmSpec, SampleFormat};

/// A [PcmSource] reading a WAV stream front to back. The layout comes from the
/// WAV header. Samples are handed out in the same byte layout WAV files store
/// them in.
pub struct WavSource<R: Read> {
    reader: WavReader<R>,
    spec: PcmSpec,
}

impl<R: Read> WavSource<R> {
    /// Wrap an existing `hound` reader. Frames are read from wherever the
    /// reader currently is.
    pub fn new(reader: WavReader<R>) -> Result<Self, AudioError> {
        let wav_spec = reader.spec();

        let sample_format = match wav_spec.sample_format {
            hound::SampleFormat::Int => SampleFormat::Int,
            hound::SampleFormat::Float => SampleFormat::Float,
        };

        let spec = PcmSpec::new(
            wav_spec.bits_per_sample.div_ceil(8),
            wav_spec.channels,
            wav_spec.sample_rate,
            sample_format,
        )?;

        Ok(Self { reader, spec })
    }

    /// Read a WAV stream from any reader (e.g. an in-memory cursor).
    pub fn from_reader(reader: R) -> Result<Self, AudioError> {
        Self::new(WavReader::new(reader)?)
    }

    /// The number of audio frames in the whole stream (read or not), according
    /// to the header.
    pub fn total_frames(&self) -> u32 {
        self.reader.duration()
    }

    fn read_int_samples(&mut self, samples: usize, bytes: &mut Vec<u8>) -> Result<(), AudioError> {
        let width = self.spec.sample_width();

        for sample in self.reader.samples::<i32>().take(samples) {
            let sample = sample?;
            match width {
                // 8-bit WAV is unsigned, `hound` hands it to us shifted down
                // by 128.
                1 => bytes.push((sample + 128) as u8),
                2 => bytes.extend_from_slice(&(sample as i16).to_le_bytes()),
                3 => bytes.extend_from_slice(&sample.to_le_bytes()[..3]),
                _ => bytes.extend_from_slice(&sample.to_le_bytes()),
            }
        }

        Ok(())
    }

    fn read_float_samples(
        &mut self,
        samples: usize,
        bytes: &mut Vec<u8>,
    ) -> Result<(), AudioError> {
        for sample in self.reader.samples::<f32>().take(samples) {
            bytes.extend_from_slice(&sample?.to_le_bytes());
        }

        Ok(())
    }
}

impl<R: Read> PcmSource for WavSource<R> {
    fn spec(&self) -> PcmSpec {
        self.spec
    }

    fn read_frames(&mut self, frames: usize) -> Result<Vec<u8>, AudioError> {
        let samples = frames * usize::from(self.spec.channels());
        let mut bytes = Vec::with_capacity(frames * self.spec.frame_size());

        match self.spec.sample_format() {
            SampleFormat::Int => self.read_int_samples(samples, &mut bytes)?,
            SampleFormat::Float => self.read_float_samples(samples, &mut bytes)?,
        }

        // A stream cut off in the middle of a frame loses that frame.
        bytes.truncate(bytes.len() / self.spec.frame_size() * self.spec.frame_size());

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use hound::{WavSpec, WavWriter};

    use super::*;

    fn wav_bytes<S: hound::Sample + Copy>(spec: WavSpec, samples: &[S]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
            for &sample in samples {
                writer.write_sample(sample).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    fn int_spec(bits_per_sample: u16, channels: u16) -> WavSpec {
        WavSpec {
            channels,
            sample_rate: 8_000,
            bits_per_sample,
            sample_format: hound::SampleFormat::Int,
        }
    }

    #[test]
    fn header_becomes_pcm_spec() {
        let bytes = wav_bytes(int_spec(16, 2), &[0i16; 8]);
        let source = WavSource::from_reader(Cursor::new(bytes)).unwrap();

        assert_eq!(
            source.spec(),
            PcmSpec::new(2, 2, 8_000, SampleFormat::Int).unwrap()
        );
        assert_eq!(source.total_frames(), 4);
    }

    #[test]
    fn sixteen_bit_frames_round_trip_to_raw_bytes() {
        let samples: Vec<i16> = vec![1, -1, 300, -300, i16::MAX, i16::MIN];
        let bytes = wav_bytes(int_spec(16, 2), &samples);
        let mut source = WavSource::from_reader(Cursor::new(bytes)).unwrap();

        let first = source.read_frames(2).unwrap();
        let expected: Vec<u8> = samples[..4].iter().flat_map(|s| s.to_le_bytes()).collect();
        assert_eq!(first, expected);

        // Only one frame is left.
        let rest = source.read_frames(2).unwrap();
        let expected: Vec<u8> = samples[4..].iter().flat_map(|s| s.to_le_bytes()).collect();
        assert_eq!(rest, expected);

        assert!(source.read_frames(2).unwrap().is_empty());
    }

    #[test]
    fn eight_bit_samples_stay_unsigned() {
        let bytes = wav_bytes(int_spec(8, 1), &[-128i8, 0, 127]);
        let mut source = WavSource::from_reader(Cursor::new(bytes)).unwrap();

        assert_eq!(source.read_frames(3).unwrap(), [0, 128, 255]);
    }

    #[test]
    fn twenty_four_bit_samples_take_three_bytes() {
        let bytes = wav_bytes(int_spec(24, 1), &[0x123456i32, -2]);
        let mut source = WavSource::from_reader(Cursor::new(bytes)).unwrap();

        assert_eq!(source.spec().sample_width(), 3);
        assert_eq!(
            source.read_frames(2).unwrap(),
            [0x56, 0x34, 0x12, 0xFE, 0xFF, 0xFF]
        );
    }

    #[test]
    fn float_samples() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 8_000,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let bytes = wav_bytes(spec, &[0.5f32, -0.25]);
        let mut source = WavSource::from_reader(Cursor::new(bytes)).unwrap();

        let expected: Vec<u8> = [0.5f32, -0.25].iter().flat_map(|s| s.to_le_bytes()).collect();
        assert_eq!(source.read_frames(10).unwrap(), expected);
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(WavSource::from_reader(Cursor::new(b"not a wav file".to_vec())).is_err());
    }
}
