//! Converting raw PCM bytes into normalized samples for audio devices.

use super::{PcmSpec, SampleFormat};

/// Decode interleaved raw PCM bytes in `spec`'s layout into `f32` samples in
/// the range `[-1.0, 1.0]`. Trailing bytes that don't make up a whole sample
/// are ignored.
///
/// ```
/// use media::audio::{PcmSpec, SampleFormat, decode_to_f32};
///
/// let spec = PcmSpec::new(2, 1, 8_000, SampleFormat::Int).unwrap();
/// let samples = decode_to_f32(spec, &[0x00, 0x40, 0x00, 0xC0]);
/// assert_eq!(samples, [0.5, -0.5]);
/// ```
pub fn decode_to_f32(spec: PcmSpec, bytes: &[u8]) -> Vec<f32> {
    let width = usize::from(spec.sample_width());
    let samples = bytes.chunks_exact(width);

    match (spec.sample_format(), width) {
        (SampleFormat::Float, _) => samples
            .map(|s| f32::from_le_bytes([s[0], s[1], s[2], s[3]]))
            .collect(),
        (SampleFormat::Int, 1) => samples.map(|s| (f32::from(s[0]) - 128.0) / 128.0).collect(),
        (SampleFormat::Int, 2) => samples
            .map(|s| f32::from(i16::from_le_bytes([s[0], s[1]])) / 32_768.0)
            .collect(),
        (SampleFormat::Int, 3) => samples
            // Put the 3 bytes in the top of an `i32` so the sign comes along.
            .map(|s| (i32::from_le_bytes([0, s[0], s[1], s[2]]) >> 8) as f32 / 8_388_608.0)
            .collect(),
        (SampleFormat::Int, _) => samples
            .map(|s| i32::from_le_bytes([s[0], s[1], s[2], s[3]]) as f32 / 2_147_483_648.0)
            .collect(),
    }
}
