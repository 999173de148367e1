//! PCM sample utilities
//!
//! Stateless helpers for preparing PCM input: scaling normalized float
//! samples to 16-bit integers and interleaving planar channel buffers.
//! Float conversion saturates explicitly; out-of-range input clamps to the
//! i16 extremes instead of wrapping, and NaN maps to silence.

/// Scale factor for normalized float samples
const I16_SCALE: f32 = 32767.0;

/// Convert a normalized float sample (nominal range [-1.0, 1.0]) to i16
pub fn sample_to_i16(sample: f32) -> i16 {
    if sample.is_nan() {
        return 0;
    }
    (sample * I16_SCALE)
        .round()
        .clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

/// Convert a slice of normalized float samples to i16
pub fn samples_to_i16(samples: &[f32]) -> Vec<i16> {
    samples.iter().map(|&s| sample_to_i16(s)).collect()
}

/// Interleave two equal-length channel buffers as [L0, R0, L1, R1, ...]
///
/// If the buffers differ in length the longer tail is ignored; callers that
/// care validate lengths first.
pub fn interleave(left: &[i16], right: &[i16]) -> Vec<i16> {
    let mut interleaved = Vec::with_capacity(left.len().min(right.len()) * 2);
    for (l, r) in left.iter().zip(right.iter()) {
        interleaved.push(*l);
        interleaved.push(*r);
    }
    interleaved
}
