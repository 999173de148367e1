//! WAV input utilities
//!
//! Reads WAV audio into the interleaved i16 form the encoder consumes.
//! Integer samples pass through; float samples go through the saturating
//! conversion in [`crate::pcm`].

use std::io::Read;

use thiserror::Error;

use crate::pcm;

/// Errors from WAV reading
#[derive(Debug, Error)]
pub enum WavError {
    /// The file could not be opened or parsed
    #[error("failed to read WAV: {0}")]
    Wav(#[from] hound::Error),

    /// Channel count does not fit the encoder's u8 channel field
    #[error("unsupported WAV channel count: {0}")]
    ChannelCount(u16),

    /// The file parsed but contained no samples
    #[error("no audio data found in WAV file")]
    Empty,
}

/// Read WAV audio from a file path
///
/// Returns the interleaved samples, the sample rate and the channel count.
pub fn read_wav_file(path: &str) -> Result<(Vec<i16>, u32, u8), WavError> {
    read_wav(hound::WavReader::open(path)?)
}

/// Read WAV audio from an already opened reader
pub fn read_wav<R: Read>(mut reader: hound::WavReader<R>) -> Result<(Vec<i16>, u32, u8), WavError> {
    let spec = reader.spec();

    // checked, not truncated: a header claiming 257 channels must not
    // silently become mono
    let channels =
        u8::try_from(spec.channels).map_err(|_| WavError::ChannelCount(spec.channels))?;

    let samples: Vec<i16> = match spec.sample_format {
        hound::SampleFormat::Int => reader.samples::<i16>().collect::<Result<_, _>>()?,
        hound::SampleFormat::Float => {
            let floats: Vec<f32> = reader.samples::<f32>().collect::<Result<_, _>>()?;
            pcm::samples_to_i16(&floats)
        }
    };

    if samples.is_empty() {
        return Err(WavError::Empty);
    }

    Ok((samples, spec.sample_rate, channels))
}
