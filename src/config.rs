//! Configuration management for the streaming encoder
//!
//! Validation mirrors the MPEG layer III parameter space: the sample rate
//! selects the MPEG version, which in turn constrains the usable bitrates.
//! All parameters are validated up front so the backend never sees an
//! unsupported combination.

use crate::error::{ConfigError, ConfigResult};

/// Supported input sample rates (Hz)
pub const SUPPORTED_SAMPLE_RATES: &[u32] = &[
    8000, 11025, 12000, // MPEG-2.5
    16000, 22050, 24000, // MPEG-2
    32000, 44100, 48000, // MPEG-1
];

/// Supported bitrates (kbps), as exposed by the LAME binding
pub const SUPPORTED_BITRATES: &[u32] = &[
    8, 16, 24, 32, 40, 48, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320,
];

/// MPEG version, derived from the input sample rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MpegVersion {
    /// MPEG-1 (32/44.1/48 kHz)
    Mpeg1,
    /// MPEG-2 (16/22.05/24 kHz)
    Mpeg2,
    /// MPEG-2.5 (8/11.025/12 kHz)
    Mpeg25,
}

/// Encoder configuration
///
/// Built with chained setters and handed to
/// [`StreamingEncoder::configure`](crate::StreamingEncoder::configure), after
/// which it is immutable for the life of the encoder.
///
/// ```
/// use pcm2mp3::EncoderConfig;
///
/// let config = EncoderConfig::new()
///     .sample_rate(44100)
///     .bitrate(128)
///     .channels(1)
///     .quality(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Target bitrate in kbps
    pub bitrate: u32,
    /// Input sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels (1 = mono, 2 = stereo, interleaved input)
    pub channels: u8,
    /// Encoding quality, 0 (best, slowest) to 9 (worst, fastest)
    pub quality: u8,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            bitrate: 128,
            sample_rate: 44100,
            channels: 2,
            quality: 5,
        }
    }
}

impl EncoderConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target bitrate (kbps)
    pub fn bitrate(mut self, bitrate: u32) -> Self {
        self.bitrate = bitrate;
        self
    }

    /// Set the input sample rate (Hz)
    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the channel count
    pub fn channels(mut self, channels: u8) -> Self {
        self.channels = channels;
        self
    }

    /// Set the quality index (0-9)
    pub fn quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if !SUPPORTED_SAMPLE_RATES.contains(&self.sample_rate) {
            return Err(ConfigError::UnsupportedSampleRate(self.sample_rate));
        }

        if !SUPPORTED_BITRATES.contains(&self.bitrate) {
            return Err(ConfigError::UnsupportedBitrate(self.bitrate));
        }

        if self.channels == 0 || self.channels > 2 {
            return Err(ConfigError::UnsupportedChannels(self.channels));
        }

        if self.quality > 9 {
            return Err(ConfigError::UnsupportedQuality(self.quality));
        }

        self.validate_compatibility()
    }

    /// Get the MPEG version implied by the sample rate
    pub fn mpeg_version(&self) -> MpegVersion {
        match self.sample_rate {
            32000 | 44100 | 48000 => MpegVersion::Mpeg1,
            16000 | 22050 | 24000 => MpegVersion::Mpeg2,
            _ => MpegVersion::Mpeg25,
        }
    }

    /// Samples per frame, per channel
    pub fn samples_per_frame(&self) -> usize {
        match self.mpeg_version() {
            MpegVersion::Mpeg1 => 1152,
            MpegVersion::Mpeg2 | MpegVersion::Mpeg25 => 576,
        }
    }

    /// Validate compatibility between sample rate and bitrate
    fn validate_compatibility(&self) -> ConfigResult<()> {
        let compatible = match self.mpeg_version() {
            MpegVersion::Mpeg1 => self.bitrate >= 32,
            MpegVersion::Mpeg2 => self.bitrate <= 160,
            MpegVersion::Mpeg25 => self.bitrate <= 64,
        };

        if !compatible {
            return Err(ConfigError::IncompatibleRateCombination {
                sample_rate: self.sample_rate,
                bitrate: self.bitrate,
            });
        }

        Ok(())
    }
}
