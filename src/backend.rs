//! Frame encoder backends
//!
//! The [`StreamingEncoder`](crate::StreamingEncoder) drives a backend through
//! the narrow [`FrameBackend`] seam: configure once, feed whole frames of
//! interleaved samples, flush once. The shipped backend wraps the LAME
//! encoder via the `mp3lame-encoder` crate; all bitstream production happens
//! inside LAME.

use std::mem::MaybeUninit;

use log::debug;
use mp3lame_encoder::{Builder, Encoder, FlushGap, InterleavedPcm, MonoPcm};

use crate::config::EncoderConfig;
use crate::error::{ConfigError, EncodeError};

/// Worst-case flush output, per the LAME documentation (7200 bytes covers
/// the final frames plus encoder delay)
const FLUSH_BUFFER_SIZE: usize = 7200;

/// Narrow seam between the streaming driver and a stateful frame encoder
///
/// Implementations are position-dependent (bit reservoir and the like);
/// frames must arrive in order and `flush` terminates the instance.
pub trait FrameBackend {
    /// Initialize the backend with a validated configuration
    fn configure(&mut self, config: &EncoderConfig) -> Result<(), ConfigError>;

    /// Encode exactly one frame of interleaved samples, returning its bytes
    fn encode_frame(&mut self, samples: &[i16]) -> Result<Vec<u8>, EncodeError>;

    /// Drain any internally buffered audio and return the final bytes
    fn flush(&mut self) -> Result<Vec<u8>, EncodeError>;
}

/// [`FrameBackend`] implementation over the LAME MP3 encoder
pub struct LameBackend {
    encoder: Option<Encoder>,
    channels: u8,
}

impl LameBackend {
    /// Create an unconfigured backend
    pub fn new() -> Self {
        Self {
            encoder: None,
            channels: 0,
        }
    }

    fn lame_bitrate(kbps: u32) -> Option<mp3lame_encoder::Bitrate> {
        use mp3lame_encoder::Bitrate;
        match kbps {
            8 => Some(Bitrate::Kbps8),
            16 => Some(Bitrate::Kbps16),
            24 => Some(Bitrate::Kbps24),
            32 => Some(Bitrate::Kbps32),
            40 => Some(Bitrate::Kbps40),
            48 => Some(Bitrate::Kbps48),
            64 => Some(Bitrate::Kbps64),
            80 => Some(Bitrate::Kbps80),
            96 => Some(Bitrate::Kbps96),
            112 => Some(Bitrate::Kbps112),
            128 => Some(Bitrate::Kbps128),
            160 => Some(Bitrate::Kbps160),
            192 => Some(Bitrate::Kbps192),
            224 => Some(Bitrate::Kbps224),
            256 => Some(Bitrate::Kbps256),
            320 => Some(Bitrate::Kbps320),
            _ => None,
        }
    }

    fn lame_quality(quality: u8) -> Option<mp3lame_encoder::Quality> {
        use mp3lame_encoder::Quality;
        match quality {
            0 => Some(Quality::Best),
            1 => Some(Quality::SecondBest),
            2 => Some(Quality::NearBest),
            3 => Some(Quality::VeryNice),
            4 => Some(Quality::Nice),
            5 => Some(Quality::Good),
            6 => Some(Quality::Decent),
            7 => Some(Quality::Ok),
            8 => Some(Quality::SecondWorst),
            9 => Some(Quality::Worst),
            _ => None,
        }
    }

    fn take_initialized(buffer: &[MaybeUninit<u8>], written: usize) -> Vec<u8> {
        buffer[..written]
            .iter()
            .map(|b| unsafe { b.assume_init() })
            .collect()
    }
}

impl Default for LameBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBackend for LameBackend {
    fn configure(&mut self, config: &EncoderConfig) -> Result<(), ConfigError> {
        let bitrate = Self::lame_bitrate(config.bitrate)
            .ok_or(ConfigError::UnsupportedBitrate(config.bitrate))?;
        let quality = Self::lame_quality(config.quality)
            .ok_or(ConfigError::UnsupportedQuality(config.quality))?;

        let mut builder = Builder::new()
            .ok_or_else(|| ConfigError::BackendRejected("failed to allocate LAME context".into()))?;

        builder
            .set_sample_rate(config.sample_rate)
            .map_err(|e| ConfigError::BackendRejected(format!("set_sample_rate: {:?}", e)))?;
        builder
            .set_num_channels(config.channels)
            .map_err(|e| ConfigError::BackendRejected(format!("set_num_channels: {:?}", e)))?;

        builder
            .set_brate(bitrate)
            .map_err(|e| ConfigError::BackendRejected(format!("set_brate: {:?}", e)))?;
        builder
            .set_quality(quality)
            .map_err(|e| ConfigError::BackendRejected(format!("set_quality: {:?}", e)))?;

        let encoder = builder
            .build()
            .map_err(|e| ConfigError::BackendRejected(format!("build: {:?}", e)))?;

        debug!(
            "LAME backend ready: {} Hz, {} kbps, {} ch, quality {}",
            config.sample_rate, config.bitrate, config.channels, config.quality
        );

        self.channels = config.channels;
        self.encoder = Some(encoder);
        Ok(())
    }

    fn encode_frame(&mut self, samples: &[i16]) -> Result<Vec<u8>, EncodeError> {
        let encoder = self
            .encoder
            .as_mut()
            .ok_or_else(|| EncodeError::Backend("backend not configured".into()))?;

        let mut buffer: Vec<MaybeUninit<u8>> =
            vec![MaybeUninit::uninit(); mp3lame_encoder::max_required_buffer_size(samples.len())];

        let written = if self.channels == 1 {
            encoder
                .encode(MonoPcm(samples), &mut buffer)
                .map_err(|e| EncodeError::Backend(format!("encode: {:?}", e)))?
        } else {
            encoder
                .encode(InterleavedPcm(samples), &mut buffer)
                .map_err(|e| EncodeError::Backend(format!("encode: {:?}", e)))?
        };

        Ok(Self::take_initialized(&buffer, written))
    }

    fn flush(&mut self) -> Result<Vec<u8>, EncodeError> {
        let encoder = self
            .encoder
            .as_mut()
            .ok_or_else(|| EncodeError::Backend("backend not configured".into()))?;

        let mut buffer: Vec<MaybeUninit<u8>> = vec![MaybeUninit::uninit(); FLUSH_BUFFER_SIZE];
        let written = encoder
            .flush::<FlushGap>(&mut buffer)
            .map_err(|e| EncodeError::Backend(format!("flush: {:?}", e)))?;

        Ok(Self::take_initialized(&buffer, written))
    }
}
