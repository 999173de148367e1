//! Error types for the streaming encoder
//!
//! Errors are split by failure domain: configuration validation, lifecycle
//! state violations, and failures reported by the underlying frame encoder.

use thiserror::Error;

/// Top-level error type returned by [`crate::StreamingEncoder`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncoderError {
    /// Configuration-related errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Lifecycle state violations
    #[error("state error: {0}")]
    State(#[from] StateError),

    /// Encoding process errors
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),
}

/// Configuration validation errors
///
/// These are fatal and non-retryable: a rejected configuration never becomes
/// valid on a later attempt with the same parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Unsupported sample rate
    #[error("unsupported sample rate: {0} Hz")]
    UnsupportedSampleRate(u32),

    /// Unsupported bitrate
    #[error("unsupported bitrate: {0} kbps")]
    UnsupportedBitrate(u32),

    /// Invalid channel configuration
    #[error("unsupported channel count: {0} (must be 1 or 2)")]
    UnsupportedChannels(u8),

    /// Quality index outside the 0-9 range
    #[error("quality {0} out of range (0 = best/slowest, 9 = worst/fastest)")]
    UnsupportedQuality(u8),

    /// Incompatible sample rate and bitrate combination
    #[error("incompatible sample rate ({sample_rate} Hz) and bitrate ({bitrate} kbps) combination")]
    IncompatibleRateCombination { sample_rate: u32, bitrate: u32 },

    /// Configure called on an already configured encoder
    #[error("encoder is already configured")]
    AlreadyConfigured,

    /// The backend refused an otherwise validated configuration
    #[error("encoder backend rejected configuration: {0}")]
    BackendRejected(String),
}

/// Lifecycle state violations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    /// Operation attempted before the encoder was configured
    #[error("{call} called before configure")]
    NotConfigured { call: &'static str },

    /// Operation attempted after the terminal flush
    #[error("{call} called after flush")]
    AlreadyFlushed { call: &'static str },
}

/// Encoding process errors
///
/// Any of these aborts the stream; bytes already emitted are not rolled back
/// and the encoder instance must be discarded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    /// Chunk length is not a multiple of the channel count
    #[error("chunk length {len} is not a multiple of the channel count {channels}")]
    UnalignedChunk { channels: u8, len: usize },

    /// Planar input does not match the configured channel layout
    #[error("planar input provided {provided} channel(s), encoder configured for {expected}")]
    ChannelMismatch { expected: u8, provided: u8 },

    /// Planar channel buffers differ in length
    #[error("planar channel lengths differ: left {left}, right {right}")]
    LengthMismatch { left: usize, right: usize },

    /// The underlying frame encoder reported a failure
    #[error("encoder backend error: {0}")]
    Backend(String),
}

/// Specialized result types for different modules
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
pub type EncodeResult<T> = std::result::Result<T, EncoderError>;
