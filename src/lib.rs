//! # pcm2mp3
//!
//! A streaming PCM to MP3 encoding library. The crate implements the
//! lifecycle and chunking discipline needed to drive a stateful frame
//! encoder correctly: configure once, feed ordered chunks of interleaved
//! 16-bit samples, flush once. Bitstream production itself is delegated to
//! the LAME encoder behind a narrow per-frame seam.
//!
//! ```no_run
//! use pcm2mp3::{EncoderConfig, StreamingEncoder};
//!
//! # fn main() -> Result<(), pcm2mp3::EncoderError> {
//! let mut encoder = StreamingEncoder::new();
//! encoder.configure(
//!     EncoderConfig::new()
//!         .sample_rate(44100)
//!         .bitrate(128)
//!         .channels(1)
//!         .quality(7),
//! )?;
//!
//! let mut mp3 = Vec::new();
//! mp3.extend(encoder.encode(&vec![0i16; 12800])?);
//! mp3.extend(encoder.flush()?);
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod encoder;
pub mod error;
pub mod pcm;
pub mod util;

pub use backend::{FrameBackend, LameBackend};
pub use config::{EncoderConfig, MpegVersion, SUPPORTED_BITRATES, SUPPORTED_SAMPLE_RATES};
pub use encoder::{encode_pcm_to_mp3, State, StreamingEncoder};
pub use error::{ConfigError, EncodeError, EncodeResult, EncoderError, StateError};
