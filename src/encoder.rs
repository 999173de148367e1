//! Streaming encoder driver
//!
//! [`StreamingEncoder`] owns the chunking discipline around a stateful frame
//! encoder: it accepts PCM chunks of any size, feeds the backend whole frames
//! only, and carries sub-frame remainders across calls. Lifecycle is a strict
//! state machine; once flushed, the instance is terminal.

use std::collections::VecDeque;

use log::{debug, trace};

use crate::backend::{FrameBackend, LameBackend};
use crate::config::EncoderConfig;
use crate::error::{ConfigError, EncodeError, EncodeResult, StateError};
use crate::pcm;

/// Encoder lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// No configuration set yet
    Unconfigured,
    /// Configured, no samples accepted yet
    Configured,
    /// At least one chunk accepted
    Encoding,
    /// Flushed; terminal
    Flushed,
}

/// Streaming PCM to MP3 encoder
///
/// Control flow: [`configure`](Self::configure) once, then
/// [`encode`](Self::encode) ordered chunks, then [`flush`](Self::flush)
/// exactly once. Concatenating all returned byte sequences in emission order
/// yields the complete MP3 stream.
///
/// The value is exclusively owned by one thread of execution; there is no
/// internal locking.
///
/// ```no_run
/// use pcm2mp3::{EncoderConfig, StreamingEncoder};
///
/// # fn main() -> Result<(), pcm2mp3::EncoderError> {
/// let mut encoder = StreamingEncoder::new();
/// encoder.configure(EncoderConfig::new().sample_rate(44100).bitrate(128).channels(1))?;
///
/// let mut mp3 = Vec::new();
/// for chunk in [[0i16; 1024]; 4] {
///     mp3.extend(encoder.encode(&chunk)?);
/// }
/// mp3.extend(encoder.flush()?);
/// # Ok(())
/// # }
/// ```
pub struct StreamingEncoder<B = LameBackend> {
    backend: B,
    state: State,
    config: Option<EncoderConfig>,
    /// Interleaved samples per backend frame (per-channel count times channels)
    samples_per_frame: usize,
    /// Carry-over samples that did not fill a whole frame
    buffer: VecDeque<i16>,
}

impl StreamingEncoder<LameBackend> {
    /// Create an unconfigured encoder backed by LAME
    pub fn new() -> Self {
        Self::with_backend(LameBackend::new())
    }
}

impl Default for StreamingEncoder<LameBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: FrameBackend> StreamingEncoder<B> {
    /// Create an unconfigured encoder over a custom backend
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            state: State::Unconfigured,
            config: None,
            samples_per_frame: 0,
            buffer: VecDeque::new(),
        }
    }

    /// Set and lock the encoder parameters
    ///
    /// Valid only once, before any samples are accepted. Parameters are
    /// validated here and then handed to the backend; both failure modes are
    /// fatal for this instance.
    pub fn configure(&mut self, config: EncoderConfig) -> EncodeResult<()> {
        match self.state {
            State::Flushed => {
                return Err(StateError::AlreadyFlushed { call: "configure" }.into());
            }
            State::Configured | State::Encoding => {
                return Err(ConfigError::AlreadyConfigured.into());
            }
            State::Unconfigured => {}
        }

        config.validate()?;
        self.backend.configure(&config)?;

        self.samples_per_frame = config.samples_per_frame() * config.channels as usize;
        debug!(
            "configured: {} Hz, {} kbps, {} ch, quality {}, {} samples/frame",
            config.sample_rate, config.bitrate, config.channels, config.quality,
            self.samples_per_frame
        );

        self.config = Some(config);
        self.state = State::Configured;
        Ok(())
    }

    /// Encode the next chunk of interleaved i16 samples
    ///
    /// Buffered leftovers from earlier calls are prepended, every complete
    /// frame is pushed through the backend, and the sub-frame remainder is
    /// retained. Returns the bytes of all frames produced by this call, which
    /// may be empty while a frame is still filling. Chunks must arrive in
    /// order; an empty chunk is a no-op.
    pub fn encode(&mut self, chunk: &[i16]) -> EncodeResult<Vec<u8>> {
        if self.state == State::Flushed {
            return Err(StateError::AlreadyFlushed { call: "encode" }.into());
        }
        let Some(config) = self.config.as_ref() else {
            return Err(StateError::NotConfigured { call: "encode" }.into());
        };

        if chunk.len() % config.channels as usize != 0 {
            return Err(EncodeError::UnalignedChunk {
                channels: config.channels,
                len: chunk.len(),
            }
            .into());
        }

        self.state = State::Encoding;
        self.buffer.extend(chunk);

        let mut output = Vec::new();
        while self.buffer.len() >= self.samples_per_frame {
            let frame: Vec<i16> = self.buffer.drain(..self.samples_per_frame).collect();
            let bytes = self.backend.encode_frame(&frame)?;
            trace!("frame encoded: {} samples in, {} bytes out", frame.len(), bytes.len());
            output.extend_from_slice(&bytes);
        }

        Ok(output)
    }

    /// Encode a chunk given as separate channel buffers
    ///
    /// For mono configurations pass `right = None`; for stereo both buffers
    /// must have equal length. The buffers are interleaved and fed through
    /// [`encode`](Self::encode).
    pub fn encode_planar(&mut self, left: &[i16], right: Option<&[i16]>) -> EncodeResult<Vec<u8>> {
        if self.state == State::Flushed {
            return Err(StateError::AlreadyFlushed { call: "encode_planar" }.into());
        }
        let Some(config) = self.config.as_ref() else {
            return Err(StateError::NotConfigured { call: "encode_planar" }.into());
        };

        match (config.channels, right) {
            (1, None) => self.encode(left),
            (2, Some(right)) => {
                if left.len() != right.len() {
                    return Err(EncodeError::LengthMismatch {
                        left: left.len(),
                        right: right.len(),
                    }
                    .into());
                }
                let interleaved = pcm::interleave(left, right);
                self.encode(&interleaved)
            }
            (expected, right) => Err(EncodeError::ChannelMismatch {
                expected,
                provided: if right.is_some() { 2 } else { 1 },
            }
            .into()),
        }
    }

    /// Finish the stream
    ///
    /// Any buffered remainder is zero-padded to a whole frame and encoded,
    /// then the backend drains its internal delay. Valid exactly once; every
    /// later call on this instance fails with a state error.
    pub fn flush(&mut self) -> EncodeResult<Vec<u8>> {
        match self.state {
            State::Unconfigured => {
                return Err(StateError::NotConfigured { call: "flush" }.into());
            }
            State::Flushed => {
                return Err(StateError::AlreadyFlushed { call: "flush" }.into());
            }
            State::Configured | State::Encoding => {}
        }
        self.state = State::Flushed;

        let mut output = Vec::new();
        if !self.buffer.is_empty() {
            let mut frame: Vec<i16> = self.buffer.drain(..).collect();
            frame.resize(self.samples_per_frame, 0);
            output.extend_from_slice(&self.backend.encode_frame(&frame)?);
        }
        output.extend_from_slice(&self.backend.flush()?);

        debug!("flushed: {} final bytes", output.len());
        Ok(output)
    }

    /// Current lifecycle state
    pub fn state(&self) -> State {
        self.state
    }

    /// The locked configuration, if set
    pub fn config(&self) -> Option<&EncoderConfig> {
        self.config.as_ref()
    }

    /// Interleaved samples per backend frame (0 before configuration)
    pub fn samples_per_frame(&self) -> usize {
        self.samples_per_frame
    }

    /// Samples currently carried over, waiting for a whole frame
    pub fn buffered_samples(&self) -> usize {
        self.buffer.len()
    }
}

/// Convenience function: encode a complete PCM buffer in one call
pub fn encode_pcm_to_mp3(config: EncoderConfig, pcm_data: &[i16]) -> EncodeResult<Vec<u8>> {
    let mut encoder = StreamingEncoder::new();
    encoder.configure(config)?;

    let mut mp3_data = encoder.encode(pcm_data)?;
    mp3_data.extend(encoder.flush()?);
    Ok(mp3_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EncoderError;

    /// Deterministic stand-in backend: records frame feeds, emits one tagged
    /// byte run per frame and a marker byte on flush.
    struct StubBackend {
        configured: bool,
        frames: Vec<Vec<i16>>,
        flushed: bool,
    }

    impl StubBackend {
        fn new() -> Self {
            Self {
                configured: false,
                frames: Vec::new(),
                flushed: false,
            }
        }
    }

    impl FrameBackend for StubBackend {
        fn configure(&mut self, _config: &EncoderConfig) -> Result<(), ConfigError> {
            self.configured = true;
            Ok(())
        }

        fn encode_frame(&mut self, samples: &[i16]) -> Result<Vec<u8>, EncodeError> {
            assert!(self.configured);
            assert!(!self.flushed);
            self.frames.push(samples.to_vec());
            Ok(vec![self.frames.len() as u8; 4])
        }

        fn flush(&mut self) -> Result<Vec<u8>, EncodeError> {
            assert!(self.configured);
            self.flushed = true;
            Ok(vec![0xEE])
        }
    }

    fn mono_config() -> EncoderConfig {
        EncoderConfig::new().sample_rate(44100).bitrate(128).channels(1)
    }

    fn configured_encoder() -> StreamingEncoder<StubBackend> {
        let mut encoder = StreamingEncoder::with_backend(StubBackend::new());
        encoder.configure(mono_config()).unwrap();
        encoder
    }

    #[test]
    fn lifecycle_transitions() {
        let mut encoder = StreamingEncoder::with_backend(StubBackend::new());
        assert_eq!(encoder.state(), State::Unconfigured);

        encoder.configure(mono_config()).unwrap();
        assert_eq!(encoder.state(), State::Configured);
        assert_eq!(encoder.samples_per_frame(), 1152);

        encoder.encode(&[0; 100]).unwrap();
        assert_eq!(encoder.state(), State::Encoding);

        encoder.flush().unwrap();
        assert_eq!(encoder.state(), State::Flushed);
    }

    #[test]
    fn encode_before_configure_is_state_error() {
        let mut encoder = StreamingEncoder::with_backend(StubBackend::new());
        assert_eq!(
            encoder.encode(&[0; 4]),
            Err(EncoderError::State(StateError::NotConfigured { call: "encode" }))
        );
    }

    #[test]
    fn flush_before_configure_is_state_error() {
        let mut encoder = StreamingEncoder::with_backend(StubBackend::new());
        assert_eq!(
            encoder.flush(),
            Err(EncoderError::State(StateError::NotConfigured { call: "flush" }))
        );
    }

    #[test]
    fn configure_twice_is_config_error() {
        let mut encoder = configured_encoder();
        assert_eq!(
            encoder.configure(mono_config()),
            Err(EncoderError::Config(ConfigError::AlreadyConfigured))
        );
    }

    #[test]
    fn configure_after_encode_is_config_error() {
        let mut encoder = configured_encoder();
        encoder.encode(&[0; 8]).unwrap();
        assert_eq!(
            encoder.configure(mono_config()),
            Err(EncoderError::Config(ConfigError::AlreadyConfigured))
        );
    }

    #[test]
    fn invalid_config_rejected_and_state_unchanged() {
        let mut encoder = StreamingEncoder::with_backend(StubBackend::new());
        let result = encoder.configure(mono_config().channels(3));
        assert_eq!(
            result,
            Err(EncoderError::Config(ConfigError::UnsupportedChannels(3)))
        );
        assert_eq!(encoder.state(), State::Unconfigured);
    }

    #[test]
    fn encode_after_flush_is_state_error() {
        let mut encoder = configured_encoder();
        encoder.flush().unwrap();
        assert_eq!(
            encoder.encode(&[0; 4]),
            Err(EncoderError::State(StateError::AlreadyFlushed { call: "encode" }))
        );
    }

    #[test]
    fn double_flush_is_state_error() {
        let mut encoder = configured_encoder();
        encoder.flush().unwrap();
        assert_eq!(
            encoder.flush(),
            Err(EncoderError::State(StateError::AlreadyFlushed { call: "flush" }))
        );
    }

    #[test]
    fn configure_after_flush_is_state_error() {
        let mut encoder = configured_encoder();
        encoder.flush().unwrap();
        assert_eq!(
            encoder.configure(mono_config()),
            Err(EncoderError::State(StateError::AlreadyFlushed { call: "configure" }))
        );
    }

    #[test]
    fn sub_frame_chunk_is_buffered() {
        let mut encoder = configured_encoder();
        let out = encoder.encode(&[1; 500]).unwrap();
        assert!(out.is_empty());
        assert_eq!(encoder.buffered_samples(), 500);
    }

    #[test]
    fn whole_frames_are_drained() {
        let mut encoder = configured_encoder();
        // 2.5 frames worth of samples: two frames out, half a frame retained
        let out = encoder.encode(&[1; 1152 * 2 + 576]).unwrap();
        assert_eq!(out.len(), 8);
        assert_eq!(encoder.buffered_samples(), 576);
    }

    #[test]
    fn remainder_is_zero_padded_on_flush() {
        let mut encoder = configured_encoder();
        encoder.encode(&[7; 100]).unwrap();
        let out = encoder.flush().unwrap();
        // padded frame bytes plus flush marker
        assert_eq!(out, vec![1, 1, 1, 1, 0xEE]);
        assert_eq!(encoder.buffered_samples(), 0);

        let frame = &encoder.backend.frames[0];
        assert_eq!(frame.len(), 1152);
        assert!(frame[..100].iter().all(|&s| s == 7));
        assert!(frame[100..].iter().all(|&s| s == 0));
    }

    #[test]
    fn flush_without_encode_drains_backend_only() {
        let mut encoder = configured_encoder();
        let out = encoder.flush().unwrap();
        assert_eq!(out, vec![0xEE]);
        assert!(encoder.backend.frames.is_empty());
    }

    #[test]
    fn empty_chunk_is_noop() {
        let mut encoder = configured_encoder();
        let out = encoder.encode(&[]).unwrap();
        assert!(out.is_empty());
        assert_eq!(encoder.buffered_samples(), 0);
    }

    #[test]
    fn unaligned_stereo_chunk_rejected() {
        let mut encoder = StreamingEncoder::with_backend(StubBackend::new());
        encoder
            .configure(EncoderConfig::new().sample_rate(44100).bitrate(128).channels(2))
            .unwrap();
        assert_eq!(
            encoder.encode(&[0; 3]),
            Err(EncoderError::Encode(EncodeError::UnalignedChunk {
                channels: 2,
                len: 3,
            }))
        );
    }

    #[test]
    fn backend_sees_identical_frames_regardless_of_chunking() {
        let samples: Vec<i16> = (0..4000).map(|i| (i % 251) as i16).collect();

        let mut whole = configured_encoder();
        whole.encode(&samples).unwrap();
        whole.flush().unwrap();

        let mut split = configured_encoder();
        for chunk in samples.chunks(333) {
            split.encode(chunk).unwrap();
        }
        split.flush().unwrap();

        assert_eq!(whole.backend.frames, split.backend.frames);
    }

    #[test]
    fn planar_stereo_is_interleaved() {
        let mut encoder = StreamingEncoder::with_backend(StubBackend::new());
        encoder
            .configure(EncoderConfig::new().sample_rate(44100).bitrate(128).channels(2))
            .unwrap();

        let left = vec![1i16; 1152];
        let right = vec![2i16; 1152];
        encoder.encode_planar(&left, Some(&right)).unwrap();

        let frame = &encoder.backend.frames[0];
        assert_eq!(frame.len(), 2304);
        assert_eq!(&frame[..4], &[1, 2, 1, 2]);
    }

    #[test]
    fn planar_mismatches_rejected() {
        let mut encoder = configured_encoder(); // mono
        assert_eq!(
            encoder.encode_planar(&[0; 4], Some(&[0; 4])),
            Err(EncoderError::Encode(EncodeError::ChannelMismatch {
                expected: 1,
                provided: 2,
            }))
        );

        let mut encoder = StreamingEncoder::with_backend(StubBackend::new());
        encoder
            .configure(EncoderConfig::new().sample_rate(44100).bitrate(128).channels(2))
            .unwrap();
        assert_eq!(
            encoder.encode_planar(&[0; 4], Some(&[0; 2])),
            Err(EncoderError::Encode(EncodeError::LengthMismatch { left: 4, right: 2 }))
        );
    }

    #[test]
    fn mpeg2_rate_uses_576_sample_frames() {
        let mut encoder = StreamingEncoder::with_backend(StubBackend::new());
        encoder
            .configure(EncoderConfig::new().sample_rate(22050).bitrate(64).channels(1))
            .unwrap();
        assert_eq!(encoder.samples_per_frame(), 576);

        encoder.encode(&[0; 600]).unwrap();
        assert_eq!(encoder.buffered_samples(), 24);
    }
}
