//! Adaptive compression: walk the escalation ladder until an output fits.
//!
//! The source is decoded once. Each ladder step downsizes and re-encodes the
//! decoded pixels with that step's profile; within a step the quality is
//! stepped down a bounded number of times toward the soft target. The walk
//! stops at the first output at or under the step's hard ceiling, or after
//! the last step. The last output is returned even when it is still over the
//! ceiling.
//!
//! Any decode or encode failure aborts the whole walk; intermediate outputs
//! are dropped and never surfaced.

use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::decode::{self, DecodeError, DecodedImage};
use crate::encode::{self, EncodeError};
use crate::preview::Preview;
use crate::profile::{
    CompressionProfile, EscalationLadder, MIN_TARGET_QUALITY, OUTPUT_MEDIA_TYPE, TARGET_QUALITY_STEP,
};
use crate::validate::MediaType;

/// Compression failures. Every variant aborts the intake.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompressionError {
    /// Decoding, resizing or re-encoding failed on some ladder step.
    #[error("Could not process image: {0}")]
    EncodeFailed(String),

    /// The selected file could not be read.
    #[error("Could not read selected file: {0}")]
    Unreadable(String),
}

impl From<DecodeError> for CompressionError {
    fn from(err: DecodeError) -> Self {
        CompressionError::EncodeFailed(err.to_string())
    }
}

impl From<EncodeError> for CompressionError {
    fn from(err: EncodeError) -> Self {
        CompressionError::EncodeFailed(err.to_string())
    }
}

/// The raw bytes of one selected file.
#[derive(Debug, Clone)]
pub struct SourceImage {
    bytes: Vec<u8>,
    media_type: MediaType,
}

impl SourceImage {
    pub fn new(media_type: MediaType, bytes: Vec<u8>) -> Self {
        Self { bytes, media_type }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn byte_length(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Output of one ladder step.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Turns decoded pixels into output bytes for one profile.
pub trait ProfileEncoder {
    fn encode(
        &self,
        image: &DecodedImage,
        profile: &CompressionProfile,
    ) -> Result<EncodedImage, CompressionError>;
}

/// Downscale to the profile's long edge, then JPEG-encode at its quality,
/// stepping the quality down while the output is over the soft target.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegProfileEncoder;

impl ProfileEncoder for JpegProfileEncoder {
    fn encode(
        &self,
        image: &DecodedImage,
        profile: &CompressionProfile,
    ) -> Result<EncodedImage, CompressionError> {
        let resized = decode::resize_to_fit(image, profile.max_edge, profile.filter)?;
        let bytes = encode_toward_target(&resized, profile)?;
        Ok(EncodedImage {
            bytes,
            width: resized.width,
            height: resized.height,
        })
    }
}

/// Encode at the profile's quality, then re-encode at lower qualities until
/// the output meets `target_bytes`, the floor is hit, or `target_iterations`
/// runs out. The last encode is returned either way.
fn encode_toward_target(
    image: &DecodedImage,
    profile: &CompressionProfile,
) -> Result<Vec<u8>, CompressionError> {
    let mut quality = encode::quality_percent(profile.quality);
    let mut bytes = encode::encode_jpeg(image, quality)?;

    for _ in 0..profile.target_iterations {
        if profile.meets_target(bytes.len()) || quality <= MIN_TARGET_QUALITY {
            break;
        }
        quality = quality
            .saturating_sub(TARGET_QUALITY_STEP)
            .max(MIN_TARGET_QUALITY);
        bytes = encode::encode_jpeg(image, quality)?;
        trace!(quality, bytes = bytes.len(), target = profile.target_bytes, "stepped quality down");
    }

    Ok(bytes)
}

/// One (profile, output) pair. Only the most recent is kept.
struct CompressionAttempt {
    number: usize,
    profile: CompressionProfile,
    output: EncodedImage,
}

/// Compressed output plus size stats. Owned by the caller once returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionResult {
    output: Vec<u8>,
    original_len: u64,
    attempts: usize,
    width: u32,
    height: u32,
    met_target: bool,
}

impl CompressionResult {
    /// The compressed bytes.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    pub fn compressed_len(&self) -> u64 {
        self.output.len() as u64
    }

    pub fn original_len(&self) -> u64 {
        self.original_len
    }

    /// Percentage of the original size saved, rounded.
    pub fn savings_percent(&self) -> i64 {
        savings_percent(self.original_len, self.compressed_len())
    }

    /// Number of ladder steps that ran.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether the output is within the soft target of the step that produced it.
    pub fn met_target(&self) -> bool {
        self.met_target
    }

    pub fn media_type(&self) -> &'static str {
        OUTPUT_MEDIA_TYPE
    }
}

/// `round((1 - compressed / original) * 100)`, or 0 for an empty original.
pub fn savings_percent(original: u64, compressed: u64) -> i64 {
    if original == 0 {
        return 0;
    }
    ((1.0 - compressed as f64 / original as f64) * 100.0).round() as i64
}

/// A finished compression: the result and a preview of its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedImage {
    pub result: CompressionResult,
    pub preview: Preview,
}

impl CompressedImage {
    /// Assemble a finished compression from its output bytes.
    ///
    /// Used by the compressor, and by callers that ran the ladder in another
    /// context (a worker) and only received the bytes and counts back.
    pub fn from_output(
        output: Vec<u8>,
        original_len: u64,
        attempts: usize,
        (width, height): (u32, u32),
        met_target: bool,
    ) -> Self {
        let preview = Preview::from_bytes(OUTPUT_MEDIA_TYPE, &output);
        Self {
            result: CompressionResult {
                output,
                original_len,
                attempts,
                width,
                height,
                met_target,
            },
            preview,
        }
    }
}

/// Runs the escalation ladder over a source image.
#[derive(Debug, Clone, Default)]
pub struct Compressor<E = JpegProfileEncoder> {
    ladder: EscalationLadder,
    encoder: E,
}

impl Compressor {
    pub fn new(ladder: EscalationLadder) -> Self {
        Self::with_encoder(ladder, JpegProfileEncoder)
    }
}

impl<E: ProfileEncoder> Compressor<E> {
    pub fn with_encoder(ladder: EscalationLadder, encoder: E) -> Self {
        Self { ladder, encoder }
    }

    /// Compress a source image.
    ///
    /// # Errors
    ///
    /// `CompressionError::EncodeFailed` if the source cannot be decoded or
    /// any ladder step fails to encode.
    pub fn compress(&self, source: &SourceImage) -> Result<CompressedImage, CompressionError> {
        let decoded = decode::decode_image(source.bytes())?;
        debug!(
            media_type = %source.media_type(),
            width = decoded.width,
            height = decoded.height,
            bytes = source.byte_length(),
            "decoded source image"
        );

        let attempt = self.run_ladder(&decoded)?;

        let len = attempt.output.bytes.len();
        if attempt.profile.exceeds_ceiling(len) {
            warn!(
                bytes = len,
                ceiling = attempt.profile.ceiling_bytes,
                attempts = attempt.number,
                "ladder exhausted, output still over ceiling"
            );
        }

        let image = CompressedImage::from_output(
            attempt.output.bytes,
            source.byte_length(),
            attempt.number,
            (attempt.output.width, attempt.output.height),
            attempt.profile.meets_target(len),
        );
        info!(
            original = image.result.original_len(),
            compressed = image.result.compressed_len(),
            savings = image.result.savings_percent(),
            attempts = image.result.attempts(),
            "compressed image"
        );

        Ok(image)
    }

    fn run_ladder(&self, decoded: &DecodedImage) -> Result<CompressionAttempt, CompressionError> {
        let mut last = None;

        for (index, profile) in self.ladder.steps().iter().enumerate() {
            let output = self.encoder.encode(decoded, profile)?;
            let over = profile.exceeds_ceiling(output.bytes.len());
            debug!(
                attempt = index + 1,
                quality = profile.quality,
                max_edge = profile.max_edge,
                bytes = output.bytes.len(),
                over_ceiling = over,
                "compression attempt"
            );

            last = Some(CompressionAttempt {
                number: index + 1,
                profile: *profile,
                output,
            });
            if !over {
                break;
            }
        }

        last.ok_or_else(|| CompressionError::EncodeFailed("empty escalation ladder".to_string()))
    }
}
