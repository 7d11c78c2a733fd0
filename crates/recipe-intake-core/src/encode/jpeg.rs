//! JPEG encoding for upload. Every ladder step encodes to JPEG.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;
use thiserror::Error;

use crate::decode::DecodedImage;

/// Errors that can occur during JPEG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// JPEG encoding failed
    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Map a 0.0-1.0 quality factor onto the encoder's 1-100 scale.
///
/// Out-of-range and NaN factors are clamped, so `quality_percent(0.8) == 80`.
pub fn quality_percent(factor: f32) -> u8 {
    if factor.is_nan() {
        return 1;
    }
    (factor.clamp(0.0, 1.0) * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Encode a decoded image to JPEG bytes.
///
/// # Arguments
///
/// * `image` - RGB image to encode
/// * `quality` - JPEG quality (1-100, values outside are clamped)
///
/// # Errors
///
/// Returns `EncodeError::InvalidDimensions` for an empty image,
/// `EncodeError::InvalidPixelData` when the buffer length does not match the
/// dimensions, and `EncodeError::EncodingFailed` if the codec itself fails.
pub fn encode_jpeg(image: &DecodedImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = (image.width, image.height);
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = (width as usize) * (height as usize) * 3;
    if image.pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: image.pixels.len(),
        });
    }

    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
        .write_image(&image.pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every factor maps into the encoder's valid range.
        #[test]
        fn prop_quality_percent_in_range(factor in any::<f32>()) {
            let q = quality_percent(factor);
            prop_assert!((1..=100).contains(&q));
        }

        /// Valid input always produces a well-formed JPEG stream.
        #[test]
        fn prop_valid_input_produces_valid_jpeg(
            width in 1u32..=40,
            height in 1u32..=40,
            quality in 1u8..=100,
        ) {
            let img = DecodedImage::new(width, height, vec![100u8; (width * height * 3) as usize]);
            let jpeg = encode_jpeg(&img, quality).unwrap();
            prop_assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
            prop_assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
        }
    }
}
