//! Downscaling for the compression ladder.
//!
//! Images are only ever shrunk to fit a long-edge limit; a photo that
//! already fits is passed through untouched.

use super::{DecodeError, DecodedImage, FilterType};

/// Shrink an image so its longest edge is at most `max_edge`, preserving
/// aspect ratio. Images that already fit are returned as a clone.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if `max_edge` is zero and
/// `DecodeError::CorruptedFile` if the pixel buffer does not match the
/// declared dimensions.
pub fn resize_to_fit(
    image: &DecodedImage,
    max_edge: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if max_edge == 0 {
        return Err(DecodeError::InvalidFormat);
    }

    if image.long_edge() <= max_edge {
        return Ok(image.clone());
    }

    let (width, height) = fit_dimensions(image.width, image.height, max_edge);

    let rgb_image = image
        .to_rgb_image()
        .ok_or_else(|| DecodeError::CorruptedFile("Pixel buffer size mismatch".to_string()))?;

    let resized = image::imageops::resize(&rgb_image, width, height, filter.to_image_filter());
    Ok(DecodedImage::from_rgb_image(resized))
}

/// Dimensions that fit within `max_edge` while preserving aspect ratio.
/// Never upscales.
pub fn fit_dimensions(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }
    if width <= max_edge && height <= max_edge {
        return (width, height);
    }

    let ratio = width as f64 / height as f64;

    if width >= height {
        let new_height = (max_edge as f64 / ratio).round() as u32;
        (max_edge, new_height.max(1))
    } else {
        let new_width = (max_edge as f64 * ratio).round() as u32;
        (new_width.max(1), max_edge)
    }
}
