//! Decoding of user-selected photos (JPEG, PNG, WebP) with EXIF orientation
//! correction and alpha flattening.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader, Rgb, RgbImage};

use super::{DecodeError, DecodedImage, Orientation};

/// Background used when flattening transparent pixels, since the output
/// encoding has no alpha channel.
const FLATTEN_BACKGROUND: [u8; 3] = [255, 255, 255];

/// Decode a photo from bytes, applying EXIF orientation correction.
///
/// The format is sniffed from the content, not taken from the declared
/// media type. Images with an alpha channel are composited onto white.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format cannot be recognized,
/// `DecodeError::CorruptedFile` if decoding fails part way, and
/// `DecodeError::EmptyImage` if the image has no pixels.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let orientation = extract_orientation(bytes);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if img.width() == 0 || img.height() == 0 {
        return Err(DecodeError::EmptyImage);
    }

    let oriented = apply_orientation(img, orientation);
    Ok(DecodedImage::from_rgb_image(flatten_alpha(oriented)))
}

/// EXIF orientation of the image, or `Orientation::Normal` if there is no
/// EXIF data or no orientation tag.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

/// Composite an image with alpha onto an opaque background.
fn flatten_alpha(img: DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.into_rgb8();
    }

    let rgba = img.into_rgba8();
    let (width, height) = rgba.dimensions();
    let mut out = RgbImage::new(width, height);

    for (dst, src) in out.pixels_mut().zip(rgba.pixels()) {
        let alpha = src[3] as u32;
        let blend = |channel: usize| -> u8 {
            let fg = src[channel] as u32 * alpha;
            let bg = FLATTEN_BACKGROUND[channel] as u32 * (255 - alpha);
            ((fg + bg + 127) / 255) as u8
        };
        *dst = Rgb([blend(0), blend(1), blend(2)]);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    fn encode_fixture(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, format).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(6, 4, Rgb([10, 20, 30])));
        let bytes = encode_fixture(img, ImageFormat::Png);

        let decoded = decode_image(&bytes).unwrap();
        assert_eq!((decoded.width, decoded.height), (6, 4));
        assert_eq!(&decoded.pixels[0..3], &[10, 20, 30]);
    }

    #[test]
    fn test_decode_jpeg() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 8, Rgb([128, 128, 128])));
        let bytes = encode_fixture(img, ImageFormat::Jpeg);

        let decoded = decode_image(&bytes).unwrap();
        assert_eq!((decoded.width, decoded.height), (16, 8));
        assert_eq!(decoded.pixels.len(), 16 * 8 * 3);
    }

    #[test]
    fn test_decode_png_with_transparency_flattens_to_white() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0])));
        let bytes = encode_fixture(img, ImageFormat::Png);

        let decoded = decode_image(&bytes).unwrap();
        assert_eq!(&decoded.pixels[0..3], &[255, 255, 255]);
    }

    #[test]
    fn test_flatten_opaque_pixel_unchanged() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([200, 100, 50, 255])));
        let flat = flatten_alpha(img);
        assert_eq!(flat.get_pixel(0, 0).0, [200, 100, 50]);
    }

    #[test]
    fn test_flatten_half_transparent_black() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 128])));
        let flat = flatten_alpha(img);
        // 255 * 127 / 255 rounds to 127
        assert_eq!(flat.get_pixel(0, 0).0, [127, 127, 127]);
    }

    #[test]
    fn test_decode_garbage_is_invalid_format() {
        let result = decode_image(b"definitely not an image");
        assert!(matches!(result, Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(decode_image(&[]).is_err());
    }

    #[test]
    fn test_decode_truncated_png() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(32, 32, Rgb([1, 2, 3])));
        let bytes = encode_fixture(img, ImageFormat::Png);

        let result = decode_image(&bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_orientation_without_exif_is_normal() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        let bytes = encode_fixture(img, ImageFormat::Jpeg);
        assert_eq!(extract_orientation(&bytes), Orientation::Normal);
        assert_eq!(extract_orientation(&[0x00, 0x01, 0x02]), Orientation::Normal);
    }

    #[test]
    fn test_apply_orientation_rotate90_swaps_dimensions() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(2, 1));
        let rotated = apply_orientation(img, Orientation::Rotate90CW);
        assert_eq!((rotated.width(), rotated.height()), (1, 2));
    }

    #[test]
    fn test_apply_orientation_flip_horizontal() {
        let pixels = vec![255, 0, 0, 0, 255, 0];
        let img = DynamicImage::ImageRgb8(RgbImage::from_raw(2, 1, pixels).unwrap());

        let flipped = apply_orientation(img, Orientation::FlipHorizontal).into_rgb8();
        assert_eq!(flipped.get_pixel(0, 0).0, [0, 255, 0]);
        assert_eq!(flipped.get_pixel(1, 0).0, [255, 0, 0]);
    }
}
