//! Validation and compression WASM bindings.
//!
//! These are the worker-side entry points: the UI thread validates through
//! the controller, then a worker calls [`compress_image`] with the file's
//! bytes and posts the result back.
//!
//! # Example
//!
//! ```typescript
//! import { compress_image } from '@recipe-intake/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = compress_image(bytes, file.type);
//! console.log(`${result.original_size} -> ${result.compressed_size} bytes`);
//! ```

use recipe_intake_core::{validate, CompressedImage, IntakeConfig, IntakeError, SourceImage};
use wasm_bindgen::prelude::*;

use crate::config::parse_config;
use crate::types::JsCompressionResult;

/// Check a selected file before reading it.
///
/// # Returns
///
/// The canonical media type (e.g. `image/jpeg`), or the user-facing error
/// message if the file is rejected.
#[wasm_bindgen]
pub fn validate_image(media_type: &str, byte_length: f64) -> Result<String, JsValue> {
    validate(media_type, byte_length_from_js(byte_length))
        .map(|media| media.as_str().to_string())
        .map_err(|e| JsValue::from_str(&IntakeError::from(e).user_message()))
}

/// Compress a photo through the escalation ladder.
///
/// # Arguments
///
/// * `bytes` - The selected file's bytes
/// * `media_type` - The file's declared media type
/// * `config` - Optional intake config (`undefined` for defaults)
///
/// # Errors
///
/// Throws the user-facing message if the file fails the config's intake
/// limits, or an error string if the image cannot be decoded or encoded.
#[wasm_bindgen]
pub fn compress_image(
    bytes: Vec<u8>,
    media_type: &str,
    config: JsValue,
) -> Result<JsCompressionResult, JsValue> {
    let config = parse_config(config)?;

    match compress_with_config(&config, media_type, bytes) {
        Ok(image) => Ok(JsCompressionResult::from_compressed(image)),
        Err(err @ IntakeError::Validation(_)) => Err(JsValue::from_str(&err.user_message())),
        Err(err) => {
            web_sys::console::warn_1(&JsValue::from_str(&format!("compress_image: {}", err)));
            Err(JsValue::from_str(&err.to_string()))
        }
    }
}

/// Validate against the config's limits, then run its ladder. Nothing is
/// decoded for a rejected file.
pub(crate) fn compress_with_config(
    config: &IntakeConfig,
    media_type: &str,
    bytes: Vec<u8>,
) -> Result<CompressedImage, IntakeError> {
    let media = config.limits.validate(media_type, bytes.len() as u64)?;
    Ok(config
        .compressor()
        .compress(&SourceImage::new(media, bytes))?)
}

/// Human-readable byte size (`512 B`, `1.5 KB`, `2.3 MB`).
#[wasm_bindgen]
pub fn format_size(bytes: f64) -> String {
    recipe_intake_core::display::format_size(byte_length_from_js(bytes))
}

/// JS numbers are f64; negative, NaN and fractional values are coerced to a
/// whole, non-negative byte count.
pub(crate) fn byte_length_from_js(value: f64) -> u64 {
    if value.is_nan() || value <= 0.0 {
        0
    } else {
        value as u64
    }
}


/// WASM-specific tests that require JsValue.
///
/// Use `wasm-pack test` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use recipe_intake_core::decode::DecodedImage;
    use recipe_intake_core::encode::encode_jpeg;
    use recipe_intake_core::IntakeLimits;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn jpeg_bytes() -> Vec<u8> {
        let img = DecodedImage::new(64, 48, vec![120u8; 64 * 48 * 3]);
        encode_jpeg(&img, 90).unwrap()
    }

    fn tight_config() -> IntakeConfig {
        IntakeConfig {
            limits: IntakeLimits {
                max_bytes: 100,
                ..IntakeLimits::default()
            },
            ..IntakeConfig::default()
        }
    }

    #[wasm_bindgen_test]
    fn test_validate_image_accepts_jpeg() {
        assert_eq!(validate_image("image/jpeg", 1024.0).unwrap(), "image/jpeg");
    }

    #[wasm_bindgen_test]
    fn test_validate_image_rejects_text() {
        let err = validate_image("text/plain", 50.0).unwrap_err();
        assert_eq!(err.as_string().unwrap(), "Only images allowed (JPEG, PNG, WebP)");
    }

    #[wasm_bindgen_test]
    fn test_compress_image() {
        let result = compress_image(jpeg_bytes(), "image/jpeg", JsValue::UNDEFINED).unwrap();
        assert_eq!(result.attempts(), 1);
        assert_eq!((result.width(), result.height()), (64, 48));
    }

    #[wasm_bindgen_test]
    fn test_compress_image_enforces_config_limits() {
        let config = serde_wasm_bindgen::to_value(&tight_config()).unwrap();
        let err = compress_image(jpeg_bytes(), "image/jpeg", config).unwrap_err();
        assert_eq!(err.as_string().unwrap(), "Image too large (max 100 B)");
    }

    #[wasm_bindgen_test]
    fn test_compress_image_rejects_oversized_by_default() {
        let bytes = vec![0u8; 10 * 1024 * 1024 + 1];
        let err = compress_image(bytes, "image/jpeg", JsValue::UNDEFINED).unwrap_err();
        assert_eq!(err.as_string().unwrap(), "Image too large (max 10MB)");
    }

    #[wasm_bindgen_test]
    fn test_compress_image_corrupt() {
        let result = compress_image(vec![0, 1, 2, 3], "image/jpeg", JsValue::UNDEFINED);
        assert!(result.is_err());
    }
}
