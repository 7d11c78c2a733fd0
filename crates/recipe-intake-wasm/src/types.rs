//! WASM-compatible wrapper types for compression results.
//!
//! This module provides JavaScript-friendly types that wrap the core types,
//! handling the conversion between Rust and JavaScript data representations.

use recipe_intake_core::CompressedImage;
use wasm_bindgen::prelude::*;

/// A finished compression, ready for display and upload.
///
/// # Memory Management
///
/// The output bytes live in WASM memory. `output()` copies them into a
/// JavaScript `Uint8Array`; do that once, right before the upload.
#[wasm_bindgen]
pub struct JsCompressionResult {
    inner: CompressedImage,
}

#[wasm_bindgen]
impl JsCompressionResult {
    /// Rebuild a result from bytes posted back by a compression worker.
    ///
    /// # Arguments
    /// * `output` - Compressed JPEG bytes
    /// * `original_size` - Byte length of the file the user selected
    /// * `attempts` - Ladder steps the worker ran
    /// * `width` / `height` - Output dimensions
    /// * `met_target` - Whether the output met the soft size target
    #[wasm_bindgen(constructor)]
    pub fn new(
        output: Vec<u8>,
        original_size: usize,
        attempts: usize,
        width: u32,
        height: u32,
        met_target: bool,
    ) -> JsCompressionResult {
        JsCompressionResult {
            inner: CompressedImage::from_output(
                output,
                original_size as u64,
                attempts,
                (width, height),
                met_target,
            ),
        }
    }

    /// Byte length of the originally selected file.
    #[wasm_bindgen(getter)]
    pub fn original_size(&self) -> usize {
        self.inner.result.original_len() as usize
    }

    /// Byte length of the compressed output.
    #[wasm_bindgen(getter)]
    pub fn compressed_size(&self) -> usize {
        self.inner.result.compressed_len() as usize
    }

    /// Rounded percentage of the original size saved.
    #[wasm_bindgen(getter)]
    pub fn savings_percent(&self) -> i32 {
        self.inner.result.savings_percent() as i32
    }

    #[wasm_bindgen(getter)]
    pub fn attempts(&self) -> usize {
        self.inner.result.attempts()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.result.dimensions().0
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.result.dimensions().1
    }

    #[wasm_bindgen(getter)]
    pub fn met_target(&self) -> bool {
        self.inner.result.met_target()
    }

    /// Media type of the output, for the upload's content type.
    #[wasm_bindgen(getter)]
    pub fn media_type(&self) -> String {
        self.inner.result.media_type().to_string()
    }

    /// `data:` URL for an `<img src>` preview.
    #[wasm_bindgen(getter)]
    pub fn preview_url(&self) -> String {
        self.inner.preview.data_url().to_string()
    }

    /// Returns the compressed bytes as a Uint8Array (copied out of WASM memory).
    pub fn output(&self) -> Vec<u8> {
        self.inner.result.output().to_vec()
    }
}

impl JsCompressionResult {
    pub(crate) fn from_compressed(inner: CompressedImage) -> Self {
        Self { inner }
    }

    pub(crate) fn to_compressed(&self) -> CompressedImage {
        self.inner.clone()
    }
}
