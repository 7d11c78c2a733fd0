//! Recipe Intake WASM - WebAssembly bindings for the cover photo pipeline
//!
//! This crate exposes recipe-intake-core to the recipe form's JavaScript.
//!
//! # Module Structure
//!
//! - `intake` - Per-picker state machine (`JsIntakeController`)
//! - `compress` - Validation and compression entry points for the worker
//! - `types` - WASM-compatible wrapper for compression results
//! - `config` - Reading intake configuration from JS objects
//!
//! # Usage
//!
//! ```typescript
//! import init, { compress_image, JsIntakeController } from '@recipe-intake/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const controller = new JsIntakeController();
//! const generation = controller.select(file.type, file.size);
//! const result = compress_image(new Uint8Array(await file.arrayBuffer()), file.type);
//! controller.finish(generation, result);
//! console.log(controller.savings_label);
//! ```

use wasm_bindgen::prelude::*;

mod compress;
mod config;
mod intake;
mod types;

// Re-export public types
pub use compress::{compress_image, format_size, validate_image};
pub use config::default_config;
pub use intake::JsIntakeController;
pub use types::JsCompressionResult;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
