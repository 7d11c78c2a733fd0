//! Image encoding for the intake pipeline.
//!
//! This module provides:
//! - JPEG encoding of decoded images at a configurable quality
//! - Mapping of 0.0-1.0 quality factors onto the codec's 1-100 scale
//!
//! Encoding runs inside a Web Worker via the WASM bindings. All operations
//! are synchronous and single-threaded.

mod jpeg;

pub use jpeg::{encode_jpeg, quality_percent, EncodeError};
