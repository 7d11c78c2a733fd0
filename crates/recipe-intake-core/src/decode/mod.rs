//! Image decoding for the intake pipeline.
//!
//! This module provides functionality for:
//! - Decoding JPEG, PNG and WebP photos (format sniffed from content)
//! - Applying EXIF orientation so camera photos come out upright
//! - Downscaling to a long-edge limit for the compression ladder
//!
//! # Architecture
//!
//! Decoding runs inside a Web Worker via the WASM bindings. All operations
//! are synchronous and single-threaded.

mod photo;
mod resize;
mod types;

pub use photo::decode_image;
pub use resize::{fit_dimensions, resize_to_fit};
pub use types::{DecodeError, DecodedImage, FilterType, Orientation};
