//! Intake validation.
//!
//! Runs on the declared media type and byte length only, before any bytes
//! are read or decoded.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest file accepted for intake (10 MiB).
pub const MAX_INTAKE_BYTES: u64 = 10 * 1024 * 1024;

/// Reasons a selected file is rejected before compression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The declared media type is not JPEG, PNG or WebP.
    #[error("Unsupported media type: {0:?}")]
    UnsupportedType(String),

    /// The file is larger than the intake ceiling.
    #[error("File is {actual} bytes, limit is {limit} bytes")]
    TooLarge { actual: u64, limit: u64 },
}

/// Image media types accepted for intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/webp")]
    Webp,
}

impl MediaType {
    /// Canonical MIME string.
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
            MediaType::Webp => "image/webp",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = ValidationError;

    /// Case-insensitive; parameters after `;` are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let essence = s.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Ok(MediaType::Jpeg),
            "image/png" => Ok(MediaType::Png),
            "image/webp" => Ok(MediaType::Webp),
            _ => Err(ValidationError::UnsupportedType(s.to_string())),
        }
    }
}

/// Limits applied by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeLimits {
    /// Largest accepted byte length.
    pub max_bytes: u64,
    /// Media types the intake accepts.
    pub accepted: Vec<MediaType>,
}

impl Default for IntakeLimits {
    fn default() -> Self {
        Self {
            max_bytes: MAX_INTAKE_BYTES,
            accepted: vec![MediaType::Jpeg, MediaType::Png, MediaType::Webp],
        }
    }
}

impl IntakeLimits {
    /// Check a candidate file. The media type is checked before the size.
    ///
    /// # Errors
    ///
    /// `ValidationError::UnsupportedType` if the media type is not accepted,
    /// `ValidationError::TooLarge` if `byte_length` exceeds `max_bytes`.
    pub fn validate(&self, media_type: &str, byte_length: u64) -> Result<MediaType, ValidationError> {
        let parsed: MediaType = media_type.parse()?;
        if !self.accepted.contains(&parsed) {
            return Err(ValidationError::UnsupportedType(media_type.to_string()));
        }
        if byte_length > self.max_bytes {
            return Err(ValidationError::TooLarge {
                actual: byte_length,
                limit: self.max_bytes,
            });
        }
        Ok(parsed)
    }
}

/// Validate against the default limits (JPEG/PNG/WebP, 10 MiB).
pub fn validate(media_type: &str, byte_length: u64) -> Result<MediaType, ValidationError> {
    IntakeLimits::default().validate(media_type, byte_length)
}
