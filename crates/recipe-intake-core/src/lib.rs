//! Recipe Intake Core - cover photo intake pipeline
//!
//! This crate turns a user-selected photo into an upload-ready JPEG for a
//! recipe's cover image: it validates the selection, decodes and downsizes
//! the photo, walks a fixed escalation ladder of quality/size profiles until
//! the output fits, and tracks the picker's state across selections.
//!
//! Persisting the bytes is left to the caller; the pipeline only hands back
//! the compressed binary, its size stats and a preview.

pub mod compress;
pub mod config;
pub mod decode;
pub mod display;
pub mod encode;
pub mod intake;
pub mod preview;
pub mod profile;
pub mod validate;

pub use compress::{
    savings_percent, CompressedImage, CompressionError, CompressionResult, Compressor,
    JpegProfileEncoder, ProfileEncoder, SourceImage,
};
pub use config::IntakeConfig;
pub use intake::{
    IntakeController, IntakeError, IntakeState, IntakeStats, IntakeTicket, PendingSubmission,
    SelectedFile, SourceFile,
};
pub use preview::Preview;
pub use profile::{CompressionProfile, EscalationLadder};
pub use validate::{validate, IntakeLimits, MediaType, ValidationError};
