//! Intake controller: the state machine behind one cover-photo picker.
//!
//! ```text
//! Idle -> Validating -> Compressing -> Ready
//!             |              |
//!             +--> Failed <--+
//! ```
//!
//! Compression is expected to run off the UI thread. `select` hands out an
//! [`IntakeTicket`]; the outcome is applied with `complete` only if that
//! ticket is still the newest one. Anything older is dropped, so a slow
//! result never overwrites a newer selection.

use std::io;

use thiserror::Error;
use tracing::debug;

use crate::compress::{
    CompressedImage, CompressionError, CompressionResult, Compressor, ProfileEncoder, SourceImage,
};
use crate::display;
use crate::preview::Preview;
use crate::validate::{IntakeLimits, MediaType, ValidationError};

/// Any error that ends an intake attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Compression(#[from] CompressionError),
}

impl IntakeError {
    /// Short message suitable for showing under the picker.
    pub fn user_message(&self) -> String {
        match self {
            IntakeError::Validation(ValidationError::UnsupportedType(_)) => {
                display::UNSUPPORTED_TYPE_MESSAGE.to_string()
            }
            IntakeError::Validation(ValidationError::TooLarge { limit, .. }) => {
                display::too_large_message(*limit)
            }
            IntakeError::Compression(_) => display::COMPRESSION_FAILED_MESSAGE.to_string(),
        }
    }
}

/// The file selection surface, as seen by the pipeline.
pub trait SourceFile {
    /// Declared media type, e.g. `image/jpeg`.
    fn media_type(&self) -> &str;
    /// Declared size in bytes.
    fn byte_length(&self) -> u64;
    /// Read the whole file.
    fn read_as_bytes(&self) -> io::Result<Vec<u8>>;
}

/// A file already held in memory.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    media_type: String,
    bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            media_type: media_type.into(),
            bytes,
        }
    }
}

impl SourceFile for SelectedFile {
    fn media_type(&self) -> &str {
        &self.media_type
    }

    fn byte_length(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn read_as_bytes(&self) -> io::Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

/// The recipe form's pending submission. It learns when a compressed photo
/// becomes part of the submission and when it is taken out again. Uploading
/// is its own business.
pub trait PendingSubmission {
    fn attach(&mut self, result: &CompressionResult);
    fn detach(&mut self);
}

impl PendingSubmission for () {
    fn attach(&mut self, _result: &CompressionResult) {}
    fn detach(&mut self) {}
}

/// Identifies one selection. Outcomes carrying an older ticket are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntakeTicket {
    generation: u64,
    media_type: MediaType,
}

impl IntakeTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Media type accepted by validation, for building the `SourceImage`.
    pub fn media_type(&self) -> MediaType {
        self.media_type
    }
}

/// Where the picker currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeState {
    Idle,
    Validating,
    Compressing { ticket: IntakeTicket },
    Ready { image: Box<CompressedImage> },
    Failed { error: IntakeError },
}

impl IntakeState {
    /// Lowercase state name, as shown to the UI layer.
    pub fn name(&self) -> &'static str {
        match self {
            IntakeState::Idle => "idle",
            IntakeState::Validating => "validating",
            IntakeState::Compressing { .. } => "compressing",
            IntakeState::Ready { .. } => "ready",
            IntakeState::Failed { .. } => "failed",
        }
    }
}

/// Before/after numbers for the stats panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntakeStats {
    pub original_bytes: u64,
    pub compressed_bytes: u64,
    pub savings_percent: i64,
}

impl IntakeStats {
    pub fn original_label(&self) -> String {
        display::format_size(self.original_bytes)
    }

    pub fn compressed_label(&self) -> String {
        display::format_size(self.compressed_bytes)
    }

    pub fn savings_label(&self) -> String {
        display::savings_label(self.savings_percent)
    }
}

/// One per picker widget; lives across any number of selections.
#[derive(Debug)]
pub struct IntakeController<S = ()> {
    state: IntakeState,
    generation: u64,
    limits: IntakeLimits,
    submission: S,
}

impl IntakeController {
    pub fn new(limits: IntakeLimits) -> Self {
        Self::with_submission(limits, ())
    }
}

impl Default for IntakeController {
    fn default() -> Self {
        Self::new(IntakeLimits::default())
    }
}

impl<S: PendingSubmission> IntakeController<S> {
    pub fn with_submission(limits: IntakeLimits, submission: S) -> Self {
        Self {
            state: IntakeState::Idle,
            generation: 0,
            limits,
            submission,
        }
    }

    pub fn state(&self) -> &IntakeState {
        &self.state
    }

    pub fn submission(&self) -> &S {
        &self.submission
    }

    /// Start a new intake for a selected file.
    ///
    /// Any previous state is discarded. On success the controller is
    /// `Compressing` and the caller should compress the file and report back
    /// with [`complete`](Self::complete) using the returned ticket.
    ///
    /// # Errors
    ///
    /// Returns the validation error (and moves to `Failed`) if the file is
    /// not an accepted image type or is too large. No compression should be
    /// started in that case.
    pub fn select(
        &mut self,
        media_type: &str,
        byte_length: u64,
    ) -> Result<IntakeTicket, ValidationError> {
        if matches!(self.state, IntakeState::Ready { .. }) {
            self.submission.detach();
        }

        self.generation += 1;
        self.state = IntakeState::Validating;
        debug!(generation = self.generation, media_type, byte_length, "validating selection");

        match self.limits.validate(media_type, byte_length) {
            Ok(media_type) => {
                let ticket = IntakeTicket {
                    generation: self.generation,
                    media_type,
                };
                self.state = IntakeState::Compressing { ticket };
                Ok(ticket)
            }
            Err(err) => {
                debug!(generation = self.generation, error = %err, "selection rejected");
                self.state = IntakeState::Failed {
                    error: err.clone().into(),
                };
                Err(err)
            }
        }
    }

    /// Apply a compression outcome.
    ///
    /// Returns `false` and leaves the state untouched when the ticket is not
    /// the one currently being compressed.
    pub fn complete(
        &mut self,
        ticket: IntakeTicket,
        outcome: Result<CompressedImage, CompressionError>,
    ) -> bool {
        let current = match &self.state {
            IntakeState::Compressing { ticket: current } => *current,
            _ => {
                debug!(generation = ticket.generation, state = self.state.name(), "discarding outcome, not compressing");
                return false;
            }
        };
        if current != ticket {
            debug!(
                generation = ticket.generation,
                current = current.generation,
                "discarding stale outcome"
            );
            return false;
        }

        self.state = match outcome {
            Ok(image) => {
                self.submission.attach(&image.result);
                IntakeState::Ready {
                    image: Box::new(image),
                }
            }
            Err(err) => IntakeState::Failed { error: err.into() },
        };
        true
    }

    /// Take the ready photo out of the pending submission.
    ///
    /// Returns `false` unless the controller was `Ready`.
    pub fn remove(&mut self) -> bool {
        if !matches!(self.state, IntakeState::Ready { .. }) {
            return false;
        }
        self.state = IntakeState::Idle;
        self.submission.detach();
        debug!("removed pending photo");
        true
    }

    /// Select, read and compress a file in one go, on the calling thread.
    ///
    /// # Errors
    ///
    /// Returns the validation, read or compression error that ended the
    /// attempt; the controller is then `Failed` with the same error.
    pub fn process<F, E>(
        &mut self,
        file: &F,
        compressor: &Compressor<E>,
    ) -> Result<&CompressionResult, IntakeError>
    where
        F: SourceFile + ?Sized,
        E: ProfileEncoder,
    {
        let ticket = self.select(file.media_type(), file.byte_length())?;

        let outcome = file
            .read_as_bytes()
            .map_err(|e| CompressionError::Unreadable(e.to_string()))
            .and_then(|bytes| compressor.compress(&SourceImage::new(ticket.media_type(), bytes)));
        self.complete(ticket, outcome);

        match &self.state {
            IntakeState::Ready { image } => Ok(&image.result),
            IntakeState::Failed { error } => Err(error.clone()),
            other => Err(CompressionError::EncodeFailed(format!(
                "unexpected intake state: {}",
                other.name()
            ))
            .into()),
        }
    }

    /// Whether a compression is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self.state, IntakeState::Compressing { .. })
    }

    pub fn result(&self) -> Option<&CompressionResult> {
        match &self.state {
            IntakeState::Ready { image } => Some(&image.result),
            _ => None,
        }
    }

    pub fn preview(&self) -> Option<&Preview> {
        match &self.state {
            IntakeState::Ready { image } => Some(&image.preview),
            _ => None,
        }
    }

    pub fn stats(&self) -> Option<IntakeStats> {
        self.result().map(|result| IntakeStats {
            original_bytes: result.original_len(),
            compressed_bytes: result.compressed_len(),
            savings_percent: result.savings_percent(),
        })
    }

    pub fn error(&self) -> Option<&IntakeError> {
        match &self.state {
            IntakeState::Failed { error } => Some(error),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<String> {
        self.error().map(IntakeError::user_message)
    }
}
