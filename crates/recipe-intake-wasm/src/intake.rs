//! Intake controller WASM bindings.
//!
//! The controller lives on the UI thread, one per cover-photo picker. It
//! validates selections, hands out a generation number for each one, and
//! accepts the worker's result only if that generation is still current.
//!
//! # Example
//!
//! ```typescript
//! const controller = new JsIntakeController(undefined, (bytes) => {
//!   pendingCover = bytes; // Uint8Array, or null when the photo is removed
//! });
//!
//! input.onchange = async () => {
//!   const file = input.files[0];
//!   let generation;
//!   try {
//!     generation = controller.select(file.type, file.size);
//!   } catch (message) {
//!     showError(message);
//!     return;
//!   }
//!   const reply = await runInWorker(file);
//!   const result = new JsCompressionResult(reply.output, file.size, reply.attempts,
//!                                          reply.width, reply.height, reply.metTarget);
//!   controller.finish(generation, result); // false if a newer file was picked
//! };
//! ```

use js_sys::{Function, Uint8Array};
use recipe_intake_core::{
    CompressionError, CompressionResult, IntakeController, IntakeState, IntakeTicket,
    PendingSubmission,
};
use wasm_bindgen::prelude::*;

use crate::compress::byte_length_from_js;
use crate::config::parse_config;
use crate::types::JsCompressionResult;

/// Forwards pending-submission changes to a JS callback: the compressed
/// bytes when a photo becomes pending, `null` when it is removed.
struct CallbackSubmission {
    on_change: Option<Function>,
}

impl CallbackSubmission {
    fn notify(&self, value: &JsValue) {
        if let Some(callback) = &self.on_change {
            if let Err(err) = callback.call1(&JsValue::NULL, value) {
                web_sys::console::error_2(&JsValue::from_str("intake on_change callback failed"), &err);
            }
        }
    }
}

impl PendingSubmission for CallbackSubmission {
    fn attach(&mut self, result: &CompressionResult) {
        let bytes = Uint8Array::from(result.output());
        self.notify(&bytes.into());
    }

    fn detach(&mut self) {
        self.notify(&JsValue::NULL);
    }
}

/// State machine behind one cover-photo picker.
#[wasm_bindgen]
pub struct JsIntakeController {
    inner: IntakeController<CallbackSubmission>,
}

#[wasm_bindgen]
impl JsIntakeController {
    /// Create a controller.
    ///
    /// # Arguments
    /// * `config` - Optional intake config (`undefined` for defaults)
    /// * `on_change` - Optional callback receiving the pending bytes or `null`
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, on_change: Option<Function>) -> Result<JsIntakeController, JsValue> {
        let config = parse_config(config)?;
        Ok(JsIntakeController {
            inner: config.controller_with(CallbackSubmission { on_change }),
        })
    }

    /// Start a new intake. Returns the generation number to pass back to
    /// `finish` / `fail`, or throws the user-facing validation message.
    pub fn select(&mut self, media_type: &str, byte_length: f64) -> Result<f64, JsValue> {
        self.inner
            .select(media_type, byte_length_from_js(byte_length))
            .map(|ticket| generation_to_js(ticket.generation()))
            .map_err(|_| JsValue::from_str(&self.error_message().unwrap_or_default()))
    }

    /// Apply a worker's result. Returns false if it is stale.
    pub fn finish(&mut self, generation: f64, result: &JsCompressionResult) -> bool {
        match current_ticket(self.inner.state(), generation) {
            Some(ticket) => self.inner.complete(ticket, Ok(result.to_compressed())),
            None => false,
        }
    }

    /// Report a worker failure. Returns false if it is stale.
    pub fn fail(&mut self, generation: f64, message: String) -> bool {
        match current_ticket(self.inner.state(), generation) {
            Some(ticket) => self
                .inner
                .complete(ticket, Err(CompressionError::EncodeFailed(message))),
            None => false,
        }
    }

    /// Drop the ready photo from the pending submission.
    pub fn remove(&mut self) -> bool {
        self.inner.remove()
    }

    /// One of `idle`, `validating`, `compressing`, `ready`, `failed`.
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.inner.state().name().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn is_busy(&self) -> bool {
        self.inner.is_busy()
    }

    /// Media type accepted for the in-flight selection, for the worker.
    #[wasm_bindgen(getter)]
    pub fn pending_media_type(&self) -> Option<String> {
        match self.inner.state() {
            IntakeState::Compressing { ticket } => Some(ticket.media_type().as_str().to_string()),
            _ => None,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn error_message(&self) -> Option<String> {
        self.inner.error_message()
    }

    #[wasm_bindgen(getter)]
    pub fn original_size(&self) -> Option<usize> {
        self.inner.stats().map(|s| s.original_bytes as usize)
    }

    #[wasm_bindgen(getter)]
    pub fn compressed_size(&self) -> Option<usize> {
        self.inner.stats().map(|s| s.compressed_bytes as usize)
    }

    #[wasm_bindgen(getter)]
    pub fn savings_percent(&self) -> Option<i32> {
        self.inner.stats().map(|s| s.savings_percent as i32)
    }

    /// `Original` size label, e.g. `4.2 MB`.
    #[wasm_bindgen(getter)]
    pub fn original_label(&self) -> Option<String> {
        self.inner.stats().map(|s| s.original_label())
    }

    /// `Compressed` size label, e.g. `187.3 KB`.
    #[wasm_bindgen(getter)]
    pub fn compressed_label(&self) -> Option<String> {
        self.inner.stats().map(|s| s.compressed_label())
    }

    /// e.g. `Saved 96% storage`.
    #[wasm_bindgen(getter)]
    pub fn savings_label(&self) -> Option<String> {
        self.inner.stats().map(|s| s.savings_label())
    }

    #[wasm_bindgen(getter)]
    pub fn preview_url(&self) -> Option<String> {
        self.inner.preview().map(|p| p.data_url().to_string())
    }

    /// The bytes to upload, copied out of WASM memory.
    pub fn output(&self) -> Option<Vec<u8>> {
        self.inner.result().map(|r| r.output().to_vec())
    }
}

/// Generations are handed to JS as plain numbers, exact up to 2^53.
fn generation_to_js(generation: u64) -> f64 {
    generation as f64
}

/// The in-flight ticket, if `generation` still names it.
fn current_ticket(state: &IntakeState, generation: f64) -> Option<IntakeTicket> {
    match state {
        IntakeState::Compressing { ticket } if generation_to_js(ticket.generation()) == generation => {
            Some(*ticket)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_intake_core::IntakeLimits;

    #[test]
    fn test_current_ticket_matches_generation() {
        let mut controller = IntakeController::new(IntakeLimits::default());
        let first = controller.select("image/png", 10).unwrap();
        assert_eq!(current_ticket(controller.state(), 1.0), Some(first));

        let second = controller.select("image/jpeg", 10).unwrap();
        assert_eq!(current_ticket(controller.state(), 1.0), None);
        assert_eq!(current_ticket(controller.state(), 2.0), Some(second));
    }

    #[test]
    fn test_generation_beyond_u32_does_not_alias() {
        let mut controller = IntakeController::new(IntakeLimits::default());
        controller.select("image/png", 10).unwrap();

        let wrapped = u32::MAX as f64 + 2.0;
        assert_eq!(current_ticket(controller.state(), wrapped), None);
        assert_eq!(current_ticket(controller.state(), 1.5), None);
        assert_eq!(generation_to_js(1 << 40), 1_099_511_627_776.0);
    }

    #[test]
    fn test_current_ticket_none_outside_compressing() {
        let mut controller = IntakeController::new(IntakeLimits::default());
        assert_eq!(current_ticket(controller.state(), 0.0), None);

        assert!(controller.select("text/plain", 10).is_err());
        assert_eq!(current_ticket(controller.state(), 1.0), None);
    }

    #[test]
    fn test_controller_without_callback() {
        let mut controller = JsIntakeController {
            inner: IntakeController::with_submission(
                IntakeLimits::default(),
                CallbackSubmission { on_change: None },
            ),
        };

        let generation = generation_to_js(controller.inner.select("image/jpeg", 100).unwrap().generation());
        assert_eq!(controller.pending_media_type().as_deref(), Some("image/jpeg"));

        assert!(!controller.fail(generation + 1.0, "stale".to_string()));
        assert!(controller.fail(generation, "decoder gave up".to_string()));
        assert_eq!(controller.state(), "failed");
        assert_eq!(
            controller.error_message().as_deref(),
            Some("Failed to optimize image. Try another photo.")
        );
        assert!(controller.original_size().is_none());
    }
}
