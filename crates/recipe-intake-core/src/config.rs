//! Pipeline configuration.
//!
//! Every field has a default, so the UI can pass a partial object (or
//! nothing) and get the standard 10 MiB / three-step ladder behavior.

use serde::{Deserialize, Serialize};

use crate::compress::Compressor;
use crate::intake::{IntakeController, PendingSubmission};
use crate::profile::EscalationLadder;
use crate::validate::IntakeLimits;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    pub limits: IntakeLimits,
    pub ladder: EscalationLadder,
}

impl IntakeConfig {
    pub fn compressor(&self) -> Compressor {
        Compressor::new(self.ladder.clone())
    }

    pub fn controller(&self) -> IntakeController {
        IntakeController::new(self.limits.clone())
    }

    pub fn controller_with<S: PendingSubmission>(&self, submission: S) -> IntakeController<S> {
        IntakeController::with_submission(self.limits.clone(), submission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{MediaType, MAX_INTAKE_BYTES};

    #[test]
    fn test_empty_object_gives_defaults() {
        let config: IntakeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, IntakeConfig::default());
        assert_eq!(config.limits.max_bytes, MAX_INTAKE_BYTES);
        assert_eq!(config.ladder.len(), 3);
    }

    #[test]
    fn test_partial_limits() {
        let config: IntakeConfig =
            serde_json::from_str(r#"{"limits": {"accepted": ["image/jpeg"]}}"#).unwrap();
        assert_eq!(config.limits.accepted, vec![MediaType::Jpeg]);
        assert_eq!(config.limits.max_bytes, MAX_INTAKE_BYTES);
    }

    #[test]
    fn test_controller_uses_limits() {
        let config: IntakeConfig =
            serde_json::from_str(r#"{"limits": {"max_bytes": 100}}"#).unwrap();
        let mut controller = config.controller();
        assert!(controller.select("image/png", 101).is_err());
        assert_eq!(
            controller.error_message().as_deref(),
            Some("Image too large (max 100 B)")
        );
    }

    #[test]
    fn test_round_trips_through_json() {
        let config = IntakeConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: IntakeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
