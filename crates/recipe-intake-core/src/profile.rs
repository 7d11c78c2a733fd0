//! Compression profiles and the escalation ladder.
//!
//! A profile is one set of encoder settings. The ladder is the fixed, ordered
//! list of profiles the compressor walks through until one output fits under
//! the hard ceiling or the list runs out.

use serde::{Deserialize, Serialize};

use crate::decode::FilterType;

/// Soft size target for the compressed output (200 KiB).
pub const SOFT_TARGET_BYTES: usize = 200 * 1024;

/// Size above which the next ladder step is tried (300 KiB).
pub const HARD_CEILING_BYTES: usize = 300 * 1024;

/// Long-edge limit for the first ladder steps.
pub const DEFAULT_MAX_EDGE: u32 = 1200;

/// Long-edge limit for the last ladder step.
pub const REDUCED_MAX_EDGE: u32 = 800;

/// Quality factor for the first ladder step.
pub const DEFAULT_QUALITY: f32 = 0.8;

/// Re-encodes allowed per ladder step while chasing the soft target.
pub const TARGET_ITERATIONS: u32 = 10;

/// Quality points dropped on each re-encode toward the soft target.
pub const TARGET_QUALITY_STEP: u8 = 5;

/// Quality floor (percent) for the soft-target step-down.
pub const MIN_TARGET_QUALITY: u8 = 10;

/// Media type of every compressed output.
pub const OUTPUT_MEDIA_TYPE: &str = "image/jpeg";

/// Encoder settings for one compression attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionProfile {
    /// Size the output should ideally stay under, in bytes.
    pub target_bytes: usize,
    /// Size above which the ladder escalates, in bytes.
    pub ceiling_bytes: usize,
    /// Maximum length of the longest edge in pixels.
    pub max_edge: u32,
    /// Quality factor (0.0 to 1.0).
    pub quality: f32,
    /// Interpolation used when downscaling.
    pub filter: FilterType,
    /// How many times the quality may be stepped down to reach `target_bytes`.
    pub target_iterations: u32,
}

impl Default for CompressionProfile {
    fn default() -> Self {
        Self {
            target_bytes: SOFT_TARGET_BYTES,
            ceiling_bytes: HARD_CEILING_BYTES,
            max_edge: DEFAULT_MAX_EDGE,
            quality: DEFAULT_QUALITY,
            filter: FilterType::Bilinear,
            target_iterations: TARGET_ITERATIONS,
        }
    }
}

impl CompressionProfile {
    /// Derive a profile with a different quality factor.
    pub fn with_quality(self, quality: f32) -> Self {
        Self { quality, ..self }
    }

    /// Derive a profile with a different long-edge limit.
    pub fn with_max_edge(self, max_edge: u32) -> Self {
        Self { max_edge, ..self }
    }

    /// Whether `len` bytes is over this profile's hard ceiling.
    pub fn exceeds_ceiling(&self, len: usize) -> bool {
        len > self.ceiling_bytes
    }

    /// Whether `len` bytes meets the soft target.
    pub fn meets_target(&self, len: usize) -> bool {
        len <= self.target_bytes
    }
}

/// Ordered, non-empty sequence of profiles tried one after another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CompressionProfile>", into = "Vec<CompressionProfile>")]
pub struct EscalationLadder {
    steps: Vec<CompressionProfile>,
}

impl Default for EscalationLadder {
    /// q0.8 at 1200px, then q0.7 at 1200px, then q0.6 at 800px.
    fn default() -> Self {
        let base = CompressionProfile::default();
        Self {
            steps: vec![
                base,
                base.with_quality(0.7),
                base.with_quality(0.6).with_max_edge(REDUCED_MAX_EDGE),
            ],
        }
    }
}

impl EscalationLadder {
    /// Build a ladder from explicit steps. Returns `None` for an empty list.
    pub fn new(steps: Vec<CompressionProfile>) -> Option<Self> {
        if steps.is_empty() {
            None
        } else {
            Some(Self { steps })
        }
    }

    /// The steps in the order they are tried.
    pub fn steps(&self) -> &[CompressionProfile] {
        &self.steps
    }

    /// Upper bound on the number of attempts.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Never true for a ladder built through `new` or deserialization.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl TryFrom<Vec<CompressionProfile>> for EscalationLadder {
    type Error = &'static str;

    fn try_from(steps: Vec<CompressionProfile>) -> Result<Self, Self::Error> {
        Self::new(steps).ok_or("escalation ladder needs at least one profile")
    }
}

impl From<EscalationLadder> for Vec<CompressionProfile> {
    fn from(ladder: EscalationLadder) -> Self {
        ladder.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let p = CompressionProfile::default();
        assert_eq!(p.target_bytes, 204_800);
        assert_eq!(p.ceiling_bytes, 307_200);
        assert_eq!(p.max_edge, 1200);
        assert!((p.quality - 0.8).abs() < f32::EPSILON);
        assert_eq!(p.target_iterations, 10);
    }

    #[test]
    fn test_default_ladder_order() {
        let ladder = EscalationLadder::default();
        let steps = ladder.steps();

        assert_eq!(ladder.len(), 3);
        assert_eq!((steps[0].quality, steps[0].max_edge), (0.8, 1200));
        assert_eq!((steps[1].quality, steps[1].max_edge), (0.7, 1200));
        assert_eq!((steps[2].quality, steps[2].max_edge), (0.6, 800));
        assert!(steps.iter().all(|s| s.ceiling_bytes == HARD_CEILING_BYTES));
    }

    #[test]
    fn test_ceiling_is_inclusive() {
        let p = CompressionProfile::default();
        assert!(!p.exceeds_ceiling(HARD_CEILING_BYTES));
        assert!(p.exceeds_ceiling(HARD_CEILING_BYTES + 1));
        assert!(p.meets_target(SOFT_TARGET_BYTES));
        assert!(!p.meets_target(SOFT_TARGET_BYTES + 1));
    }

    #[test]
    fn test_empty_ladder_rejected() {
        assert!(EscalationLadder::new(vec![]).is_none());
        assert!(EscalationLadder::try_from(Vec::new()).is_err());
    }

    #[test]
    fn test_ladder_deserializes_from_list_with_partial_profiles() {
        let ladder: EscalationLadder =
            serde_json::from_str(r#"[{"quality": 0.5}, {"quality": 0.4, "max_edge": 640}]"#)
                .unwrap();

        assert_eq!(ladder.len(), 2);
        assert_eq!(ladder.steps()[0].max_edge, DEFAULT_MAX_EDGE);
        assert_eq!(ladder.steps()[1].max_edge, 640);
        assert_eq!(ladder.steps()[1].filter, FilterType::Bilinear);
    }

    #[test]
    fn test_empty_ladder_fails_to_deserialize() {
        let result: Result<EscalationLadder, _> = serde_json::from_str("[]");
        assert!(result.is_err());
    }
}
