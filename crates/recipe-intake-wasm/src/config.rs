//! Reading pipeline configuration passed in from JavaScript.

use recipe_intake_core::IntakeConfig;
use wasm_bindgen::prelude::*;

/// Deserialize an optional config object. `undefined` and `null` give the
/// defaults; partial objects fill in the rest from defaults.
///
/// # Example (TypeScript)
/// ```typescript
/// const controller = new JsIntakeController({ limits: { max_bytes: 5 * 1024 * 1024 } });
/// ```
pub(crate) fn parse_config(value: JsValue) -> Result<IntakeConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(IntakeConfig::default());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid intake config: {}", e)))
}

/// Return the default configuration as a plain object.
#[wasm_bindgen]
pub fn default_config() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&IntakeConfig::default())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// WASM-specific tests that require JsValue.
///
/// Use `wasm-pack test` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_undefined_gives_defaults() {
        let config = parse_config(JsValue::UNDEFINED).unwrap();
        assert_eq!(config, IntakeConfig::default());
    }

    #[wasm_bindgen_test]
    fn test_default_config_round_trips() {
        let value = default_config().unwrap();
        let config = parse_config(value).unwrap();
        assert_eq!(config, IntakeConfig::default());
    }

    #[wasm_bindgen_test]
    fn test_invalid_config_errors() {
        let value = serde_wasm_bindgen::to_value(&"nope").unwrap();
        assert!(parse_config(value).is_err());
    }
}
