//! Presentation configuration for modal dialogs

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Class names applied by the two dialog strategies.
///
/// Every field has a default, so a partial JSON object only overrides what
/// it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModalConfig {
    /// Classes on the native `<dialog>` element
    pub native_class: String,
    /// Classes on the fallback full-viewport container
    pub fallback_class: String,
    /// Classes on the fallback's inner content wrapper
    pub fallback_content_class: String,
    /// Class added to the fallback container while closed
    pub hidden_class: String,
}

impl Default for ModalConfig {
    fn default() -> Self {
        ModalConfig {
            native_class: "relative w-full h-full backdrop:bg-black/50".to_string(),
            fallback_class: "fixed z-max top-0 left-0 right-0 bottom-0 p-3 bg-black/50"
                .to_string(),
            fallback_content_class: "relative w-full h-full".to_string(),
            hidden_class: "hidden".to_string(),
        }
    }
}

impl ModalConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ModalConfig = serde_json::from_str(json)?;
        config.validate()
    }

    /// Read a configuration object handed over from JavaScript.
    /// `undefined` and `null` give the defaults.
    pub fn from_js(value: wasm_bindgen::JsValue) -> Result<Self, ConfigError> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }
        let config: ModalConfig = serde_wasm_bindgen::from_value(value)
            .map_err(|e| ConfigError::Value(e.to_string()))?;
        config.validate()
    }

    /// The hidden class is toggled as a single token, so it cannot be blank
    /// or contain whitespace.
    fn validate(self) -> Result<Self, ConfigError> {
        let hidden = self.hidden_class.as_str();
        if hidden.is_empty() || hidden.contains(char::is_whitespace) {
            return Err(ConfigError::Value(format!(
                "hiddenClass must be a single class name, got {:?}",
                hidden
            )));
        }
        Ok(self)
    }

    /// Fallback container classes for the given visibility.
    pub fn fallback_classes(&self, hidden: bool) -> String {
        if hidden {
            format!("{} {}", self.fallback_class, self.hidden_class)
        } else {
            self.fallback_class.clone()
        }
    }
}
