use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::path::Path;
use std::time::Duration;

/// Configuration shared by every live view in a registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LiveViewConfig {
    /// Selection events arriving within this many milliseconds of the last
    /// accepted click are treated as duplicates of it
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Clear the selection after every selection event (default: true).
    /// Keeps carets from highlighting clicked widgets.
    #[serde(default = "default_true")]
    pub clear_selection: bool,

    /// Layer `default_settings` under the settings passed to `apply_settings`
    #[serde(default = "default_true")]
    pub use_default_settings: bool,

    /// View settings applied by `apply_settings` when defaults are enabled
    #[serde(default = "default_view_settings")]
    pub default_settings: Map<String, Value>,
}

fn default_true() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    100
}

/// Settings that turn an editing view into a widget surface
pub fn default_view_settings() -> Map<String, Value> {
    let value = json!({
        "rulers": [],
        "highlight_line": false,
        "fade_fold_buttons": true,
        "caret_style": "solid",
        "line_numbers": false,
        "draw_white_space": "none",
        "gutter": false,
        "word_wrap": false,
        "indent_guide_options": []
    });
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

impl Default for LiveViewConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            clear_selection: true,
            use_default_settings: true,
            default_settings: default_view_settings(),
        }
    }
}

impl LiveViewConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut config: LiveViewConfig =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.merge_defaults_for_maps();

        Ok(config)
    }

    /// Fill in built-in default settings the user did not mention.
    ///
    /// User entries always win; a user map with only `{"gutter": true}` still
    /// gets every other default.
    pub fn merge_defaults_for_maps(&mut self) {
        for (name, value) in default_view_settings() {
            self.default_settings.entry(name).or_insert(value);
        }
    }

    /// JSON schema of the configuration file
    pub fn schema() -> Value {
        serde_json::to_value(schemars::schema_for!(LiveViewConfig)).unwrap_or(Value::Null)
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LiveViewConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(100));
        assert!(config.clear_selection);
        assert_eq!(config.default_settings["caret_style"], json!("solid"));
        assert_eq!(config.default_settings.len(), 9);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: LiveViewConfig = serde_json::from_str(r#"{"debounce_ms": 250}"#).unwrap();
        assert_eq!(config.debounce_ms, 250);
        assert!(config.use_default_settings);
        assert_eq!(config.default_settings, default_view_settings());
    }

    #[test]
    fn test_merge_keeps_user_values() {
        let mut config: LiveViewConfig =
            serde_json::from_str(r#"{"default_settings": {"gutter": true, "font_size": 9}}"#)
                .unwrap();
        config.merge_defaults_for_maps();
        assert_eq!(config.default_settings["gutter"], json!(true));
        assert_eq!(config.default_settings["font_size"], json!(9));
        assert_eq!(config.default_settings["line_numbers"], json!(false));
    }

    #[test]
    fn test_schema_lists_fields() {
        let schema = LiveViewConfig::schema();
        let properties = &schema["properties"];
        assert!(properties.get("debounce_ms").is_some());
        assert!(properties.get("default_settings").is_some());
    }
}
