//! Settings loading from configuration files.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON document (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `WEBFORMS_DEBUG` | `debug` |
//! | `WEBFORMS_LOG_LEVEL` | `log_level` |
//! | `WEBFORMS_LANGUAGE_CODE` | `language_code` |
//! | `WEBFORMS_LOCALE_DIRS` | `locale_dirs` (comma-separated) |
//! | `WEBFORMS_TEMPLATE_DIRS` | `template_dirs` (comma-separated) |
//!
//! ## Examples
//!
//! ```
//! use webforms_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_str(r#"
//!     language_code = "de"
//!     [templates]
//!     field = "site/field.html"
//! "#).unwrap();
//! assert_eq!(settings.language_code, "de");
//! assert_eq!(settings.templates.field, "site/field.html");
//! assert_eq!(settings.templates.fieldset, "webforms/fieldset.html");
//! ```

use std::path::{Path, PathBuf};

use crate::error::WebformsError;
use crate::settings::WebformsSettings;

/// Loads settings from a TOML string, keeping defaults for anything absent.
pub fn from_toml_str(toml_str: &str) -> Result<WebformsSettings, WebformsError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| WebformsError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;
    from_json_value(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a TOML file.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<WebformsSettings, WebformsError> {
    from_toml_str(&read_config(path.as_ref(), "TOML")?)
}

/// Loads settings from a TOML file and then applies environment overrides.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<WebformsSettings, WebformsError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string, keeping defaults for anything absent.
pub fn from_json_str(json_str: &str) -> Result<WebformsSettings, WebformsError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| WebformsError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;
    from_json_value(json_value, "JSON")
}

/// Loads settings from a JSON file.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<WebformsSettings, WebformsError> {
    from_json_str(&read_config(path.as_ref(), "JSON")?)
}

/// Loads settings from environment variables only, starting from defaults.
pub fn from_env() -> WebformsSettings {
    let mut settings = WebformsSettings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies `WEBFORMS_*` environment variable overrides.
pub fn apply_env_overrides(settings: &mut WebformsSettings) {
    if let Ok(val) = std::env::var("WEBFORMS_DEBUG") {
        settings.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Ok(val) = std::env::var("WEBFORMS_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Ok(val) = std::env::var("WEBFORMS_LANGUAGE_CODE") {
        settings.language_code = val;
    }

    if let Ok(val) = std::env::var("WEBFORMS_LOCALE_DIRS") {
        settings.locale_dirs = split_paths(&val);
    }

    if let Ok(val) = std::env::var("WEBFORMS_TEMPLATE_DIRS") {
        settings.template_dirs = split_paths(&val);
    }
}

// ============================================================
// Helpers
// ============================================================

fn read_config(path: &Path, format: &str) -> Result<String, WebformsError> {
    std::fs::read_to_string(path).map_err(|e| {
        WebformsError::ConfigurationError(format!(
            "Failed to read {format} file '{}': {e}",
            path.display()
        ))
    })
}

fn from_json_value(
    value: serde_json::Value,
    format: &str,
) -> Result<WebformsSettings, WebformsError> {
    let default_json = serde_json::to_value(WebformsSettings::default()).map_err(|e| {
        WebformsError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;
    let merged = merge_json(default_json, value);
    serde_json::from_value(merged).map_err(|e| {
        WebformsError::ConfigurationError(format!(
            "Failed to deserialize settings from {format}: {e}"
        ))
    })
}

fn split_paths(value: &str) -> Vec<PathBuf> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => serde_json::Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = match base_map.remove(&key) {
                    Some(base_v) => merge_json(base_v, override_v),
                    None => override_v,
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}
