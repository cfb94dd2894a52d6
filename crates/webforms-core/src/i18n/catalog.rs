//! Translation catalog.
//!
//! A global, thread-safe registry of message translations keyed by language
//! code. Catalogs are registered programmatically or loaded from JSON files:
//!
//! ```json
//! {
//!   "messages": {
//!     "Submit": "Отправить",
//!     "Invalid CSRF token.": "Неверный CSRF-токен."
//!   }
//! }
//! ```
//!
//! [`load_dir`] reads every `<lang>.json` file in a directory, which is how
//! the registration entry point wires translation directories.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{OnceLock, RwLock};

use crate::error::WebformsError;

/// Message translations for a single language: msgid -> translated string.
#[derive(Debug, Clone, Default)]
pub struct TranslationCatalog {
    messages: HashMap<String, String>,
}

fn global_catalogs() -> &'static RwLock<HashMap<String, TranslationCatalog>> {
    static CATALOGS: OnceLock<RwLock<HashMap<String, TranslationCatalog>>> = OnceLock::new();
    CATALOGS.get_or_init(|| RwLock::new(HashMap::new()))
}

#[allow(clippy::significant_drop_tightening)]
fn with_catalog_mut<F>(language: &str, f: F)
where
    F: FnOnce(&mut TranslationCatalog),
{
    let mut catalogs = global_catalogs().write().expect("catalog lock poisoned");
    let catalog = catalogs.entry(language.to_string()).or_default();
    f(catalog);
}

// ── Registration API ─────────────────────────────────────────────────────

/// Registers message translations for a language, merging with any
/// existing entries.
///
/// ```
/// use webforms_core::i18n::catalog;
///
/// catalog::register_translations("de", vec![("Submit", "Absenden")]);
/// assert_eq!(catalog::translate("de", "Submit"), Some("Absenden".to_string()));
/// ```
pub fn register_translations(language: &str, entries: Vec<(&str, &str)>) {
    with_catalog_mut(language, |catalog| {
        for (msgid, translated) in entries {
            catalog
                .messages
                .insert(msgid.to_string(), translated.to_string());
        }
    });
}

/// Loads translations for a language from a JSON string.
pub fn load_from_json(language: &str, json_str: &str) -> Result<(), WebformsError> {
    let value: serde_json::Value = serde_json::from_str(json_str).map_err(|e| {
        WebformsError::ConfigurationError(format!("Invalid translation JSON for '{language}': {e}"))
    })?;

    with_catalog_mut(language, |catalog| {
        if let Some(messages) = value.get("messages").and_then(|v| v.as_object()) {
            for (msgid, translated) in messages {
                if let Some(t) = translated.as_str() {
                    catalog.messages.insert(msgid.clone(), t.to_string());
                }
            }
        }
    });

    Ok(())
}

/// Loads every `<lang>.json` file found in `dir`.
///
/// Returns the language codes that were loaded, sorted.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<Vec<String>, WebformsError> {
    let dir = dir.as_ref();
    let mut loaded = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(language) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let content = std::fs::read_to_string(&path)?;
        load_from_json(language, &content)?;
        tracing::debug!(language, path = %path.display(), "loaded translation catalog");
        loaded.push(language.to_string());
    }

    loaded.sort();
    Ok(loaded)
}

// ── Lookup API ───────────────────────────────────────────────────────────

/// Looks up a translation in the catalog.
pub fn translate(language: &str, msgid: &str) -> Option<String> {
    let catalogs = global_catalogs().read().expect("catalog lock poisoned");
    catalogs
        .get(language)
        .and_then(|catalog| catalog.messages.get(msgid).cloned())
}

/// Returns `true` if translations are registered for the given language.
pub fn has_language(language: &str) -> bool {
    let catalogs = global_catalogs().read().expect("catalog lock poisoned");
    catalogs.contains_key(language)
}

/// Clears all translations for a given language.
pub fn clear_language(language: &str) {
    let mut catalogs = global_catalogs().write().expect("catalog lock poisoned");
    catalogs.remove(language);
}
