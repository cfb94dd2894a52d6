//! Localization.
//!
//! The form layer never looks messages up itself; it asks a [`Translator`]
//! obtained from the current request. [`Localizer`] is the catalog-backed
//! implementation bound to one language, and [`NullTranslator`] returns
//! every message unchanged.
//!
//! ```
//! use webforms_core::i18n::{self, Localizer, Translator};
//!
//! i18n::catalog::register_translations("es", vec![("Submit", "Enviar")]);
//!
//! let localizer = Localizer::new("es");
//! assert_eq!(localizer.translate("Submit"), "Enviar");
//! assert_eq!(localizer.translate("or"), "or");
//! ```

pub mod catalog;

use std::fmt;

/// Translates message ids into localized strings.
pub trait Translator: Send + Sync + fmt::Debug {
    /// Returns the localized form of `msgid`, or `msgid` itself when no
    /// translation is known.
    fn translate(&self, msgid: &str) -> String;
}

/// A translator backed by the global [`catalog`] for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Localizer {
    language: String,
}

impl Localizer {
    /// Creates a localizer for the given language code.
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }

    /// Returns the language this localizer translates into.
    pub fn language(&self) -> &str {
        &self.language
    }
}

impl Default for Localizer {
    fn default() -> Self {
        Self::new("en")
    }
}

impl Translator for Localizer {
    fn translate(&self, msgid: &str) -> String {
        catalog::translate(&self.language, msgid).unwrap_or_else(|| msgid.to_string())
    }
}

/// A translator that returns every message unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTranslator;

impl Translator for NullTranslator {
    fn translate(&self, msgid: &str) -> String {
        msgid.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localizer_falls_back_to_msgid() {
        let localizer = Localizer::new("i18n_t1");
        assert_eq!(
            localizer.translate("Please correct your input parameters."),
            "Please correct your input parameters."
        );
    }

    #[test]
    fn test_localizer_uses_catalog() {
        catalog::register_translations("i18n_t2", vec![("Error", "Ошибка")]);
        let localizer = Localizer::new("i18n_t2");
        assert_eq!(localizer.language(), "i18n_t2");
        assert_eq!(localizer.translate("Error"), "Ошибка");
    }

    #[test]
    fn test_null_translator() {
        assert_eq!(NullTranslator.translate("Submit"), "Submit");
    }

    #[test]
    fn test_default_localizer_is_english() {
        assert_eq!(Localizer::default().language(), "en");
    }
}
