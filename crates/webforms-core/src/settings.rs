//! Settings for webforms.
//!
//! [`WebformsSettings`] holds everything the form layer reads from the host
//! application's configuration: logging, localization and the template id
//! used for each kind of rendered fragment. Template ids are opaque to the
//! form layer; the configured [`TemplateRenderer`] decides what they mean.
//!
//! [`TemplateRenderer`]: ../../webforms_template/renderer/trait.TemplateRenderer.html

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The kinds of fragment the form layer renders through templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    /// The outer container wrapping attributes, fields, buttons and footer.
    Form,
    /// One fieldset with its caption.
    Fieldset,
    /// One field wrapper (label, control, error, tooltip, extras).
    Field,
    /// An inline per-field error message.
    FieldError,
    /// The form-level error banner.
    FormError,
    /// A field tooltip.
    Tooltip,
    /// A lone submit button.
    Submit,
    /// A submit button followed by an alternate link.
    SubmitAlternate,
}

impl TemplateKind {
    /// All kinds, in a stable order.
    pub const ALL: [Self; 8] = [
        Self::Form,
        Self::Fieldset,
        Self::Field,
        Self::FieldError,
        Self::FormError,
        Self::Tooltip,
        Self::Submit,
        Self::SubmitAlternate,
    ];

    /// Returns the short name of this kind (e.g. `"field_error"`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Form => "form",
            Self::Fieldset => "fieldset",
            Self::Field => "field",
            Self::FieldError => "field_error",
            Self::FormError => "form_error",
            Self::Tooltip => "tooltip",
            Self::Submit => "submit",
            Self::SubmitAlternate => "submit_alternate",
        }
    }

    /// Returns the built-in template id for this kind.
    pub fn default_id(self) -> String {
        format!("webforms/{}.html", self.as_str())
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Template id overrides, one per [`TemplateKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateIds {
    pub form: String,
    pub fieldset: String,
    pub field: String,
    pub field_error: String,
    pub form_error: String,
    pub tooltip: String,
    pub submit: String,
    pub submit_alternate: String,
}

impl Default for TemplateIds {
    fn default() -> Self {
        Self {
            form: TemplateKind::Form.default_id(),
            fieldset: TemplateKind::Fieldset.default_id(),
            field: TemplateKind::Field.default_id(),
            field_error: TemplateKind::FieldError.default_id(),
            form_error: TemplateKind::FormError.default_id(),
            tooltip: TemplateKind::Tooltip.default_id(),
            submit: TemplateKind::Submit.default_id(),
            submit_alternate: TemplateKind::SubmitAlternate.default_id(),
        }
    }
}

impl TemplateIds {
    /// Returns the configured template id for the given kind.
    pub fn get(&self, kind: TemplateKind) -> &str {
        match kind {
            TemplateKind::Form => &self.form,
            TemplateKind::Fieldset => &self.fieldset,
            TemplateKind::Field => &self.field,
            TemplateKind::FieldError => &self.field_error,
            TemplateKind::FormError => &self.form_error,
            TemplateKind::Tooltip => &self.tooltip,
            TemplateKind::Submit => &self.submit,
            TemplateKind::SubmitAlternate => &self.submit_alternate,
        }
    }

    /// Overrides the template id for the given kind.
    pub fn set(&mut self, kind: TemplateKind, id: impl Into<String>) {
        let slot = match kind {
            TemplateKind::Form => &mut self.form,
            TemplateKind::Fieldset => &mut self.fieldset,
            TemplateKind::Field => &mut self.field,
            TemplateKind::FieldError => &mut self.field_error,
            TemplateKind::FormError => &mut self.form_error,
            TemplateKind::Tooltip => &mut self.tooltip,
            TemplateKind::Submit => &mut self.submit,
            TemplateKind::SubmitAlternate => &mut self.submit_alternate,
        };
        *slot = id.into();
    }
}

/// The complete set of webforms settings.
///
/// # Examples
///
/// ```
/// use webforms_core::settings::{TemplateKind, WebformsSettings};
///
/// let settings = WebformsSettings::default();
/// assert_eq!(settings.language_code, "en");
/// assert_eq!(settings.templates.get(TemplateKind::Field), "webforms/field.html");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebformsSettings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log filter directive (e.g. "info", "webforms_forms=debug").
    pub log_level: String,

    // ── Internationalization ─────────────────────────────────────────

    /// The language used by the default localizer.
    pub language_code: String,
    /// Directories holding `<lang>.json` translation files.
    pub locale_dirs: Vec<PathBuf>,

    // ── Templates ────────────────────────────────────────────────────

    /// Directories holding template overrides, loaded by the renderer.
    pub template_dirs: Vec<PathBuf>,
    /// Template id for each fragment kind.
    pub templates: TemplateIds,
}

impl Default for WebformsSettings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            language_code: "en".to_string(),
            locale_dirs: Vec::new(),
            template_dirs: Vec::new(),
            templates: TemplateIds::default(),
        }
    }
}

impl WebformsSettings {
    /// Returns the configured template id for the given kind.
    pub fn template_id(&self, kind: TemplateKind) -> &str {
        self.templates.get(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_ids() {
        let ids = TemplateIds::default();
        for kind in TemplateKind::ALL {
            assert_eq!(ids.get(kind), kind.default_id());
        }
    }

    #[test]
    fn test_override_template_id() {
        let mut settings = WebformsSettings::default();
        settings.templates.set(TemplateKind::Tooltip, "app/tip.html");
        assert_eq!(settings.template_id(TemplateKind::Tooltip), "app/tip.html");
        assert_eq!(settings.template_id(TemplateKind::Field), "webforms/field.html");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(TemplateKind::SubmitAlternate.as_str(), "submit_alternate");
        assert_eq!(TemplateKind::FieldError.to_string(), "field_error");
    }

    #[test]
    fn test_settings_serde_roundtrip_keeps_defaults() {
        let json = serde_json::json!({"debug": false});
        let settings: WebformsSettings = serde_json::from_value(json).unwrap();
        assert!(!settings.debug);
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.templates, TemplateIds::default());
    }
}
