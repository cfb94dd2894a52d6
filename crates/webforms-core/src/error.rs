//! Core error types for webforms.
//!
//! [`WebformsError`] covers configuration mistakes made while declaring or
//! rendering a form, template and routing failures surfaced by external
//! collaborators, and validation failures. [`ValidationError`] is the
//! structured payload produced by a failed schema run: a whole-form message
//! plus a mapping from field name to message.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Key under which whole-form (chained validator) errors are reported.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// A validation failure with optional per-field messages.
///
/// # Examples
///
/// ```
/// use webforms_core::error::ValidationError;
///
/// let err = ValidationError::new("Please enter a value", "empty");
/// assert_eq!(err.to_string(), "Please enter a value");
///
/// let err = ValidationError::for_field("email", "An email address must contain a single @");
/// assert_eq!(
///     err.field_errors.get("email").map(String::as_str),
///     Some("An email address must contain a single @")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationError {
    /// The primary error message.
    pub message: String,
    /// A short code identifying the failure (e.g. "empty", "invalid").
    pub code: String,
    /// Per-field messages, keyed by field name.
    pub field_errors: BTreeMap<String, String>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            field_errors: BTreeMap::new(),
        }
    }

    /// Creates a `ValidationError` carrying a single field message.
    pub fn for_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut field_errors = BTreeMap::new();
        field_errors.insert(field.into(), message.clone());
        Self {
            message,
            code: "invalid".to_string(),
            field_errors,
        }
    }

    /// Creates a `ValidationError` from a field → message mapping.
    pub fn with_field_errors(field_errors: BTreeMap<String, String>) -> Self {
        Self {
            message: String::new(),
            code: "invalid".to_string(),
            field_errors,
        }
    }

    /// Flattens this error into a field → message mapping.
    ///
    /// A bare message with no field errors lands under [`NON_FIELD_ERRORS`].
    pub fn unpack_errors(&self) -> BTreeMap<String, String> {
        if self.field_errors.is_empty() && !self.message.is_empty() {
            let mut errors = BTreeMap::new();
            errors.insert(NON_FIELD_ERRORS.to_string(), self.message.clone());
            return errors;
        }
        self.field_errors.clone()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.message.is_empty() {
            return write!(f, "{}", self.message);
        }
        let mut first = true;
        for (field, message) in &self.field_errors {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// The primary error type for webforms.
#[derive(Error, Debug)]
pub enum WebformsError {
    // ── Configuration ────────────────────────────────────────────────

    /// A form declaration or environment is inconsistent.
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),

    /// A field declares a control type the renderer has no support for.
    #[error("HTML field type \"{0}\" is not supported")]
    UnsupportedFieldType(String),

    /// A field name was referenced that no declaration provides.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// A settings value is missing or malformed.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Collaborators ────────────────────────────────────────────────

    /// The requested template id is not registered with the renderer.
    #[error("Template does not exist: {0}")]
    TemplateDoesNotExist(String),

    /// The renderer failed while rendering a template.
    #[error("Template error: {0}")]
    TemplateError(String),

    /// A route name could not be resolved to a URL.
    #[error("Reverse for '{0}' not found")]
    NoReverseMatch(String),

    // ── Request level ────────────────────────────────────────────────

    /// The request was refused (CSRF failure).
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Submitted data failed validation.
    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationError),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred while loading settings, templates or catalogs.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl WebformsError {
    /// Returns the HTTP status code associated with this error.
    ///
    /// - `ValidationError` -> 400
    /// - `PermissionDenied` -> 403
    /// - `NoReverseMatch` -> 404
    /// - Everything else -> 500
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::ValidationError(_) => 400,
            Self::PermissionDenied(_) => 403,
            Self::NoReverseMatch(_) => 404,
            Self::ImproperlyConfigured(_)
            | Self::UnsupportedFieldType(_)
            | Self::UnknownField(_)
            | Self::ConfigurationError(_)
            | Self::TemplateDoesNotExist(_)
            | Self::TemplateError(_)
            | Self::IoError(_) => 500,
        }
    }

    /// Returns `true` for programmer errors in a form declaration.
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::ImproperlyConfigured(_)
                | Self::UnsupportedFieldType(_)
                | Self::UnknownField(_)
                | Self::ConfigurationError(_)
        )
    }
}

/// A convenience type alias for `Result<T, WebformsError>`.
pub type WebformsResult<T> = Result<T, WebformsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_simple() {
        let err = ValidationError::new("Please enter a value", "empty");
        assert_eq!(err.to_string(), "Please enter a value");
    }

    #[test]
    fn test_validation_error_display_field_errors() {
        let mut field_errors = BTreeMap::new();
        field_errors.insert("email".to_string(), "Invalid email.".to_string());
        field_errors.insert("name".to_string(), "Missing value".to_string());
        let err = ValidationError::with_field_errors(field_errors);
        assert_eq!(err.to_string(), "email: Invalid email.; name: Missing value");
    }

    #[test]
    fn test_unpack_bare_message_goes_to_form_key() {
        let err = ValidationError::new("Passwords do not match", "mismatch");
        let unpacked = err.unpack_errors();
        assert_eq!(
            unpacked.get(NON_FIELD_ERRORS).map(String::as_str),
            Some("Passwords do not match")
        );
    }

    #[test]
    fn test_unpack_field_errors() {
        let err = ValidationError::for_field("_at", "Invalid CSRF token.");
        let unpacked = err.unpack_errors();
        assert_eq!(unpacked.len(), 1);
        assert!(unpacked.contains_key("_at"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            WebformsError::ValidationError(ValidationError::new("x", "y")).status_code(),
            400
        );
        assert_eq!(WebformsError::PermissionDenied("x".into()).status_code(), 403);
        assert_eq!(WebformsError::NoReverseMatch("x".into()).status_code(), 404);
        assert_eq!(WebformsError::UnsupportedFieldType("radio".into()).status_code(), 500);
    }

    #[test]
    fn test_configuration_error_classification() {
        assert!(WebformsError::UnsupportedFieldType("radio".into()).is_configuration_error());
        assert!(WebformsError::UnknownField("nope".into()).is_configuration_error());
        assert!(!WebformsError::PermissionDenied("csrf".into()).is_configuration_error());
    }

    #[test]
    fn test_unsupported_field_type_message() {
        let err = WebformsError::UnsupportedFieldType("radio".into());
        assert_eq!(err.to_string(), "HTML field type \"radio\" is not supported");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: WebformsError = io_err.into();
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().contains("file missing"));
    }
}
