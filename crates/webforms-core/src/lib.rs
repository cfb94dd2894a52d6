//! # webforms-core
//!
//! Core types shared by every webforms crate.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Settings and template id configuration
//! - [`settings_loader`] - Loading settings from TOML/JSON and the environment
//! - [`logging`] - Tracing-based logging integration
//! - [`i18n`] - Translator contract and translation catalog

pub mod error;
pub mod i18n;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{ValidationError, WebformsError, WebformsResult, NON_FIELD_ERRORS};
pub use i18n::{Localizer, NullTranslator, Translator};
pub use settings::{TemplateKind, WebformsSettings};
