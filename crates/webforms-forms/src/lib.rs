//! # webforms-forms
//!
//! Declarative form types for server-rendered pages. A [`Declaration`]
//! lists fields, fieldsets, validators and presentation options; compiling
//! it with [`FormType::declare`] merges it over a parent type, applies field
//! filters, wires the CSRF token field for POST forms and builds a shared
//! validation [`Schema`]. A [`Form`] instance renders the type to HTML
//! through the configured templates, caching each part it produces.
//!
//! ## Modules
//!
//! - [`fields`] - Field kinds, declarations and per-instance overrides
//! - [`declaration`] - Fieldsets, URL targets, form parameters and declarations
//! - [`registry`] - Compiled form types and validation entry point
//! - [`schema`] - Validator traits, validation state and schemas
//! - [`validators`] - Reference validators
//! - [`csrf`] - CSRF token field, validator and view guard
//! - [`tags`] - HTML tag builders
//! - [`field`] - Single-field rendering
//! - [`form`] - Form instances and part rendering
//! - [`env`] - Settings plus renderer

pub mod csrf;
pub mod declaration;
pub mod env;
pub mod field;
pub mod fields;
pub mod form;
pub mod registry;
pub mod schema;
pub mod tags;
pub mod validators;

pub use csrf::{authenticate_form, authenticated_form, ViewFunction, CSRF_TOKEN_KEY};
pub use declaration::{Declaration, Fieldset, FieldsetItem, FormParams, Param, UrlTarget};
pub use env::FormEnvironment;
pub use field::InputField;
pub use fields::{FieldData, FieldDecl, FieldKind};
pub use form::{form_errors, Form, Part};
pub use registry::FormType;
pub use schema::{ChainedValidator, CleanedData, Schema, ValidationState, Validator};
