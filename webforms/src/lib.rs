//! # webforms
//!
//! Declarative forms for server-rendered web applications: declare a form
//! type once, validate submissions against its compiled schema and render it
//! to HTML with CSRF protection, error messages and tooltips.
//!
//! This is the meta-crate that re-exports the sub-crates and provides
//! [`include`], the registration entry point that builds a
//! [`FormEnvironment`](forms::FormEnvironment) from settings.
//!
//! ```
//! use std::sync::Arc;
//!
//! use webforms::prelude::*;
//!
//! let env = webforms::include(WebformsSettings::default()).unwrap();
//!
//! let login = FormType::declare(
//!     None,
//!     Declaration::new("Login")
//!         .field("username", FieldDecl::text().title("Username").validator(UnicodeString::new().not_empty()))
//!         .field("password", FieldDecl::password().title("Password").validator(UnicodeString::new().not_empty()))
//!         .fieldsets(vec![vec![FieldsetItem::fields(["username", "password"])]]),
//! )
//! .unwrap();
//!
//! let request = SimpleRequest::builder().csrf_token("t0k3n").build();
//! let mut form = Form::new(Arc::new(login));
//! let html = form.render(&env, &request, Part::All).unwrap();
//! assert!(html.as_str().contains(r#"name="_at""#));
//! ```

use std::sync::Arc;

use webforms_core::i18n::catalog;
use webforms_core::{WebformsResult, WebformsSettings};
use webforms_forms::FormEnvironment;
use webforms_template::TeraRenderer;

/// Core types, settings, logging and i18n.
pub use webforms_core as core;

/// Request, session, routing and response collaborators.
pub use webforms_http as http;

/// Template contract, context values and the tera-backed renderer.
pub use webforms_template as template;

/// Declarations, form types, validation, CSRF and rendering.
pub use webforms_forms as forms;

/// Builds the form environment for an application.
///
/// Loads every `<lang>.json` catalog from `settings.locale_dirs`, registers
/// the built-in templates plus any `.html` files under
/// `settings.template_dirs`, and returns an environment using them.
pub fn include(settings: WebformsSettings) -> WebformsResult<FormEnvironment> {
    for dir in &settings.locale_dirs {
        let languages = catalog::load_dir(dir)?;
        tracing::debug!(dir = %dir.display(), ?languages, "loaded translation directory");
    }
    let renderer = TeraRenderer::with_template_dirs(&settings.template_dirs)?;
    tracing::info!(
        language = %settings.language_code,
        template_dirs = settings.template_dirs.len(),
        "webforms configured"
    );
    Ok(FormEnvironment::new(settings, Arc::new(renderer)))
}

/// The commonly used types in one import.
pub mod prelude {
    pub use webforms_core::settings::TemplateKind;
    pub use webforms_core::{ValidationError, WebformsError, WebformsResult, WebformsSettings};
    pub use webforms_forms::csrf::{authenticate_form, authenticated_form, CSRF_TOKEN_KEY};
    pub use webforms_forms::validators::{
        Bool, DateConverter, Email, FieldsMatch, Int, OneOf, UnicodeString,
    };
    pub use webforms_forms::{
        form_errors, ChainedValidator, Declaration, FieldData, FieldDecl, FieldKind,
        FieldsetItem, Form, FormEnvironment, FormType, Param, Part, UrlTarget, ValidationState,
        Validator,
    };
    pub use webforms_http::{FormRequest, HttpResponse, Method, SimpleRequest};
    pub use webforms_template::{Markup, TemplateRenderer};
}
