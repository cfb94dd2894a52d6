//! Cross-site request forgery protection.
//!
//! Every POST form type carries a hidden [`CSRF_TOKEN_KEY`] field whose value
//! is the session's token at render time. On submission the
//! [`CsrfTokenValidator`] compares the submitted value with the session
//! token; [`authenticate_form`] applies the same check in front of a view.

use std::sync::Arc;

use serde_json::Value;
use webforms_core::ValidationError;
use webforms_http::{FormRequest, HttpResponse};

use crate::fields::FieldDecl;
use crate::schema::{ValidationState, Validator};
use crate::validators::UnicodeString;

/// Name of the hidden field carrying the CSRF token.
pub const CSRF_TOKEN_KEY: &str = "_at";

/// Body of the 403 response sent when a submission is not authenticated.
pub const CSRF_DETECTED_MESSAGE: &str = "Cross-site request forgery detected, request denied. \
See http://en.wikipedia.org/wiki/Cross-site_request_forgery for more information.";

/// A view that handles one request.
pub type ViewFunction = Box<dyn Fn(&dyn FormRequest) -> HttpResponse + Send + Sync>;

/// Checks the submitted token against the session token.
#[derive(Debug, Clone)]
pub struct CsrfTokenValidator {
    inner: UnicodeString,
}

impl Default for CsrfTokenValidator {
    fn default() -> Self {
        Self {
            inner: UnicodeString::new().not_empty().strip(),
        }
    }
}

impl Validator for CsrfTokenValidator {
    fn clean(
        &self,
        raw: Option<&str>,
        state: &ValidationState<'_>,
    ) -> Result<Value, ValidationError> {
        let submitted = self.inner.check(raw, state)?;
        if submitted != state.request().session().get_csrf_token() {
            tracing::warn!("CSRF token mismatch");
            return Err(ValidationError::new(
                state.translate("Invalid CSRF token."),
                "csrf",
            ));
        }
        Ok(Value::from(submitted))
    }
}

/// The hidden field added to every POST form type.
pub fn csrf_token_field() -> FieldDecl {
    FieldDecl::hidden("").validator_arc(Arc::new(CsrfTokenValidator::default()))
}

/// Returns `true` when the request body carries the session's token.
pub fn authenticated_form(request: &dyn FormRequest) -> bool {
    request
        .post()
        .get(CSRF_TOKEN_KEY)
        .is_some_and(|token| token == request.session().get_csrf_token())
}

/// Wraps a view so that submissions without a valid token are refused.
///
/// Requests with an empty body reach the view untouched. Anything else must
/// pass [`authenticated_form`], or a 403 response carrying
/// [`CSRF_DETECTED_MESSAGE`] is returned without running the view.
///
/// ```
/// use webforms_forms::csrf::{authenticate_form, ViewFunction};
/// use webforms_http::{HttpResponse, Method, SimpleRequest, StatusCode};
///
/// let view: ViewFunction = Box::new(|_| HttpResponse::ok("saved"));
/// let view = authenticate_form(view);
///
/// let forged = SimpleRequest::builder()
///     .method(Method::POST)
///     .body("name=x&_at=guess")
///     .csrf_token("secret")
///     .build();
/// assert_eq!(view(&forged).status(), StatusCode::FORBIDDEN);
/// ```
pub fn authenticate_form(view: ViewFunction) -> ViewFunction {
    Box::new(move |request: &dyn FormRequest| {
        if request.post().is_empty() || authenticated_form(request) {
            return view(request);
        }
        tracing::warn!(method = %request.method(), "CSRF check failed, request denied");
        HttpResponse::forbidden(CSRF_DETECTED_MESSAGE)
    })
}
