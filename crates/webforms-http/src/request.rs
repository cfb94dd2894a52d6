//! The request collaborator contract.
//!
//! The form layer never talks to a web framework directly. Everything it
//! needs from the current request is behind [`FormRequest`]: the method,
//! submitted body and query string, the session's CSRF token, errors left by
//! a previous validation attempt, route reversal and a localizer.
//! [`SimpleRequest`] is an in-memory implementation suitable for tests and
//! for adapting other frameworks' request types.

use std::collections::BTreeMap;
use std::sync::Arc;

use http::Method;
use webforms_core::i18n::{Localizer, Translator};
use webforms_core::WebformsResult;

use crate::querydict::QueryDict;
use crate::routes::RouteTable;
use crate::session::Session;

/// What the form layer reads from the current HTTP request.
pub trait FormRequest {
    /// Returns the HTTP method.
    fn method(&self) -> &Method;

    /// Returns the submitted form body.
    fn post(&self) -> &QueryDict;

    /// Returns the parsed query string.
    fn query(&self) -> &QueryDict;

    /// Returns query string and body merged, body values last.
    fn params(&self) -> QueryDict {
        let mut params = self.query().clone();
        params.extend(self.post());
        params
    }

    /// Returns the current session.
    fn session(&self) -> &Session;

    /// Returns errors from a previous validation attempt, keyed by field name.
    fn form_errors(&self) -> &BTreeMap<String, String>;

    /// Resolves a named route to a path.
    fn route_path(&self, name: &str, kwargs: &BTreeMap<String, String>) -> WebformsResult<String>;

    /// Returns the translator for this request's language.
    fn localizer(&self) -> &dyn Translator;
}

/// An in-memory [`FormRequest`].
///
/// ```
/// use http::Method;
/// use webforms_http::{FormRequest, SimpleRequest};
///
/// let request = SimpleRequest::builder()
///     .method(Method::POST)
///     .body("username=alice&_at=token")
///     .csrf_token("token")
///     .build();
///
/// assert_eq!(request.post().get("username"), Some("alice"));
/// assert_eq!(request.session().get_csrf_token(), "token");
/// ```
#[derive(Debug, Clone)]
pub struct SimpleRequest {
    method: Method,
    post: QueryDict,
    query: QueryDict,
    session: Session,
    form_errors: BTreeMap<String, String>,
    routes: Arc<RouteTable>,
    localizer: Arc<dyn Translator>,
}

impl SimpleRequest {
    /// Returns a builder for a `GET` request with an empty body.
    pub fn builder() -> SimpleRequestBuilder {
        SimpleRequestBuilder::default()
    }

    /// Records an error message for a field, as a controller does after a
    /// failed validation before re-rendering the form.
    pub fn set_form_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.form_errors.insert(field.into(), message.into());
    }

    /// Replaces the error store with the given mapping.
    pub fn set_form_errors(&mut self, errors: BTreeMap<String, String>) {
        self.form_errors = errors;
    }

    /// Returns a mutable reference to the session.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }
}

impl FormRequest for SimpleRequest {
    fn method(&self) -> &Method {
        &self.method
    }

    fn post(&self) -> &QueryDict {
        &self.post
    }

    fn query(&self) -> &QueryDict {
        &self.query
    }

    fn session(&self) -> &Session {
        &self.session
    }

    fn form_errors(&self) -> &BTreeMap<String, String> {
        &self.form_errors
    }

    fn route_path(&self, name: &str, kwargs: &BTreeMap<String, String>) -> WebformsResult<String> {
        self.routes.reverse(name, kwargs)
    }

    fn localizer(&self) -> &dyn Translator {
        self.localizer.as_ref()
    }
}

/// Builder for [`SimpleRequest`].
#[derive(Debug)]
pub struct SimpleRequestBuilder {
    method: Method,
    post: QueryDict,
    query: QueryDict,
    session: Session,
    form_errors: BTreeMap<String, String>,
    routes: RouteTable,
    shared_routes: Option<Arc<RouteTable>>,
    localizer: Arc<dyn Translator>,
}

impl Default for SimpleRequestBuilder {
    fn default() -> Self {
        Self {
            method: Method::GET,
            post: QueryDict::new(),
            query: QueryDict::new(),
            session: Session::new(),
            form_errors: BTreeMap::new(),
            routes: RouteTable::new(),
            shared_routes: None,
            localizer: Arc::new(Localizer::default()),
        }
    }
}

impl SimpleRequestBuilder {
    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the form-encoded body.
    #[must_use]
    pub fn body(mut self, body: &str) -> Self {
        self.post = QueryDict::parse(body);
        self
    }

    /// Appends one body parameter.
    #[must_use]
    pub fn post_param(mut self, key: &str, value: &str) -> Self {
        self.post.append(key, value);
        self
    }

    /// Sets the query string.
    #[must_use]
    pub fn query_string(mut self, qs: &str) -> Self {
        self.query = QueryDict::parse(qs);
        self
    }

    /// Uses a session whose CSRF token is `token`.
    #[must_use]
    pub fn csrf_token(mut self, token: &str) -> Self {
        self.session = Session::with_csrf_token(token);
        self
    }

    /// Uses the given session.
    #[must_use]
    pub fn session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    /// Records a previous validation error for a field.
    #[must_use]
    pub fn form_error(mut self, field: &str, message: &str) -> Self {
        self.form_errors
            .insert(field.to_string(), message.to_string());
        self
    }

    /// Registers a named route.
    #[must_use]
    pub fn route(mut self, name: &str, pattern: &str) -> Self {
        self.routes.add(name, pattern);
        self
    }

    /// Uses a shared route table; routes added with [`route`](Self::route)
    /// are ignored when one is set.
    #[must_use]
    pub fn routes(mut self, routes: Arc<RouteTable>) -> Self {
        self.shared_routes = Some(routes);
        self
    }

    /// Sets the translator.
    #[must_use]
    pub fn localizer(mut self, localizer: Arc<dyn Translator>) -> Self {
        self.localizer = localizer;
        self
    }

    /// Builds the request.
    pub fn build(self) -> SimpleRequest {
        SimpleRequest {
            method: self.method,
            post: self.post,
            query: self.query,
            session: self.session,
            form_errors: self.form_errors,
            routes: self.shared_routes.unwrap_or_else(|| Arc::new(self.routes)),
            localizer: self.localizer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webforms_core::i18n::catalog;

    #[test]
    fn test_defaults() {
        let request = SimpleRequest::builder().build();
        assert_eq!(request.method(), Method::GET);
        assert!(request.post().is_empty());
        assert!(request.query().is_empty());
        assert!(request.form_errors().is_empty());
    }

    #[test]
    fn test_params_merges_query_then_body() {
        let request = SimpleRequest::builder()
            .method(Method::POST)
            .query_string("page=2&q=rust")
            .body("q=forms")
            .build();
        let params = request.params();
        assert_eq!(params.get("page"), Some("2"));
        assert_eq!(params.get("q"), Some("forms"));
    }

    #[test]
    fn test_post_param() {
        let request = SimpleRequest::builder()
            .post_param("a", "1")
            .post_param("a", "2")
            .build();
        assert_eq!(request.post().get_list("a").map(<[String]>::len), Some(2));
    }

    #[test]
    fn test_form_errors() {
        let mut request = SimpleRequest::builder()
            .form_error("email", "Bad email")
            .build();
        request.set_form_error("name", "Missing");
        assert_eq!(request.form_errors().len(), 2);
    }

    #[test]
    fn test_route_path() {
        let request = SimpleRequest::builder()
            .route("profile", "/u/<name>")
            .build();
        let mut kwargs = BTreeMap::new();
        kwargs.insert("name".to_string(), "ann".to_string());
        assert_eq!(request.route_path("profile", &kwargs).unwrap(), "/u/ann");
    }

    #[test]
    fn test_shared_routes() {
        let mut table = RouteTable::new();
        table.add("home", "/");
        let request = SimpleRequest::builder()
            .routes(Arc::new(table))
            .build();
        assert_eq!(request.route_path("home", &BTreeMap::new()).unwrap(), "/");
    }

    #[test]
    fn test_localizer() {
        catalog::register_translations("request_t1", vec![("Submit", "Valider")]);
        let request = SimpleRequest::builder()
            .localizer(Arc::new(Localizer::new("request_t1")))
            .build();
        assert_eq!(request.localizer().translate("Submit"), "Valider");
    }
}
