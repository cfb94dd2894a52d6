//! A minimal HTTP response, enough for views wrapped by form decorators.

use http::StatusCode;

/// An HTTP response with a text body.
///
/// ```
/// use webforms_http::HttpResponse;
///
/// let response = HttpResponse::forbidden("nope");
/// assert_eq!(response.status(), http::StatusCode::FORBIDDEN);
/// assert_eq!(response.body(), "nope");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    status: StatusCode,
    content_type: String,
    body: String,
}

impl HttpResponse {
    /// Creates a new `text/html` response.
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/html; charset=utf-8".to_string(),
            body: body.into(),
        }
    }

    /// Creates a 200 OK response.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, body)
    }

    /// Creates a 403 Forbidden response.
    pub fn forbidden(body: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, body)
    }

    /// Sets the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Returns the status code.
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the content type.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Returns the body.
    pub fn body(&self) -> &str {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok() {
        let response = HttpResponse::ok("<p>hi</p>");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.content_type(), "text/html; charset=utf-8");
    }

    #[test]
    fn test_content_type_override() {
        let response = HttpResponse::ok("{}").with_content_type("application/json");
        assert_eq!(response.content_type(), "application/json");
    }
}
