//! Named routes and reverse URL resolution.
//!
//! Route patterns use `<name>` or `<converter:name>` placeholders, e.g.
//! `/users/<int:id>/edit`. Reversing substitutes percent-encoded keyword
//! arguments by name; keywords the pattern does not mention are ignored.

use std::collections::BTreeMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use webforms_core::{WebformsError, WebformsResult};

/// Characters escaped in a substituted path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A table of named route patterns.
///
/// ```
/// use std::collections::BTreeMap;
/// use webforms_http::RouteTable;
///
/// let mut routes = RouteTable::new();
/// routes.add("user_edit", "/users/<int:id>/edit");
///
/// let mut kwargs = BTreeMap::new();
/// kwargs.insert("id".to_string(), "42".to_string());
/// assert_eq!(routes.reverse("user_edit", &kwargs).unwrap(), "/users/42/edit");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: BTreeMap<String, String>,
}

impl RouteTable {
    /// Creates an empty route table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a named route pattern.
    pub fn add(&mut self, name: impl Into<String>, pattern: impl Into<String>) -> &mut Self {
        self.routes.insert(name.into(), pattern.into());
        self
    }

    /// Returns `true` if a route with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    /// Generates the path for a named route.
    pub fn reverse(&self, name: &str, kwargs: &BTreeMap<String, String>) -> WebformsResult<String> {
        let pattern = self
            .routes
            .get(name)
            .ok_or_else(|| WebformsError::NoReverseMatch(name.to_string()))?;
        let path = substitute_pattern(pattern, kwargs)?;
        if path.starts_with('/') {
            Ok(path)
        } else {
            Ok(format!("/{path}"))
        }
    }
}

/// Replaces `<type:name>` placeholders with encoded values from `kwargs`.
fn substitute_pattern(route: &str, kwargs: &BTreeMap<String, String>) -> WebformsResult<String> {
    let mut result = String::new();
    let mut remaining = route;

    while let Some(start) = remaining.find('<') {
        result.push_str(&remaining[..start]);

        let end = remaining[start..].find('>').ok_or_else(|| {
            WebformsError::ImproperlyConfigured(format!(
                "Unclosed angle bracket in route pattern: {route}"
            ))
        })? + start;

        let inner = &remaining[start + 1..end];
        let param = inner.split_once(':').map_or(inner, |(_, name)| name);

        let value = kwargs.get(param).ok_or_else(|| {
            WebformsError::NoReverseMatch(format!(
                "{route} (no value provided for parameter '{param}')"
            ))
        })?;
        result.extend(utf8_percent_encode(value, PATH_SEGMENT));

        remaining = &remaining[end + 1..];
    }

    result.push_str(remaining);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kwargs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_reverse_static() {
        let mut routes = RouteTable::new();
        routes.add("login", "/login");
        assert_eq!(routes.reverse("login", &BTreeMap::new()).unwrap(), "/login");
    }

    #[test]
    fn test_reverse_adds_leading_slash() {
        let mut routes = RouteTable::new();
        routes.add("home", "home/");
        assert_eq!(routes.reverse("home", &BTreeMap::new()).unwrap(), "/home/");
    }

    #[test]
    fn test_reverse_with_kwargs() {
        let mut routes = RouteTable::new();
        routes.add("post", "/blog/<slug>/<int:page>");
        let path = routes
            .reverse("post", &kwargs(&[("slug", "hello"), ("page", "2"), ("extra", "x")]))
            .unwrap();
        assert_eq!(path, "/blog/hello/2");
    }

    #[test]
    fn test_reverse_encodes_values() {
        let mut routes = RouteTable::new();
        routes.add("search", "/search/<term>");
        let path = routes
            .reverse("search", &kwargs(&[("term", "a b/c?d")]))
            .unwrap();
        assert_eq!(path, "/search/a%20b%2Fc%3Fd");
    }

    #[test]
    fn test_reverse_missing_kwarg() {
        let mut routes = RouteTable::new();
        routes.add("post", "/blog/<slug>");
        let err = routes.reverse("post", &BTreeMap::new()).unwrap_err();
        assert!(matches!(err, WebformsError::NoReverseMatch(_)));
    }

    #[test]
    fn test_reverse_unknown_route() {
        let routes = RouteTable::new();
        let err = routes.reverse("nope", &BTreeMap::new()).unwrap_err();
        assert_eq!(err.to_string(), "Reverse for 'nope' not found");
    }

    #[test]
    fn test_unclosed_placeholder() {
        let mut routes = RouteTable::new();
        routes.add("bad", "/x/<id");
        let err = routes.reverse("bad", &kwargs(&[("id", "1")])).unwrap_err();
        assert!(err.is_configuration_error());
    }
}
