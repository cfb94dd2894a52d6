//! Values passed to templates and already-rendered markup.
//!
//! [`Markup`] is HTML that must be emitted verbatim. A plain
//! [`ContextValue::String`] is text and is escaped by the renderer, while
//! [`ContextValue::Markup`] is inserted as-is. Rendered fragments flow from
//! one template into the next as `Markup`, so nothing gets escaped twice.

use std::collections::BTreeMap;
use std::fmt;

/// Escapes HTML special characters in a string.
///
/// Replaces `&`, `<`, `>`, `"`, and `'` with their HTML entity equivalents.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// A string of HTML that is safe to emit without escaping.
///
/// ```
/// use webforms_template::Markup;
///
/// let text = Markup::escape("<b>bold</b>");
/// assert_eq!(text.as_str(), "&lt;b&gt;bold&lt;/b&gt;");
///
/// let joined: Markup = vec![Markup::new("<p>"), text, Markup::new("</p>")]
///     .into_iter()
///     .collect();
/// assert_eq!(joined.as_str(), "<p>&lt;b&gt;bold&lt;/b&gt;</p>");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Markup(String);

impl Markup {
    /// Wraps a string that is already valid HTML.
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    /// Escapes plain text into markup.
    pub fn escape(text: &str) -> Self {
        Self(escape_html(text))
    }

    /// Returns the HTML as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the markup and returns the HTML string.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns `true` if there is no HTML.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends more markup.
    pub fn push(&mut self, other: &Self) {
        self.0.push_str(&other.0);
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromIterator<Self> for Markup {
    fn from_iter<I: IntoIterator<Item = Self>>(iter: I) -> Self {
        let mut out = Self::default();
        for part in iter {
            out.push(&part);
        }
        out
    }
}

impl AsRef<str> for Markup {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A dynamic value in a template context.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextValue {
    /// Plain text, escaped on output.
    String(String),
    /// Pre-rendered HTML, emitted verbatim.
    Markup(Markup),
    /// A boolean flag.
    Bool(bool),
    /// A 64-bit integer.
    Integer(i64),
    /// An ordered list of values.
    List(Vec<ContextValue>),
    /// A nested mapping.
    Dict(BTreeMap<String, ContextValue>),
    /// The absence of a value.
    None,
}

impl ContextValue {
    /// Returns `true` if this value is truthy in template conditionals.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::None => false,
            Self::Bool(b) => *b,
            Self::Integer(i) => *i != 0,
            Self::String(s) => !s.is_empty(),
            Self::Markup(m) => !m.is_empty(),
            Self::List(l) => !l.is_empty(),
            Self::Dict(d) => !d.is_empty(),
        }
    }

    /// Returns the value as markup, escaping plain text.
    pub fn to_markup(&self) -> Markup {
        match self {
            Self::String(s) => Markup::escape(s),
            Self::Markup(m) => m.clone(),
            Self::Bool(b) => Markup::new(b.to_string()),
            Self::Integer(i) => Markup::new(i.to_string()),
            Self::List(items) => items.iter().map(Self::to_markup).collect(),
            Self::Dict(_) | Self::None => Markup::default(),
        }
    }

    /// Converts to JSON for renderers that take serde values. Plain text is
    /// escaped here so the renderer can emit every string verbatim.
    pub fn to_escaped_json(&self) -> serde_json::Value {
        match self {
            Self::String(s) => serde_json::Value::String(escape_html(s)),
            Self::Markup(m) => serde_json::Value::String(m.as_str().to_string()),
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Integer(i) => serde_json::Value::from(*i),
            Self::List(items) => {
                serde_json::Value::Array(items.iter().map(Self::to_escaped_json).collect())
            }
            Self::Dict(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_escaped_json()))
                    .collect(),
            ),
            Self::None => serde_json::Value::Null,
        }
    }
}

impl From<&str> for ContextValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Markup> for ContextValue {
    fn from(m: Markup) -> Self {
        Self::Markup(m)
    }
}

impl From<bool> for ContextValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for ContextValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

/// The variables handed to one template render call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    values: BTreeMap<String, ContextValue>,
}

impl Context {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a variable.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ContextValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Sets a variable and returns the context, for chained construction.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Returns a variable.
    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.values.get(key)
    }

    /// Iterates over the variables in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContextValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of variables.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the context has no variables.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_markup_is_not_escaped_again() {
        let value = ContextValue::from(Markup::new("<br />"));
        assert_eq!(value.to_markup().as_str(), "<br />");
        assert_eq!(value.to_escaped_json(), serde_json::json!("<br />"));
    }

    #[test]
    fn test_plain_string_is_escaped() {
        let value = ContextValue::from("<br />");
        assert_eq!(value.to_markup().as_str(), "&lt;br /&gt;");
        assert_eq!(value.to_escaped_json(), serde_json::json!("&lt;br /&gt;"));
    }

    #[test]
    fn test_truthiness() {
        assert!(!ContextValue::None.is_truthy());
        assert!(!ContextValue::from("").is_truthy());
        assert!(!ContextValue::from(Markup::default()).is_truthy());
        assert!(ContextValue::from("x").is_truthy());
        assert!(ContextValue::from(true).is_truthy());
        assert!(!ContextValue::from(0_i64).is_truthy());
    }

    #[test]
    fn test_nested_json() {
        let mut dict = BTreeMap::new();
        dict.insert("a".to_string(), ContextValue::from("<"));
        let value = ContextValue::List(vec![ContextValue::Dict(dict), ContextValue::None]);
        assert_eq!(
            value.to_escaped_json(),
            serde_json::json!([{"a": "&lt;"}, null])
        );
    }

    #[test]
    fn test_context_with() {
        let ctx = Context::new().with("title", "Name").with("required", true);
        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx.get("title"), Some(&ContextValue::from("Name")));
        let keys: Vec<_> = ctx.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["required", "title"]);
    }

    #[test]
    fn test_markup_collect() {
        let parts = vec![Markup::new("a"), Markup::new("b")];
        let joined: Markup = parts.into_iter().collect();
        assert_eq!(joined.to_string(), "ab");
    }
}
