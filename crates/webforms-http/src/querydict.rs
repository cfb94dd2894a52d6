//! Multi-value dictionary for submitted form data and query strings.
//!
//! Keys keep every submitted value in order; [`QueryDict::get`] returns the
//! last one, which is what single-valued validators consume.

use std::collections::BTreeMap;

/// A dictionary of form-encoded parameters.
///
/// # Examples
///
/// ```
/// use webforms_http::QueryDict;
///
/// let qd = QueryDict::parse("tag=rust&tag=web&name=J%C3%BCrgen+B");
/// assert_eq!(qd.get("tag"), Some("web"));
/// assert_eq!(qd.get_list("tag"), Some(&["rust".to_string(), "web".to_string()][..]));
/// assert_eq!(qd.get("name"), Some("Jürgen B"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryDict {
    data: BTreeMap<String, Vec<String>>,
}

impl QueryDict {
    /// Creates an empty `QueryDict`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a form-encoded string (`key1=val1&key2=val2`).
    pub fn parse(query_string: &str) -> Self {
        let mut qd = Self::new();
        for pair in query_string.split('&') {
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            qd.append(percent_decode(key), percent_decode(value));
        }
        qd
    }

    /// Builds a `QueryDict` from `(key, value)` pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut qd = Self::new();
        for (key, value) in pairs {
            qd.append(key, value);
        }
        qd
    }

    /// Returns the last value for the given key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data
            .get(key)
            .and_then(|values| values.last())
            .map(String::as_str)
    }

    /// Returns all values for the given key.
    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        self.data.get(key).map(Vec::as_slice)
    }

    /// Replaces every value for `key` with a single value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.insert(key.into(), vec![value.into()]);
    }

    /// Appends a value to the list for `key`.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.entry(key.into()).or_default().push(value.into());
    }

    /// Appends every value of `other` after the values already present.
    pub fn extend(&mut self, other: &Self) {
        for (key, values) in &other.data {
            self.data
                .entry(key.clone())
                .or_default()
                .extend(values.iter().cloned());
        }
    }

    /// Encodes this dictionary as a form-encoded string, keys in sorted order.
    pub fn urlencode(&self) -> String {
        self.iter()
            .map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if no key is present.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Returns an iterator over the keys, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    /// Returns an iterator over every `(key, value)` pair.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.data.iter().flat_map(|(key, values)| {
            values
                .iter()
                .map(move |value| (key.as_str(), value.as_str()))
        })
    }
}

/// Decodes a form-encoded component (`+` is a space).
fn percent_decode(input: &str) -> String {
    let plus_decoded = input.replace('+', " ");
    percent_encoding::percent_decode_str(&plus_decoded)
        .decode_utf8_lossy()
        .into_owned()
}

fn percent_encode(input: &str) -> String {
    percent_encoding::utf8_percent_encode(input, percent_encoding::NON_ALPHANUMERIC).to_string()
}
