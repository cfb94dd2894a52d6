//! HTML tag builders for form controls.
//!
//! Every builder returns [`Markup`] with its attributes sorted by name and
//! their values escaped, so output is deterministic. Boolean attributes
//! (`checked`, `multiple`, `required`, ...) are written as `name="name"`.

use std::collections::BTreeMap;

use webforms_http::Method;
use webforms_template::{escape_html, Markup};

/// Attributes of one tag.
pub type Attrs = BTreeMap<String, String>;

/// Formats attributes as ` key="value"` pairs in key order.
pub fn render_attrs(attrs: &Attrs) -> String {
    attrs
        .iter()
        .map(|(k, v)| format!(r#" {k}="{}""#, escape_html(v)))
        .collect()
}

fn void_tag(tag: &str, attrs: &Attrs) -> Markup {
    Markup::new(format!("<{tag}{} />", render_attrs(attrs)))
}

fn set_opt(attrs: &mut Attrs, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        attrs.insert(key.to_string(), value.to_string());
    }
}

fn set_flag(attrs: &mut Attrs, key: &str, on: bool) {
    if on {
        attrs.insert(key.to_string(), key.to_string());
    } else {
        attrs.remove(key);
    }
}

/// An `<input>` of the given type.
///
/// ```
/// use webforms_forms::tags;
///
/// let html = tags::input("text", "q", Some("a&b"), tags::Attrs::new());
/// assert_eq!(html.as_str(), r#"<input name="q" type="text" value="a&amp;b" />"#);
/// ```
pub fn input(input_type: &str, name: &str, value: Option<&str>, mut attrs: Attrs) -> Markup {
    attrs.insert("type".to_string(), input_type.to_string());
    attrs.insert("name".to_string(), name.to_string());
    set_opt(&mut attrs, "value", value);
    void_tag("input", &attrs)
}

/// A hidden input whose `id` is its name.
pub fn hidden(name: &str, value: Option<&str>) -> Markup {
    let mut attrs = Attrs::new();
    attrs.insert("id".to_string(), name.to_string());
    input("hidden", name, Some(value.unwrap_or_default()), attrs)
}

/// A `<textarea>` with escaped content.
pub fn textarea(name: &str, content: &str, mut attrs: Attrs) -> Markup {
    attrs.insert("name".to_string(), name.to_string());
    Markup::new(format!(
        "<textarea{}>{}</textarea>",
        render_attrs(&attrs),
        escape_html(content)
    ))
}

/// One `<option>` of a select box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// The submitted value.
    pub value: String,
    /// The displayed label.
    pub label: String,
}

impl SelectOption {
    /// Creates an option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A `<select>` with options; every option whose value is in `selected` is
/// marked selected.
pub fn select(
    name: &str,
    selected: &[String],
    options: &[SelectOption],
    multiple: bool,
    mut attrs: Attrs,
) -> Markup {
    attrs.insert("name".to_string(), name.to_string());
    set_flag(&mut attrs, "multiple", multiple);
    let mut html = format!("<select{}>", render_attrs(&attrs));
    for option in options {
        let mut option_attrs = Attrs::new();
        option_attrs.insert("value".to_string(), option.value.clone());
        set_flag(
            &mut option_attrs,
            "selected",
            selected.iter().any(|s| s == &option.value),
        );
        html.push_str(&format!(
            "<option{}>{}</option>",
            render_attrs(&option_attrs),
            escape_html(&option.label)
        ));
    }
    html.push_str("</select>");
    Markup::new(html)
}

/// A checkbox.
pub fn checkbox(name: &str, value: &str, checked: bool, mut attrs: Attrs) -> Markup {
    set_flag(&mut attrs, "checked", checked);
    input("checkbox", name, Some(value), attrs)
}

/// A file input.
pub fn file(name: &str, multiple: bool, mut attrs: Attrs) -> Markup {
    set_flag(&mut attrs, "multiple", multiple);
    input("file", name, None, attrs)
}

/// The opening `<form>` tag.
///
/// Methods other than `GET` and `POST` are submitted as `POST` with a hidden
/// `_method` input naming the real verb.
pub fn form_start(action: &str, method: &Method, multipart: bool, mut attrs: Attrs) -> Markup {
    attrs.insert("action".to_string(), action.to_string());
    if multipart {
        attrs.insert("enctype".to_string(), "multipart/form-data".to_string());
    }
    let tunnelled = *method != Method::GET && *method != Method::POST;
    let method_attr = if *method == Method::GET { "get" } else { "post" };
    attrs.insert("method".to_string(), method_attr.to_string());

    let mut html = format!("<form{}>", render_attrs(&attrs));
    if tunnelled {
        html.push_str(&format!(
            "<div style=\"display:none\">{}</div>",
            input("hidden", "_method", Some(method.as_str()), Attrs::new())
        ));
    }
    Markup::new(html)
}
