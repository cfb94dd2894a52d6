//! Field declarations.
//!
//! A [`FieldDecl`] describes one named entry of a form type: the control
//! kind, its default value, an optional validator and presentation options.
//! Per-instance overrides are expressed with [`FieldData`] and merged over
//! the declaration when the field is rendered.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::Validator;

/// The kind of control a field renders as.
///
/// Unknown control names are kept as [`FieldKind::Other`]; they are accepted
/// when a form type is declared and rejected when the field is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    /// Raw markup taken from the field value.
    Html,
    /// `<input type="text">`.
    Text,
    /// `<input type="password">`.
    Password,
    /// `<textarea>`.
    Textarea,
    /// `<select>`.
    Select,
    /// `<input type="checkbox">`.
    Checkbox,
    /// `<input type="file">`.
    File,
    /// `<input type="date">`.
    Date,
    /// `<input type="hidden">`, rendered with the form's opening tag.
    Hidden,
    /// Any other control name.
    Other(String),
}

impl FieldKind {
    /// Parses a control name.
    pub fn parse(name: &str) -> Self {
        match name {
            "html" => Self::Html,
            "text" => Self::Text,
            "password" => Self::Password,
            "textarea" => Self::Textarea,
            "select" => Self::Select,
            "checkbox" => Self::Checkbox,
            "file" => Self::File,
            "date" => Self::Date,
            "hidden" => Self::Hidden,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the control name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Html => "html",
            Self::Text => "text",
            Self::Password => "password",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Checkbox => "checkbox",
            Self::File => "file",
            Self::Date => "date",
            Self::Hidden => "hidden",
            Self::Other(name) => name,
        }
    }

    /// Returns `true` for fields that go with the opening form tag instead
    /// of a fieldset.
    pub const fn is_hidden(&self) -> bool {
        matches!(self, Self::Hidden)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for FieldKind {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl From<String> for FieldKind {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Renders a JSON scalar the way it appears in an HTML attribute.
///
/// Returns `None` for `null` and `false`, which suppress the attribute.
pub fn value_to_attr(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some(String::new()),
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

/// The declaration of one form field.
///
/// ```
/// use webforms_forms::fields::{FieldDecl, FieldKind};
///
/// let field = FieldDecl::text()
///     .title("Username")
///     .tip("Letters and digits only")
///     .attr("maxlength", 32);
///
/// assert_eq!(field.kind, FieldKind::Text);
/// assert_eq!(field.title, "Username");
/// assert!(field.validator.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct FieldDecl {
    /// The control kind.
    pub kind: FieldKind,
    /// The default value.
    pub value: Option<Value>,
    /// The validator wired into the form type's schema. Fields without one
    /// are render-only.
    pub validator: Option<Arc<dyn Validator>>,
    /// The label.
    pub title: String,
    /// Tooltip text.
    pub tip: String,
    /// Checked state for checkboxes.
    pub selected: bool,
    /// Presentation attributes (`class`, `id`, `size`, `options`,
    /// `html5_attrs`, `extra_html`, `tip_escape`, ...).
    pub attrs: BTreeMap<String, Value>,
}

impl FieldDecl {
    /// Creates a declaration of the given kind with no value or validator.
    pub fn new(kind: impl Into<FieldKind>) -> Self {
        Self {
            kind: kind.into(),
            value: None,
            validator: None,
            title: String::new(),
            tip: String::new(),
            selected: false,
            attrs: BTreeMap::new(),
        }
    }

    /// A raw markup field.
    pub fn html(markup: impl Into<String>) -> Self {
        Self::new(FieldKind::Html).value(markup.into())
    }

    /// A text input.
    pub fn text() -> Self {
        Self::new(FieldKind::Text)
    }

    /// A password input.
    pub fn password() -> Self {
        Self::new(FieldKind::Password)
    }

    /// A textarea.
    pub fn textarea() -> Self {
        Self::new(FieldKind::Textarea)
    }

    /// A select box with `(value, label)` options.
    pub fn select<V, L>(options: impl IntoIterator<Item = (V, L)>) -> Self
    where
        V: Into<String>,
        L: Into<String>,
    {
        let options: Vec<Value> = options
            .into_iter()
            .map(|(value, label)| {
                Value::Array(vec![
                    Value::String(value.into()),
                    Value::String(label.into()),
                ])
            })
            .collect();
        Self::new(FieldKind::Select).attr("options", Value::Array(options))
    }

    /// A checkbox.
    pub fn checkbox() -> Self {
        Self::new(FieldKind::Checkbox)
    }

    /// A file input.
    pub fn file() -> Self {
        Self::new(FieldKind::File)
    }

    /// A date input.
    pub fn date() -> Self {
        Self::new(FieldKind::Date)
    }

    /// A hidden input with a default value.
    pub fn hidden(value: impl Into<Value>) -> Self {
        Self::new(FieldKind::Hidden).value(value)
    }

    /// Sets the default value.
    #[must_use]
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the validator.
    #[must_use]
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Sets a shared validator.
    #[must_use]
    pub fn validator_arc(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Sets the label.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the tooltip.
    #[must_use]
    pub fn tip(mut self, tip: impl Into<String>) -> Self {
        self.tip = tip.into();
        self
    }

    /// Sets the checked state.
    #[must_use]
    pub const fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Sets the HTML `required` flag on the control.
    #[must_use]
    pub fn required(self, required: bool) -> Self {
        self.attr("required", required)
    }

    /// Sets the `class` attribute.
    #[must_use]
    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class.into())
    }

    /// Sets the `id` attribute.
    #[must_use]
    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id.into())
    }

    /// Adds an extra HTML5 attribute to the control.
    #[must_use]
    pub fn html5_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let entry = self
            .attrs
            .entry("html5_attrs".to_string())
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
        if let Value::Object(map) = entry {
            map.insert(key.into(), Value::String(value.into()));
        }
        self
    }

    /// Sets a presentation attribute.
    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }
}

/// Per-instance overrides for one field.
///
/// Any member left unset falls back to the declaration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldData {
    /// Overrides the value.
    pub value: Option<Value>,
    /// Overrides the label.
    pub title: Option<String>,
    /// Overrides the tooltip.
    pub tip: Option<String>,
    /// Overrides the checked state.
    pub selected: Option<bool>,
    /// Overrides individual presentation attributes.
    pub attrs: BTreeMap<String, Value>,
}

impl FieldData {
    /// Creates an empty override.
    pub fn new() -> Self {
        Self::default()
    }

    /// An override carrying only a value.
    pub fn with_value(value: impl Into<Value>) -> Self {
        Self::new().value(value)
    }

    /// Sets the value.
    #[must_use]
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the label.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the tooltip.
    #[must_use]
    pub fn tip(mut self, tip: impl Into<String>) -> Self {
        self.tip = Some(tip.into());
        self
    }

    /// Sets the checked state.
    #[must_use]
    pub const fn selected(mut self, selected: bool) -> Self {
        self.selected = Some(selected);
        self
    }

    /// Sets a presentation attribute.
    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }
}
