//! Rendering of a single field.
//!
//! An [`InputField`] is the merged view of one field for one render: the
//! form's tooltip default, then the declaration, then per-instance
//! overrides. It builds the control for its kind and wraps it in the
//! `field` template together with the label, any previous validation
//! error, the tooltip and extra markup.

use std::collections::BTreeMap;

use serde_json::Value;
use webforms_core::settings::TemplateKind;
use webforms_core::{WebformsError, WebformsResult};
use webforms_http::FormRequest;
use webforms_template::{Context, ContextValue, Markup};

use crate::env::FormEnvironment;
use crate::fields::{value_to_attr, FieldData, FieldDecl, FieldKind};
use crate::tags::{self, Attrs, SelectOption};

const DEFAULT_COLS: &str = "30";
const DEFAULT_ROWS: &str = "7";
const DEFAULT_WRAP: &str = "SOFT";
const DEFAULT_CHECKBOX_VALUE: &str = "1";

/// One field ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct InputField {
    name: String,
    kind: FieldKind,
    value: Option<Value>,
    selected: bool,
    title: String,
    tip: String,
    attrs: BTreeMap<String, Value>,
}

impl InputField {
    /// Merges the form default, the declaration and an optional override.
    pub fn new(
        name: impl Into<String>,
        decl: &FieldDecl,
        data: Option<&FieldData>,
        with_tip: bool,
    ) -> Self {
        let mut attrs = BTreeMap::new();
        attrs.insert("with_tip".to_string(), Value::Bool(with_tip));
        attrs.extend(decl.attrs.clone());

        let mut field = Self {
            name: name.into(),
            kind: decl.kind.clone(),
            value: decl.value.clone(),
            selected: decl.selected,
            title: decl.title.clone(),
            tip: decl.tip.clone(),
            attrs,
        };
        if let Some(data) = data {
            if data.value.is_some() {
                field.value.clone_from(&data.value);
            }
            if let Some(title) = &data.title {
                field.title.clone_from(title);
            }
            if let Some(tip) = &data.tip {
                field.tip.clone_from(tip);
            }
            if let Some(selected) = data.selected {
                field.selected = selected;
            }
            field.attrs.extend(data.attrs.clone());
        }
        field
    }

    /// Returns the field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn attr(&self, key: &str) -> Option<String> {
        self.attrs.get(key).and_then(value_to_attr)
    }

    fn flag(&self, key: &str, default: bool) -> bool {
        match self.attrs.get(key) {
            None => default,
            Some(Value::Bool(b)) => *b,
            Some(Value::Null) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n.abs() > f64::EPSILON),
            Some(_) => true,
        }
    }

    fn value_str(&self) -> Option<String> {
        self.value.as_ref().and_then(value_to_attr)
    }

    fn base_attrs(&self) -> Attrs {
        let mut attrs = Attrs::new();
        if let Some(id) = self.attr("id") {
            attrs.insert("id".to_string(), id);
        }
        let mut class = self.attr("class").unwrap_or_default();
        if self.flag("with_tip", true) && !self.tip.is_empty() {
            if !class.is_empty() {
                class.push(' ');
            }
            class.push_str("with-tip");
        }
        if !class.is_empty() {
            attrs.insert("class".to_string(), class);
        }
        attrs
    }

    fn copy_attrs(&self, attrs: &mut Attrs, keys: &[&str]) {
        for key in keys {
            if let Some(value) = self.attr(key) {
                attrs.insert((*key).to_string(), value);
            }
        }
    }

    fn set_required(&self, attrs: &mut Attrs) {
        if self.flag("required", false) {
            attrs.insert("required".to_string(), "required".to_string());
        }
    }

    fn merge_html5_attrs(&self, attrs: &mut Attrs) {
        if let Some(Value::Object(extra)) = self.attrs.get("html5_attrs") {
            for (key, value) in extra {
                if let Some(value) = value_to_attr(value) {
                    attrs.insert(key.clone(), value);
                }
            }
        }
    }

    fn selected_values(&self) -> Vec<String> {
        match &self.value {
            Some(Value::Array(items)) => items.iter().filter_map(value_to_attr).collect(),
            Some(value) => value_to_attr(value).into_iter().collect(),
            None => Vec::new(),
        }
    }

    fn options(&self) -> Vec<SelectOption> {
        let Some(Value::Array(items)) = self.attrs.get("options") else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(|item| match item {
                Value::Array(pair) => {
                    let value = pair.first().and_then(value_to_attr)?;
                    let label = pair
                        .get(1)
                        .and_then(value_to_attr)
                        .unwrap_or_else(|| value.clone());
                    Some(SelectOption::new(value, label))
                }
                Value::Object(map) => {
                    let value = map.get("value").and_then(value_to_attr)?;
                    let label = map
                        .get("label")
                        .and_then(value_to_attr)
                        .unwrap_or_else(|| value.clone());
                    Some(SelectOption::new(value, label))
                }
                other => value_to_attr(other).map(|v| SelectOption::new(v.clone(), v)),
            })
            .collect()
    }

    /// Builds the bare control.
    pub fn control(&self) -> WebformsResult<Markup> {
        let mut attrs = self.base_attrs();
        let html = match &self.kind {
            FieldKind::Html => Markup::new(self.value_str().unwrap_or_default()),
            FieldKind::Text | FieldKind::Date | FieldKind::Password => {
                self.copy_attrs(&mut attrs, &["size", "maxlength"]);
                self.set_required(&mut attrs);
                self.merge_html5_attrs(&mut attrs);
                tags::input(
                    self.kind.as_str(),
                    &self.name,
                    self.value_str().as_deref(),
                    attrs,
                )
            }
            FieldKind::Textarea => {
                attrs.insert(
                    "cols".to_string(),
                    self.attr("cols").unwrap_or_else(|| DEFAULT_COLS.to_string()),
                );
                attrs.insert(
                    "rows".to_string(),
                    self.attr("rows").unwrap_or_else(|| DEFAULT_ROWS.to_string()),
                );
                attrs.insert(
                    "wrap".to_string(),
                    self.attr("wrap").unwrap_or_else(|| DEFAULT_WRAP.to_string()),
                );
                self.set_required(&mut attrs);
                self.merge_html5_attrs(&mut attrs);
                let content = self.value_str().unwrap_or_default();
                tags::textarea(&self.name, &content, attrs)
            }
            FieldKind::Select => {
                self.merge_html5_attrs(&mut attrs);
                tags::select(
                    &self.name,
                    &self.selected_values(),
                    &self.options(),
                    self.flag("multiple", false),
                    attrs,
                )
            }
            FieldKind::Checkbox => {
                self.merge_html5_attrs(&mut attrs);
                let value = self
                    .value_str()
                    .unwrap_or_else(|| DEFAULT_CHECKBOX_VALUE.to_string());
                tags::checkbox(&self.name, &value, self.selected, attrs)
            }
            FieldKind::File => {
                self.merge_html5_attrs(&mut attrs);
                tags::file(&self.name, self.flag("multiple", false), attrs)
            }
            FieldKind::Hidden => {
                attrs.remove("class");
                attrs
                    .entry("id".to_string())
                    .or_insert_with(|| self.name.clone());
                let value = self.value_str().unwrap_or_default();
                tags::input("hidden", &self.name, Some(&value), attrs)
            }
            FieldKind::Other(kind) => {
                return Err(WebformsError::UnsupportedFieldType(kind.clone()));
            }
        };
        Ok(html)
    }

    /// Renders the field through the `field` template, or the bare control
    /// when `input_only` is set.
    pub fn render(
        &self,
        env: &FormEnvironment,
        request: &dyn FormRequest,
    ) -> WebformsResult<Markup> {
        let input = self.control()?;
        if self.flag("input_only", false) {
            return Ok(input);
        }

        let error_message = match request.form_errors().get(&self.name) {
            Some(error) if !error.is_empty() => field_error(env, request, error)?,
            _ => Markup::default(),
        };
        let tip = tooltip(env, request, &self.tip, self.flag("tip_escape", true))?;
        let extras = Markup::new(self.attr("extra_html").unwrap_or_default());

        let context = Context::new()
            .with("name", self.name.as_str())
            .with("title", self.title.as_str())
            .with("error_message", error_message)
            .with("input", input)
            .with("tip", tip)
            .with("extras", extras);
        env.render(TemplateKind::Field, &context, request)
    }
}

/// Renders a tooltip; an empty tip renders nothing.
pub fn tooltip(
    env: &FormEnvironment,
    request: &dyn FormRequest,
    tip: &str,
    escape: bool,
) -> WebformsResult<Markup> {
    if tip.is_empty() {
        return Ok(Markup::default());
    }
    let tip = if escape {
        ContextValue::from(tip)
    } else {
        ContextValue::from(Markup::new(tip))
    };
    env.render(
        TemplateKind::Tooltip,
        &Context::new().with("tip", tip),
        request,
    )
}

/// Renders an inline error message with the localized "Error" label.
pub fn field_error(
    env: &FormEnvironment,
    request: &dyn FormRequest,
    error: &str,
) -> WebformsResult<Markup> {
    let context = Context::new()
        .with("label", request.localizer().translate("Error"))
        .with("text", error);
    env.render(TemplateKind::FieldError, &context, request)
}
