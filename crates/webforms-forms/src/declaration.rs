//! Form declarations.
//!
//! A [`Declaration`] is what a developer writes to define a form type: a
//! list of named field declarations and a list of form parameters. It is
//! compiled into a [`FormType`](crate::registry::FormType) on top of an
//! optional parent.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use webforms_core::WebformsResult;
use webforms_http::{FormRequest, Method};

use crate::fields::FieldDecl;
use crate::schema::ChainedValidator;

/// A named group of fields rendered together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fieldset {
    /// The caption, if any.
    pub name: Option<String>,
    /// Whether the group is marked optional.
    pub optional: bool,
    /// Field names in render order.
    pub fields: Vec<String>,
}

/// One item of a fieldset description, in any order.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldsetItem {
    /// The caption.
    Caption(String),
    /// `"optional"` marks the fieldset optional; any other marker does not.
    Marker(String),
    /// Field names.
    Fields(Vec<String>),
    /// Anything else; skipped.
    Other(Value),
}

impl FieldsetItem {
    /// A caption item.
    pub fn caption(caption: impl Into<String>) -> Self {
        Self::Caption(caption.into())
    }

    /// A field-list item.
    pub fn fields<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self::Fields(names.into_iter().map(Into::into).collect())
    }

    /// The `"optional"` marker.
    pub fn optional() -> Self {
        Self::Marker("optional".to_string())
    }

    /// The `"required"` marker.
    pub fn required() -> Self {
        Self::Marker("required".to_string())
    }
}

/// Builds fieldsets from heterogeneous item lists.
///
/// Later items of the same kind win. Unrecognized items are ignored.
///
/// ```
/// use webforms_forms::declaration::{compose_fieldsets, FieldsetItem};
///
/// let fieldsets = compose_fieldsets(vec![vec![
///     FieldsetItem::fields(["email", "phone"]),
///     FieldsetItem::optional(),
///     FieldsetItem::caption("Contact"),
/// ]]);
///
/// assert_eq!(fieldsets[0].name.as_deref(), Some("Contact"));
/// assert!(fieldsets[0].optional);
/// assert_eq!(fieldsets[0].fields, vec!["email", "phone"]);
/// ```
pub fn compose_fieldsets(items: Vec<Vec<FieldsetItem>>) -> Vec<Fieldset> {
    items
        .into_iter()
        .map(|group| {
            let mut fieldset = Fieldset::default();
            for item in group {
                match item {
                    FieldsetItem::Caption(name) => fieldset.name = Some(name),
                    FieldsetItem::Marker(marker) => fieldset.optional = marker == "optional",
                    FieldsetItem::Fields(fields) => fieldset.fields = fields,
                    FieldsetItem::Other(_) => {}
                }
            }
            fieldset
        })
        .collect()
}

/// Where a URL comes from: a literal string or a named route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlTarget {
    /// Used as given.
    Literal(String),
    /// Resolved through the request's route table.
    Route {
        /// Route name.
        name: String,
        /// Values for the route's placeholders.
        kwargs: BTreeMap<String, String>,
    },
}

impl UrlTarget {
    /// A literal URL.
    pub fn literal(url: impl Into<String>) -> Self {
        Self::Literal(url.into())
    }

    /// A named route without arguments.
    pub fn route(name: impl Into<String>) -> Self {
        Self::Route {
            name: name.into(),
            kwargs: BTreeMap::new(),
        }
    }

    /// Adds a route argument. Has no effect on literals.
    #[must_use]
    pub fn arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Self::Route { kwargs, .. } = &mut self {
            kwargs.insert(key.into(), value.into());
        }
        self
    }

    /// Resolves to a path for the current request.
    pub fn resolve(&self, request: &dyn FormRequest) -> WebformsResult<String> {
        match self {
            Self::Literal(url) => Ok(url.clone()),
            Self::Route { name, kwargs } => request.route_path(name, kwargs),
        }
    }
}

/// Form-level parameters.
///
/// Subtypes receive an independent copy; validators are shared through
/// `Arc` and never mutated.
#[derive(Debug, Clone)]
pub struct FormParams {
    /// Submission method.
    pub method: Method,
    /// Action URL; `None` posts back to the same view.
    pub action: Option<UrlTarget>,
    /// Fieldsets in render order.
    pub fieldsets: Vec<Fieldset>,
    /// Names to remove while compiling; always empty on a compiled type.
    pub filter: Vec<String>,
    /// Whole-form validators.
    pub chained_validators: Vec<Arc<dyn ChainedValidator>>,
    /// `id` of the form tag.
    pub id: Option<String>,
    /// `class` of the form tag.
    pub class: Option<String>,
    /// `style` of the form tag.
    pub style: Option<String>,
    /// `target` of the form tag.
    pub target: Option<String>,
    /// Sends `enctype="multipart/form-data"`.
    pub multipart: bool,
    /// Extra attributes of the form tag.
    pub html5_attrs: BTreeMap<String, String>,
    /// Submit button label; localized "Submit" when unset.
    pub submit_text: Option<String>,
    /// Text between submit button and alternate link; localized "or" when
    /// unset.
    pub or_text: Option<String>,
    /// Alternate link shown next to the submit button.
    pub alternate_url: Option<UrlTarget>,
    /// Alternate link text.
    pub alternate_text: String,
    /// Default tooltip display for fields.
    pub with_tip: bool,
    /// Free-form parameters for custom templates and subtypes.
    pub extra: BTreeMap<String, Value>,
}

impl Default for FormParams {
    fn default() -> Self {
        Self {
            method: Method::POST,
            action: None,
            fieldsets: Vec::new(),
            filter: Vec::new(),
            chained_validators: Vec::new(),
            id: None,
            class: None,
            style: None,
            target: None,
            multipart: false,
            html5_attrs: BTreeMap::new(),
            submit_text: None,
            or_text: None,
            alternate_url: None,
            alternate_text: String::new(),
            with_tip: true,
            extra: BTreeMap::new(),
        }
    }
}

/// One declared form parameter.
#[derive(Debug, Clone)]
pub enum Param {
    Method(Method),
    Action(UrlTarget),
    /// Replaces the fieldsets; each inner list is composed with
    /// [`compose_fieldsets`].
    Fieldsets(Vec<Vec<FieldsetItem>>),
    /// Removes inherited fields by name.
    Filter(Vec<String>),
    /// Replaces the whole-form validators, inherited ones included.
    ChainedValidators(Vec<Arc<dyn ChainedValidator>>),
    /// Appends whole-form validators to the inherited ones.
    AddChainedValidators(Vec<Arc<dyn ChainedValidator>>),
    Id(String),
    Class(String),
    Style(String),
    Target(String),
    Multipart(bool),
    Html5Attrs(BTreeMap<String, String>),
    SubmitText(String),
    OrText(String),
    AlternateUrl(UrlTarget),
    AlternateText(String),
    WithTip(bool),
    Extra(String, Value),
}

impl Param {
    /// Applies this parameter.
    pub(crate) fn apply(self, params: &mut FormParams) {
        match self {
            Self::Method(method) => params.method = method,
            Self::Action(action) => params.action = Some(action),
            Self::Fieldsets(items) => params.fieldsets = compose_fieldsets(items),
            Self::Filter(names) => params.filter = names,
            Self::ChainedValidators(validators) => params.chained_validators = validators,
            Self::AddChainedValidators(validators) => params.chained_validators.extend(validators),
            Self::Id(id) => params.id = Some(id),
            Self::Class(class) => params.class = Some(class),
            Self::Style(style) => params.style = Some(style),
            Self::Target(target) => params.target = Some(target),
            Self::Multipart(multipart) => params.multipart = multipart,
            Self::Html5Attrs(attrs) => params.html5_attrs = attrs,
            Self::SubmitText(text) => params.submit_text = Some(text),
            Self::OrText(text) => params.or_text = Some(text),
            Self::AlternateUrl(url) => params.alternate_url = Some(url),
            Self::AlternateText(text) => params.alternate_text = text,
            Self::WithTip(with_tip) => params.with_tip = with_tip,
            Self::Extra(key, value) => {
                params.extra.insert(key, value);
            }
        }
    }
}

/// The declaration of a form type.
///
/// ```
/// use webforms_forms::declaration::{Declaration, FieldsetItem};
/// use webforms_forms::fields::FieldDecl;
/// use webforms_forms::validators::UnicodeString;
///
/// let login = Declaration::new("Login")
///     .field("username", FieldDecl::text().validator(UnicodeString::new().not_empty()))
///     .field("password", FieldDecl::password().validator(UnicodeString::new().not_empty()))
///     .fieldsets(vec![vec![FieldsetItem::fields(["username", "password"])]]);
///
/// assert_eq!(login.name(), "Login");
/// ```
#[derive(Debug, Clone)]
pub struct Declaration {
    name: String,
    fields: Vec<(String, FieldDecl)>,
    params: Vec<Param>,
}

impl Declaration {
    /// Starts a declaration for a form type named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            params: Vec::new(),
        }
    }

    /// Returns the form type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declares (or re-declares) a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, decl: FieldDecl) -> Self {
        self.fields.push((name.into(), decl));
        self
    }

    /// Declares a parameter.
    #[must_use]
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Sets the submission method.
    #[must_use]
    pub fn method(self, method: Method) -> Self {
        self.param(Param::Method(method))
    }

    /// Sets the action.
    #[must_use]
    pub fn action(self, action: UrlTarget) -> Self {
        self.param(Param::Action(action))
    }

    /// Sets the fieldsets.
    #[must_use]
    pub fn fieldsets(self, fieldsets: Vec<Vec<FieldsetItem>>) -> Self {
        self.param(Param::Fieldsets(fieldsets))
    }

    /// Removes inherited fields.
    #[must_use]
    pub fn filter<S: Into<String>>(self, names: impl IntoIterator<Item = S>) -> Self {
        self.param(Param::Filter(names.into_iter().map(Into::into).collect()))
    }

    /// Adds a whole-form validator after those inherited from the parent.
    ///
    /// Use [`Param::ChainedValidators`] to replace the inherited list.
    #[must_use]
    pub fn chained_validator(mut self, validator: impl ChainedValidator + 'static) -> Self {
        let validator: Arc<dyn ChainedValidator> = Arc::new(validator);
        let existing = self.params.iter_mut().rev().find_map(|p| match p {
            Param::AddChainedValidators(list) => Some(list),
            _ => None,
        });
        match existing {
            Some(list) => list.push(validator),
            None => self.params.push(Param::AddChainedValidators(vec![validator])),
        }
        self
    }

    pub(crate) fn into_parts(self) -> (String, Vec<(String, FieldDecl)>, Vec<Param>) {
        (self.name, self.fields, self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::FieldsMatch;
    use webforms_http::SimpleRequest;

    #[test]
    fn test_compose_any_order() {
        let sets = compose_fieldsets(vec![
            vec![FieldsetItem::caption("A"), FieldsetItem::fields(["x"])],
            vec![FieldsetItem::fields(["y", "z"]), FieldsetItem::required()],
        ]);
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].name.as_deref(), Some("A"));
        assert!(!sets[0].optional);
        assert_eq!(sets[1].name, None);
        assert_eq!(sets[1].fields, vec!["y", "z"]);
    }

    #[test]
    fn test_compose_unknown_marker_is_not_optional() {
        let sets = compose_fieldsets(vec![vec![
            FieldsetItem::Marker("maybe".into()),
            FieldsetItem::Other(serde_json::json!(42)),
        ]]);
        assert!(!sets[0].optional);
        assert!(sets[0].fields.is_empty());
    }

    #[test]
    fn test_url_target_resolve() {
        let request = SimpleRequest::builder()
            .route("user", "/users/<id>")
            .build();
        assert_eq!(
            UrlTarget::literal("/x").resolve(&request).unwrap(),
            "/x"
        );
        assert_eq!(
            UrlTarget::route("user").arg("id", "7").resolve(&request).unwrap(),
            "/users/7"
        );
        assert!(UrlTarget::route("missing").resolve(&request).is_err());
    }

    #[test]
    fn test_param_apply() {
        let mut params = FormParams::default();
        Param::Method(Method::GET).apply(&mut params);
        Param::Extra("layout".into(), Value::from("wide")).apply(&mut params);
        Param::WithTip(false).apply(&mut params);
        assert_eq!(params.method, Method::GET);
        assert_eq!(params.extra.get("layout"), Some(&Value::from("wide")));
        assert!(!params.with_tip);
    }

    #[test]
    fn test_chained_validators_accumulate() {
        let decl = Declaration::new("Signup")
            .chained_validator(FieldsMatch::new(["a", "b"]))
            .chained_validator(FieldsMatch::new(["c", "d"]));
        let (_, _, params) = decl.into_parts();
        assert_eq!(params.len(), 1);
        let Param::AddChainedValidators(list) = &params[0] else {
            panic!("expected chained validators");
        };
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_chained_validators_append_and_replace() {
        let mut params = FormParams::default();
        Param::AddChainedValidators(vec![Arc::new(FieldsMatch::new(["a", "b"]))])
            .apply(&mut params);
        Param::AddChainedValidators(vec![Arc::new(FieldsMatch::new(["c", "d"]))])
            .apply(&mut params);
        assert_eq!(params.chained_validators.len(), 2);

        Param::ChainedValidators(vec![Arc::new(FieldsMatch::new(["e", "f"]))])
            .apply(&mut params);
        assert_eq!(params.chained_validators.len(), 1);
    }
}
