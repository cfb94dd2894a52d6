//! Form instances and their rendering.
//!
//! A [`Form`] pairs a shared [`FormType`] with per-render data: field
//! overrides and an optional action URL. It renders in four parts
//! (`attributes`, `fields`, `buttons`, `footer`), each computed at most once
//! per instance and reused by later calls.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;
use webforms_core::logging::form_span;
use webforms_core::settings::TemplateKind;
use webforms_core::{WebformsError, WebformsResult};
use webforms_http::{FormRequest, Method};
use webforms_template::{Context, Markup};

use crate::csrf::CSRF_TOKEN_KEY;
use crate::declaration::Fieldset;
use crate::env::FormEnvironment;
use crate::field::InputField;
use crate::fields::{value_to_attr, FieldData};
use crate::registry::FormType;
use crate::tags;

const FOOTER: &str = "</form>";

/// A renderable part of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Part {
    /// The opening tag and hidden fields.
    Attributes,
    /// The fieldsets.
    Fields,
    /// The submit button, optionally with an alternate link.
    Buttons,
    /// The closing tag.
    Footer,
    /// All four parts wrapped in the `form` template.
    #[default]
    All,
}

impl Part {
    /// Returns the part name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Attributes => "attributes",
            Self::Fields => "fields",
            Self::Buttons => "buttons",
            Self::Footer => "footer",
            Self::All => "all",
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Part {
    type Err = WebformsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "attributes" => Ok(Self::Attributes),
            "fields" => Ok(Self::Fields),
            "buttons" => Ok(Self::Buttons),
            "footer" => Ok(Self::Footer),
            "all" => Ok(Self::All),
            other => Err(WebformsError::ConfigurationError(format!(
                "unknown form part \"{other}\""
            ))),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct PartCache {
    attributes: Option<Markup>,
    fields: Option<Markup>,
    buttons: Option<Markup>,
    footer: Option<Markup>,
}

/// One form instance.
///
/// ```
/// use std::sync::Arc;
///
/// use webforms_forms::declaration::{Declaration, FieldsetItem};
/// use webforms_forms::env::FormEnvironment;
/// use webforms_forms::fields::{FieldData, FieldDecl};
/// use webforms_forms::form::{Form, Part};
/// use webforms_forms::registry::FormType;
/// use webforms_http::{Method, SimpleRequest};
///
/// let search = FormType::declare(
///     None,
///     Declaration::new("Search")
///         .method(Method::GET)
///         .field("q", FieldDecl::text())
///         .fieldsets(vec![vec![FieldsetItem::fields(["q"])]]),
/// )
/// .unwrap();
///
/// let env = FormEnvironment::with_defaults().unwrap();
/// let request = SimpleRequest::builder().build();
/// let mut form = Form::new(Arc::new(search)).with_field("q", FieldData::with_value("rust"));
///
/// let html = form.render(&env, &request, Part::Fields).unwrap();
/// assert!(html.as_str().contains(r#"value="rust""#));
/// ```
#[derive(Debug, Clone)]
pub struct Form {
    form_type: Arc<FormType>,
    data: BTreeMap<String, FieldData>,
    action: Option<String>,
    cache: PartCache,
}

impl Form {
    /// Creates an instance without overrides.
    pub fn new(form_type: Arc<FormType>) -> Self {
        Self {
            form_type,
            data: BTreeMap::new(),
            action: None,
            cache: PartCache::default(),
        }
    }

    /// Creates an instance with field overrides.
    pub fn with_data(form_type: Arc<FormType>, data: BTreeMap<String, FieldData>) -> Self {
        Self {
            data,
            ..Self::new(form_type)
        }
    }

    /// Adds an override for one field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, data: FieldData) -> Self {
        self.data.insert(name.into(), data);
        self
    }

    /// Posts to `url` instead of the form type's configured action.
    #[must_use]
    pub fn with_action(mut self, url: impl Into<String>) -> Self {
        self.action = Some(url.into());
        self
    }

    /// Returns the form type.
    pub fn form_type(&self) -> &Arc<FormType> {
        &self.form_type
    }

    /// Returns the instance data.
    pub fn data(&self) -> &BTreeMap<String, FieldData> {
        &self.data
    }

    /// Renders one part, or the whole form for [`Part::All`].
    ///
    /// The opening tag is always computed so that the session's CSRF token is
    /// captured on the first call. Parts already rendered by this instance
    /// are returned from its cache.
    pub fn render(
        &mut self,
        env: &FormEnvironment,
        request: &dyn FormRequest,
        part: Part,
    ) -> WebformsResult<Markup> {
        let span = form_span(self.form_type.name());
        let _guard = span.enter();

        if self.form_type.params().method == Method::POST {
            let token = request.session().get_csrf_token().to_string();
            self.data
                .entry(CSRF_TOKEN_KEY.to_string())
                .or_default()
                .value = Some(Value::String(token));
        }

        let attributes = self.attributes(request)?;
        match part {
            Part::Attributes => Ok(attributes),
            Part::Fields => self.fields(env, request),
            Part::Buttons => self.buttons(env, request),
            Part::Footer => Ok(self.footer()),
            Part::All => {
                let context = Context::new()
                    .with("attributes", attributes)
                    .with("fields", self.fields(env, request)?)
                    .with("buttons", self.buttons(env, request)?)
                    .with("footer", self.footer());
                env.render(TemplateKind::Form, &context, request)
            }
        }
    }

    fn attributes(&mut self, request: &dyn FormRequest) -> WebformsResult<Markup> {
        if let Some(cached) = &self.cache.attributes {
            tracing::trace!(part = "attributes", "render cache hit");
            return Ok(cached.clone());
        }
        let params = self.form_type.params();
        let action = match (&self.action, &params.action) {
            (Some(action), _) => action.clone(),
            (None, Some(target)) => target.resolve(request)?,
            (None, None) => String::new(),
        };

        let mut attrs: tags::Attrs = params.html5_attrs.clone();
        for (key, value) in [
            ("id", &params.id),
            ("class", &params.class),
            ("style", &params.style),
            ("target", &params.target),
        ] {
            if let Some(value) = value {
                attrs.insert(key.to_string(), value.clone());
            }
        }

        let mut html = tags::form_start(&action, &params.method, params.multipart, attrs);
        for (name, decl) in self.form_type.hidden_fields() {
            let value = self
                .data
                .get(name)
                .and_then(|d| d.value.as_ref())
                .or(decl.value.as_ref())
                .and_then(value_to_attr);
            html.push(&tags::hidden(name, value.as_deref()));
        }

        self.cache.attributes = Some(html.clone());
        Ok(html)
    }

    fn fields(&mut self, env: &FormEnvironment, request: &dyn FormRequest) -> WebformsResult<Markup> {
        if let Some(cached) = &self.cache.fields {
            tracing::trace!(part = "fields", "render cache hit");
            return Ok(cached.clone());
        }
        let mut html = Markup::default();
        for fieldset in &self.form_type.params().fieldsets {
            html.push(&self.fieldset(env, request, fieldset)?);
        }
        self.cache.fields = Some(html.clone());
        Ok(html)
    }

    fn fieldset(
        &self,
        env: &FormEnvironment,
        request: &dyn FormRequest,
        fieldset: &Fieldset,
    ) -> WebformsResult<Markup> {
        let with_tip = self.form_type.params().with_tip;
        let mut fields = Markup::default();
        for name in &fieldset.fields {
            let Some(decl) = self.form_type.field(name) else {
                // Hidden fields are emitted with the form attributes.
                if self.form_type.hidden_fields().contains_key(name) {
                    continue;
                }
                return Err(WebformsError::UnknownField(format!(
                    "fieldset of form \"{}\" names unknown field \"{name}\"",
                    self.form_type.name()
                )));
            };
            let field = InputField::new(name.as_str(), decl, self.data.get(name), with_tip);
            fields.push(&field.render(env, request)?);
        }
        if fields.is_empty() {
            return Ok(Markup::default());
        }
        let context = Context::new()
            .with("caption", fieldset.name.clone().unwrap_or_default())
            .with("optional", fieldset.optional)
            .with("fields", fields);
        env.render(TemplateKind::Fieldset, &context, request)
    }

    fn buttons(&mut self, env: &FormEnvironment, request: &dyn FormRequest) -> WebformsResult<Markup> {
        if let Some(cached) = &self.cache.buttons {
            tracing::trace!(part = "buttons", "render cache hit");
            return Ok(cached.clone());
        }
        let params = self.form_type.params();
        let localizer = request.localizer();
        let submit_text = params
            .submit_text
            .clone()
            .unwrap_or_else(|| localizer.translate("Submit"));

        let html = match &params.alternate_url {
            Some(target) => {
                let context = Context::new()
                    .with("submit_text", submit_text)
                    .with(
                        "or_text",
                        params
                            .or_text
                            .clone()
                            .unwrap_or_else(|| localizer.translate("or")),
                    )
                    .with("alternate_url", target.resolve(request)?)
                    .with("alternate_text", params.alternate_text.as_str());
                env.render(TemplateKind::SubmitAlternate, &context, request)?
            }
            None => {
                let context = Context::new().with("submit_text", submit_text);
                env.render(TemplateKind::Submit, &context, request)?
            }
        };
        self.cache.buttons = Some(html.clone());
        Ok(html)
    }

    fn footer(&mut self) -> Markup {
        self.cache
            .footer
            .get_or_insert_with(|| Markup::new(FOOTER))
            .clone()
    }
}

/// Renders the form-level error banner when the request carries errors from
/// a previous validation attempt, and nothing otherwise.
pub fn form_errors(env: &FormEnvironment, request: &dyn FormRequest) -> WebformsResult<Markup> {
    if request.form_errors().is_empty() {
        return Ok(Markup::default());
    }
    let message = request
        .localizer()
        .translate("Please correct your input parameters.");
    env.render(
        TemplateKind::FormError,
        &Context::new().with("error_message", message),
        request,
    )
}
