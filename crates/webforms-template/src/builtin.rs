//! Tera-backed renderer shipping the default form templates.
//!
//! Every [`TemplateKind`] has a built-in template registered under its
//! default id (`webforms/<kind>.html`). Applications override a fragment
//! either by registering a template under the same id or by pointing the
//! settings at a different id they provide.
//!
//! Plain-text context values are escaped before they reach tera and
//! pre-rendered [`Markup`](crate::Markup) is passed through, so tera's own
//! autoescaping is switched off.

use std::path::{Path, PathBuf};

use webforms_core::settings::TemplateKind;
use webforms_core::{WebformsError, WebformsResult};
use webforms_http::FormRequest;

use crate::context::Context;
use crate::renderer::TemplateRenderer;

const FORM: &str = "{{ attributes }}\n{{ fields }}\n<div class=\"form-buttons\">{{ buttons }}</div>\n{{ footer }}";

const FIELDSET: &str = "<fieldset>{% if caption %}<legend>{{ caption }}</legend>{% endif %}{{ fields }}</fieldset>";

const FIELD: &str = "<div class=\"field\" id=\"field-{{ name }}\">\
{% if title %}<label for=\"{{ name }}\">{{ title }}</label>{% endif %}\
{{ error_message }}{{ input }}{{ tip }}{{ extras }}</div>";

const FIELD_ERROR: &str = "<span class=\"field-error\"><strong>{{ label }}:</strong> {{ text }}</span>";

const FORM_ERROR: &str = "<div class=\"form-error\">{{ error_message }}</div>";

const TOOLTIP: &str = "<span class=\"tip\">{{ tip }}</span>";

const SUBMIT: &str = "<input type=\"submit\" value=\"{{ submit_text }}\" />";

const SUBMIT_ALTERNATE: &str = "<input type=\"submit\" value=\"{{ submit_text }}\" /> \
<span class=\"or\">{{ or_text }}</span> <a href=\"{{ alternate_url }}\">{{ alternate_text }}</a>";

/// Returns the built-in template source for a kind.
pub const fn builtin_source(kind: TemplateKind) -> &'static str {
    match kind {
        TemplateKind::Form => FORM,
        TemplateKind::Fieldset => FIELDSET,
        TemplateKind::Field => FIELD,
        TemplateKind::FieldError => FIELD_ERROR,
        TemplateKind::FormError => FORM_ERROR,
        TemplateKind::Tooltip => TOOLTIP,
        TemplateKind::Submit => SUBMIT,
        TemplateKind::SubmitAlternate => SUBMIT_ALTERNATE,
    }
}

/// A [`TemplateRenderer`] backed by a [`tera::Tera`] instance.
///
/// ```
/// use webforms_http::SimpleRequest;
/// use webforms_template::{Context, TemplateRenderer, TeraRenderer};
///
/// let renderer = TeraRenderer::new().unwrap();
/// let request = SimpleRequest::builder().build();
/// let ctx = Context::new().with("tip", "a < b");
///
/// let html = renderer.render("webforms/tooltip.html", &ctx, &request).unwrap();
/// assert_eq!(html, "<span class=\"tip\">a &lt; b</span>");
/// ```
#[derive(Debug)]
pub struct TeraRenderer {
    tera: tera::Tera,
}

impl TeraRenderer {
    /// Creates a renderer holding the built-in templates.
    pub fn new() -> WebformsResult<Self> {
        let mut tera = tera::Tera::default();
        tera.autoescape_on(vec![]);
        let builtins: Vec<(String, &str)> = TemplateKind::ALL
            .iter()
            .map(|kind| (kind.default_id(), builtin_source(*kind)))
            .collect();
        tera.add_raw_templates(builtins).map_err(template_error)?;
        Ok(Self { tera })
    }

    /// Creates a renderer holding the built-in templates plus every `.html`
    /// file below the given directories, registered under its path relative
    /// to the directory. Files shadow built-ins with the same id.
    pub fn with_template_dirs(dirs: &[PathBuf]) -> WebformsResult<Self> {
        let mut renderer = Self::new()?;
        for dir in dirs {
            renderer.load_dir(dir)?;
        }
        Ok(renderer)
    }

    /// Registers (or replaces) a template from source.
    pub fn add_template(&mut self, id: &str, source: &str) -> WebformsResult<()> {
        self.tera
            .add_raw_template(id, source)
            .map_err(template_error)
    }

    /// Returns `true` if a template with this id is registered.
    pub fn has_template(&self, id: &str) -> bool {
        self.tera.get_template_names().any(|name| name == id)
    }

    fn load_dir(&mut self, dir: &Path) -> WebformsResult<()> {
        let mut files = Vec::new();
        collect_templates(dir, dir, &mut files)?;
        for (path, id) in files {
            tracing::debug!(template = %id, path = %path.display(), "registering template file");
            self.tera
                .add_template_file(&path, Some(&id))
                .map_err(template_error)?;
        }
        Ok(())
    }
}

impl TemplateRenderer for TeraRenderer {
    fn render(
        &self,
        template_id: &str,
        context: &Context,
        _request: &dyn FormRequest,
    ) -> WebformsResult<String> {
        let mut tera_ctx = tera::Context::new();
        for (key, value) in context.iter() {
            tera_ctx.insert(key, &value.to_escaped_json());
        }
        tracing::trace!(template = template_id, "rendering template");
        self.tera
            .render(template_id, &tera_ctx)
            .map_err(template_error)
    }
}

fn collect_templates(
    root: &Path,
    dir: &Path,
    out: &mut Vec<(PathBuf, String)>,
) -> WebformsResult<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_templates(root, &path, out)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("html") {
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let id = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            out.push((path, id));
        }
    }
    Ok(())
}

fn template_error(err: tera::Error) -> WebformsError {
    if let tera::ErrorKind::TemplateNotFound(name) = &err.kind {
        return WebformsError::TemplateDoesNotExist(name.clone());
    }
    let mut message = err.to_string();
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    WebformsError::TemplateError(message)
}
