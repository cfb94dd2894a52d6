//! The rendering environment shared by all forms of an application.

use std::sync::Arc;

use webforms_core::settings::TemplateKind;
use webforms_core::{WebformsResult, WebformsSettings};
use webforms_http::FormRequest;
use webforms_template::{Context, Markup, TemplateRenderer, TeraRenderer};

/// Settings plus the renderer every fragment goes through.
#[derive(Clone)]
pub struct FormEnvironment {
    settings: Arc<WebformsSettings>,
    renderer: Arc<dyn TemplateRenderer>,
}

impl FormEnvironment {
    /// Creates an environment.
    pub fn new(settings: WebformsSettings, renderer: Arc<dyn TemplateRenderer>) -> Self {
        Self {
            settings: Arc::new(settings),
            renderer,
        }
    }

    /// Creates an environment with default settings and the built-in
    /// templates.
    pub fn with_defaults() -> WebformsResult<Self> {
        Ok(Self::new(
            WebformsSettings::default(),
            Arc::new(TeraRenderer::new()?),
        ))
    }

    /// Returns the settings.
    pub fn settings(&self) -> &WebformsSettings {
        &self.settings
    }

    /// Returns the renderer.
    pub fn renderer(&self) -> &Arc<dyn TemplateRenderer> {
        &self.renderer
    }

    /// Renders the template configured for `kind`.
    pub fn render(
        &self,
        kind: TemplateKind,
        context: &Context,
        request: &dyn FormRequest,
    ) -> WebformsResult<Markup> {
        let template_id = self.settings.template_id(kind);
        tracing::trace!(kind = %kind, template = template_id, "rendering fragment");
        self.renderer
            .render(template_id, context, request)
            .map(Markup::new)
    }
}

impl std::fmt::Debug for FormEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormEnvironment")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
