//! The render-call contract.
//!
//! The form layer hands every fragment it produces to a [`TemplateRenderer`]
//! together with a template id taken from settings. Ids are never
//! interpreted by the form layer; a renderer maps them to whatever template
//! source it manages.

use std::sync::Arc;

use webforms_core::WebformsResult;
use webforms_http::FormRequest;

use crate::context::Context;

/// Renders a template id with a context for the current request.
pub trait TemplateRenderer: Send + Sync {
    /// Renders `template_id` and returns the resulting HTML.
    fn render(
        &self,
        template_id: &str,
        context: &Context,
        request: &dyn FormRequest,
    ) -> WebformsResult<String>;
}

impl<T: TemplateRenderer + ?Sized> TemplateRenderer for Arc<T> {
    fn render(
        &self,
        template_id: &str,
        context: &Context,
        request: &dyn FormRequest,
    ) -> WebformsResult<String> {
        (**self).render(template_id, context, request)
    }
}

impl<T: TemplateRenderer + ?Sized> TemplateRenderer for Box<T> {
    fn render(
        &self,
        template_id: &str,
        context: &Context,
        request: &dyn FormRequest,
    ) -> WebformsResult<String> {
        (**self).render(template_id, context, request)
    }
}
