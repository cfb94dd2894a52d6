//! # webforms-template
//!
//! The template side of the form layer: the [`TemplateRenderer`] contract,
//! template [`Context`] values, [`Markup`] for already-rendered HTML, and
//! [`TeraRenderer`], which ships the default template for each fragment kind.

pub mod builtin;
pub mod context;
pub mod renderer;

pub use builtin::TeraRenderer;
pub use context::{escape_html, Context, ContextValue, Markup};
pub use renderer::TemplateRenderer;
