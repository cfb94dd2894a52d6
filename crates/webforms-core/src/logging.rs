//! Logging integration.
//!
//! Configures a [`tracing`] subscriber from [`WebformsSettings`]. The form
//! layer itself only emits events; installing a subscriber is left to the
//! host application, which may call [`setup_logging`] or bring its own.

use crate::settings::WebformsSettings;

/// Installs the global tracing subscriber based on the given settings.
///
/// The filter is read from `settings.log_level`. Debug mode uses a pretty,
/// human-readable format; otherwise a structured JSON format is used. If a
/// subscriber is already installed this is a no-op.
pub fn setup_logging(settings: &WebformsSettings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a span covering the rendering of one form instance.
///
/// ```
/// use webforms_core::logging::form_span;
///
/// let span = form_span("Login");
/// let _guard = span.enter();
/// tracing::debug!("rendering");
/// ```
pub fn form_span(form_name: &str) -> tracing::Span {
    tracing::debug_span!("form", name = form_name)
}
