//! Render engine: template + configuration to markup

use thiserror::Error;

use crate::config::ConfigValue;
use crate::template::Template;

/// A template's render logic faulted on an otherwise valid configuration
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("render error in '{template}': {message}")]
pub struct RenderError {
    template: String,
    message: String,
}

impl RenderError {
    pub fn template(&self) -> &str {
        &self.template
    }

    /// The fault's own message, as shown in the preview notice
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Render a template with a configuration
///
/// Faults raised by the template are converted into a [`RenderError`] here;
/// the engine keeps no state between calls.
pub fn render(template: &Template, config: &ConfigValue) -> Result<String, RenderError> {
    (template.render_fn())(config).map_err(|fault| RenderError {
        template: template.name().to_string(),
        message: fault.to_string(),
    })
}

/// Result of rendering the current configuration, as shown to the author
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    Markup(String),
    Failed(RenderError),
}

impl Preview {
    pub fn from_result(result: Result<String, RenderError>) -> Self {
        match result {
            Ok(markup) => Preview::Markup(markup),
            Err(err) => Preview::Failed(err),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Preview::Failed(_))
    }

    pub fn error(&self) -> Option<&RenderError> {
        match self {
            Preview::Failed(err) => Some(err),
            Preview::Markup(_) => None,
        }
    }

    /// Markup for the live preview surface, or a fallback notice
    pub fn preview_html(&self) -> String {
        match self {
            Preview::Markup(markup) => markup.clone(),
            Preview::Failed(err) => format!(
                r#"<p style="color:#fca5a5;font-size:13px;">Render error: {}</p>"#,
                escape_html(err.message())
            ),
        }
    }

    /// Markup for the code output, or a commented placeholder
    pub fn code_markup(&self) -> String {
        match self {
            Preview::Markup(markup) => markup.clone(),
            Preview::Failed(err) => format!("<!-- Render error: {} -->", err.message()),
        }
    }
}

/// Escape text for safe inclusion in HTML content
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
