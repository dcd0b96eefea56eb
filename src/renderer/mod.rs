//! Rendering of templates into markup and code output
//!
//! This module runs a template's render function behind an error boundary
//! and combines the result with the assembled stylesheet into the export
//! payload.

pub mod config;
pub mod engine;
pub mod export;

pub use config::{ExportOptions, DEFAULT_FONT_URL};
pub use engine::{escape_html, render, Preview, RenderError};
pub use export::format_export;
