//! Popup Studio - live authoring of promotional popup templates
//!
//! This library provides a template catalog, a JSON configuration parser,
//! a render engine with an error boundary, stylesheet assembly and a
//! debounced edit session that keeps preview and code output in lockstep.
//!
//! # Example
//!
//! ```rust
//! use popup_studio::config::parse_config;
//! use popup_studio::renderer::render;
//! use popup_studio::stylesheet::StyleMode;
//! use popup_studio::template::builtin_catalog;
//!
//! let catalog = builtin_catalog(StyleMode::Inline);
//! let template = catalog.get(catalog.find("free coins v2").unwrap()).unwrap();
//! let config = parse_config(r#"{"title": "Hello", "cta": {"text": "Claim"}}"#).unwrap();
//! let markup = render(template, &config).unwrap();
//! assert!(markup.contains("Hello"));
//! ```

pub mod config;
pub mod error;
pub mod interaction;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod stylesheet;
pub mod template;

pub use config::{parse_config, ConfigValue};
pub use error::{ConfigParseError, StudioError};
pub use renderer::{format_export, render, ExportOptions, Preview, RenderError};
pub use session::{EditSession, EditState, SessionError, SessionEvent, SessionHandle};
pub use settings::StudioSettings;
pub use stylesheet::{ExternalSheet, StyleMode, StylesheetAssembler};
pub use template::{builtin_catalog, Template, TemplateCatalog};

/// Open an edit session on the built-in catalog
///
/// Loads the external base sheet named by the settings (falling back to a
/// placeholder if it cannot be read) and selects the start template.
pub async fn open_session(settings: &StudioSettings) -> Result<EditSession, StudioError> {
    let external = ExternalSheet::load(&settings.sheet_source).await;
    let catalog = builtin_catalog(settings.style_mode);
    let session = EditSession::new(catalog, StylesheetAssembler::new(external), settings)?;
    Ok(session)
}
