//! Template system for promotional popups
//!
//! A template pairs a default configuration with a pure render function and
//! a stylesheet policy. Templates live in an ordered [`TemplateCatalog`]
//! that is read-only once built.
//!
//! # Example
//!
//! ```rust
//! use popup_studio::config::ConfigValue;
//! use popup_studio::template::{RenderFault, Template, TemplateCatalog};
//!
//! fn banner(config: &ConfigValue) -> Result<String, RenderFault> {
//!     Ok(format!("<h1>{}</h1>", config.require_text("title")?))
//! }
//!
//! let template = Template::new(
//!     "Banner",
//!     ConfigValue::map([("title", ConfigValue::str("Hello"))]),
//!     banner,
//! );
//! let catalog = TemplateCatalog::new(vec![template]).unwrap();
//! assert_eq!(catalog.list()[0].name, "Banner");
//! ```

mod catalog;
mod popups;

pub use catalog::{CatalogEntry, CatalogError, RenderFault, RenderFn, Template, TemplateCatalog};
pub use popups::{builtin_catalog, CLAIM_RESET};
