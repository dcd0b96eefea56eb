//! Template catalog: the ordered, read-only set of popup templates

use thiserror::Error;

use crate::config::{ConfigValue, FieldError};
use crate::interaction::InteractionDescriptor;
use crate::renderer;
use crate::stylesheet::StylesheetSpec;

/// A fault raised by a template's own render logic
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RenderFault {
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("{0}")]
    Message(String),
}

/// Render function of a template: configuration in, markup out
///
/// Must be pure: the same configuration always yields the same markup.
pub type RenderFn = fn(&ConfigValue) -> Result<String, RenderFault>;

/// Errors that can occur during catalog operations
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// Index does not name a template
    #[error("template index {index} out of range (catalog has {len} templates)")]
    OutOfRange { index: usize, len: usize },

    /// No template with the given name
    #[error("template not found: {name}")]
    NotFound { name: String },

    /// Catalog built without templates
    #[error("catalog must contain at least one template")]
    Empty,

    /// Two templates share a name
    #[error("duplicate template name: {name}")]
    Duplicate { name: String },

    /// A template's default configuration does not render
    #[error("default configuration of template '{name}' does not render: {message}")]
    DefaultNotRenderable { name: String, message: String },
}

/// A named pairing of default configuration, render function and stylesheet
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    default_config: ConfigValue,
    render: RenderFn,
    stylesheet: StylesheetSpec,
    interactions: Vec<InteractionDescriptor>,
}

impl Template {
    /// Create a template using the shared external stylesheet
    pub fn new(name: impl Into<String>, default_config: ConfigValue, render: RenderFn) -> Self {
        Self {
            name: name.into(),
            default_config,
            render,
            stylesheet: StylesheetSpec::ExternalBase,
            interactions: Vec::new(),
        }
    }

    /// Set the stylesheet composition policy
    pub fn with_stylesheet(mut self, stylesheet: StylesheetSpec) -> Self {
        self.stylesheet = stylesheet;
        self
    }

    /// Declare an interactive element of the rendered markup
    pub fn with_interaction(mut self, descriptor: InteractionDescriptor) -> Self {
        self.interactions.push(descriptor);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The catalog's default configuration, never handed out for mutation
    pub fn default_config(&self) -> &ConfigValue {
        &self.default_config
    }

    /// A deep, independent copy of the default configuration
    pub fn fresh_config(&self) -> ConfigValue {
        self.default_config.clone()
    }

    pub fn stylesheet(&self) -> &StylesheetSpec {
        &self.stylesheet
    }

    pub fn interactions(&self) -> &[InteractionDescriptor] {
        &self.interactions
    }

    pub(crate) fn render_fn(&self) -> RenderFn {
        self.render
    }
}

/// One row of the template selection surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub index: usize,
    pub name: String,
}

/// Ordered collection of templates
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
}

impl TemplateCatalog {
    /// Build a catalog, checking that every default configuration renders
    pub fn new(templates: Vec<Template>) -> Result<Self, CatalogError> {
        if templates.is_empty() {
            return Err(CatalogError::Empty);
        }

        for (i, template) in templates.iter().enumerate() {
            if templates[..i].iter().any(|t| t.name == template.name) {
                return Err(CatalogError::Duplicate {
                    name: template.name.clone(),
                });
            }
            if let Err(err) = renderer::render(template, &template.default_config) {
                return Err(CatalogError::DefaultNotRenderable {
                    name: template.name.clone(),
                    message: err.message().to_string(),
                });
            }
        }

        Ok(Self { templates })
    }

    /// Index and display name of every template, in catalog order
    pub fn list(&self) -> Vec<CatalogEntry> {
        self.templates
            .iter()
            .enumerate()
            .map(|(index, t)| CatalogEntry {
                index,
                name: t.name.clone(),
            })
            .collect()
    }

    /// Get a template by position
    pub fn get(&self, index: usize) -> Result<&Template, CatalogError> {
        self.templates.get(index).ok_or(CatalogError::OutOfRange {
            index,
            len: self.templates.len(),
        })
    }

    /// Find a template by display name (case-insensitive)
    pub fn find(&self, name: &str) -> Result<usize, CatalogError> {
        self.templates
            .iter()
            .position(|t| t.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| CatalogError::NotFound {
                name: name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn greeting(config: &ConfigValue) -> Result<String, RenderFault> {
        Ok(format!("<p>{}</p>", config.require_text("text")?))
    }

    fn broken(_config: &ConfigValue) -> Result<String, RenderFault> {
        Err(RenderFault::Message("always fails".to_string()))
    }

    fn greeting_template(name: &str) -> Template {
        Template::new(
            name,
            ConfigValue::map([("text", ConfigValue::str("hi"))]),
            greeting,
        )
    }

    #[test]
    fn test_list_is_ordered() {
        let catalog =
            TemplateCatalog::new(vec![greeting_template("B"), greeting_template("A")]).unwrap();
        assert_eq!(
            catalog.list(),
            vec![
                CatalogEntry {
                    index: 0,
                    name: "B".to_string()
                },
                CatalogEntry {
                    index: 1,
                    name: "A".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_get_out_of_range() {
        let catalog = TemplateCatalog::new(vec![greeting_template("A")]).unwrap();
        assert!(catalog.get(0).is_ok());
        assert_eq!(
            catalog.get(3).unwrap_err(),
            CatalogError::OutOfRange { index: 3, len: 1 }
        );
    }

    #[test]
    fn test_find_by_name() {
        let catalog =
            TemplateCatalog::new(vec![greeting_template("Alpha"), greeting_template("Beta")])
                .unwrap();
        assert_eq!(catalog.find("beta"), Ok(1));
        assert!(matches!(
            catalog.find("gamma"),
            Err(CatalogError::NotFound { .. })
        ));
    }

    #[test]
    fn test_rejects_unrenderable_default() {
        let template = Template::new("Broken", ConfigValue::Null, broken);
        let err = TemplateCatalog::new(vec![template]).unwrap_err();
        assert_eq!(
            err,
            CatalogError::DefaultNotRenderable {
                name: "Broken".to_string(),
                message: "always fails".to_string(),
            }
        );
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert_eq!(TemplateCatalog::new(vec![]).unwrap_err(), CatalogError::Empty);
        assert!(matches!(
            TemplateCatalog::new(vec![greeting_template("A"), greeting_template("A")]),
            Err(CatalogError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_fresh_config_is_independent_copy() {
        let template = greeting_template("A");
        let mut copy = template.fresh_config();
        if let ConfigValue::Map(map) = &mut copy {
            map.insert("text".to_string(), ConfigValue::str("changed"));
        }
        assert_eq!(
            template.default_config().text_field("text").as_deref(),
            Some("hi")
        );
    }
}
