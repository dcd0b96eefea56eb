//! Stylesheet assembly for popup templates
//!
//! Templates compose their stylesheet under one of three policies: inline
//! rules layered over a shared base sheet, a single external sheet shared by
//! every template, or that external sheet made editable by the author. The
//! [`StylesheetAssembler`] hides the policy from the preview and the code
//! output, which only ever see the final text.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

/// Stylesheet composition policy of a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StylesheetSpec {
    /// A CSS fragment appended after the shared base rules
    Inline(String),
    /// The external sheet, verbatim, independent of configuration
    ExternalBase,
    /// The external sheet as a starting point the author may edit live
    EditableOverride,
}

impl StylesheetSpec {
    pub fn is_editable(&self) -> bool {
        matches!(self, StylesheetSpec::EditableOverride)
    }
}

/// Policy selector used to build the built-in catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleMode {
    Inline,
    External,
    #[default]
    Editable,
}

impl FromStr for StyleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "inline" => Ok(StyleMode::Inline),
            "external" => Ok(StyleMode::External),
            "editable" => Ok(StyleMode::Editable),
            other => Err(format!(
                "unknown style mode '{}' (expected inline, external or editable)",
                other
            )),
        }
    }
}

impl fmt::Display for StyleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StyleMode::Inline => "inline",
            StyleMode::External => "external",
            StyleMode::Editable => "editable",
        })
    }
}

/// Where the external base sheet comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSource {
    Local(PathBuf),
    Remote(Url),
}

impl SheetSource {
    /// Interpret a location string: http(s) URLs are remote, anything else a path
    pub fn parse(location: &str) -> Self {
        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => SheetSource::Remote(url),
            _ => SheetSource::Local(PathBuf::from(location)),
        }
    }

    /// Short resource name used in the placeholder comment
    pub fn resource_name(&self) -> String {
        match self {
            SheetSource::Local(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            SheetSource::Remote(url) => url
                .path_segments()
                .and_then(|segments| segments.last().map(str::to_string))
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| url.to_string()),
        }
    }
}

impl fmt::Display for SheetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetSource::Local(path) => write!(f, "{}", path.display()),
            SheetSource::Remote(url) => write!(f, "{}", url),
        }
    }
}

/// Errors that can occur while fetching the external sheet
///
/// These never leave [`ExternalSheet::load`]; they are logged and replaced
/// by the placeholder text.
#[derive(Error, Debug)]
enum SheetLoadError {
    #[error("failed to read stylesheet file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to fetch stylesheet: {0}")]
    Http(#[from] reqwest::Error),
    #[error("stylesheet request returned HTTP {0}")]
    Status(reqwest::StatusCode),
}

/// The external base sheet, loaded once at session start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalSheet {
    resource: String,
    text: Option<String>,
}

impl ExternalSheet {
    /// Fetch the sheet, degrading to the placeholder on any failure
    pub async fn load(source: &SheetSource) -> Self {
        let resource = source.resource_name();
        match fetch(source).await {
            Ok(text) => {
                info!(source = %source, bytes = text.len(), "loaded base stylesheet");
                Self {
                    resource,
                    text: Some(text),
                }
            }
            Err(err) => {
                debug!(source = %source, error = %err, "base stylesheet unavailable, using placeholder");
                Self::unavailable(resource)
            }
        }
    }

    /// A sheet that was loaded from elsewhere
    pub fn loaded(resource: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            text: Some(text.into()),
        }
    }

    /// A sheet whose load failed
    pub fn unavailable(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            text: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.text.is_some()
    }

    /// Loaded text, or the placeholder comment
    pub fn text(&self) -> String {
        match &self.text {
            Some(text) => text.clone(),
            None => self.placeholder(),
        }
    }

    pub fn placeholder(&self) -> String {
        format!("/* Could not load {} */", self.resource)
    }
}

async fn fetch(source: &SheetSource) -> Result<String, SheetLoadError> {
    match source {
        SheetSource::Local(path) => Ok(tokio::fs::read_to_string(path).await?),
        SheetSource::Remote(url) => {
            let response = reqwest::get(url.clone()).await?;
            if !response.status().is_success() {
                return Err(SheetLoadError::Status(response.status()));
            }
            Ok(response.text().await?)
        }
    }
}

/// Produces the final stylesheet text of a template
#[derive(Debug, Clone)]
pub struct StylesheetAssembler {
    external: ExternalSheet,
}

impl StylesheetAssembler {
    pub fn new(external: ExternalSheet) -> Self {
        Self { external }
    }

    pub fn external(&self) -> &ExternalSheet {
        &self.external
    }

    /// Final stylesheet text for a template
    ///
    /// `live_override` is only consulted for editable templates.
    pub fn assemble(&self, spec: &StylesheetSpec, live_override: Option<&str>) -> String {
        match spec {
            StylesheetSpec::Inline(fragment) => format!("{}\n\n{}", BASE_RULES, fragment),
            StylesheetSpec::ExternalBase => self.external.text(),
            StylesheetSpec::EditableOverride => match live_override {
                Some(text) => text.to_string(),
                None => self.external.text(),
            },
        }
    }

    /// Text the stylesheet editor starts with for editable templates
    pub fn editable_seed(&self) -> String {
        self.external.text()
    }
}

/// Shared rules every inline template builds on
pub const BASE_RULES: &str = r#"/* Popup base */
.popup-overlay {
  position: fixed;
  inset: 0;
  display: none;
  align-items: center;
  justify-content: center;
  background: rgba(6, 4, 20, 0.72);
  font-family: 'Figtree', sans-serif;
  z-index: 1000;
}
.popup-overlay.active {
  display: flex;
}
.popup-container {
  position: relative;
  width: 360px;
  max-width: calc(100vw - 32px);
  padding: 28px 22px 24px;
  border-radius: 22px;
  color: #ffffff;
  text-align: center;
  box-shadow: 0 18px 48px rgba(0, 0, 0, 0.45);
}
.popup-close {
  position: absolute;
  top: 12px;
  right: 12px;
  width: 32px;
  height: 32px;
  padding: 6px;
  border: none;
  border-radius: 50%;
  background: rgba(255, 255, 255, 0.18);
  cursor: pointer;
  z-index: 2;
}
.popup-close svg {
  width: 100%;
  height: 100%;
}
.popup-title {
  position: relative;
  margin: 0 0 8px;
  font-size: 30px;
  font-weight: 900;
  letter-spacing: 0.5px;
}
.popup-hero {
  position: relative;
  height: 180px;
  margin: 0 auto;
}
.popup-hero img {
  max-height: 100%;
}
.popup-hero--animated .popup-hero-main {
  animation: popup-float 3s ease-in-out infinite;
}
.popup-scatter {
  position: absolute;
  width: 56px;
}
.scatter-tl {
  top: 4%;
  left: 6%;
}
.scatter-mr {
  top: 45%;
  right: 2%;
}
.popup-content {
  position: relative;
}
.popup-subtitle {
  margin: 10px 0 6px;
  font-size: 13px;
  font-weight: 700;
  letter-spacing: 0.6px;
  opacity: 0.9;
}
.popup-cta {
  position: relative;
  width: 100%;
  padding: 14px 18px;
  border: none;
  border-radius: 14px;
  background: linear-gradient(180deg, #4ef08a 0%, #17b856 100%);
  color: #ffffff;
  font-family: inherit;
  font-size: 18px;
  font-weight: 800;
  cursor: pointer;
}
.popup-claim-coin {
  position: absolute;
  left: 50%;
  bottom: 50%;
  width: 22px;
  opacity: 0;
  pointer-events: none;
  transform: translateX(var(--coin-x));
}
.popup-cta.is-claimed .popup-claim-coin {
  animation: popup-coin-fountain 1s ease-out forwards;
}
@keyframes popup-float {
  0%, 100% { transform: translateY(0); }
  50% { transform: translateY(-8px); }
}
@keyframes popup-coin-fountain {
  0% { opacity: 1; transform: translate(var(--coin-x), 0); }
  100% { opacity: 0; transform: translate(var(--coin-x), -120px); }
}"#;
