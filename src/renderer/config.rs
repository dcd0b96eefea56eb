//! Configuration for code output

/// Google Fonts stylesheet the popups are designed against
pub const DEFAULT_FONT_URL: &str =
    "https://fonts.googleapis.com/css2?family=Figtree:wght@400;600;700;800;900&display=swap";

/// Configuration options for the export payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Whether to prefix the payload with a font-loading comment
    pub include_font_notice: bool,

    /// Font stylesheet named in the notice
    pub font_url: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_font_notice: true,
            font_url: DEFAULT_FONT_URL.to_string(),
        }
    }
}

impl ExportOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the font notice is included
    pub fn with_font_notice(mut self, include: bool) -> Self {
        self.include_font_notice = include;
        self
    }

    /// Set the font stylesheet named in the notice
    pub fn with_font_url(mut self, url: impl Into<String>) -> Self {
        self.font_url = url.into();
        self
    }
}
