//! Code output: the copyable markup + stylesheet block

use super::ExportOptions;

/// Combine markup and stylesheet into the export payload
///
/// Layout: optional font comment, the markup section, then the stylesheet
/// wrapped in a `<style>` block.
pub fn format_export(markup: &str, stylesheet: &str, options: &ExportOptions) -> String {
    let mut out = String::new();
    if options.include_font_notice {
        out.push_str(&format!("<!-- Add Google Font: {} -->\n\n", options.font_url));
    }
    out.push_str("<!-- HTML -->\n");
    out.push_str(markup);
    out.push_str("\n\n<style>\n");
    out.push_str(stylesheet);
    out.push_str("\n</style>");
    out
}
