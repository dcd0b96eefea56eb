//! Error types for configuration parsing and the studio pipeline

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use chumsky::error::{Rich, RichPattern, RichReason};
use thiserror::Error;

use crate::config::lexer::Token;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// A malformed configuration document
///
/// The message is what the editor shows next to the configuration text.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message} at line {line}, column {column}")]
pub struct ConfigParseError {
    message: String,
    span: Span,
    line: usize,
    column: usize,
    expected: Vec<String>,
}

impl ConfigParseError {
    pub(crate) fn from_rich(err: Rich<'_, Token>, source: &str) -> Self {
        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => {
                let found_str = match found {
                    Some(tok) => format_token(tok),
                    None => "end of input".to_string(),
                };
                format!("Unexpected {}", found_str)
            }
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                RichPattern::Token(tok) => Some(format_token(tok)),
                RichPattern::Label(label) => Some(label.to_string()),
                RichPattern::EndOfInput => Some("end of input".to_string()),
                RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                RichPattern::Any => Some("any token".to_string()),
                RichPattern::SomethingElse => None,
            })
            .collect();

        Self::at(message, err.span().into_range(), expected, source)
    }

    /// Error for a document with no content at all
    pub(crate) fn empty(len: usize) -> Self {
        Self {
            message: "Unexpected end of input".to_string(),
            span: len..len,
            line: 1,
            column: len + 1,
            expected: vec!["value".to_string()],
        }
    }

    /// Error for a list or object opened past the nesting limit
    pub(crate) fn nesting_too_deep(span: Span, source: &str) -> Self {
        Self::at("nesting too deep".to_string(), span, Vec::new(), source)
    }

    fn at(message: String, span: Span, expected: Vec<String>, source: &str) -> Self {
        let offset = span.start.min(source.len());
        let before = source.get(..offset).unwrap_or(source);
        let line = before.matches('\n').count() + 1;
        let column = before
            .rsplit('\n')
            .next()
            .map(|l| l.chars().count())
            .unwrap_or(0)
            + 1;
        Self {
            message,
            span,
            line,
            column,
            expected,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn span(&self) -> Span {
        self.span.clone()
    }

    /// One-based line and column of the error position
    pub fn position(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    pub fn expected(&self) -> &[String] {
        &self.expected
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        let expected_str = if self.expected.is_empty() {
            String::new()
        } else {
            format!("\nExpected: {}", self.expected.join(", "))
        };

        let written = Report::build(ReportKind::Error, filename, self.span.start)
            .with_config(Config::default().with_index_type(IndexType::Byte))
            .with_message(&self.message)
            .with_label(
                Label::new((filename, self.span.clone()))
                    .with_message(format!("{}{}", self.message, expected_str))
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &Token) -> String {
    match tok {
        Token::String(s) => format!("string \"{}\"", s),
        Token::Number(n) => format!("number {}", n),
        Token::True => "'true'".to_string(),
        Token::False => "'false'".to_string(),
        Token::Null => "'null'".to_string(),
        Token::BraceOpen => "'{'".to_string(),
        Token::BraceClose => "'}'".to_string(),
        Token::BracketOpen => "'['".to_string(),
        Token::BracketClose => "']'".to_string(),
        Token::Comma => "','".to_string(),
        Token::Colon => "':'".to_string(),
        Token::Invalid(s) => format!("invalid input '{}'", s),
    }
}

/// Top-level error for studio operations outside the edit loop
#[derive(Debug, Error)]
pub enum StudioError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigParseError),

    #[error(transparent)]
    Catalog(#[from] crate::template::CatalogError),

    #[error(transparent)]
    Session(#[from] crate::session::SessionError),

    #[error(transparent)]
    Settings(#[from] crate::settings::SettingsError),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
