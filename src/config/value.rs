//! Configuration value tree
//!
//! A [`ConfigValue`] is the author-editable parameter set of one template
//! instance. Maps keep insertion order so that pretty-printing a default
//! configuration reproduces the order the template author wrote it in.

use std::fmt::{self, Write};

use indexmap::IndexMap;
use thiserror::Error;

/// Ordered map used for configuration objects
pub type ConfigMap = IndexMap<String, ConfigValue>;

/// A structured configuration value
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Seq(Vec<ConfigValue>),
    Map(ConfigMap),
}

/// Errors raised when a template reads a field that is missing or mistyped
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FieldError {
    #[error("missing required field '{path}'")]
    Missing { path: String },

    #[error("field '{path}' must be {expected}, found {found}")]
    WrongType {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl ConfigValue {
    /// Build a map value from key/value pairs
    pub fn map<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ConfigValue)>,
    {
        ConfigValue::Map(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build a string value
    pub fn str(s: impl Into<String>) -> Self {
        ConfigValue::String(s.into())
    }

    /// Human-readable name of the value's kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Bool(_) => "a boolean",
            ConfigValue::Number(_) => "a number",
            ConfigValue::String(_) => "a string",
            ConfigValue::Seq(_) => "a list",
            ConfigValue::Map(_) => "an object",
        }
    }

    /// Look up a key if this value is a map
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        match self {
            ConfigValue::Map(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ConfigMap> {
        match self {
            ConfigValue::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::Seq(s) => Some(s),
            _ => None,
        }
    }

    /// Scalar value rendered as markup text
    ///
    /// Strings are returned as-is, numbers and booleans are formatted.
    /// Null, lists and objects have no text form.
    pub fn as_text(&self) -> Option<String> {
        match self {
            ConfigValue::String(s) => Some(s.clone()),
            ConfigValue::Number(n) => Some(format_number(*n)),
            ConfigValue::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Optional text field; missing or null yields `None`
    pub fn text_field(&self, key: &str) -> Option<String> {
        self.get(key).and_then(ConfigValue::as_text)
    }

    /// Optional text field with a fallback used when it is missing or empty
    pub fn text_or(&self, key: &str, fallback: &str) -> String {
        self.text_field(key)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Required scalar field rendered as text
    pub fn require_text(&self, key: &str) -> Result<String, FieldError> {
        let value = self.require(key)?;
        value.as_text().ok_or_else(|| FieldError::WrongType {
            path: key.to_string(),
            expected: "a string or number",
            found: value.kind(),
        })
    }

    /// Required list field
    pub fn require_seq(&self, key: &str) -> Result<&[ConfigValue], FieldError> {
        let value = self.require(key)?;
        value.as_seq().ok_or_else(|| FieldError::WrongType {
            path: key.to_string(),
            expected: "a list",
            found: value.kind(),
        })
    }

    /// Required object field
    pub fn require_map(&self, key: &str) -> Result<&ConfigValue, FieldError> {
        let value = self.require(key)?;
        match value {
            ConfigValue::Map(_) => Ok(value),
            other => Err(FieldError::WrongType {
                path: key.to_string(),
                expected: "an object",
                found: other.kind(),
            }),
        }
    }

    /// Optional list field; a missing or null field is an empty list
    pub fn seq_or_empty(&self, key: &str) -> Result<&[ConfigValue], FieldError> {
        match self.get(key) {
            None | Some(ConfigValue::Null) => Ok(&[]),
            Some(_) => self.require_seq(key),
        }
    }

    fn require(&self, key: &str) -> Result<&ConfigValue, FieldError> {
        match self.get(key) {
            None | Some(ConfigValue::Null) => Err(FieldError::Missing {
                path: key.to_string(),
            }),
            Some(value) => Ok(value),
        }
    }

    /// Pretty-print as a JSON document with two-space indentation
    pub fn to_pretty_string(&self) -> String {
        let mut out = String::new();
        write_pretty(&mut out, self, 0).expect("writing to a String cannot fail");
        out
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pretty_string())
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<f64> for ConfigValue {
    fn from(n: f64) -> Self {
        ConfigValue::Number(n)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(items: Vec<ConfigValue>) -> Self {
        ConfigValue::Seq(items)
    }
}

/// Format a number the way the configuration document prints it
///
/// Integral values print without a fractional part.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn write_pretty(out: &mut String, value: &ConfigValue, depth: usize) -> fmt::Result {
    match value {
        ConfigValue::Null => out.push_str("null"),
        ConfigValue::Bool(b) => write!(out, "{}", b)?,
        ConfigValue::Number(n) => out.push_str(&format_number(*n)),
        ConfigValue::String(s) => write_escaped(out, s)?,
        ConfigValue::Seq(items) if items.is_empty() => out.push_str("[]"),
        ConfigValue::Seq(items) => {
            out.push_str("[\n");
            for (i, item) in items.iter().enumerate() {
                indent(out, depth + 1);
                write_pretty(out, item, depth + 1)?;
                if i + 1 < items.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            indent(out, depth);
            out.push(']');
        }
        ConfigValue::Map(map) if map.is_empty() => out.push_str("{}"),
        ConfigValue::Map(map) => {
            out.push_str("{\n");
            for (i, (key, item)) in map.iter().enumerate() {
                indent(out, depth + 1);
                write_escaped(out, key)?;
                out.push_str(": ");
                write_pretty(out, item, depth + 1)?;
                if i + 1 < map.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            indent(out, depth);
            out.push('}');
        }
    }
    Ok(())
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn write_escaped(out: &mut String, s: &str) -> fmt::Result {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => write!(out, "\\u{:04x}", c as u32)?,
            c => out.push(c),
        }
    }
    out.push('"');
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> ConfigValue {
        ConfigValue::map([
            ("title", ConfigValue::str("Hello")),
            (
                "amounts",
                ConfigValue::Seq(vec![ConfigValue::map([
                    ("value", ConfigValue::Number(40.0)),
                    ("label", ConfigValue::str("FOR\nFREE")),
                ])]),
            ),
            ("empty", ConfigValue::Seq(vec![])),
            ("flags", ConfigValue::map::<&str, _>([])),
        ])
    }

    #[test]
    fn test_pretty_two_space_indentation() {
        let expected = r#"{
  "title": "Hello",
  "amounts": [
    {
      "value": 40,
      "label": "FOR\nFREE"
    }
  ],
  "empty": [],
  "flags": {}
}"#;
        assert_eq!(sample().to_pretty_string(), expected);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(40.0), "40");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(24.99), "24.99");
    }

    #[test]
    fn test_text_field_accepts_scalars() {
        let cfg = ConfigValue::map([
            ("a", ConfigValue::str("x")),
            ("b", ConfigValue::Number(1.5)),
            ("c", ConfigValue::Bool(true)),
            ("d", ConfigValue::Null),
        ]);
        assert_eq!(cfg.text_field("a").as_deref(), Some("x"));
        assert_eq!(cfg.text_field("b").as_deref(), Some("1.5"));
        assert_eq!(cfg.text_field("c").as_deref(), Some("true"));
        assert_eq!(cfg.text_field("d"), None);
        assert_eq!(cfg.text_field("missing"), None);
    }

    #[test]
    fn test_require_reports_path() {
        let cfg = ConfigValue::map([("cta", ConfigValue::str("oops"))]);
        assert_eq!(
            cfg.require_map("cta").unwrap_err(),
            FieldError::WrongType {
                path: "cta".to_string(),
                expected: "an object",
                found: "a string",
            }
        );
        assert_eq!(
            cfg.require_seq("amounts").unwrap_err(),
            FieldError::Missing {
                path: "amounts".to_string()
            }
        );
    }

    #[test]
    fn test_seq_or_empty() {
        let cfg = ConfigValue::map([("list", ConfigValue::Null)]);
        assert!(cfg.seq_or_empty("list").unwrap().is_empty());
        assert!(cfg.seq_or_empty("other").unwrap().is_empty());
    }

    #[test]
    fn test_clone_is_independent() {
        let original = sample();
        let mut copy = original.clone();
        if let ConfigValue::Map(map) = &mut copy {
            map.insert("title".to_string(), ConfigValue::str("Changed"));
        }
        assert_eq!(original.text_field("title").as_deref(), Some("Hello"));
        assert_ne!(original, copy);
    }
}
