//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::config::lexer::{Span, Token};
use crate::config::value::{ConfigMap, ConfigValue};
use crate::error::ConfigParseError;

/// Deepest list/object nesting a configuration document may have
pub const MAX_DEPTH: usize = 128;

/// Parse configuration text into a value tree
///
/// Only the first syntax error is reported: the author fixes one thing at a
/// time and the editor shows a single message.
pub fn parse_config(input: &str) -> Result<ConfigValue, ConfigParseError> {
    let len = input.len();

    let tokens: Vec<(Token, Span)> = crate::config::lexer::lex(input).collect();
    check_depth(&tokens, input)?;

    let token_iter = tokens.into_iter().map(|(tok, span)| (tok, span.into()));

    let token_stream = Stream::from_iter(token_iter)
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    document_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| {
            errs.into_iter()
                .next()
                .map(|e| ConfigParseError::from_rich(e, input))
                .unwrap_or_else(|| ConfigParseError::empty(len))
        })
}

/// Reject documents nested deeper than [`MAX_DEPTH`] before any value is built
fn check_depth(tokens: &[(Token, Span)], input: &str) -> Result<(), ConfigParseError> {
    let mut depth = 0usize;
    for (tok, span) in tokens {
        match tok {
            Token::BraceOpen | Token::BracketOpen => {
                depth += 1;
                if depth > MAX_DEPTH {
                    return Err(ConfigParseError::nesting_too_deep(span.clone(), input));
                }
            }
            Token::BraceClose | Token::BracketClose => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

fn document_parser<'a, I>() -> impl Parser<'a, I, ConfigValue, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let value = recursive(|value| {
        let scalar = select! {
            Token::Null => ConfigValue::Null,
            Token::True => ConfigValue::Bool(true),
            Token::False => ConfigValue::Bool(false),
            Token::Number(n) => ConfigValue::Number(n),
            Token::String(s) => ConfigValue::String(s),
        };

        let seq = value
            .clone()
            .separated_by(just(Token::Comma))
            .collect::<Vec<_>>()
            .delimited_by(just(Token::BracketOpen), just(Token::BracketClose))
            .map(ConfigValue::Seq);

        let key = select! { Token::String(s) => s };

        // Duplicate keys keep their first position and take the last value
        let map = key
            .then_ignore(just(Token::Colon))
            .then(value)
            .separated_by(just(Token::Comma))
            .collect::<Vec<_>>()
            .delimited_by(just(Token::BraceOpen), just(Token::BraceClose))
            .map(|members| ConfigValue::Map(members.into_iter().collect::<ConfigMap>()));

        choice((scalar, seq, map)).boxed()
    });

    value.then_ignore(end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_scalars() {
        assert_eq!(parse_config("null").unwrap(), ConfigValue::Null);
        assert_eq!(parse_config("true").unwrap(), ConfigValue::Bool(true));
        assert_eq!(parse_config("-2.5").unwrap(), ConfigValue::Number(-2.5));
        assert_eq!(parse_config(r#""hi""#).unwrap(), ConfigValue::str("hi"));
    }

    #[test]
    fn test_parse_nested_document() {
        let value = parse_config(
            r#"{
                "title": "Special Offer!",
                "amounts": [{"value": "40", "type": "sc"}],
                "cta": {"text": "Buy"}
            }"#,
        )
        .expect("Should parse");

        assert_eq!(value.text_field("title").as_deref(), Some("Special Offer!"));
        let amounts = value.require_seq("amounts").unwrap();
        assert_eq!(amounts.len(), 1);
        assert_eq!(amounts[0].text_field("type").as_deref(), Some("sc"));
        assert_eq!(
            value.require_map("cta").unwrap().text_field("text").as_deref(),
            Some("Buy")
        );
    }

    #[test]
    fn test_key_order_is_preserved() {
        let value = parse_config(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let keys: Vec<_> = value.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_duplicate_key_last_value_wins() {
        let value = parse_config(r#"{"a": 1, "b": 2, "a": 3}"#).unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get_index(0), Some((&"a".to_string(), &ConfigValue::Number(3.0))));
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(parse_config("[]").unwrap(), ConfigValue::Seq(vec![]));
        assert_eq!(parse_config("{}").unwrap(), ConfigValue::Map(ConfigMap::new()));
    }

    #[test]
    fn test_truncated_document_is_error() {
        let err = parse_config(r#"{"a":"#).unwrap_err();
        assert!(!err.message().is_empty());
        assert_eq!(err.span(), 5..5);
    }

    #[test]
    fn test_trailing_comma_is_error() {
        assert!(parse_config(r#"{"a": 1,}"#).is_err());
        assert!(parse_config("[1, 2,]").is_err());
    }

    #[test]
    fn test_trailing_content_is_error() {
        assert!(parse_config("{} {}").is_err());
    }

    #[test]
    fn test_empty_input_is_error() {
        let err = parse_config("   ").unwrap_err();
        assert!(!err.message().is_empty());
    }

    #[test]
    fn test_invalid_token_reported_at_position() {
        let err = parse_config(r#"{"a": @}"#).unwrap_err();
        assert_eq!(err.span(), 6..7);
        assert!(err.message().contains('@'));
    }

    #[test]
    fn test_unquoted_key_is_error() {
        assert!(parse_config("{a: 1}").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let at_limit = format!("{}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert!(parse_config(&at_limit).is_ok());

        let deep = format!(r#"{{"x": {}{}}}"#, "[".repeat(20_000), "]".repeat(20_000));
        let err = parse_config(&deep).unwrap_err();
        assert_eq!(err.message(), "nesting too deep");
        // The opening brace is depth 1, so the 128th bracket is the first past the limit
        let offset = r#"{"x": "#.len() + MAX_DEPTH - 1;
        assert_eq!(err.span(), offset..offset + 1);
    }

    #[test]
    fn test_out_of_range_number_is_error() {
        let err = parse_config(r#"{"a": 1e400}"#).unwrap_err();
        assert_eq!(err.span(), 6..11);
        assert!(err.message().contains("1e400"));
    }

    #[test]
    fn test_pretty_output_reparses_equal() {
        let source = r#"{"title":"x","n":[1,2.5,{"deep":[true,null]}],"e":{}}"#;
        let value = parse_config(source).unwrap();
        let reparsed = parse_config(&value.to_pretty_string()).unwrap();
        assert_eq!(value, reparsed);
    }

    #[test]
    fn test_pretty_output_of_extreme_numbers_reparses() {
        let value = parse_config(r#"{"big": 1e300, "small": -2.5e-300}"#).unwrap();
        let reparsed = parse_config(&value.to_pretty_string()).unwrap();
        assert_eq!(value, reparsed);
    }
}
