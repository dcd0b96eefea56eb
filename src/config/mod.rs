//! Configuration documents
//!
//! The configuration text surface holds a JSON document describing one
//! template instance. This module lexes and parses it into a
//! [`ConfigValue`] tree and prints values back with two-space indentation.

mod grammar;
pub mod lexer;
pub mod value;

pub use grammar::{parse_config, MAX_DEPTH};
pub use value::{format_number, ConfigMap, ConfigValue, FieldError};
