//! Schema-driven argument parsing
//!
//! Arguments are read left to right. Every token carrying a flag prefix is an
//! option; the first token without one starts the target command, and that
//! token plus everything after it is passed through untouched.

use crate::{
    cli::schema::{OptionSpec, Param, SpecSchema, ValueKind},
    config::{
        CLI_FLAG_LONG_PREFIX, CLI_FLAG_SHORT_PREFIX, CLI_FLAG_VALUE_SEPARATOR,
        CLI_OPTION_VALUES_SEPARATOR,
    },
    error::{LoaderError, Result},
};
use std::{collections::BTreeMap, ffi::OsString};
use tracing::debug;

/// Parsed value of a single option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Bool(bool),
    String(String),
    List(Vec<String>),
}

impl OptionValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }
}

/// Options keyed by their schema name
pub type Options = BTreeMap<String, OptionValue>;

/// The program to launch and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub args: Vec<String>,
}

impl Command {
    /// The command as a single space-joined line
    pub fn command_line(&self) -> String {
        std::iter::once(self.name.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Result of parsing an argument vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub command: Command,
    /// `None` when the input held no option tokens at all
    pub options: Option<Options>,
}

/// Convert raw process arguments, rejecting any that are not valid UTF-8
pub fn utf8_args<I>(args: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            arg.into_string().map_err(|arg| {
                LoaderError::cli_parse(format!("Invalid UTF-8 in argument {arg:?}"))
            })
        })
        .collect()
}

/// Parse `input` against `schema`
pub fn parse<S: AsRef<str>>(input: &[S], schema: &SpecSchema) -> Result<ParseResult> {
    let boundary = input
        .iter()
        .position(|token| !is_option_token(token.as_ref()))
        .ok_or_else(|| LoaderError::cli_parse("Missing target command"))?;

    let command = split_command(&input[boundary..])?;

    let mut options: Option<Options> = None;
    for token in &input[..boundary] {
        let (name, value) = parse_option(token.as_ref(), schema)?;
        debug!("Parsed option {} = {:?}", name, value);
        options
            .get_or_insert_with(Options::new)
            .insert(name.to_string(), value);
    }

    Ok(ParseResult { command, options })
}

fn is_option_token(token: &str) -> bool {
    token.starts_with(CLI_FLAG_LONG_PREFIX) || token.starts_with(CLI_FLAG_SHORT_PREFIX)
}

fn split_command<S: AsRef<str>>(region: &[S]) -> Result<Command> {
    let raw = region
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ");
    let mut parts = raw.split_whitespace().map(str::to_string);

    let name = parts
        .next()
        .ok_or_else(|| LoaderError::cli_parse("Missing target command"))?;

    Ok(Command {
        name,
        args: parts.collect(),
    })
}

fn parse_option(token: &str, schema: &SpecSchema) -> Result<(&'static str, OptionValue)> {
    let body = token
        .strip_prefix(CLI_FLAG_LONG_PREFIX)
        .or_else(|| token.strip_prefix(CLI_FLAG_SHORT_PREFIX))
        .unwrap_or(token);

    let (flag, value) = match body.split_once(CLI_FLAG_VALUE_SEPARATOR) {
        Some((flag, value)) => (flag, Some(value)),
        None => (body, None),
    };
    // `--flag=` behaves like `--flag`
    let value = value.filter(|value| !value.is_empty());

    if flag.trim().is_empty() {
        return Err(LoaderError::cli_parse(format!(
            "Missing option flag in \"{token}\""
        )));
    }

    let (name, spec) = schema
        .find(flag)
        .ok_or_else(|| LoaderError::cli_parse(format!("Unknown option \"{flag}\"")))?;

    Ok((name, read_value(flag, spec, value)?))
}

fn read_value(flag: &str, spec: &OptionSpec, value: Option<&str>) -> Result<OptionValue> {
    match (spec.param, value) {
        (Param::Flag, None) => Ok(OptionValue::Bool(true)),
        (Param::Flag, Some(_)) => Err(LoaderError::cli_parse(format!(
            "Unexpected value for option \"{flag}\""
        ))),
        (Param::Boolean, None) => Ok(OptionValue::Bool(true)),
        (Param::Boolean, Some(value)) => parse_bool(value).map(OptionValue::Bool).ok_or_else(|| {
            LoaderError::cli_parse(format!(
                "Invalid boolean value \"{value}\" for option \"{flag}\", expected true or false"
            ))
        }),
        (Param::Value { .. }, None) => Err(LoaderError::cli_parse(format!(
            "Expected value for option \"{flag}\""
        ))),
        (Param::Value { kind, .. }, Some(value)) => Ok(match kind {
            ValueKind::String => OptionValue::String(value.to_string()),
            ValueKind::StringList => OptionValue::List(
                value
                    .split(CLI_OPTION_VALUES_SEPARATOR)
                    .map(str::to_string)
                    .collect(),
            ),
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
