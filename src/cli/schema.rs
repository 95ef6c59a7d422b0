//! Declarative option schema
//!
//! The schema lists every recognized option together with its flags and the
//! shape of the value it accepts. It is built once at startup and shared by the
//! argument parser and the help renderer.

use crate::error::{LoaderError, Result};
use std::collections::HashSet;

/// Option name for the environment file list
pub const FILES: &str = "files";
/// Option name for the help switch
pub const HELP: &str = "help";
/// Option name for the override policy switch
pub const NO_OVERRIDE: &str = "no_override";
/// Option name for verbose parse reporting
pub const VERBOSE: &str = "verbose";

/// Kind of value carried by a valued option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// A single string, returned verbatim
    String,
    /// A separator-delimited list of strings
    StringList,
}

/// Parameter shape of an option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    /// Presence-only switch; never takes a value
    Flag,
    /// Switch that optionally takes an explicit `true`/`false`
    Boolean,
    /// Option that requires a value
    Value {
        /// Placeholder shown in help output
        alias: &'static str,
        kind: ValueKind,
    },
}

/// Specification of a single option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    /// Human readable description for help output
    pub description: &'static str,
    /// Flag matched after the long prefix (and after the short one too)
    pub long_flag: &'static str,
    /// Optional abbreviated flag
    pub short_flag: Option<&'static str>,
    /// Value shape
    pub param: Param,
}

impl OptionSpec {
    /// Whether `flag` names this option, in its long or short form
    pub fn matches(&self, flag: &str) -> bool {
        self.long_flag == flag || self.short_flag == Some(flag)
    }
}

/// Ordered set of options keyed by their internal name
#[derive(Debug, Clone, Default)]
pub struct SpecSchema {
    entries: Vec<(&'static str, OptionSpec)>,
}

impl SpecSchema {
    /// Build a schema, rejecting duplicated names or flags
    pub fn new<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'static str, OptionSpec)>,
    {
        let entries: Vec<_> = entries.into_iter().collect();
        let mut names = HashSet::new();
        let mut long_flags = HashSet::new();
        let mut short_flags = HashSet::new();

        for (name, spec) in &entries {
            if !names.insert(*name) {
                return Err(LoaderError::schema(format!("duplicate option \"{name}\"")));
            }
            if !long_flags.insert(spec.long_flag) {
                return Err(LoaderError::schema(format!(
                    "duplicate long flag \"{}\"",
                    spec.long_flag
                )));
            }
            if let Some(short) = spec.short_flag {
                if !short_flags.insert(short) {
                    return Err(LoaderError::schema(format!(
                        "duplicate short flag \"{short}\""
                    )));
                }
            }
        }

        Ok(Self { entries })
    }

    /// Find the option named by `flag`
    pub fn find(&self, flag: &str) -> Option<(&'static str, &OptionSpec)> {
        self.entries
            .iter()
            .find(|(_, spec)| spec.matches(flag))
            .map(|(name, spec)| (*name, spec))
    }

    /// Options in display order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &OptionSpec)> {
        self.entries.iter().map(|(name, spec)| (*name, spec))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The options understood by the `envloadr` binary
pub fn default_schema() -> Result<SpecSchema> {
    SpecSchema::new([
        (
            FILES,
            OptionSpec {
                description: "Specifies the filepath(s) to load environment variables from (default: .env)",
                long_flag: "file",
                short_flag: Some("f"),
                param: Param::Value {
                    alias: "path",
                    kind: ValueKind::StringList,
                },
            },
        ),
        (
            HELP,
            OptionSpec {
                description: "Displays help information about the available options and their usage",
                long_flag: "help",
                short_flag: Some("h"),
                param: Param::Flag,
            },
        ),
        (
            NO_OVERRIDE,
            OptionSpec {
                description: "Prevents overwriting, ensuring repeated variables keep their initial value",
                long_flag: "no-override",
                short_flag: None,
                param: Param::Boolean,
            },
        ),
        (
            VERBOSE,
            OptionSpec {
                description: "Displays each environment file and variable as it is loaded",
                long_flag: "verbose",
                short_flag: Some("v"),
                param: Param::Boolean,
            },
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flag(long_flag: &'static str, short_flag: Option<&'static str>) -> OptionSpec {
        OptionSpec {
            description: "test option",
            long_flag,
            short_flag,
            param: Param::Flag,
        }
    }

    #[test]
    fn test_default_schema_is_valid() {
        let schema = default_schema().unwrap();
        assert_eq!(schema.len(), 4);

        let names: Vec<_> = schema.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec![FILES, HELP, NO_OVERRIDE, VERBOSE]);
    }

    #[test]
    fn test_find_by_long_and_short_flag() {
        let schema = default_schema().unwrap();

        assert_eq!(schema.find("file").map(|(name, _)| name), Some(FILES));
        assert_eq!(schema.find("f").map(|(name, _)| name), Some(FILES));
        assert_eq!(
            schema.find("no-override").map(|(name, _)| name),
            Some(NO_OVERRIDE)
        );
        assert!(schema.find("unknown").is_none());
    }

    #[test]
    fn test_duplicate_long_flag_rejected() {
        let result = SpecSchema::new([("a", flag("same", None)), ("b", flag("same", None))]);
        assert!(matches!(result, Err(LoaderError::Schema { .. })));
    }

    #[test]
    fn test_duplicate_short_flag_rejected() {
        let result = SpecSchema::new([
            ("a", flag("alpha", Some("x"))),
            ("b", flag("beta", Some("x"))),
        ]);
        assert!(matches!(result, Err(LoaderError::Schema { .. })));
    }

    #[test]
    fn test_missing_short_flags_do_not_collide() {
        let schema = SpecSchema::new([("a", flag("alpha", None)), ("b", flag("beta", None))]);
        assert!(schema.is_ok());
    }
}
