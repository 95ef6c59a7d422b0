//! Environment file parsing
//!
//! Reads `NAME=VALUE` files into an insertion-ordered map. Blank lines and
//! `#` comments are skipped, the first `=` splits name from value, and a value
//! wrapped in one matching pair of quotes loses that pair.

use crate::{
    config::{DEFAULT_OVERRIDE, DEFAULT_VERBOSE, ENV_FILE_COMMENT_PREFIX, KEY_VALUE_SEPARATOR},
    error::{LoaderError, Result},
};
use std::{collections::HashMap, path::Path};
use tracing::{debug, info, instrument};

/// Options controlling how environment files are read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvFileOptions {
    /// Replace an already loaded variable when it is defined again
    pub override_existing: bool,
    /// Report each opened file and each assignment
    pub verbose: bool,
}

impl Default for EnvFileOptions {
    fn default() -> Self {
        Self {
            override_existing: DEFAULT_OVERRIDE,
            verbose: DEFAULT_VERBOSE,
        }
    }
}

/// What happened when a variable was offered to an [`Env`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// First definition of the name
    Added,
    /// An earlier value was replaced
    Overridden,
    /// An earlier value was kept and the new one dropped
    Kept,
}

/// Insertion-ordered set of environment variables with unique names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Env {
    entries: Vec<(String, String)>,
    positions: HashMap<String, usize>,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer `key = value`, resolving a duplicate name with `override_existing`
    pub fn assign(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
        override_existing: bool,
    ) -> Assignment {
        let key = key.into();
        match self.positions.get(&key) {
            Some(&index) if override_existing => {
                self.entries[index].1 = value.into();
                Assignment::Overridden
            }
            Some(_) => Assignment::Kept,
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, value.into()));
                Assignment::Added
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.positions
            .get(key)
            .map(|&index| self.entries[index].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Variables in first-definition order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl IntoIterator for Env {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Parse a single environment file
pub fn parse_env_file<P: AsRef<Path>>(path: P, options: EnvFileOptions) -> Result<Env> {
    let mut env = Env::new();
    load_into(path.as_ref(), options, &mut env)?;
    Ok(env)
}

/// Parse several environment files in order into one map
///
/// The override policy spans the whole sequence: with overriding disabled the
/// first definition seen in any file wins.
#[instrument(skip(paths))]
pub fn parse_env_files<P: AsRef<Path>>(paths: &[P], options: EnvFileOptions) -> Result<Env> {
    let mut env = Env::new();
    for path in paths {
        load_into(path.as_ref(), options, &mut env)?;
    }
    debug!("Loaded {} variables from {} file(s)", env.len(), paths.len());
    Ok(env)
}

fn load_into(path: &Path, options: EnvFileOptions, env: &mut Env) -> Result<()> {
    let content =
        std::fs::read_to_string(path).map_err(|e| LoaderError::env_file_read(path, e))?;

    if options.verbose {
        info!("Parsing file \"{}\"", path.display());
    }

    for (index, line) in content.split('\n').enumerate() {
        let line_number = index + 1;
        let parsed = parse_line(line)
            .map_err(|message| LoaderError::env_file_line(path, line_number, message))?;
        let Some((key, value)) = parsed else {
            continue;
        };

        let assignment = env.assign(key, value, options.override_existing);
        if options.verbose {
            match assignment {
                Assignment::Added => info!("Successfully parsed: {} = {}", key, value),
                Assignment::Overridden => info!("Successfully overridden: {} = {}", key, value),
                Assignment::Kept => debug!("Keeping first value of {}", key),
            }
        }
    }

    Ok(())
}

/// Split one line into a name and its unquoted value
///
/// Returns `Ok(None)` for lines that carry no assignment.
fn parse_line(line: &str) -> std::result::Result<Option<(&str, &str)>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(ENV_FILE_COMMENT_PREFIX) {
        return Ok(None);
    }

    let Some((key, value)) = line.split_once(KEY_VALUE_SEPARATOR) else {
        return Err(format!(
            "Invalid variable separator, expected \"NAME{KEY_VALUE_SEPARATOR}VALUE\" format"
        ));
    };

    let key = key.trim();
    if key.is_empty() {
        return Err(format!(
            "Variable name not found, expected \"NAME{KEY_VALUE_SEPARATOR}VALUE\" format"
        ));
    }

    Ok(Some((key, strip_quotes(value.trim()))))
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
