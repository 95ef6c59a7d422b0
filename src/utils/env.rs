//! Environment variable utilities
//!
//! Combines the host's own environment with the variables loaded from files.

use crate::core::env_file::Env;
use std::{collections::HashMap, env, ffi::OsString};
use tracing::debug;

/// Environment variable utilities
#[derive(Debug)]
pub struct EnvUtils;

impl EnvUtils {
    /// The current process environment, including non UTF-8 entries
    pub fn process_vars() -> Vec<(OsString, OsString)> {
        env::vars_os().collect()
    }

    /// Merge loaded variables into `base`
    ///
    /// With `override_existing` a loaded variable replaces a base variable of
    /// the same name; without it the base value is kept and only new names are
    /// added. Base order is preserved and new names are appended in load order.
    pub fn merge<I>(base: I, loaded: &Env, override_existing: bool) -> Vec<(OsString, OsString)>
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let mut merged: Vec<(OsString, OsString)> = base.into_iter().collect();
        let mut positions: HashMap<OsString, usize> = merged
            .iter()
            .enumerate()
            .map(|(index, (key, _))| (key.clone(), index))
            .collect();

        for (key, value) in loaded.iter() {
            let key = OsString::from(key);
            match positions.get(&key) {
                Some(&index) if override_existing => merged[index].1 = OsString::from(value),
                Some(_) => debug!("Keeping inherited value of {:?}", key),
                None => {
                    positions.insert(key.clone(), merged.len());
                    merged.push((key, OsString::from(value)));
                }
            }
        }

        merged
    }
}
