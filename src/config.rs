//! Saved preferences and exclusion rules.

use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::classify;
use crate::error::Result;
use crate::structure::StructureFormat;
use crate::template::{DEFAULT_END_TEMPLATE, DEFAULT_START_TEMPLATE};

/// Directory under the user config dir holding the config file.
pub const CONFIG_DIR_NAME: &str = "fcs";
/// Config file name.
pub const CONFIG_FILENAME: &str = "config.json";

fn default_start_comment() -> String {
    DEFAULT_START_TEMPLATE.to_string()
}

fn default_end_comment() -> String {
    DEFAULT_END_TEMPLATE.to_string()
}

/// Combine preferences persisted between runs.
///
/// Every field has a default, so a config file written by an older
/// version still loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Structure header format.
    #[serde(default)]
    pub structure_format: StructureFormat,
    /// Drop delimiter comments and the structure header.
    #[serde(default)]
    pub disable_comments: bool,
    /// Start delimiter template.
    #[serde(default = "default_start_comment")]
    pub start_comment: String,
    /// End delimiter template.
    #[serde(default = "default_end_comment")]
    pub end_comment: String,
    /// Exclusion patterns, one per line.
    #[serde(default)]
    pub exclusion_filter: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            structure_format: StructureFormat::default(),
            disable_comments: false,
            start_comment: default_start_comment(),
            end_comment: default_end_comment(),
            exclusion_filter: String::new(),
        }
    }
}

impl Preferences {
    /// Load preferences from `path`. A missing file or one that fails to
    /// parse yields the defaults; the parse failure is logged rather
    /// than propagated so a corrupt config never blocks a run.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        match serde_json::from_str(&text) {
            Ok(prefs) => {
                log::debug!("loaded preferences from {}", path.display());
                Ok(prefs)
            }
            Err(err) => {
                log::warn!("ignoring unparsable config {}: {}", path.display(), err);
                Ok(Self::default())
            }
        }
    }

    /// Save preferences to `path`, creating parent directories as
    /// needed.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Compiled exclusion patterns.
///
/// Two pattern kinds: a trailing slash (`node_modules/`) excludes that
/// directory and everything under it; anything else is a glob matched
/// against the full path and, separately, the file name, so `*.log`
/// catches log files at any depth.
#[derive(Debug)]
pub struct ExclusionRules {
    globs: GlobSet,
    prefixes: Vec<String>,
}

impl Default for ExclusionRules {
    fn default() -> Self {
        Self { globs: GlobSet::empty(), prefixes: Vec::new() }
    }
}

impl ExclusionRules {
    /// Compile patterns into a rule set. Blank patterns are skipped;
    /// surrounding whitespace is ignored.
    pub fn compile<'a, I>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut builder = GlobSetBuilder::new();
        let mut prefixes = Vec::new();
        for pattern in patterns {
            let pattern = pattern.trim();
            if pattern.is_empty() {
                continue;
            }
            if let Some(dir) = pattern.strip_suffix('/') {
                if !dir.is_empty() {
                    prefixes.push(format!("{}/", dir));
                }
            } else {
                builder.add(Glob::new(pattern)?);
            }
        }
        Ok(Self { globs: builder.build()?, prefixes })
    }

    /// Whether `path` is excluded. `path` uses forward slashes.
    pub fn is_excluded(&self, path: &str) -> bool {
        for prefix in &self.prefixes {
            if path.starts_with(prefix.as_str()) || prefix.strip_suffix('/') == Some(path) {
                return true;
            }
        }
        if self.globs.is_match(path) {
            return true;
        }
        let name = classify::basename(path);
        name != path && self.globs.is_match(name)
    }

    pub fn is_empty(&self) -> bool {
        self.globs.is_empty() && self.prefixes.is_empty()
    }
}
