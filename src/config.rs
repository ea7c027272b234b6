use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".transkeyrc.json";

const DEFAULT_MATCHES: &[&str] = &["this._translate", "_translate"];
const LENIENT_MATCHES: &[&str] = &["translate", "trans"];

const DEFAULT_LANGUAGES: &[&str] = &["typescript", "html"];
const LENIENT_LANGUAGES: &[&str] = &["javascript"];

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Prefixes that mark a translation reference, in priority order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches: Option<Vec<String>>,
    /// Language ids of the buffers to resolve in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    /// Translation files, relative to the project root.
    #[serde(default)]
    pub paths: Vec<String>,
    /// Widen the built-in defaults for `matches` and `languages`.
    #[serde(default)]
    pub lenient: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            matches: Some(default_matches(false)),
            languages: Some(default_languages(false)),
            paths: Vec::new(),
            lenient: false,
        }
    }
}

fn default_matches(lenient: bool) -> Vec<String> {
    let extra: &[&str] = if lenient { LENIENT_MATCHES } else { &[] };
    DEFAULT_MATCHES
        .iter()
        .chain(extra)
        .map(|s| s.to_string())
        .collect()
}

fn default_languages(lenient: bool) -> Vec<String> {
    let extra: &[&str] = if lenient { LENIENT_LANGUAGES } else { &[] };
    DEFAULT_LANGUAGES
        .iter()
        .chain(extra)
        .map(|s| s.to_string())
        .collect()
}

impl Config {
    /// Configured prefixes, or the built-in defaults.
    pub fn effective_matches(&self) -> Vec<String> {
        self.matches
            .clone()
            .unwrap_or_else(|| default_matches(self.lenient))
    }

    /// Configured language ids, or the built-in defaults.
    pub fn effective_languages(&self) -> Vec<String> {
        self.languages
            .clone()
            .unwrap_or_else(|| default_languages(self.lenient))
    }

    /// Whether buffers of `language_id` should be resolved.
    pub fn applies_to(&self, language_id: &str) -> bool {
        self.effective_languages()
            .iter()
            .any(|lang| lang.eq_ignore_ascii_case(language_id))
    }

    /// Validate configuration values.
    ///
    /// Returns an error if a prefix is empty or contains whitespace, or a
    /// path is empty.
    pub fn validate(&self) -> Result<()> {
        for prefix in self.matches.iter().flatten() {
            if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
                bail!("Invalid prefix in 'matches': \"{}\"", prefix);
            }
        }

        for path in &self.paths {
            if path.trim().is_empty() {
                bail!("Empty entry in 'paths'");
            }
        }

        Ok(())
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
    /// Directory translation paths are resolved against: the directory of the
    /// config file, or the start directory.
    pub root: PathBuf,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            let root = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| start_dir.to_path_buf());
            Ok(ConfigLoadResult {
                config,
                from_file: true,
                root,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
            root: start_dir.to_path_buf(),
        }),
    }
}
