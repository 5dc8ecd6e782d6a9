//! `AppConfig` struct and TOML read/write.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides the configured API key.
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Directory name under the user config directory.
const APP_DIR: &str = "reelview";

/// Config file name.
const CONFIG_FILE: &str = "config.toml";

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB access settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
}

/// TMDB access configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TmdbConfig {
    /// TMDB v3 API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Response language (e.g. "en-US"). Provider default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl AppConfig {
    /// Resolves the config file path.
    ///
    /// - If `dir` is `Some`, returns `{dir}/config.toml`.
    /// - Otherwise `$XDG_CONFIG_HOME/reelview/config.toml` when that variable
    ///   holds an absolute path, else `~/.config/reelview/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if no directory can be determined.
    pub fn path(dir: Option<&Path>) -> Result<PathBuf> {
        config_path_from(
            dir,
            std::env::var_os("XDG_CONFIG_HOME"),
            std::env::var_os("HOME"),
        )
    }

    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Picks the API key: a non-blank `env_value` wins over the file.
    ///
    /// # Errors
    ///
    /// Returns an error if neither source provides a non-blank key.
    pub fn resolve_api_key(&self, env_value: Option<String>) -> Result<String> {
        let from_env = env_value.filter(|key| !key.trim().is_empty());
        let from_file = || {
            self.tmdb
                .api_key
                .clone()
                .filter(|key| !key.trim().is_empty())
        };

        match from_env.or_else(from_file) {
            Some(key) => Ok(key),
            None => bail!(
                "TMDB API key is not configured: set {API_KEY_ENV} or run `reelview config set-key`"
            ),
        }
    }
}

/// Resolves the config path from explicit environment values.
fn config_path_from(
    dir: Option<&Path>,
    xdg_config_home: Option<OsString>,
    home: Option<OsString>,
) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE));
    }

    let xdg = xdg_config_home
        .map(PathBuf::from)
        .filter(|path| path.is_absolute());
    let base = if let Some(xdg) = xdg {
        xdg
    } else {
        let home = home
            .filter(|home| !home.is_empty())
            .context("neither XDG_CONFIG_HOME nor HOME is set")?;
        PathBuf::from(home).join(".config")
    };

    Ok(base.join(APP_DIR).join(CONFIG_FILE))
}
