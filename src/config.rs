use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub window: WindowSettings,
    pub update: UpdateSettings,
    pub validation: ValidationSettings,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
    pub header_font_size: f32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Youtube Downloader".to_string(),
            width: 800.0,
            height: 600.0,
            font_size: 16.0,
            header_font_size: 18.0,
        }
    }
}

/// Launch-time self-update
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct UpdateSettings {
    pub enabled: bool,
    /// Upgrade the downloader package through pip
    pub upgrade_downloader: bool,
    /// `git pull` the application checkout
    pub pull_self: bool,
    pub python: String,
    pub package: String,
    pub git: String,
    /// Checkout to pull; the working directory when unset
    pub repo_dir: Option<PathBuf>,
}

impl Default for UpdateSettings {
    fn default() -> Self {
        let python = if cfg!(target_os = "windows") { "python" } else { "python3" };
        Self {
            enabled: true,
            upgrade_downloader: true,
            pull_self: true,
            python: python.to_string(),
            package: "yt-dlp".to_string(),
            git: "git".to_string(),
            repo_dir: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ValidationSettings {
    /// Treat scheme-less input as https
    pub assume_https: bool,
    /// Accepted domains (subdomains included); empty accepts any host
    pub allowed_hosts: Vec<String>,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            assume_https: true,
            allowed_hosts: Vec::new(),
        }
    }
}

impl Settings {
    /// Per-user settings location, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "yt-queue").map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the explicit `path` if given, else the per-user file.
    ///
    /// An explicit path must load. The per-user file is optional: missing
    /// means defaults, unreadable or malformed means defaults plus a warning.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load_from(path);
        }

        let Some(path) = Self::default_path() else {
            return Ok(Self::default());
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        match Self::load_from(&path) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring settings file");
                Ok(Self::default())
            }
        }
    }
}
