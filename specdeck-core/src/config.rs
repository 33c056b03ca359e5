//! Configuration system for Specdeck.
//!
//! Uses `figment` for layered configuration: defaults -> config file -> environment -> overrides.
//! Configuration is loaded from the user config dir (`config.toml`) and/or
//! `.specdeck/config.toml` in the workspace directory.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, SpecdeckError};
use crate::view::ViewOptions;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecdeckConfig {
    pub catalog: CatalogConfig,
    pub view: ViewConfig,
}

/// Where system data comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON catalog document on disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Base URL of a catalog service. Takes precedence over `path`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Request timeout for the catalog service, in seconds.
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: None,
            base_url: None,
            timeout_secs: 10,
        }
    }
}

impl CatalogConfig {
    /// Validate and return human-readable warnings. Never fails.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.path.is_none() && self.base_url.is_none() {
            warnings.push("no catalog path or base_url configured; nothing to compare".to_string());
        }
        if self.path.is_some() && self.base_url.is_some() {
            warnings.push("both catalog path and base_url are set; base_url wins".to_string());
        }
        if self.timeout_secs == 0 {
            warnings.push("timeout_secs is 0; every catalog request will time out".to_string());
        }
        warnings
    }
}

/// Matrix rendering defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Hide rows whose raw values are identical on both sides.
    pub diff_only: bool,
    /// Emit a divider at each category boundary.
    pub show_category_headers: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            diff_only: false,
            show_category_headers: true,
        }
    }
}

impl From<&ViewConfig> for ViewOptions {
    fn from(config: &ViewConfig) -> Self {
        ViewOptions {
            diff_only: config.diff_only,
            show_category_headers: config.show_category_headers,
        }
    }
}

impl SpecdeckConfig {
    pub fn validate(&self) -> Vec<String> {
        self.catalog.validate()
    }
}

fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "specdeck", "specdeck")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".specdeck").join("config.toml")
}

/// Load configuration with layered sources.
///
/// Priority (highest to lowest):
/// 1. Explicit overrides (passed as argument)
/// 2. Environment variables (prefixed with `SPECDECK_`)
/// 3. Workspace-local config (`.specdeck/config.toml`)
/// 4. User config (`~/.config/specdeck/config.toml`)
/// 5. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&SpecdeckConfig>,
) -> Result<SpecdeckConfig, Box<figment::Error>> {
    let mut figment = layered(workspace, None);

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    figment.extract().map_err(Box::new)
}

/// Load configuration with an explicit file layered above the workspace
/// config and below the environment. The file must exist.
pub fn load_config_file(workspace: Option<&Path>, file: &Path) -> crate::Result<SpecdeckConfig> {
    if !file.exists() {
        return Err(ConfigError::FileNotFound {
            path: file.to_path_buf(),
        }
        .into());
    }
    layered(workspace, Some(file)).extract().map_err(|e| {
        SpecdeckError::from(ConfigError::ParseError {
            message: e.to_string(),
        })
    })
}

fn layered(workspace: Option<&Path>, file: Option<&Path>) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(SpecdeckConfig::default()));

    if let Some(user_config) = user_config_path() {
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    if let Some(ws) = workspace {
        let ws_config = workspace_config_path(ws);
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    if let Some(file) = file {
        figment = figment.merge(Toml::file(file));
    }

    // SPECDECK_CATALOG__PATH, SPECDECK_VIEW__DIFF_ONLY, ...
    figment.merge(Env::prefixed("SPECDECK_").split("__"))
}

/// Check whether a user-level or workspace-level config file exists.
pub fn config_exists(workspace: Option<&Path>) -> bool {
    if user_config_path().is_some_and(|p| p.exists()) {
        return true;
    }
    workspace.is_some_and(|ws| workspace_config_path(ws).exists())
}

/// Write the default configuration into `<workspace>/.specdeck/config.toml`.
///
/// Refuses to overwrite an existing file. Returns the path written.
pub fn write_default_config(workspace: &Path) -> Result<PathBuf, ConfigError> {
    let path = workspace_config_path(workspace);
    if path.exists() {
        return Err(ConfigError::Invalid {
            message: format!("{} already exists", path.display()),
        });
    }
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::Invalid {
            message: format!("Failed to create {}: {}", dir.display(), e),
        })?;
    }
    let toml_str =
        toml::to_string_pretty(&SpecdeckConfig::default()).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
    std::fs::write(&path, toml_str).map_err(|e| ConfigError::Invalid {
        message: format!("Failed to write {}: {}", path.display(), e),
    })?;
    Ok(path)
}
