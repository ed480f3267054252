use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PublishError, Result};

/// File name looked up in the working copy.
pub const CONFIG_FILE_NAME: &str = "publish.toml";

/// File name looked up in the user config directory.
pub const USER_CONFIG_FILE_NAME: &str = ".publish.toml";

pub const DEFAULT_REMOTE: &str = "origin";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_COMMIT_MESSAGE: &str = "Initial commit: FastAPI blog backend";
pub const DEFAULT_PROGRAM: &str = "git";

/// Represents the complete configuration for repo-publish.
///
/// Contains the publish target, the version-control tool to drive, and behavior options.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub publish: PublishConfig,

    #[serde(default)]
    pub tool: ToolConfig,

    #[serde(default)]
    pub behavior: BehaviorConfig,
}

fn default_remote() -> String {
    DEFAULT_REMOTE.to_string()
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

fn default_commit_message() -> String {
    DEFAULT_COMMIT_MESSAGE.to_string()
}

fn default_program() -> String {
    DEFAULT_PROGRAM.to_string()
}

fn default_true() -> bool {
    true
}

/// Where and how the working copy gets published.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PublishConfig {
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_branch")]
    pub branch: String,

    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    /// Used when no URL is passed on the command line; skips the prompt.
    #[serde(default)]
    pub remote_url: Option<String>,
}

impl Default for PublishConfig {
    fn default() -> Self {
        PublishConfig {
            remote: default_remote(),
            branch: default_branch(),
            commit_message: default_commit_message(),
            remote_url: None,
        }
    }
}

/// The version-control executable to drive.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ToolConfig {
    #[serde(default = "default_program")]
    pub program: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        ToolConfig {
            program: default_program(),
        }
    }
}

/// Configuration for behavior customization.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BehaviorConfig {
    #[serde(default = "default_true")]
    pub pause_on_exit: bool,

    #[serde(default)]
    pub verbose: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        BehaviorConfig {
            pause_on_exit: true,
            verbose: false,
        }
    }
}

impl Config {
    /// Parses a configuration document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| PublishError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let required = [
            ("publish.remote", &self.publish.remote),
            ("publish.branch", &self.publish.branch),
            ("publish.commit_message", &self.publish.commit_message),
            ("tool.program", &self.tool.program),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(PublishError::config(format!("{} must not be empty", field)));
            }
        }
        Ok(())
    }
}

/// Resolves which configuration file applies, if any.
///
/// Lookup order:
/// 1. Custom path provided as parameter
/// 2. `publish.toml` in the working directory
/// 3. `.publish.toml` in the user config directory
pub fn locate_config(config_path: Option<&str>, work_dir: &Path) -> Option<PathBuf> {
    if let Some(path) = config_path {
        return Some(PathBuf::from(path));
    }

    let local = work_dir.join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(USER_CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}

/// Loads configuration from file or returns defaults.
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
/// * `work_dir` - Working copy searched for `publish.toml`
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>, work_dir: &Path) -> Result<Config> {
    match locate_config(config_path, work_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path).map_err(|e| {
                PublishError::config(format!("cannot read {}: {}", path.display(), e))
            })?;
            Config::from_toml(&content)
        }
        None => Ok(Config::default()),
    }
}
