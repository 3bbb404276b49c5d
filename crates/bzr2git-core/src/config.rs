//! Configuration management for bzr2git.

use std::fs;
use std::path::Path;

use bzr2git_bzr::Revno;
use bzr2git_git::ExternalTools;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// File name looked up inside the target repository's git directory.
pub const CONFIG_FILE: &str = "bzr2git.toml";

/// bzr2git configuration, usually loaded from `.git/bzr2git.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// External programs.
    #[serde(default)]
    pub tools: ToolsConfig,
}

impl Config {
    /// Load config from a TOML file.
    ///
    /// # Errors
    /// Returns error if file can't be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse {
            file: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Save config to a TOML file.
    ///
    /// # Errors
    /// Returns error if serialization or write fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| std::io::Error::other(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Origin URL of a source revision, shown in progress output.
    #[must_use]
    pub fn origin_url(&self, project: &str, branch: &str, revno: Revno) -> String {
        self.general
            .origin_url
            .replace("{project}", project)
            .replace("{branch}", branch)
            .replace("{revno}", &revno.to_string())
    }
}

/// General replay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// E-mail used when an author string carries none.
    #[serde(default = "default_fallback_email")]
    pub fallback_email: String,

    /// Extra attempts for revno lookups that fail transiently.
    #[serde(default = "default_lookup_retries")]
    pub lookup_retries: u32,

    /// Template with `{project}`, `{branch}` and `{revno}` placeholders.
    #[serde(default = "default_origin_url")]
    pub origin_url: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            fallback_email: default_fallback_email(),
            lookup_retries: default_lookup_retries(),
            origin_url: default_origin_url(),
        }
    }
}

fn default_fallback_email() -> String {
    "no_email@example.org".into()
}

const fn default_lookup_retries() -> u32 {
    2
}

fn default_origin_url() -> String {
    "http://bazaar.launchpad.net/~openupgrade-committers/{project}/{branch}/revision/{revno}".into()
}

/// External program names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Bazaar executable.
    #[serde(default = "default_bzr")]
    pub bzr: String,

    /// Patch executable.
    #[serde(default = "default_patch")]
    pub patch: String,

    /// Git executable, used for renames.
    #[serde(default = "default_git")]
    pub git: String,
}

impl ToolsConfig {
    /// Programs used on the git side.
    #[must_use]
    pub fn git_tools(&self) -> ExternalTools {
        ExternalTools {
            patch: self.patch.clone(),
            git: self.git.clone(),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            bzr: default_bzr(),
            patch: default_patch(),
            git: default_git(),
        }
    }
}

fn default_bzr() -> String {
    "bzr".into()
}

fn default_patch() -> String {
    "patch".into()
}

fn default_git() -> String {
    "git".into()
}
