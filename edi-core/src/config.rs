//! Client configuration
//!
//! ## Configuration Sources (in precedence order)
//!
//! 1. CLI flags (applied by the caller)
//! 2. `EDI_BASE_URL` / `EDI_LANG` environment variables
//! 3. `.edi/config.json` - Project-level config
//! 4. `<platform config dir>/edi/config.json` - Global config
//! 5. Built-in defaults
//!
//! ## Directory Structure
//!
//! ```text
//! .edi/
//! ├── config.json          # base_url, timeout_seconds, language, session_id
//! └── locales/             # optional overrides, see `locale`
//!     ├── questions.json
//!     └── strings.json
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

use crate::client::SessionId;
use crate::locale::{language_name, DEFAULT_LANGUAGE};

pub const ENV_BASE_URL: &str = "EDI_BASE_URL";
pub const ENV_LANG: &str = "EDI_LANG";

/// Default project config directory, relative to the working directory
pub const PROJECT_CONFIG_DIR: &str = ".edi";

/// Settings for talking to the triage backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server root; endpoint paths are appended to it
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Active language code
    #[serde(default = "default_language")]
    pub language: String,

    /// Fixed conversation id; generated per run when absent
    #[serde(default)]
    pub session_id: Option<String>,

    /// Log requests instead of sending them. CLI-only, never read from files.
    #[serde(skip)]
    pub dry_run: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            language: default_language(),
            session_id: None,
            dry_run: false,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl ClientConfig {
    /// Load config from a directory's config.json
    ///
    /// Returns `None` when the file does not exist or cannot be read. A file
    /// that fails to parse logs a warning and yields the defaults.
    pub fn load_from_dir(dir: &Path) -> Option<Self> {
        let config_path = dir.join("config.json");
        if !config_path.exists() {
            trace!("No config at {}", config_path.display());
            return None;
        }

        match std::fs::read_to_string(&config_path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    debug!("Loaded client config from {}", config_path.display());
                    Some(config)
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}", config_path.display(), e);
                    Some(Self::default())
                }
            },
            Err(e) => {
                warn!("Failed to read {}: {}", config_path.display(), e);
                None
            }
        }
    }

    /// Project config, else global config, else defaults
    pub fn load(project_dir: Option<&Path>, global_dir: Option<&Path>) -> Self {
        project_dir
            .and_then(Self::load_from_dir)
            .or_else(|| global_dir.and_then(Self::load_from_dir))
            .unwrap_or_default()
    }

    /// Overlay `EDI_BASE_URL` and `EDI_LANG` when set and non-empty
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(base_url) = non_empty_env(ENV_BASE_URL) {
            debug!("Using {} override: {}", ENV_BASE_URL, base_url);
            self.base_url = base_url;
        }
        if let Some(language) = non_empty_env(ENV_LANG) {
            debug!("Using {} override: {}", ENV_LANG, language);
            self.language = language;
        }
        self
    }

    /// Configured session id, or a freshly generated one
    pub fn session_id(&self) -> SessionId {
        match &self.session_id {
            Some(id) => SessionId::from(id.as_str()),
            None => SessionId::generate(),
        }
    }

    /// Warn about settings that will silently degrade
    pub fn check(&self) {
        if language_name(&self.language).is_none() {
            warn!(
                "Language '{}' is not supported; English content will be used",
                self.language
            );
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Project and global configuration directories
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub project: PathBuf,
    /// `None` when no global directory exists (graceful absence)
    pub global: Option<PathBuf>,
}

impl ConfigPaths {
    /// Resolve paths for a project config directory and the platform global one
    pub fn discover(project: impl Into<PathBuf>) -> Self {
        let global = platform_config_dir()
            .map(|dir| dir.join("edi"))
            .filter(|dir| {
                let exists = dir.exists();
                if !exists {
                    debug!("No global configuration found at {:?}", dir);
                }
                exists
            });

        Self {
            project: project.into(),
            global,
        }
    }

    /// Load the client config these paths point at, with env overrides applied
    pub fn load_client_config(&self) -> ClientConfig {
        ClientConfig::load(Some(&self.project), self.global.as_deref()).with_env_overrides()
    }
}

/// Platform config root
///
/// On Linux: ~/.config/
/// On macOS: ~/Library/Application Support/
/// On Windows: %APPDATA%\
fn platform_config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "edi")
        .and_then(|dirs| dirs.config_dir().parent().map(Path::to_path_buf))
}
