//! # noteset-config
//!
//! Layered configuration loading for Noteset using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`NOTESET_*` prefix, `__` as separator)
//! 2. Project-level `.noteset/config.toml`
//! 3. User-level `~/.config/noteset/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `NOTESET_STORE__PATH` -> `store.path`,
//! `NOTESET_SERVER__MAX_BODY_BYTES` -> `server.max_body_bytes`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use noteset_config::NotesetConfig;
//!
//! let config = NotesetConfig::load_with_dotenv().expect("config");
//! println!("store: {}", config.store.path);
//! ```

mod error;
mod server;
mod store;
mod validation;

pub use error::ConfigError;
pub use server::ServerConfig;
pub use store::{IN_MEMORY, StoreConfig};
pub use validation::ValidationConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project-local directory holding config and the default database.
pub const PROJECT_DIR: &str = ".noteset";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NotesetConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl NotesetConfig {
    /// Load configuration for the project in the current directory.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_in(Path::new("."))
    }

    /// Load configuration for the project rooted at `project_root`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is invalid.
    pub fn load_in(project_root: &Path) -> Result<Self, ConfigError> {
        let config: Self = Self::figment_in(project_root).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` as for [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_with_dotenv_in(Path::new("."))
    }

    /// Load `.env` from `project_root` (or the current directory) and then
    /// the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` as for [`Self::load`].
    pub fn load_with_dotenv_in(project_root: &Path) -> Result<Self, ConfigError> {
        Self::load_dotenv(project_root);
        Self::load_in(project_root)
    }

    /// Provider chain for the project in the current directory.
    #[must_use]
    pub fn figment() -> Figment {
        Self::figment_in(Path::new("."))
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment_in(project_root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = Self::project_config_path(project_root);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("NOTESET_").split("__"))
    }

    /// Cross-field checks figment cannot express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "store.path".into(),
                reason: "must not be empty".into(),
            });
        }
        self.server.validate()
    }

    /// `.noteset/config.toml` under `project_root`.
    #[must_use]
    pub fn project_config_path(project_root: &Path) -> PathBuf {
        project_root.join(PROJECT_DIR).join("config.toml")
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("noteset").join("config.toml"))
    }

    /// Load `.env` from the project root, falling back to the current
    /// directory and its ancestors. Silently does nothing if none is found.
    fn load_dotenv(project_root: &Path) {
        let env_path = project_root.join(".env");
        if env_path.exists() {
            let _ = dotenvy::from_path(&env_path);
            return;
        }
        let _ = dotenvy::dotenv();
    }
}
