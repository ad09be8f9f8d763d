//! Note store configuration.

use std::path::{Path, PathBuf};

use noteset_core::enums::CreatePolicy;
use serde::{Deserialize, Serialize};

/// In-memory database marker understood by libSQL.
pub const IN_MEMORY: &str = ":memory:";

fn default_path() -> String {
    ".noteset/noteset.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Database file, relative to the project root unless absolute.
    #[serde(default = "default_path")]
    pub path: String,

    /// Whether submissions may create rows.
    #[serde(default)]
    pub create_policy: CreatePolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            create_policy: CreatePolicy::default(),
        }
    }
}

impl StoreConfig {
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path == IN_MEMORY
    }

    /// Database location with relative paths anchored at `project_root`.
    #[must_use]
    pub fn resolved_path(&self, project_root: &Path) -> PathBuf {
        let path = Path::new(&self.path);
        if self.is_in_memory() || path.is_absolute() {
            path.to_path_buf()
        } else {
            project_root.join(path)
        }
    }
}
