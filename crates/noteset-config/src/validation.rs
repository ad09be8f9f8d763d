//! Submission validation settings.

use serde::{Deserialize, Serialize};

const fn default_allow_empty_content() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidationConfig {
    /// Accept notes whose content is empty or whitespace.
    #[serde(default = "default_allow_empty_content")]
    pub allow_empty_content: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            allow_empty_content: default_allow_empty_content(),
        }
    }
}
