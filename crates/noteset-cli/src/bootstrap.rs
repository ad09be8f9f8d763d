use std::path::Path;

use noteset_config::NotesetConfig;

/// Load layered configuration for a project, after its `.env` file.
pub fn load_config(project_root: &Path) -> anyhow::Result<NotesetConfig> {
    let config = NotesetConfig::load_with_dotenv_in(project_root)?;
    if config.store.is_in_memory() {
        tracing::warn!("store path is ':memory:'; changes will not survive this process");
    }
    Ok(config)
}
