use std::path::Path;

use anyhow::{Context, bail};
use noteset_config::{NotesetConfig, PROJECT_DIR};
use noteset_core::entities::Note;
use serde::Serialize;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::InitArgs;
use crate::context::AppContext;
use crate::output::output;

const CONFIG_TEMPLATE: &str = r#"# Noteset project configuration.
# NOTESET_<SECTION>__<KEY> environment variables override these values.

[store]
path = ".noteset/noteset.db"
# "enabled" lets submissions carry entries without an id.
create_policy = "disabled"

[validation]
allow_empty_content = true

[server]
bind = "127.0.0.1:8787"
max_body_bytes = 1048576
list_path = "/notes"
"#;

#[derive(Debug, Serialize)]
struct InitResponse {
    project_root: String,
    store: String,
    config_created: bool,
    seeded: Vec<Note>,
}

/// Handle `noteset init`.
pub async fn handle(args: &InitArgs, root: &Path, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = init_project(root, &args.seeds).await?;
    output(&response, flags.format)
}

async fn init_project(root: &Path, seeds: &[String]) -> anyhow::Result<InitResponse> {
    if !root.is_dir() {
        bail!("cannot initialize '{}': not a directory", root.display());
    }

    let project_dir = root.join(PROJECT_DIR);
    std::fs::create_dir_all(&project_dir)
        .with_context(|| format!("failed to create {}", project_dir.display()))?;

    let config_path = NotesetConfig::project_config_path(root);
    let config_created = !config_path.exists();
    if config_created {
        std::fs::write(&config_path, CONFIG_TEMPLATE)
            .with_context(|| format!("failed to write {}", config_path.display()))?;
    }

    let config = bootstrap::load_config(root)?;
    let ctx = AppContext::init(root.to_path_buf(), config).await?;

    let mut seeded = Vec::with_capacity(seeds.len());
    for content in seeds {
        seeded.push(ctx.service.create_note(content).await?);
    }
    tracing::info!(root = %root.display(), seeded = seeded.len(), "project initialized");

    Ok(InitResponse {
        project_root: root.display().to_string(),
        store: ctx.config.store.resolved_path(root).display().to_string(),
        config_created,
        seeded,
    })
}

#[cfg(test)]
mod tests {
    use noteset_config::NotesetConfig;
    use pretty_assertions::assert_eq;

    use super::{CONFIG_TEMPLATE, init_project};

    #[test]
    fn template_matches_defaults() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir(temp.path().join(".noteset")).unwrap();
        std::fs::write(NotesetConfig::project_config_path(temp.path()), CONFIG_TEMPLATE).unwrap();

        let from_template: NotesetConfig = NotesetConfig::figment_in(temp.path()).extract().unwrap();
        let defaults = NotesetConfig::default();
        assert_eq!(from_template.store.path, defaults.store.path);
        assert_eq!(from_template.store.create_policy, defaults.store.create_policy);
        assert_eq!(from_template.server.list_path, defaults.server.list_path);
        assert_eq!(from_template.server.max_body_bytes, defaults.server.max_body_bytes);
    }

    #[tokio::test]
    async fn init_creates_store_and_keeps_existing_config() {
        let temp = tempfile::tempdir().unwrap();

        let first = init_project(temp.path(), &["one".to_string(), "two".to_string()])
            .await
            .unwrap();
        assert!(first.config_created);
        assert_eq!(first.seeded.len(), 2);
        assert!(temp.path().join(".noteset/noteset.db").exists());

        let second = init_project(temp.path(), &[]).await.unwrap();
        assert!(!second.config_created);
        assert!(second.seeded.is_empty());
    }

    #[tokio::test]
    async fn init_rejects_missing_directory() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("nope");
        assert!(init_project(&missing, &[]).await.is_err());
    }
}
