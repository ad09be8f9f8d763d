use std::path::PathBuf;

use anyhow::Context;
use noteset_config::NotesetConfig;
use noteset_db::service::NoteService;
use noteset_schema::{SubmissionValidator, ValidatorOptions};

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: NoteService,
    pub validator: SubmissionValidator,
    pub config: NotesetConfig,
    pub project_root: PathBuf,
}

impl AppContext {
    /// Open the configured store for the discovered project root.
    pub async fn init(project_root: PathBuf, config: NotesetConfig) -> anyhow::Result<Self> {
        let db_path = config.store.resolved_path(&project_root);
        let db_path_str = db_path.to_string_lossy();

        let service = NoteService::new_local(&db_path_str, config.store.create_policy)
            .await
            .with_context(|| format!("failed to open note store at {db_path_str}"))?;

        tracing::debug!(
            store = %db_path_str,
            create_policy = %config.store.create_policy.as_str(),
            "note store opened"
        );

        Ok(Self {
            service,
            validator: SubmissionValidator::new(validator_options(&config)),
            config,
            project_root,
        })
    }
}

/// Validation knobs derived from configuration.
#[must_use]
pub fn validator_options(config: &NotesetConfig) -> ValidatorOptions {
    ValidatorOptions {
        create_policy: config.store.create_policy,
        allow_empty_content: config.validation.allow_empty_content,
    }
}
