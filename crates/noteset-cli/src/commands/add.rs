use anyhow::bail;
use noteset_schema::validator::EMPTY_CONTENT;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AddArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `noteset add`. Appends regardless of the create policy, which
/// governs submissions only.
pub async fn handle(args: &AddArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if !ctx.config.validation.allow_empty_content && args.content.trim().is_empty() {
        bail!("{EMPTY_CONTENT}");
    }
    let note = ctx.service.create_note(&args.content).await?;
    output(&note, flags.format)
}
