use noteset_core::responses::NotesPage;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `noteset list`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let notes = ctx.service.list_notes().await?;
    output(&NotesPage { notes }, flags.format)
}
