use crate::boundary::Boundary;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::ServeArgs;
use crate::context::AppContext;
use crate::server;

/// Handle `noteset serve`.
pub async fn handle(args: &ServeArgs, ctx: &AppContext, _flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut config = ctx.config.server.clone();
    if let Some(bind) = &args.bind {
        config.bind.clone_from(bind);
    }
    let addr = config.bind_addr()?;
    tracing::debug!(project = %ctx.project_root.display(), %addr, "starting server");

    let boundary = Boundary::new(&ctx.service, &ctx.validator, &config.list_path);
    server::serve(&boundary, addr, config.max_body_bytes).await
}
