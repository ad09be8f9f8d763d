use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use noteset_config::PROJECT_DIR;

mod bootstrap;
mod boundary;
mod cli;
mod commands;
mod context;
mod output;
mod server;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("noteset error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    output::init(&flags);

    match &cli.command {
        cli::Commands::Init(args) => {
            let root = init_root(flags.project.as_deref())?;
            return commands::init::handle(args, &root, &flags).await;
        }
        cli::Commands::Schema(args) => return commands::schema::handle(args, &flags),
        _ => {}
    }

    let project_root = resolve_project_root(flags.project.as_deref())?;
    let config = bootstrap::load_config(&project_root)?;

    let ctx = context::AppContext::init(project_root, config)
        .await
        .context("failed to initialize noteset application context")?;

    commands::dispatch::dispatch(cli.command, &ctx, &flags).await
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("NOTESET_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

/// `--project` may name the project root or its `.noteset` directory.
fn strip_project_dir(path: &Path) -> anyhow::Result<PathBuf> {
    if path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name == PROJECT_DIR)
    {
        return path
            .parent()
            .map(Path::to_path_buf)
            .context("invalid --project path: '.noteset' directory has no parent");
    }
    Ok(path.to_path_buf())
}

fn resolve_project_root(project_override: Option<&str>) -> anyhow::Result<PathBuf> {
    if let Some(path) = project_override {
        let explicit = strip_project_dir(Path::new(path))?;
        if explicit.join(PROJECT_DIR).is_dir() {
            return Ok(explicit);
        }
        anyhow::bail!(
            "invalid --project '{}': no {PROJECT_DIR} directory. Run 'noteset init' first.",
            explicit.display()
        );
    }

    let start = std::env::current_dir().context("failed to read current directory")?;
    context::find_project_root(&start)
        .context("not a noteset project (no .noteset directory found). Run 'noteset init' first.")
}

fn init_root(project_override: Option<&str>) -> anyhow::Result<PathBuf> {
    match project_override {
        Some(path) => strip_project_dir(Path::new(path)),
        None => std::env::current_dir().context("failed to read current directory"),
    }
}
