use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level commands.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create `.noteset/` in a directory and open its store.
    Init(InitArgs),
    /// Print every note in store order.
    List,
    /// Append one note with a store-assigned id.
    Add(AddArgs),
    /// Submit an edited list and reconcile the store with it.
    Submit(SubmitArgs),
    /// Serve the list editor boundary over HTTP.
    Serve(ServeArgs),
    /// Print a registered JSON schema, or the registered names.
    Schema(SchemaArgs),
}

/// Arguments for `noteset init`.
#[derive(Clone, Debug, Args)]
pub struct InitArgs {
    /// Note content to add after creating the store (repeatable).
    #[arg(long = "seed", value_name = "CONTENT")]
    pub seeds: Vec<String>,
}

/// Arguments for `noteset add`.
#[derive(Clone, Debug, Args)]
pub struct AddArgs {
    pub content: String,
}

/// Arguments for `noteset submit`.
#[derive(Clone, Debug, Args)]
pub struct SubmitArgs {
    /// Read the submission from a file instead of stdin.
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Treat the input as a JSON document instead of a urlencoded form.
    #[arg(long)]
    pub json: bool,
    /// Validate and print the reconcile plan without writing.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for `noteset serve`.
#[derive(Clone, Debug, Args)]
pub struct ServeArgs {
    /// Listen address, overriding `server.bind`.
    #[arg(long)]
    pub bind: Option<String>,
}

/// Arguments for `noteset schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    pub type_name: Option<String>,
}
