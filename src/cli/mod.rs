//! The snapkeep command-line interface.
//!
//! Read-only inspection of store files; recording and updating only happen
//! through snapshot assertions inside tests.

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::args::{Command, SnapkeepArgs};
use crate::errors::{Result, SnapshotError};
use crate::store::SnapshotStore;

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    init_tracing();
    let args = SnapkeepArgs::parse();

    let result = match args.command {
        Command::List { store } => handle_list(&store),
        Command::Show { store, key } => handle_show(&store, &key),
        Command::Check { stores } => handle_check(&stores),
    };

    if let Err(e) = result {
        output::print_error(e);
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_list(path: &Path) -> Result<()> {
    let store = load_existing(path)?;
    output::print_keys(&store);
    Ok(())
}

fn handle_show(path: &Path, key: &str) -> Result<()> {
    let store = load_existing(path)?;
    let value = store.get(key).ok_or_else(|| SnapshotError::UnknownKey {
        key: key.to_string(),
        path: path.to_path_buf(),
    })?;
    output::print_value(&value.render()?);
    Ok(())
}

fn handle_check(paths: &[PathBuf]) -> Result<()> {
    for path in paths {
        let store = load_existing(path)?;
        output::print_check(&store);
    }
    Ok(())
}

/// Like [`SnapshotStore::load`], but a missing file is an error here.
fn load_existing(path: &Path) -> Result<SnapshotStore> {
    if !path.exists() {
        return Err(SnapshotError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "store file not found"),
        ));
    }
    SnapshotStore::load(path)
}
