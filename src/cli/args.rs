//! Defines the command-line arguments and subcommands for the snapkeep CLI.
//!
//! Uses the `clap` crate with its "derive" feature for a declarative,
//! type-safe argument structure.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "snapkeep",
    version,
    about = "Inspect snapshot store files recorded by snapkeep."
)]
pub struct SnapkeepArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the snapshot keys of a store, in file order.
    List {
        /// The store file to read.
        #[arg(required = true)]
        store: PathBuf,
    },
    /// Print one stored snapshot value.
    Show {
        /// The store file to read.
        #[arg(required = true)]
        store: PathBuf,
        /// The snapshot key, e.g. `tests::render(0)`.
        #[arg(required = true)]
        key: String,
    },
    /// Verify that store files parse; prints the number of entries of each.
    Check {
        /// The store files to verify.
        #[arg(required = true, num_args = 1..)]
        stores: Vec<PathBuf>,
    },
}
