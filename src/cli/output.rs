//! Handles all user-facing output for the CLI.
//!
//! Snapshot values are printed plain on stdout; headings are colorized when
//! stdout is a terminal.

use std::io::Write;

use miette::Report;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::errors::SnapshotError;
use crate::store::SnapshotStore;

/// Prints every key of `store`, one per line.
pub fn print_keys(store: &SnapshotStore) {
    for key in store.keys() {
        println!("{}", key);
    }
}

/// Prints a rendered snapshot value.
pub fn print_value(rendered: &str) {
    println!("{}", rendered);
}

/// Prints a one-line summary for a verified store.
pub fn print_check(store: &SnapshotStore) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
    let _ = write!(stdout, "OK");
    let _ = stdout.reset();
    let _ = writeln!(
        stdout,
        ": {} ({} snapshots)",
        store.path().display(),
        store.len()
    );
}

/// Renders an error through miette's report handler on stderr.
pub fn print_error(error: SnapshotError) {
    let report = Report::new(error);
    eprintln!("{report:?}");
}
