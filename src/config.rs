//! Runtime configuration for snapshot assertions.
//!
//! The two behavioral toggles come from the environment, the way test
//! runners are usually driven:
//! - `UPDATE` turns on update mode, letting divergent snapshots be rewritten;
//! - `CI` marks a continuous-integration run, where no snapshot may be created.
//!
//! A toggle counts as set when the variable exists and is not empty.

use std::env;
use std::ffi::OsString;

pub const UPDATE_ENV: &str = "UPDATE";
pub const CI_ENV: &str = "CI";
pub const DEFAULT_SNAPSHOT_DIR: &str = "__snapshots__";
pub const DEFAULT_EXTENSION: &str = ".snap";

/// Configuration for one snapshot assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotConfig {
    /// Divergences overwrite the stored value instead of failing.
    pub update: bool,
    /// Creating snapshots or snapshot directories is forbidden.
    pub ci: bool,
    /// Color the divergence report.
    pub use_colors: bool,
    /// Subdirectory, next to the test file, holding store files.
    pub snapshot_dir: String,
    /// Suffix appended to the test file name to form the store file name.
    pub extension: String,
}

impl SnapshotConfig {
    /// Reads `UPDATE` and `CI`; colors follow whether stderr is a terminal.
    pub fn from_env() -> Self {
        Self {
            update: flag_is_set(env::var_os(UPDATE_ENV)),
            ci: flag_is_set(env::var_os(CI_ENV)),
            use_colors: atty::is(atty::Stream::Stderr),
            snapshot_dir: DEFAULT_SNAPSHOT_DIR.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Configuration with both toggles off and no colors, ignoring the
    /// environment.
    pub fn plain() -> Self {
        Self {
            update: false,
            ci: false,
            use_colors: false,
            snapshot_dir: DEFAULT_SNAPSHOT_DIR.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    pub fn with_update(mut self, update: bool) -> Self {
        self.update = update;
        self
    }

    pub fn with_ci(mut self, ci: bool) -> Self {
        self.ci = ci;
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn with_snapshot_dir(mut self, dir: impl Into<String>) -> Self {
        self.snapshot_dir = dir.into();
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// A toggle is set when its variable is present and not empty.
fn flag_is_set(value: Option<OsString>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}
