//! snapkeep: snapshot assertions for tests.
//!
//! The first time a test asserts a snapshot, its value is canonicalized and
//! recorded in a store file next to the test. Later runs compare the fresh
//! value against the recorded one and fail with a line diff when they
//! diverge. Set `UPDATE` to accept changes; under `CI`, missing snapshots
//! fail instead of being recorded.
//!
//! ```rust,no_run
//! use snapkeep::{assert_snapshot, Value};
//!
//! let rendered = Value::map([("title", Value::from("hello")), ("count", Value::from(3))]);
//! assert_snapshot!(rendered);
//! ```

pub use crate::canonical::Canonical;
pub use crate::canonicalize::{canonicalize, canonicalize_with, CanonicalizeOptions};
pub use crate::compare::{compare, Change, Comparison, DivergenceReport, Segment};
pub use crate::config::SnapshotConfig;
pub use crate::errors::{Result, SnapshotError};
pub use crate::identity::TestIdentity;
pub use crate::sequencer::Sequencer;
pub use crate::snapshot::{Outcome, Snapshotter};
pub use crate::store::{store_path_for, SnapshotStore};
pub use crate::value::{RenderTree, Value};

pub mod canonical;
pub mod canonicalize;
pub mod cli;
pub mod compare;
pub mod config;
pub mod errors;
pub mod identity;
pub mod sequencer;
pub mod snapshot;
pub mod store;
pub mod value;
