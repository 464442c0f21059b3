//! Snapshot assertion orchestration.
//!
//! One [`Snapshotter::check`] call walks this state machine:
//!
//! | store holds key | values match | update mode | result                   |
//! |-----------------|--------------|-------------|--------------------------|
//! | no              | -            | -           | record, persist          |
//! | yes             | yes          | -           | pass, no write           |
//! | yes             | no           | on          | overwrite, persist       |
//! | yes             | no           | off         | fail with the diff       |
//!
//! Recording is forbidden under CI and fails before anything is written.
//! The store is reloaded from disk on every call.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::canonical::Canonical;
use crate::canonicalize::{canonicalize_with, CanonicalizeOptions};
use crate::compare::compare;
use crate::config::SnapshotConfig;
use crate::errors::{Result, SnapshotError};
use crate::identity::TestIdentity;
use crate::sequencer::{next_thread_key, Sequencer};
use crate::store::{path_guard, store_path_for, SnapshotStore};
use crate::value::Value;

/// What a successful check did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No snapshot existed; the value was recorded.
    Recorded,
    /// The stored snapshot matched.
    Matched,
    /// The stored snapshot diverged and was overwritten in update mode.
    Updated,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Recorded => "recorded",
            Outcome::Matched => "matched",
            Outcome::Updated => "updated",
        }
    }
}

/// Runs snapshot assertions under one configuration.
#[derive(Debug, Clone)]
pub struct Snapshotter {
    config: SnapshotConfig,
    options: CanonicalizeOptions,
    sequencer: Option<Arc<Sequencer>>,
}

impl Snapshotter {
    /// Uses the calling thread's sequencer for keys.
    pub fn new(config: SnapshotConfig) -> Self {
        Self {
            config,
            options: CanonicalizeOptions::default(),
            sequencer: None,
        }
    }

    /// Uses `sequencer` for keys instead of the thread's own.
    pub fn with_sequencer(mut self, sequencer: Arc<Sequencer>) -> Self {
        self.sequencer = Some(sequencer);
        self
    }

    pub fn with_options(mut self, options: CanonicalizeOptions) -> Self {
        self.options = options;
        self
    }

    fn next_key(&self, full_name: &str) -> String {
        match &self.sequencer {
            Some(sequencer) => sequencer.next_key(full_name),
            None => next_thread_key(full_name),
        }
    }

    /// Compares `value` against the stored snapshot for `identity`,
    /// recording or updating it as the configuration allows.
    pub fn check(&self, identity: &TestIdentity, value: impl Into<Value>) -> Result<Outcome> {
        let path = store_path_for(&identity.file, &self.config);
        let key = self.next_key(&identity.full_name);
        let fresh = canonicalize_with(&value.into(), self.options);

        let guard = path_guard(&path);
        let _lock = match guard.lock() {
            Ok(lock) => lock,
            Err(poisoned) => poisoned.into_inner(),
        };

        let mut store = SnapshotStore::load(&path)?;
        let outcome = match store.get(&key) {
            None => self.record(&mut store, key.clone(), fresh)?,
            Some(stored) => {
                let comparison = compare(stored, &fresh)?;
                if comparison.matches {
                    Outcome::Matched
                } else if self.config.update {
                    store.insert(key.clone(), fresh);
                    store.persist()?;
                    Outcome::Updated
                } else {
                    let err = SnapshotError::Mismatch {
                        key: key.clone(),
                        report: comparison.report.format(self.config.use_colors),
                    };
                    warn!(kind = err.kind_name(), key = %key, path = %path.display(), "snapshot mismatch");
                    return Err(err);
                }
            }
        };
        debug!(key = %key, outcome = outcome.as_str(), "snapshot checked");
        Ok(outcome)
    }

    fn record(&self, store: &mut SnapshotStore, key: String, fresh: Canonical) -> Result<Outcome> {
        if self.config.ci {
            let err = SnapshotError::CiWriteForbidden {
                key: key.clone(),
                path: store.path().to_path_buf(),
            };
            warn!(
                kind = err.kind_name(),
                key = %key,
                path = %store.path().display(),
                "refusing to record snapshot on CI"
            );
            return Err(err);
        }
        store.ensure_dir()?;
        info!(key = %key, path = %store.path().display(), "recording new snapshot");
        store.insert(key, fresh);
        store.persist()?;
        Ok(Outcome::Recorded)
    }
}

/// Asserts that a value matches its stored snapshot, recording it on the
/// first run. Panics with the failure message otherwise.
///
/// The key comes from the running test's name; configuration comes from
/// `UPDATE` and `CI` unless a [`SnapshotConfig`] is passed.
#[macro_export]
macro_rules! assert_snapshot {
    ($value:expr) => {
        $crate::assert_snapshot!($value, $crate::SnapshotConfig::from_env())
    };
    ($value:expr, $config:expr) => {{
        let identity = $crate::TestIdentity::current(
            file!(),
            env!("CARGO_MANIFEST_DIR"),
            module_path!(),
        );
        if let Err(err) = $crate::Snapshotter::new($config).check(&identity, $value) {
            panic!("{}", err);
        }
    }};
}
