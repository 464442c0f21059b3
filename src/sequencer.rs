//! Snapshot key sequencing.
//!
//! A test may call the snapshot assertion several times. Each call gets the
//! key `name(n)`, where `n` counts consecutive calls made under the same
//! test name and restarts at zero when a different test takes over. Keys are
//! therefore order-dependent: a test must make its snapshot calls in the same
//! order on every run for the keys to line up with the stored ones.

use std::sync::Mutex;

#[derive(Debug, Default)]
struct SequencerState {
    last_name: Option<String>,
    counter: usize,
}

/// Produces disambiguated snapshot keys. One instance per run context.
#[derive(Debug, Default)]
pub struct Sequencer {
    state: Mutex<SequencerState>,
}

thread_local! {
    static THREAD_SEQUENCER: Sequencer = Sequencer::new();
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the key for the next snapshot call made by `test_full_name`.
    ///
    /// ```rust
    /// use snapkeep::Sequencer;
    /// let seq = Sequencer::new();
    /// assert_eq!(seq.next_key("T"), "T(0)");
    /// assert_eq!(seq.next_key("T"), "T(1)");
    /// assert_eq!(seq.next_key("U"), "U(0)");
    /// ```
    pub fn next_key(&self, test_full_name: &str) -> String {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if state.last_name.as_deref() == Some(test_full_name) {
            state.counter += 1;
        } else {
            state.counter = 0;
            state.last_name = Some(test_full_name.to_string());
        }
        format!("{}({})", test_full_name, state.counter)
    }

    /// Forgets the last seen name, so the next call starts at zero.
    pub fn reset(&self) {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *state = SequencerState::default();
    }
}

/// Sequences a key on the calling thread's sequencer.
///
/// libtest runs every test on its own thread, so tests running in parallel
/// never share counters.
pub fn next_thread_key(test_full_name: &str) -> String {
    THREAD_SEQUENCER.with(|seq| seq.next_key(test_full_name))
}
