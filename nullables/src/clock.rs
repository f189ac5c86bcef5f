//! Nullable clock: deterministic time for testing.

use std::cell::Cell;

use tangle_types::{Clock, Timestamp};

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to.
pub struct NullClock {
    current_millis: Cell<u64>,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current_millis: Cell::new(initial_secs * 1000),
        }
    }

    /// Advance time by a number of seconds.
    pub fn advance(&self, secs: u64) {
        self.current_millis
            .set(self.current_millis.get() + secs * 1000);
    }

    /// Advance time by a number of milliseconds.
    pub fn advance_millis(&self, millis: u64) {
        self.current_millis.set(self.current_millis.get() + millis);
    }

    /// Set the time to a specific value.
    pub fn set(&self, secs: u64) {
        self.current_millis.set(secs * 1000);
    }
}

impl Clock for NullClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.current_millis.get())
    }
}
