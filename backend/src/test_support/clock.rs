//! Clock test double that only moves when told to.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

/// Clock whose time is set and advanced explicitly.
#[derive(Debug)]
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Start the clock at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move the clock forward (or backward for negative deltas).
    pub fn advance(&self, delta: TimeDelta) {
        *self.lock_clock() += delta;
    }

    /// Move the clock forward by whole hours.
    pub fn advance_hours(&self, hours: i64) {
        self.advance(TimeDelta::hours(hours));
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}
