//! Time sources for creation stamps and expiry checks.
use std::sync::Mutex;

use chrono::{Duration, Utc};

use super::Time;

/// Provides the current time to the session store.
pub trait Clock {
    /// The current point in time.
    fn now(&self) -> Time;
}

/// The system wall clock in Utc.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

/// A clock that only moves when told to.
///
/// Expiry is checked against the time of access, so a frozen clock makes lifetimes of grants and
/// codes testable without sleeping.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Time>,
}

impl Clock for SystemClock {
    fn now(&self) -> Time {
        Utc::now()
    }
}

impl ManualClock {
    /// A clock frozen at the given instant.
    pub fn at(now: Time) -> Self {
        ManualClock { now: Mutex::new(now) }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|poison| poison.into_inner());
        *now = *now + by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Time {
        *self.now.lock().unwrap_or_else(|poison| poison.into_inner())
    }
}

impl<'a, C: Clock + ?Sized> Clock for &'a C {
    fn now(&self) -> Time {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now(&self) -> Time {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> Time {
        (**self).now()
    }
}
