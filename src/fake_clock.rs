use std::cell::Cell;
use std::time::{Duration, Instant};

use crate::Clock;

/// A manually driven clock. Every read moves time forward by `step`, so two
/// consecutive operations never observe the same instant.
#[derive(Debug, Clone)]
pub struct FakeClock {
    cur: Cell<Instant>,
    step: Duration,
}

impl Default for FakeClock {
    fn default() -> Self {
        FakeClock::with_step(Duration::from_millis(1))
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        let now = self.cur.get() + self.step;
        self.cur.set(now);
        now
    }
}

impl FakeClock {
    pub fn with_step(step: Duration) -> FakeClock {
        FakeClock {
            cur: Cell::new(Instant::now()),
            step,
        }
    }

    /// A clock that only moves when advanced explicitly.
    pub fn frozen() -> FakeClock {
        FakeClock::with_step(Duration::ZERO)
    }

    pub fn advance(&self, duration: Duration) {
        self.cur.set(self.cur.get() + duration);
    }

    /// The current time, without stepping.
    pub fn peek(&self) -> Instant {
        self.cur.get()
    }
}
