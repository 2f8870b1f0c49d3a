//! A hash set whose elements may carry a time-to-live.
//!
//! Expired elements are evicted lazily: every operation that reports or
//! changes membership first pops the deadlines that have come due from a
//! time-ordered queue. There is no background thread and no scan over the
//! whole set.
//!
//! ```
//! use ttlset::{ExpirableSet, Expiry, TimeUnit};
//!
//! let mut seen = ExpirableSet::new();
//! assert!(seen.insert_with_ttl("req-1", 30, TimeUnit::Seconds).unwrap());
//! assert!(seen.insert("admin"));
//!
//! assert!(seen.contains("req-1"));
//! assert_eq!(seen.get_expiry("admin"), Ok(Expiry::Never));
//! assert_eq!(seen.len(), 2);
//! ```
//!
//! The set is not thread-safe. Share it behind a single external lock.

use std::time::Instant;

mod error;
mod expirable_set;
mod expiry_queue;
mod fake_clock;
mod time;

pub use error::{Error, Result};
pub use expirable_set::{ExpirableSet, Iter};
pub use fake_clock::FakeClock;
pub use time::{Expiry, TimeUnit};

/// Set operations with per-element expiry.
pub trait TtlSet<T> {
    type Iter<'a>: Iterator<Item = &'a T>
    where
        Self: 'a,
        T: 'a;

    fn insert(&mut self, item: T) -> bool;
    fn insert_with_ttl(&mut self, item: T, ttl: i64, unit: TimeUnit) -> Result<bool>;
    fn remove(&mut self, item: &T) -> bool;
    // &mut because we want to permit cleanup operations
    fn contains(&mut self, item: &T) -> bool;
    fn len(&mut self) -> usize;
    /// Live elements, after evicting whatever has expired.
    fn iter(&mut self) -> Self::Iter<'_>;
}

pub trait Clock {
    fn now(&self) -> Instant;
}

/// Reads the monotonic system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
