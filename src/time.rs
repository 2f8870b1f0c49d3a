use std::fmt;
use std::time::{Duration, Instant};

/// Granularity of a TTL passed to `insert_with_ttl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Converts `amount` of this unit to a `Duration`, or `None` if it overflows.
    pub fn to_duration(self, amount: u64) -> Option<Duration> {
        match self {
            TimeUnit::Nanoseconds => Some(Duration::from_nanos(amount)),
            TimeUnit::Microseconds => Some(Duration::from_micros(amount)),
            TimeUnit::Milliseconds => Some(Duration::from_millis(amount)),
            TimeUnit::Seconds => Some(Duration::from_secs(amount)),
            TimeUnit::Minutes => amount.checked_mul(60).map(Duration::from_secs),
            TimeUnit::Hours => amount.checked_mul(60 * 60).map(Duration::from_secs),
            TimeUnit::Days => amount.checked_mul(24 * 60 * 60).map(Duration::from_secs),
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimeUnit::Nanoseconds => "ns",
            TimeUnit::Microseconds => "us",
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "s",
            TimeUnit::Minutes => "min",
            TimeUnit::Hours => "h",
            TimeUnit::Days => "d",
        };
        f.write_str(name)
    }
}

/// When an element stops being a member of the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expiry {
    Never,
    At(Instant),
}

impl Expiry {
    pub fn is_never(&self) -> bool {
        matches!(self, Expiry::Never)
    }

    pub fn instant(&self) -> Option<Instant> {
        match *self {
            Expiry::Never => None,
            Expiry::At(time) => Some(time),
        }
    }

    /// A deadline equal to `now` counts as due.
    pub fn is_due(&self, now: Instant) -> bool {
        match *self {
            Expiry::Never => false,
            Expiry::At(time) => time <= now,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unit_conversion() {
        assert_eq!(
            TimeUnit::Milliseconds.to_duration(1500),
            Some(Duration::from_millis(1500))
        );
        assert_eq!(
            TimeUnit::Days.to_duration(2),
            Some(Duration::from_secs(2 * 24 * 60 * 60))
        );
        assert_eq!(TimeUnit::Nanoseconds.to_duration(0), Some(Duration::ZERO));
    }

    #[test]
    fn unit_conversion_overflow() {
        assert_eq!(TimeUnit::Minutes.to_duration(u64::MAX), None);
        assert_eq!(TimeUnit::Days.to_duration(u64::MAX / 1000), None);
        assert!(TimeUnit::Seconds.to_duration(u64::MAX).is_some());
    }

    #[test]
    fn expiry_due_at_deadline() {
        let now = Instant::now();
        let exp = Expiry::At(now);
        assert!(exp.is_due(now));
        assert!(!exp.is_due(now - Duration::from_millis(1)));
        assert!(!Expiry::Never.is_due(now + Duration::from_secs(1_000_000)));
        assert_eq!(exp.instant(), Some(now));
        assert!(Expiry::Never.is_never());
    }
}
