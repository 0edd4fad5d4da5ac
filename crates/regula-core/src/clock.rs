//! Injectable time source.
//!
//! Every date-driven rule (transition side effects, overdue evaluation,
//! monthly reports) reads "today" from a [`Clock`] instead of the system
//! clock so that behavior is reproducible in tests.

use std::{fmt, sync::Arc};

use jiff::{civil::Date, tz::TimeZone, Timestamp};

/// Source of the current date and instant.
pub trait Clock: Send + Sync {
    /// The current civil date in the local time zone.
    fn today(&self) -> Date;

    /// The current instant, used for audit timestamps.
    fn now(&self) -> Timestamp;
}

/// Shared handle to a clock implementation.
pub type SharedClock = Arc<dyn Clock>;

/// Clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Date {
        Timestamp::now().to_zoned(TimeZone::system()).date()
    }

    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Clock pinned to a fixed date. Audit timestamps still advance.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    today: Date,
}

impl FixedClock {
    pub fn new(today: Date) -> Self {
        Self { today }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.today
    }

    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

impl fmt::Debug for dyn Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Clock(today = {})", self.today())
    }
}

/// Returns the default system clock as a shared handle.
pub fn system_clock() -> SharedClock {
    Arc::new(SystemClock)
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn test_fixed_clock_returns_pinned_date() {
        let clock = FixedClock::new(date(2024, 3, 15));
        assert_eq!(clock.today(), date(2024, 3, 15));
        assert_eq!(clock.today(), date(2024, 3, 15));
    }
}
