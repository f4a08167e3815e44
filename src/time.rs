//! Time abstraction for testability.
//!
//! Refund estimates depend on the current time. Production code reads the
//! system clock through [`Clock`]; tests inject a [`FixedClock`].

use chrono::{DateTime, Utc};

/// Abstraction over the wall clock.
///
/// # Example
///
/// ```
/// use arcube_console::time::{Clock, SystemClock};
///
/// let now = SystemClock.now();
/// assert!(now.timestamp() > 0);
/// ```
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock using the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stopped at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn system_clock_returns_current_time() {
        let before = Utc::now();
        let result = SystemClock.now();
        let after = Utc::now();

        assert!(result >= before);
        assert!(result <= after);
    }

    #[test]
    fn fixed_clock_never_moves() {
        let instant = Utc.with_ymd_and_hms(2026, 10, 30, 6, 0, 0).unwrap();
        let clock = FixedClock(instant);

        assert_eq!(clock.now(), instant);
        assert_eq!(clock.now(), instant);
    }

    #[test]
    fn clocks_are_object_safe() {
        let clocks: [Box<dyn Clock>; 2] = [
            Box::new(SystemClock),
            Box::new(FixedClock(DateTime::<Utc>::UNIX_EPOCH)),
        ];
        assert!(clocks.iter().all(|c| c.now() >= DateTime::<Utc>::UNIX_EPOCH));
    }
}
