use chrono::{DateTime, Duration, Utc};

/// Source of the current time for expiry decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// `now + lifetime_secs`, or `None` when the lifetime does not fit a
/// timestamp.
pub(crate) fn expiry_after(now: DateTime<Utc>, lifetime_secs: i64) -> Option<DateTime<Utc>> {
    Duration::try_seconds(lifetime_secs).and_then(|lifetime| now.checked_add_signed(lifetime))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn expiry_after_adds_lifetime() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap();
        assert_eq!(
            expiry_after(now, 3600),
            Some(Utc.with_ymd_and_hms(2026, 10, 17, 13, 0, 0).unwrap())
        );
    }

    #[test]
    fn expiry_after_rejects_out_of_range_lifetimes() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap();
        assert_eq!(expiry_after(now, i64::MAX), None);
        assert_eq!(expiry_after(now, i64::MAX / 1_000), None);
    }
}
