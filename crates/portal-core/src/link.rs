use crate::shortcode::ShortCode;
use std::time::Duration;

const SECONDS_PER_HOUR: u64 = 3600;

/// A short-identifier to target-URL mapping as written to the link namespace.
///
/// Entries are never mutated after creation; the store evicts them once
/// `expiry` has elapsed, after which the identifier may be reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    /// The key in the link namespace.
    pub code: ShortCode,
    /// The normalized absolute target URL.
    pub target: String,
    /// How long the store keeps the entry.
    pub expiry: Retention,
}

/// Link retention, expressed in whole hours as callers and configuration do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Retention {
    hours: u64,
}

impl Retention {
    /// Longest accepted retention, roughly a century. Longer requests are clamped.
    pub const MAX_HOURS: u64 = 876_000;

    pub const fn from_hours(hours: u64) -> Self {
        let hours = if hours > Self::MAX_HOURS {
            Self::MAX_HOURS
        } else {
            hours
        };
        Self { hours }
    }

    pub fn hours(&self) -> u64 {
        self.hours
    }

    /// Converts to the store's native expiry unit.
    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.hours.saturating_mul(SECONDS_PER_HOUR))
    }

    /// Picks the caller-requested retention if nonzero, else `default`.
    pub fn requested_or(requested: Option<u64>, default: Retention) -> Self {
        match requested {
            Some(hours) if hours > 0 => Self::from_hours(hours),
            _ => default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retention_converts_hours_to_seconds() {
        assert_eq!(
            Retention::from_hours(24).as_duration(),
            Duration::from_secs(86_400)
        );
    }

    #[test]
    fn zero_or_missing_request_falls_back_to_default() {
        let default = Retention::from_hours(24);
        assert_eq!(Retention::requested_or(None, default), default);
        assert_eq!(Retention::requested_or(Some(0), default), default);
        assert_eq!(
            Retention::requested_or(Some(2), default),
            Retention::from_hours(2)
        );
    }

    #[test]
    fn oversized_request_is_clamped() {
        let default = Retention::from_hours(24);
        let retention = Retention::requested_or(Some(1_000_000_000_000_000), default);

        assert_eq!(retention.hours(), Retention::MAX_HOURS);
        assert_eq!(
            retention.as_duration(),
            Duration::from_secs(Retention::MAX_HOURS * SECONDS_PER_HOUR)
        );
    }
}
