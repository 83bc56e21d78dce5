use jiff::Timestamp;

/// A source of the current time.
///
/// Backends that evaluate expiry in-process read time through this trait so
/// tests can move across expiry boundaries without sleeping.
pub trait Clock: Send + Sync + 'static {
    /// Returns the current time of the clock
    fn now(&self) -> Timestamp;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}
