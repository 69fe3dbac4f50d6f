//! Minimum-interval rate limiter

/// Accepts at most one event per `min_interval_ms`
///
/// The interval is measured from the last accepted event, or from
/// [`RateLimiter::start`] for the first one. Timestamps are `u32`
/// milliseconds and wrap-around safe.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    min_interval_ms: u32,
    last_ms: Option<u32>,
}

impl RateLimiter {
    /// Create a limiter that has not been started yet
    pub fn new(min_interval_ms: u32) -> Self {
        Self {
            min_interval_ms,
            last_ms: None,
        }
    }

    /// Set the reference point for the first interval
    pub fn start(&mut self, now_ms: u32) {
        self.last_ms = Some(now_ms);
    }

    /// Check whether [`RateLimiter::start`] has been called
    pub fn is_started(&self) -> bool {
        self.last_ms.is_some()
    }

    /// Check if an event at `now_ms` would be accepted, without consuming it
    pub fn ready(&self, now_ms: u32) -> bool {
        match self.last_ms {
            Some(last) => now_ms.wrapping_sub(last) >= self.min_interval_ms,
            None => true,
        }
    }

    /// Accept the event if the interval has elapsed
    pub fn try_accept(&mut self, now_ms: u32) -> bool {
        if self.ready(now_ms) {
            self.last_ms = Some(now_ms);
            true
        } else {
            false
        }
    }

    /// Configured minimum interval
    pub fn min_interval_ms(&self) -> u32 {
        self.min_interval_ms
    }
}
