//! Running and error LEDs
//!
//! The running LED is driven directly. Fault blinking is non-blocking:
//! [`StatusIndicator::signal_fault`] only arms the blink, and
//! [`StatusLeds::poll`] toggles the error LED when a half period has passed.

use core::convert::Infallible;

use embedded_hal::digital::OutputPin;
use vaaka_core::traits::StatusIndicator;

/// Time the error LED spends in each state while blinking
pub const BLINK_HALF_PERIOD_MS: u32 = 500;

#[derive(Debug, Clone, Copy)]
struct Blink {
    /// Toggles left; `None` blinks until power cycle
    remaining: Option<u16>,
    /// Time of the last toggle; `None` until the first poll
    last_toggle_ms: Option<u32>,
}

/// Two-LED status indicator
pub struct StatusLeds<P> {
    running: P,
    error: P,
    running_on: bool,
    error_on: bool,
    inverted: bool,
    blink: Option<Blink>,
}

impl<P: OutputPin<Error = Infallible>> StatusLeds<P> {
    /// Create with both LEDs off
    ///
    /// `inverted` applies to both LEDs (lit = pin low).
    pub fn new(running: P, error: P, inverted: bool) -> Self {
        let mut leds = Self {
            running,
            error,
            running_on: false,
            error_on: false,
            inverted,
            blink: None,
        };
        leds.write_running(false);
        leds.write_error(false);
        leds
    }

    fn write_running(&mut self, on: bool) {
        self.running_on = on;
        self.running
            .set_state((on != self.inverted).into())
            .unwrap_or_else(|e| match e {});
    }

    fn write_error(&mut self, on: bool) {
        self.error_on = on;
        self.error
            .set_state((on != self.inverted).into())
            .unwrap_or_else(|e| match e {});
    }

    /// Advance the blink pattern
    pub fn poll(&mut self, now_ms: u32) {
        let Some(mut blink) = self.blink else {
            return;
        };

        let due = match blink.last_toggle_ms {
            None => true,
            Some(last) => now_ms.wrapping_sub(last) >= BLINK_HALF_PERIOD_MS,
        };
        if !due {
            return;
        }

        self.write_error(!self.error_on);
        blink.last_toggle_ms = Some(now_ms);

        match blink.remaining {
            Some(1) => {
                self.write_error(false);
                self.blink = None;
            }
            Some(n) => {
                blink.remaining = Some(n - 1);
                self.blink = Some(blink);
            }
            None => self.blink = Some(blink),
        }
    }

    /// Check if a fault blink is in progress
    pub fn is_blinking(&self) -> bool {
        self.blink.is_some()
    }

    /// Running LED state
    pub fn running_on(&self) -> bool {
        self.running_on
    }

    /// Error LED state
    pub fn error_on(&self) -> bool {
        self.error_on
    }
}

impl<P: OutputPin<Error = Infallible>> StatusIndicator for StatusLeds<P> {
    fn set_running(&mut self, on: bool) {
        self.write_running(on);
    }

    fn toggle_running(&mut self) {
        let on = !self.running_on;
        self.write_running(on);
    }

    fn signal_fault(&mut self, blink_count: u8) {
        self.write_running(false);
        self.write_error(false);
        self.blink = Some(Blink {
            // One blink is an on toggle plus an off toggle
            remaining: (blink_count != 0).then(|| blink_count as u16 * 2),
            last_toggle_ms: None,
        });
    }
}
