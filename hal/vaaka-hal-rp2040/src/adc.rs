//! Analog inputs on the shared ADC block
//!
//! The RP2040 has one converter multiplexed over GPIO26-29. Every wired
//! analog sensor gets its own [`AdcChannel`] handle that borrows the shared
//! converter for the duration of a single conversion.

use core::cell::RefCell;

use embassy_rp::adc::{Adc, Blocking, Channel};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use vaaka_drivers::sensor::AnalogSource;

/// ADC block shared between channels
pub type SharedAdc = Mutex<CriticalSectionRawMutex, RefCell<Adc<'static, Blocking>>>;

/// One analog input on the shared ADC
pub struct AdcChannel {
    adc: &'static SharedAdc,
    channel: Channel<'static>,
    last: u16,
}

impl AdcChannel {
    /// Create a channel handle
    pub fn new(adc: &'static SharedAdc, channel: Channel<'static>) -> Self {
        Self {
            adc,
            channel,
            last: 0,
        }
    }
}

impl AnalogSource for AdcChannel {
    /// Read one 12-bit conversion
    ///
    /// A failed conversion repeats the previous value.
    fn read_raw(&mut self) -> u16 {
        let result = self
            .adc
            .lock(|adc| adc.borrow_mut().blocking_read(&mut self.channel));
        match result {
            Ok(raw) => self.last = raw,
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("ADC conversion failed: {}", _e);
            }
        }
        self.last
    }
}
