//! Telemetry serial link
//!
//! Rows are written with a blocking UART transmitter; the host side captures
//! the stream into a delimited text file.

use embassy_rp::uart::{self, Blocking, UartTx};
use embedded_io::{ErrorKind, ErrorType, Write};

/// UART transmit error mapped onto `embedded-io` kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialError(ErrorKind);

impl embedded_io::Error for SerialError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

impl From<uart::Error> for SerialError {
    fn from(e: uart::Error) -> Self {
        match e {
            uart::Error::Overrun => SerialError(ErrorKind::OutOfMemory),
            uart::Error::Break => SerialError(ErrorKind::NotConnected),
            _ => SerialError(ErrorKind::Other),
        }
    }
}

/// `embedded_io::Write` over a blocking UART transmitter
pub struct SerialWriter {
    tx: UartTx<'static, Blocking>,
}

impl SerialWriter {
    /// Wrap a transmitter created with `UartTx::new_blocking`
    pub fn new(tx: UartTx<'static, Blocking>) -> Self {
        Self { tx }
    }
}

impl ErrorType for SerialWriter {
    type Error = SerialError;
}

impl Write for SerialWriter {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.tx.blocking_write(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.tx.blocking_flush()?;
        Ok(())
    }
}
