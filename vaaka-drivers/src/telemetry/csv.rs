//! Delimited-text telemetry log
//!
//! Output layout (with the default `;` separator and timer enabled):
//!
//! ```text
//! sep=;
//! Time;A1;A2;B2;B1;Force
//! 1;0;0;0;1;12.5
//! 2;0;1;0;0;12.5
//! ```
//!
//! The `sep=` line lets spreadsheet tools pick the separator up
//! automatically. The writer can be a file, a UART or a test buffer.

use core::fmt;

use embedded_io::Write;
use vaaka_core::config::TelemetryConfig;
use vaaka_core::fault::ConfigError;
use vaaka_core::telemetry::{check_arity, check_header, RateLimiter, Seconds, TelemetryError, Value};
use vaaka_core::traits::TelemetrySink;

/// Rate-limited CSV writer
pub struct CsvLogger<W> {
    writer: W,
    config: TelemetryConfig,
    limiter: RateLimiter,
    /// Record arity, fixed by `setup`
    columns: Option<usize>,
    rows: u32,
}

impl<W: Write> CsvLogger<W> {
    /// Create a logger; nothing is written until `setup`
    pub fn new(writer: W, config: &TelemetryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            writer,
            config: *config,
            limiter: RateLimiter::new(config.min_interval_ms),
            columns: None,
            rows: 0,
        })
    }

    /// Rows written since setup
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Borrow the underlying writer
    pub fn writer(&self) -> &W {
        &self.writer
    }

    fn emit(&mut self, args: fmt::Arguments<'_>) -> Result<(), TelemetryError> {
        self.writer
            .write_fmt(args)
            .map_err(|_| TelemetryError::Write)
    }

    fn write_row<T: fmt::Display>(
        &mut self,
        first: Option<&dyn fmt::Display>,
        fields: &[T],
    ) -> Result<(), TelemetryError> {
        let sep = self.config.separator;
        let mut need_sep = false;
        if let Some(first) = first {
            self.emit(format_args!("{}", first))?;
            need_sep = true;
        }
        for field in fields {
            if need_sep {
                self.emit(format_args!("{}", sep))?;
            }
            self.emit(format_args!("{}", field))?;
            need_sep = true;
        }
        self.emit(format_args!("\n"))?;
        self.writer.flush().map_err(|_| TelemetryError::Write)
    }
}

impl<W: Write> TelemetrySink for CsvLogger<W> {
    fn setup(&mut self, now_ms: u32, header: &[&str]) -> Result<(), TelemetryError> {
        check_header(header.len())?;
        let sep = self.config.separator;
        self.emit(format_args!("sep={}\n", sep))?;

        let time: Option<&dyn fmt::Display> = if self.config.add_timer {
            Some(&"Time")
        } else {
            None
        };
        self.write_row(time, header)?;

        self.columns = Some(header.len());
        self.rows = 0;
        self.limiter.start(now_ms);
        Ok(())
    }

    fn append(&mut self, now_ms: u32, record: &[Value]) -> Result<bool, TelemetryError> {
        let columns = self.columns.ok_or(ConfigError::TelemetryNotSetUp)?;
        check_arity(columns, record.len())?;

        if !self.limiter.try_accept(now_ms) {
            return Ok(false);
        }

        let time = Seconds {
            ms: now_ms,
            decimals: self.config.timer_decimals,
        };
        let first: Option<&dyn fmt::Display> = if self.config.add_timer {
            Some(&time)
        } else {
            None
        };
        self.write_row(first, record)?;
        self.rows = self.rows.wrapping_add(1);
        Ok(true)
    }
}
