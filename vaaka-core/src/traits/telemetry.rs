//! Telemetry sink trait

use crate::telemetry::{TelemetryError, Value};

/// Append-only, rate-limited recorder of a fixed sensor tuple
pub trait TelemetrySink {
    /// Write the header row
    ///
    /// Fixes the record arity for the lifetime of the log target and starts
    /// the rate limit interval at `now_ms`.
    fn setup(&mut self, now_ms: u32, header: &[&str]) -> Result<(), TelemetryError>;

    /// Append one record
    ///
    /// Returns `Ok(false)` if the record was skipped because the minimum
    /// interval since the last accepted append has not elapsed.
    fn append(&mut self, now_ms: u32, record: &[Value]) -> Result<bool, TelemetryError>;
}
