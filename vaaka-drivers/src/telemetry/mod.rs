//! Telemetry sinks

mod csv;

pub use csv::CsvLogger;
