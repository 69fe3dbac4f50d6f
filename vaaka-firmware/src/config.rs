//! Embedded machine configuration
//!
//! `build.rs` validates `machine.toml` on the host and embeds its postcard
//! encoding. It is decoded and validated again at boot.

use defmt::*;
use vaaka_core::config::MachineConfig;
use vaaka_core::fault::ConfigError;

/// Postcard-encoded `machine.toml`
static EMBEDDED_CONFIG: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/machine.bin"));

/// Decode and validate the embedded configuration
pub fn load_config() -> Result<MachineConfig, ConfigError> {
    let config: MachineConfig =
        postcard::from_bytes(EMBEDDED_CONFIG).map_err(|_| ConfigError::Undecodable)?;
    config.validate()?;
    info!(
        "Configuration loaded: tick {}ms, lift {}..{}",
        config.sequence.tick_ms, config.lift.min, config.lift.max
    );
    Ok(config)
}
