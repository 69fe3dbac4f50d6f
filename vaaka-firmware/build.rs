//! Build script for vaaka-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Parses and validates machine.toml, then embeds it as postcard

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use vaaka_core::config::MachineConfig;

fn main() {
    let out_dir = match env::var_os("OUT_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => fail("OUT_DIR not set", "build.rs must be run by cargo"),
    };

    setup_linker(&out_dir);
    embed_config(&out_dir);
}

/// Set up linker search paths for memory.x
fn setup_linker(out_dir: &Path) {
    let memory_x = include_bytes!("memory.x");
    if let Err(e) = fs::write(out_dir.join("memory.x"), memory_x) {
        fail("Failed to copy memory.x", &e.to_string());
    }

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Parse machine.toml, validate it and write the postcard blob
fn embed_config(out_dir: &Path) {
    println!("cargo:rerun-if-changed=machine.toml");

    let config_path = Path::new("machine.toml");
    if !config_path.exists() {
        fail(
            "machine.toml not found!",
            "The firmware requires a machine.toml next to Cargo.toml.",
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read machine.toml", &e.to_string()),
    };

    let config: MachineConfig = match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => fail("Invalid machine.toml", &e.to_string()),
    };

    if let Err(e) = config.validate() {
        fail("Invalid machine configuration", &e.to_string());
    }

    let bytes = match postcard::to_allocvec(&config) {
        Ok(bytes) => bytes,
        Err(e) => fail("Failed to encode machine.toml", &e.to_string()),
    };

    if let Err(e) = fs::write(out_dir.join("machine.bin"), bytes) {
        fail("Failed to write machine.bin", &e.to_string());
    }

    println!("cargo:warning=machine.toml validated successfully");
}

/// Abort the build with a boxed message
fn fail(title: &str, detail: &str) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        format_error_lines(detail)
    );
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
