//! Build script for the DreamStreamer CLI.
//!
//! Places the `.env.example` configuration template in the user's local data
//! directory, next to where `dreamstreamer` looks for its `.env`.

use std::{env, fs, path::PathBuf};

/// Copies `.env.example` from the crate root into the data directory:
///
/// - Linux: `~/.local/share/dreamstreamer/.env.example`
/// - macOS: `~/Library/Application Support/dreamstreamer/.env.example`
/// - Windows: `%LOCALAPPDATA%/dreamstreamer/.env.example`
///
/// A missing template only produces a cargo warning. Failing to create the
/// directory or write the copy fails the build.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let template = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("dreamstreamer");
    fs::create_dir_all(&out_dir)?;

    if template.is_file() {
        fs::copy(&template, out_dir.join(".env.example"))?;
    } else {
        println!(
            "cargo:warning=.env.example not found at {}",
            template.display()
        );
    }

    Ok(())
}
