//! Build script for spotstatus.
//!
//! Copies the configuration templates into the user's local data directory,
//! so `.env.example` and `config.toml.example` sit next to the files the
//! application reads.

use std::{env, fs, path::PathBuf};

const TEMPLATES: [&str; 2] = [".env.example", "config.toml.example"];

/// Copies each template from the crate root to the local data directory.
///
/// Templates are copied to:
/// - Linux: `~/.local/share/spotstatus/`
/// - macOS: `~/Library/Application Support/spotstatus/`
/// - Windows: `%LOCALAPPDATA%/spotstatus/`
///
/// A missing template only produces a cargo warning. Failing to create the
/// directory or to write a file fails the build.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("spotstatus");
    fs::create_dir_all(&out_dir)?;

    for template in TEMPLATES {
        println!("cargo:rerun-if-changed={template}");

        let source = manifest_dir.join(template);
        if source.is_file() {
            fs::copy(&source, out_dir.join(template))?;
        } else {
            println!("cargo:warning={template} not found at {}", source.display());
        }
    }

    Ok(())
}
