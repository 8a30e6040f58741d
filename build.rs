//! Build script for the playlist sync CLI.
//!
//! Copies the configuration template (`.env.example`) from the crate root
//! to the user's local data directory during the build, so a ready-to-edit
//! example sits where the application looks for its `.env` file:
//! - Linux: `~/.local/share/sposync/.env.example`
//! - macOS: `~/Library/Application Support/sposync/.env.example`
//! - Windows: `%LOCALAPPDATA%/sposync/.env.example`
//!
//! A missing template only produces a cargo warning instead of failing the
//! build.

use std::{env, fs, path::PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Re-run if the template changes
    println!("cargo:rerun-if-changed=env.example");

    // Where to copy FROM (crate root)
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    // Compute target dir (your local data dir) and ensure it exists
    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("sposync");
    fs::create_dir_all(&out_dir)?;

    // Only copy if the source exists; otherwise warn instead of failing
    if env_example_path.is_file() {
        let contents = fs::read_to_string(&env_example_path)?;
        fs::write(out_dir.join(".env.example"), contents)?;
    } else {
        println!(
            "cargo:warning=env.example not found at {}",
            env_example_path.display()
        );
    }

    Ok(())
}
