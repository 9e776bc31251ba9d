use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use vhdfix::{sizes, CreateOptions, DiskHandle};

/// Creates a new fixed-size Virtual Hard Disk file.
#[derive(Parser)]
#[command(name = "vhdfix-create", version, about)]
struct Cli {
    /// Path of the VHD file to create.
    path: PathBuf,

    /// Virtual disk size in bytes. Must be a positive multiple of 512.
    size_bytes: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let handle = DiskHandle::create(&cli.path, cli.size_bytes, CreateOptions::default())
        .with_context(|| format!("creating {}", cli.path.display()))?;

    println!(
        "created {} ({} bytes, geometry {})",
        cli.path.display(),
        cli.size_bytes,
        handle.footer().geometry()
    );
    println!("size in MiB: {}", cli.size_bytes / sizes::MIB);

    Ok(())
}
