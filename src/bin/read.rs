use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use vhdfix::{DiskHandle, SectorSeek};

/// Reads one 512-byte sector from a Virtual Hard Disk file and prints it.
#[derive(Parser)]
#[command(name = "vhdfix-read", version, about)]
struct Cli {
    /// Path of the VHD file to read from.
    path: PathBuf,

    /// Sector index to read.
    sector: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut handle =
        DiskHandle::open(&cli.path).with_context(|| format!("opening {}", cli.path.display()))?;

    handle
        .seek(SectorSeek::Start(cli.sector))
        .context("seeking to sector")?;

    let mut buf = [0u8; 512];
    handle.read(&mut buf, 1).context("reading sector")?;

    std::io::stdout()
        .write_all(&buf)
        .context("writing sector to stdout")?;
    Ok(())
}
