use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use vhdfix::{DiskHandle, SectorSeek};

/// Fills one 512-byte sector of a Virtual Hard Disk file with a single byte.
#[derive(Parser)]
#[command(name = "vhdfix-write", version, about)]
struct Cli {
    /// Path of the VHD file to write to.
    path: PathBuf,

    /// Sector index to write.
    sector: u64,

    /// Single ASCII character to fill the sector with.
    fill: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let Some(byte) = cli.fill.bytes().next() else {
        bail!("fill value must be a single character");
    };

    let mut handle =
        DiskHandle::open(&cli.path).with_context(|| format!("opening {}", cli.path.display()))?;

    handle
        .seek(SectorSeek::Start(cli.sector))
        .context("seeking to sector")?;

    let buf = [byte; 512];
    handle.write(&buf, 1).context("writing sector")?;
    handle.flush().context("flushing")?;

    Ok(())
}
