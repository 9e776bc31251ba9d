//! Footer codec and sector-addressed I/O for fixed-size Virtual Hard Disk
//! (VHD) files.
//!
//! A fixed VHD is a flat region of sector data followed by a 512-byte
//! big-endian footer describing it. [`Footer`] handles the wire format,
//! [`Geometry`] derives the legacy CHS triple the footer carries, and
//! [`DiskHandle`] ties both together into bounded, sector-granular reads,
//! writes, and commits over any `Read + Write + Seek` stream.

mod byteorder;
mod clock;
mod disk;
mod error;
mod footer;
mod geometry;
mod uuid_source;

pub use clock::{FixedClock, SystemClock, VhdClock, VHD_EPOCH_OFFSET};
pub use disk::{CreateOptions, DiskHandle, Resizable, SectorSeek};
pub use error::VhdError;
pub use footer::{
    Footer, COOKIE, CREATOR_HOST_OS_MAC, CREATOR_HOST_OS_WINDOWS, DATA_OFFSET_FIXED,
    DISK_TYPE_FIXED, FILE_FORMAT_VERSION, FOOTER_LEN,
};
pub use geometry::Geometry;
pub use uuid::Uuid;
pub use uuid_source::{FixedIdSource, RandomIdSource, VhdIdSource};

pub type Result<T> = std::result::Result<T, VhdError>;

/// Byte-size constants used throughout the sector I/O layer.
pub mod sizes {
    pub const SECTOR: u32 = 512;
    pub const SECTOR_U64: u64 = SECTOR as u64;
    pub const KIB: u64 = 1024;
    pub const MIB: u64 = 1024 * KIB;
    pub const GIB: u64 = 1024 * MIB;
    pub const SECTOR_SHIFT: u32 = 9;
}
