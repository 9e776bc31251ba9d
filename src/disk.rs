use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::{debug, instrument, warn};

use crate::clock::{SystemClock, VhdClock};
use crate::error::VhdError;
use crate::footer::{
    Footer, CREATOR_HOST_OS_WINDOWS, DATA_OFFSET_FIXED, DISK_TYPE_FIXED, FILE_FORMAT_VERSION,
    FOOTER_LEN,
};
use crate::geometry::Geometry;
use crate::sizes;
use crate::uuid_source::{RandomIdSource, VhdIdSource};

/// A type that can be resized in place, the way a real file can be
/// truncated or extended. Implemented for [`File`] and for
/// `Cursor<Vec<u8>>` so tests can exercise [`DiskHandle::commit`]'s
/// truncation behavior without touching the filesystem.
pub trait Resizable {
    fn set_len(&mut self, len: u64) -> std::io::Result<()>;
}

impl Resizable for File {
    fn set_len(&mut self, len: u64) -> std::io::Result<()> {
        File::set_len(self, len)
    }
}

impl Resizable for std::io::Cursor<Vec<u8>> {
    fn set_len(&mut self, len: u64) -> std::io::Result<()> {
        self.get_mut().resize(len as usize, 0);
        Ok(())
    }
}

/// Options controlling the footer populated by [`DiskHandle::create`].
pub struct CreateOptions {
    pub creator_application: [u8; 4],
    pub creator_version: u32,
    pub creator_host_os: u32,
    pub clock: Box<dyn VhdClock>,
    pub id_source: Box<dyn VhdIdSource>,
}

impl Default for CreateOptions {
    fn default() -> Self {
        CreateOptions {
            creator_application: *b"vhdf",
            creator_version: FILE_FORMAT_VERSION,
            creator_host_os: CREATOR_HOST_OS_WINDOWS,
            clock: Box::new(SystemClock),
            id_source: Box::new(RandomIdSource),
        }
    }
}

impl CreateOptions {
    pub fn creator_application(mut self, tag: [u8; 4]) -> Self {
        self.creator_application = tag;
        self
    }

    pub fn creator_host_os(mut self, fourcc: u32) -> Self {
        self.creator_host_os = fourcc;
        self
    }

    pub fn clock(mut self, clock: impl VhdClock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn id_source(mut self, id_source: impl VhdIdSource + 'static) -> Self {
        self.id_source = Box::new(id_source);
        self
    }
}

/// Where a sector-addressed seek is anchored. Mirrors [`SeekFrom`] but
/// counts in 512-byte sectors instead of bytes.
#[derive(Debug, Clone, Copy)]
pub enum SectorSeek {
    Start(u64),
    Current(i64),
    /// The virtual end of the data region: `current_size / 512`, i.e. the
    /// first byte of the footer.
    End,
}

/// A fixed-size VHD backed by any `Read + Write + Seek + Resizable` stream.
///
/// Generic over the stream so both a real file and an in-memory
/// `Cursor<Vec<u8>>` satisfy it; [`DiskHandle::create`]/[`DiskHandle::open`]
/// are the `File`-backed convenience constructors real callers use.
pub struct DiskHandle<S> {
    stream: S,
    footer: Footer,
}

impl<S: Read + Write + Seek + Resizable> DiskHandle<S> {
    /// Builds a fresh fixed disk of `size_bytes` over `stream`, which is
    /// assumed to already be zero-length. Zero-fills the data region,
    /// populates a footer from `options`, and commits it.
    #[instrument(skip(stream, options))]
    pub fn create_in(mut stream: S, size_bytes: u64, options: CreateOptions) -> Result<Self, VhdError> {
        if size_bytes == 0 || size_bytes % sizes::SECTOR_U64 != 0 {
            return Err(VhdError::InvalidArgument(format!(
                "size_bytes must be a positive multiple of 512, got {size_bytes}"
            )));
        }

        stream.set_len(size_bytes)?;
        stream.seek(SeekFrom::Start(0))?;

        let mut footer = Footer::zeroed();
        footer.cookie = crate::footer::COOKIE;
        footer.features = 0;
        footer.file_format_version = FILE_FORMAT_VERSION;
        footer.data_offset = DATA_OFFSET_FIXED;
        footer.timestamp = options.clock.now_vhd_epoch();
        footer.creator_application = options.creator_application;
        footer.creator_version = options.creator_version;
        footer.creator_host_os = options.creator_host_os;
        footer.original_size = size_bytes;
        footer.current_size = size_bytes;
        footer.disk_geometry = Geometry::from_capacity(size_bytes).encode();
        footer.disk_type = DISK_TYPE_FIXED;
        footer.uuid = options.id_source.generate();
        footer.saved_state = 0;
        footer.checksum = footer.checksum();

        let mut handle = DiskHandle { stream, footer };
        handle.commit()?;
        debug!(size_bytes, "created fixed vhd");
        Ok(handle)
    }

    /// Opens an existing (or freshly empty) backing stream.
    ///
    /// An empty stream is treated as freshly created: the returned handle
    /// has a zeroed footer, and the caller is expected to populate it and
    /// call [`DiskHandle::commit`]. A non-empty stream shorter than 512
    /// bytes fails with [`VhdError::TruncatedFile`]. Otherwise the trailing
    /// footer is read and its checksum verified.
    #[instrument(skip(stream))]
    pub fn open_in(mut stream: S) -> Result<Self, VhdError> {
        let len = stream.seek(SeekFrom::End(0))?;

        let footer = if len == 0 {
            Footer::zeroed()
        } else if len < FOOTER_LEN as u64 {
            return Err(VhdError::TruncatedFile);
        } else {
            stream.seek(SeekFrom::Start(len - FOOTER_LEN as u64))?;
            let mut buf = [0u8; FOOTER_LEN];
            stream.read_exact(&mut buf)?;
            let footer = Footer::decode(&buf)?;
            if let Err(e) = footer.verify() {
                warn!(error = %e, "footer checksum mismatch");
                return Err(e);
            }
            footer
        };

        stream.seek(SeekFrom::Start(0))?;
        Ok(DiskHandle { stream, footer })
    }

    pub fn footer(&self) -> &Footer {
        &self.footer
    }

    pub fn footer_mut(&mut self) -> &mut Footer {
        &mut self.footer
    }

    /// Reads `count` sectors (`count * 512` bytes) into `buf`, which must be
    /// exactly that size.
    pub fn read(&mut self, buf: &mut [u8], count: u64) -> Result<(), VhdError> {
        let requested = count
            .checked_mul(sizes::SECTOR_U64)
            .ok_or_else(|| VhdError::InvalidArgument("sector count overflows".into()))?;
        if buf.len() as u64 != requested {
            return Err(VhdError::InvalidArgument(format!(
                "buffer is {} bytes, expected {requested} for {count} sectors",
                buf.len()
            )));
        }

        let cursor = self.stream.stream_position()?;
        let limit = self.footer.current_size;
        if requested > limit || cursor > limit - requested {
            return Err(VhdError::OutOfBounds { cursor, requested, limit });
        }

        self.stream.read_exact(buf)?;
        Ok(())
    }

    /// Writes `count` sectors (`count * 512` bytes) from `buf`, which must
    /// be exactly that size. Never extends the file past `current_size`.
    pub fn write(&mut self, buf: &[u8], count: u64) -> Result<(), VhdError> {
        let requested = count
            .checked_mul(sizes::SECTOR_U64)
            .ok_or_else(|| VhdError::InvalidArgument("sector count overflows".into()))?;
        if buf.len() as u64 != requested {
            return Err(VhdError::InvalidArgument(format!(
                "buffer is {} bytes, expected {requested} for {count} sectors",
                buf.len()
            )));
        }

        let cursor = self.stream.stream_position()?;
        let limit = self.footer.current_size;
        if requested > limit || cursor > limit - requested {
            return Err(VhdError::OutOfBounds { cursor, requested, limit });
        }

        self.stream.write_all(buf)?;
        Ok(())
    }

    /// Returns the current sector index (`cursor_bytes / 512`).
    pub fn tell(&mut self) -> Result<u64, VhdError> {
        Ok(self.stream.stream_position()? / sizes::SECTOR_U64)
    }

    /// Moves the cursor and returns the resulting sector index.
    pub fn seek(&mut self, whence: SectorSeek) -> Result<u64, VhdError> {
        match whence {
            SectorSeek::Start(sector) => {
                self.stream.seek(SeekFrom::Start(sector * sizes::SECTOR_U64))?;
            }
            SectorSeek::Current(delta) => {
                self.stream.seek(SeekFrom::Current(delta * sizes::SECTOR_U64 as i64))?;
            }
            SectorSeek::End => {
                self.stream.seek(SeekFrom::Start(self.footer.current_size))?;
            }
        }
        self.tell()
    }

    /// Flushes the stream's library-level buffers. Does not fsync.
    pub fn flush(&mut self) -> Result<(), VhdError> {
        self.stream.flush()?;
        Ok(())
    }

    /// Persists the in-memory footer to `[current_size, current_size + 512)`
    /// and truncates/extends the backing stream to exactly that length.
    ///
    /// The caller is expected to have set `current_size` to a multiple of
    /// 512 and refreshed `checksum` beforehand. Leaves the in-memory footer
    /// in host-native order (encoding never mutates it) and the cursor at
    /// offset 0.
    #[instrument(skip(self))]
    pub fn commit(&mut self) -> Result<(), VhdError> {
        if self.footer.current_size % sizes::SECTOR_U64 != 0 {
            return Err(VhdError::InvalidArgument(
                "current_size must be a multiple of 512 before commit".into(),
            ));
        }

        let encoded = self.footer.encode();
        self.stream.seek(SeekFrom::Start(self.footer.current_size))?;
        self.stream.write_all(&encoded)?;
        self.stream.set_len(self.footer.current_size + FOOTER_LEN as u64)?;
        self.stream.seek(SeekFrom::Start(0))?;
        debug!(current_size = self.footer.current_size, "committed footer");
        Ok(())
    }
}

impl DiskHandle<File> {
    pub fn create(path: impl AsRef<Path>, size_bytes: u64, options: CreateOptions) -> Result<Self, VhdError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Self::create_in(file, size_bytes, options)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, VhdError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;
        Self::open_in(file)
    }
}
