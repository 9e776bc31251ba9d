use uuid::Uuid;

use crate::byteorder::{from_disk_u32, from_disk_u64, to_disk_u32, to_disk_u64};
use crate::error::VhdError;
use crate::geometry::Geometry;
use crate::sizes;

/// ASCII `"conectix"`.
pub const COOKIE: [u8; 8] = *b"conectix";
pub const FILE_FORMAT_VERSION: u32 = 0x0001_0000;
/// Sentinel `data_offset` value that marks a disk as fixed (no BAT follows).
pub const DATA_OFFSET_FIXED: u64 = 0xFFFF_FFFF_FFFF_FFFF;
pub const DISK_TYPE_FIXED: u32 = 2;

pub const CREATOR_HOST_OS_WINDOWS: u32 = 0x5769_326B; // "Wi2k"
pub const CREATOR_HOST_OS_MAC: u32 = 0x4D61_6320; // "Mac "

pub const FOOTER_LEN: usize = 512;

/// The 512-byte VHD footer, held in host-native byte order in memory.
///
/// [`Footer::encode`]/[`Footer::decode`] are the only places that touch
/// endianness; neither mutates its input, so there is no transient
/// wrong-endianness state visible between calls (unlike the in-place
/// double-swap the original reference performs around every disk I/O).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footer {
    pub cookie: [u8; 8],
    pub features: u32,
    pub file_format_version: u32,
    pub data_offset: u64,
    pub timestamp: u32,
    pub creator_application: [u8; 4],
    pub creator_version: u32,
    pub creator_host_os: u32,
    pub original_size: u64,
    pub current_size: u64,
    pub disk_geometry: u32,
    pub disk_type: u32,
    pub checksum: u32,
    pub uuid: Uuid,
    pub saved_state: u8,
    pub reserved: [u8; 427],
}

impl Footer {
    /// A footer with every field zeroed, matching what `open` hands back
    /// for a freshly created (empty) backing file.
    pub fn zeroed() -> Self {
        Footer {
            cookie: [0; 8],
            features: 0,
            file_format_version: 0,
            data_offset: 0,
            timestamp: 0,
            creator_application: [0; 4],
            creator_version: 0,
            creator_host_os: 0,
            original_size: 0,
            current_size: 0,
            disk_geometry: 0,
            disk_type: 0,
            checksum: 0,
            uuid: Uuid::nil(),
            saved_state: 0,
            reserved: [0; 427],
        }
    }

    pub fn geometry(&self) -> Geometry {
        Geometry::decode(self.disk_geometry)
    }

    /// Serializes this footer to its 512-byte big-endian on-disk form.
    /// Does not mutate `self`.
    pub fn encode(&self) -> [u8; FOOTER_LEN] {
        let mut buf = [0u8; FOOTER_LEN];
        buf[0..8].copy_from_slice(&self.cookie);
        buf[8..12].copy_from_slice(&to_disk_u32(self.features));
        buf[12..16].copy_from_slice(&to_disk_u32(self.file_format_version));
        buf[16..24].copy_from_slice(&to_disk_u64(self.data_offset));
        buf[24..28].copy_from_slice(&to_disk_u32(self.timestamp));
        buf[28..32].copy_from_slice(&self.creator_application);
        buf[32..36].copy_from_slice(&to_disk_u32(self.creator_version));
        buf[36..40].copy_from_slice(&to_disk_u32(self.creator_host_os));
        buf[40..48].copy_from_slice(&to_disk_u64(self.original_size));
        buf[48..56].copy_from_slice(&to_disk_u64(self.current_size));
        buf[56..60].copy_from_slice(&to_disk_u32(self.disk_geometry));
        buf[60..64].copy_from_slice(&to_disk_u32(self.disk_type));
        buf[64..68].copy_from_slice(&to_disk_u32(self.checksum));
        buf[68..84].copy_from_slice(self.uuid.as_bytes());
        buf[84] = self.saved_state;
        buf[85..512].copy_from_slice(&self.reserved);
        buf
    }

    /// Parses a 512-byte big-endian buffer into a host-native [`Footer`].
    pub fn decode(bytes: &[u8]) -> Result<Self, VhdError> {
        if bytes.len() != FOOTER_LEN {
            return Err(VhdError::MalformedFooter(format!(
                "expected {FOOTER_LEN} bytes, got {}",
                bytes.len()
            )));
        }

        let mut cookie = [0u8; 8];
        cookie.copy_from_slice(&bytes[0..8]);
        let mut creator_application = [0u8; 4];
        creator_application.copy_from_slice(&bytes[28..32]);
        let mut uuid_bytes = [0u8; 16];
        uuid_bytes.copy_from_slice(&bytes[68..84]);
        let mut reserved = [0u8; 427];
        reserved.copy_from_slice(&bytes[85..512]);

        let array4 = |range: std::ops::Range<usize>| -> [u8; 4] {
            let mut a = [0u8; 4];
            a.copy_from_slice(&bytes[range]);
            a
        };
        let array8 = |range: std::ops::Range<usize>| -> [u8; 8] {
            let mut a = [0u8; 8];
            a.copy_from_slice(&bytes[range]);
            a
        };

        Ok(Footer {
            cookie,
            features: from_disk_u32(array4(8..12)),
            file_format_version: from_disk_u32(array4(12..16)),
            data_offset: from_disk_u64(array8(16..24)),
            timestamp: from_disk_u32(array4(24..28)),
            creator_application,
            creator_version: from_disk_u32(array4(32..36)),
            creator_host_os: from_disk_u32(array4(36..40)),
            original_size: from_disk_u64(array8(40..48)),
            current_size: from_disk_u64(array8(48..56)),
            disk_geometry: from_disk_u32(array4(56..60)),
            disk_type: from_disk_u32(array4(60..64)),
            checksum: from_disk_u32(array4(64..68)),
            uuid: Uuid::from_bytes(uuid_bytes),
            saved_state: bytes[84],
            reserved,
        })
    }

    /// One's-complement of the byte-sum of the 512-byte encoded form, with
    /// the checksum field itself treated as zero. Does not mutate `self`.
    pub fn checksum(&self) -> u32 {
        let mut bytes = self.encode();
        bytes[64..68].copy_from_slice(&[0, 0, 0, 0]);

        let sum: u32 = bytes.iter().fold(0u32, |acc, &b| acc.wrapping_add(b as u32));
        !sum
    }

    /// Recomputes the checksum and compares it to the stored value.
    pub fn verify(&self) -> Result<(), VhdError> {
        let actual = self.checksum();
        if actual != self.checksum {
            return Err(VhdError::BadChecksum {
                expected: self.checksum,
                actual,
            });
        }
        Ok(())
    }

    pub fn is_fixed(&self) -> bool {
        self.disk_type == DISK_TYPE_FIXED && self.data_offset == DATA_OFFSET_FIXED
    }

    pub fn sector_count(&self) -> u64 {
        self.current_size / sizes::SECTOR_U64
    }
}
