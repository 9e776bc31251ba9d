use thiserror::Error;

/// Every way a fixed-disk operation can fail.
#[derive(Error, Debug)]
pub enum VhdError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file is non-empty but shorter than a 512-byte footer")]
    TruncatedFile,

    #[error("malformed footer: {0}")]
    MalformedFooter(String),

    #[error("bad footer checksum: expected {expected:#010X}, computed {actual:#010X}")]
    BadChecksum { expected: u32, actual: u32 },

    #[error("sector access out of bounds: cursor {cursor} bytes, requested {requested} bytes, limit {limit} bytes")]
    OutOfBounds {
        cursor: u64,
        requested: u64,
        limit: u64,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}