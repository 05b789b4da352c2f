use std::error::Error;
use std::fmt;

/// Failures while reading a WAD or the map lumps inside it. Any of these
/// aborts the whole load; no partial archive is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WadError {
    /// Shorter than the 12 byte header
    TooSmall(usize),
    /// Sizes and offsets are signed 32 bit, so the file can't reach 2GiB
    TooLarge(usize),
    BadMagic([u8; 4]),
    BadLumpCount(i32),
    DirectoryOutOfBounds {
        offset: i32,
        count: i32,
        file_len: usize,
    },
    NegativeLumpSize {
        name: String,
        size: i32,
    },
    LumpOutOfBounds {
        name: String,
        offset: i32,
        size: i32,
        file_len: usize,
    },
    /// A lump's length is not a whole number of records
    BadRecordSize {
        lump: String,
        size: usize,
        record: usize,
    },
    /// The lumps following `index` are not a map
    NotALevel {
        index: usize,
    },
}

impl Error for WadError {}

impl fmt::Display for WadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WadError::TooSmall(len) => {
                write!(f, "{} bytes is too small for a WAD header", len)
            }
            WadError::TooLarge(len) => write!(f, "{} bytes is too large for a WAD", len),
            WadError::BadMagic(m) => {
                write!(f, "not a WAD, magic is {:?}", String::from_utf8_lossy(m))
            }
            WadError::BadLumpCount(n) => write!(f, "invalid lump count {}", n),
            WadError::DirectoryOutOfBounds {
                offset,
                count,
                file_len,
            } => write!(
                f,
                "directory of {} lumps at offset {} runs past end of file ({} bytes)",
                count, offset, file_len
            ),
            WadError::NegativeLumpSize { name, size } => {
                write!(f, "lump {} has negative size {}", name, size)
            }
            WadError::LumpOutOfBounds {
                name,
                offset,
                size,
                file_len,
            } => write!(
                f,
                "lump {} ({} bytes at offset {}) runs past end of file ({} bytes)",
                name, size, offset, file_len
            ),
            WadError::BadRecordSize { lump, size, record } => write!(
                f,
                "lump {} is {} bytes, not a multiple of the {} byte record",
                lump, size, record
            ),
            WadError::NotALevel { index } => {
                write!(f, "lumps after index {} are not a map", index)
            }
        }
    }
}
