//! Reading and writing of WAD archives and the fixed-size map records stored
//! inside them.
//!
//! The structure of a WAD is this:
//!
//! ```text,ignore
//!                        <───── 32 bits ──────>
//!                        ┌────────────────────┐
//!             ┌──── 0x00 |  "IWAD" or "PWAD"  | 0x03
//!             |          | ────────────────── |
//!     Header ─┤     0x04 |  number of lumps   | 0x07
//!             |          | ────────────────── |
//!             └──── 0x08 | directory offset ─────0x0B ──┐
//!             ┌───────── | ────────────────── |        |
//!             |     0x0C | ┌────────────────┐ |        |
//!             |          | |   Lump Bytes   |<─────┐   |
//!     Lumps ──┤          | |       .        | |    |   |
//!             |          | └────────────────┘ |    |   |
//!             └───────── |         .          |    |   |
//!             ┌───────── | ┌────────────────┐<─────────┘
//!             |          | |   File Offset  |──────┘
//!  Directory ─┤          | |   Size         | |
//!             |          | |   Name[8]      | |
//!             |          | └────────────────┘ |
//!             └───────── └────────────────────┘
//! ```
//!
//! Everything here works on in-memory buffers. Getting the bytes off disk is
//! left to the caller.

pub mod cursor;
mod error;
/// Fixed-width map records and the codec that turns lumps into sequences of
/// them.
///
/// Each record kind knows its byte width; a lump holding records must be an
/// exact multiple of that width.
pub mod lumps;
/// The archive container: header, directory and lump payloads
pub mod wad;

pub use crate::cursor::Cursor;
pub use crate::error::WadError;
pub use crate::wad::{Archive, Lump, WadKind};
