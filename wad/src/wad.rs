use std::fmt;

use log::{debug, info};

use crate::cursor::{Cursor, NAME_LEN};
use crate::error::WadError;

const HEADER_SIZE: usize = 12;
/// Size of one directory entry: offset, size, and name
const DIR_ENTRY_SIZE: usize = 4 + 4 + NAME_LEN;
/// Offsets and sizes are signed 32 bit on the wire
const MAX_FILE_LEN: usize = i32::MAX as usize;

/// Will be either `IWAD` for a game, or `PWAD` for a patch
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WadKind {
    IWad,
    #[default]
    PWad,
}

impl WadKind {
    fn from_magic(magic: [u8; 4]) -> Result<Self, WadError> {
        match &magic {
            b"IWAD" => Ok(WadKind::IWad),
            b"PWAD" => Ok(WadKind::PWad),
            _ => Err(WadError::BadMagic(magic)),
        }
    }

    pub fn magic(&self) -> &'static [u8; 4] {
        match self {
            WadKind::IWad => b"IWAD",
            WadKind::PWad => b"PWAD",
        }
    }
}

/// A named chunk of bytes. Names are not unique within an archive; every map
/// has its own `THINGS`, `LINEDEFS` and so on.
#[derive(Clone, PartialEq, Eq)]
pub struct Lump {
    pub name: String,
    pub data: Vec<u8>,
}

impl Lump {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Lump {
            name: name.into(),
            data,
        }
    }

    /// A zero length lump, as used for map markers
    pub fn marker(name: impl Into<String>) -> Self {
        Lump::new(name, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for Lump {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Lump {{ name: {}, size: {} }}", self.name, self.data.len())
    }
}

/// "Where's All (the) Data": the ordered lumps of a WAD, detached from the
/// file layout they were read from.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Archive {
    kind: WadKind,
    lumps: Vec<Lump>,
}

impl Archive {
    pub fn new(kind: WadKind) -> Self {
        Archive {
            kind,
            lumps: Vec::new(),
        }
    }

    /// Validate and split a complete WAD file.
    pub fn parse(bytes: &[u8]) -> Result<Self, WadError> {
        let file_len = bytes.len();
        if file_len < HEADER_SIZE {
            return Err(WadError::TooSmall(file_len));
        }
        if file_len >= MAX_FILE_LEN {
            return Err(WadError::TooLarge(file_len));
        }

        let mut cursor = Cursor::new(bytes);
        let mut magic = [0u8; 4];
        magic.copy_from_slice(cursor.read_bytes(4));
        let kind = WadKind::from_magic(magic)?;
        let num_lumps = cursor.read_i32();
        let dir_offset = cursor.read_i32();
        debug!(
            "WAD header: {:?}, {} lumps, directory at {}",
            kind, num_lumps, dir_offset
        );

        if num_lumps < 0 {
            return Err(WadError::BadLumpCount(num_lumps));
        }
        let dir_len = num_lumps
            .checked_mul(DIR_ENTRY_SIZE as i32)
            .ok_or(WadError::BadLumpCount(num_lumps))?;
        if num_lumps > 0 {
            let out_of_bounds = WadError::DirectoryOutOfBounds {
                offset: dir_offset,
                count: num_lumps,
                file_len,
            };
            if dir_offset < 0 {
                return Err(out_of_bounds);
            }
            match dir_offset.checked_add(dir_len) {
                Some(end) if end as usize <= file_len => {}
                _ => return Err(out_of_bounds),
            }
        }

        let mut lumps = Vec::with_capacity(num_lumps as usize);
        cursor.set_position(dir_offset.max(0) as usize);
        for _ in 0..num_lumps {
            let offset = cursor.read_i32();
            let size = cursor.read_i32();
            let name = cursor.read_name();

            if size < 0 {
                return Err(WadError::NegativeLumpSize { name, size });
            }
            let data = if size == 0 {
                Vec::new()
            } else {
                let in_bounds = offset >= 0
                    && offset
                        .checked_add(size)
                        .is_some_and(|end| end as usize <= file_len);
                if !in_bounds {
                    return Err(WadError::LumpOutOfBounds {
                        name,
                        offset,
                        size,
                        file_len,
                    });
                }
                let start = offset as usize;
                bytes[start..start + size as usize].to_vec()
            };
            lumps.push(Lump { name, data });
        }

        info!("Read {:?} with {} lumps", kind, lumps.len());
        Ok(Archive { kind, lumps })
    }

    /// Write out the header, every lump payload in order, then the directory.
    /// Offsets are recomputed so the physical layout may differ from what was
    /// parsed.
    pub fn serialize(&self) -> Vec<u8> {
        let payload: usize = self.lumps.iter().map(Lump::len).sum();
        let mut cursor = Cursor::new(Vec::with_capacity(
            HEADER_SIZE + payload + self.lumps.len() * DIR_ENTRY_SIZE,
        ));

        cursor.write_bytes(self.kind.magic());
        cursor.write_i32(self.lumps.len() as i32);
        // patched once the payload size is known
        cursor.write_i32(0);

        let mut offsets = Vec::with_capacity(self.lumps.len());
        for lump in &self.lumps {
            offsets.push(cursor.position() as i32);
            cursor.write_bytes(&lump.data);
        }

        let dir_offset = cursor.position();
        for (lump, offset) in self.lumps.iter().zip(offsets) {
            cursor.write_i32(offset);
            cursor.write_i32(lump.data.len() as i32);
            cursor.write_name(&lump.name);
        }

        cursor.set_position(8);
        cursor.write_i32(dir_offset as i32);
        cursor.into_inner()
    }

    pub fn kind(&self) -> WadKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: WadKind) {
        self.kind = kind;
    }

    pub fn lumps(&self) -> &[Lump] {
        &self.lumps
    }

    pub fn lump(&self, index: usize) -> Option<&Lump> {
        self.lumps.get(index)
    }

    pub fn len(&self) -> usize {
        self.lumps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lumps.is_empty()
    }

    pub fn push(&mut self, lump: Lump) {
        self.lumps.push(lump);
    }

    /// Index of the first lump with this name
    pub fn find_lump(&self, name: &str) -> Option<usize> {
        self.find_lump_after(name, 0)
    }

    /// Index of the first lump with this name at or after `start`
    pub fn find_lump_after(&self, name: &str, start: usize) -> Option<usize> {
        self.lumps
            .iter()
            .skip(start)
            .position(|l| l.name == name)
            .map(|i| i + start)
    }

    pub fn lump_exists(&self, name: &str) -> bool {
        self.find_lump(name).is_some()
    }

    /// Overwrite `lumps.len()` lumps starting at `start`. Used to put a
    /// rebuilt map back over the lumps it was read from.
    pub fn replace_range(&mut self, start: usize, lumps: Vec<Lump>) -> Result<(), WadError> {
        let end = start + lumps.len();
        if end > self.lumps.len() {
            return Err(WadError::NotALevel { index: start });
        }
        self.lumps.splice(start..end, lumps);
        Ok(())
    }
}
