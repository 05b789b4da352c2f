//! Finding maps in an archive.
//!
//! A map is a marker lump (its name is the map's name) followed by exactly the
//! ten map lumps in their fixed order. Nothing else marks a map, so detection
//! is purely structural: the names must match and each lump must hold a whole
//! number of records.

use std::cell::OnceCell;

use log::{debug, info};
use wad::lumps::MapLump;
use wad::{Archive, Lump, WadError};

use crate::level::Level;

/// True if the ten lumps after `marker` look like a map
pub fn signature_matches(lumps: &[Lump], marker: usize) -> bool {
    let Some(run) = lumps.get(marker + 1..marker + 1 + MapLump::ALL.len()) else {
        return false;
    };
    run.iter().zip(MapLump::ALL).all(|(lump, kind)| {
        if lump.name != kind.name() {
            return false;
        }
        if lump.len() % kind.record_size() != 0 {
            debug!(
                "{} at {}: {} bytes is not a multiple of {}",
                lump.name,
                marker,
                lump.len(),
                kind.record_size()
            );
            return false;
        }
        true
    })
}

/// A map found by `scan`. The map itself is decoded on first access.
#[derive(Debug)]
pub struct LevelSlot {
    name: String,
    marker_index: usize,
    level: OnceCell<Level>,
}

impl LevelSlot {
    fn new(name: String, marker_index: usize) -> Self {
        LevelSlot {
            name,
            marker_index,
            level: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn marker_index(&self) -> usize {
        self.marker_index
    }

    pub fn is_loaded(&self) -> bool {
        self.level.get().is_some()
    }

    /// Decode the map if it hasn't been, using the archive it was found in
    pub fn level(&self, archive: &Archive) -> Result<&Level, WadError> {
        if let Some(level) = self.level.get() {
            return Ok(level);
        }
        let built = Level::build(archive, self.marker_index)?;
        Ok(self.level.get_or_init(|| built))
    }

    pub fn level_mut(&mut self, archive: &Archive) -> Result<&mut Level, WadError> {
        if self.level.get().is_none() {
            let built = Level::build(archive, self.marker_index)?;
            let _ = self.level.set(built);
        }
        self.level.get_mut().ok_or(WadError::NotALevel {
            index: self.marker_index,
        })
    }

    /// Put the map's lumps back into the archive over the ones it came from.
    /// A map that was never loaded is already there unchanged.
    pub fn write_back(&self, archive: &mut Archive) -> Result<(), WadError> {
        match self.level.get() {
            Some(level) => archive.replace_range(self.marker_index + 1, level.to_lumps()),
            None => Ok(()),
        }
    }
}

/// Every map in the archive, in directory order.
///
/// A match claims its marker and all ten lumps, and scanning picks up after
/// them, so no two maps share a lump.
pub fn scan(archive: &Archive) -> Vec<LevelSlot> {
    let lumps = archive.lumps();
    let mut found = Vec::new();
    let mut i = 0;
    while i + MapLump::ALL.len() < lumps.len() {
        if signature_matches(lumps, i) {
            debug!("Found map {} at lump {}", lumps[i].name, i);
            found.push(LevelSlot::new(lumps[i].name.clone(), i));
            i += MapLump::ALL.len() + 1;
        } else {
            i += 1;
        }
    }
    info!("Found {} maps in {} lumps", found.len(), lumps.len());
    found
}
