//! The editable form of a Doom map.
//!
//! `scan` finds the maps in a `wad::Archive`; each one decodes on demand into
//! a `Level`, a graph of entities linked by stable handles with the reverse
//! links kept alongside. Edits go through `Level` so both directions stay in
//! step, and `Level::to_lumps` flattens the graph back into wire records.

mod backrefs;
mod edit;
mod interact;
mod level;
mod locator;
pub mod map_defs;
mod store;
mod thing_types;

#[cfg(test)]
mod test_utils;

pub use edit::{EditError, Side};
pub use glam;
pub use interact::{DragTarget, Interactive, MapExtents};
pub use level::{Level, LevelStats};
pub use locator::{LevelSlot, scan, signature_matches};
pub use log;
pub use map_defs::{
    DragState, Draggable, LineDef, Node, Point, Sector, Segment, SideDef, SubSector, Thing,
    Vertex,
};
pub use store::{LinedefId, SectorId, SidedefId, ThingId, VertexId};
pub use thing_types::{ConfigError, Rgb, ThingInfo, ThingTypes};
pub use wad;
