//! Mutations on a `Level`.
//!
//! Every method that changes a link updates the reverse reference in the same
//! call, and checks all handles before touching anything, so a failed edit
//! leaves the level as it was.

use std::error::Error;
use std::fmt;

use log::debug;

use crate::level::Level;
use crate::map_defs::{Draggable, LineDef, Point, Sector, SideDef, Thing, Vertex};
use crate::store::{LinedefId, SectorId, SidedefId, ThingId, VertexId};

/// A handle that no longer names anything in the level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditError {
    NoSuchVertex(VertexId),
    NoSuchLinedef(LinedefId),
    NoSuchSidedef(SidedefId),
    NoSuchSector(SectorId),
    NoSuchThing(ThingId),
}

impl Error for EditError {}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::NoSuchVertex(id) => write!(f, "no vertex {:?}", id),
            EditError::NoSuchLinedef(id) => write!(f, "no linedef {:?}", id),
            EditError::NoSuchSidedef(id) => write!(f, "no sidedef {:?}", id),
            EditError::NoSuchSector(id) => write!(f, "no sector {:?}", id),
            EditError::NoSuchThing(id) => write!(f, "no thing {:?}", id),
        }
    }
}

/// Which side of a linedef
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
}

/// Which end of a linedef
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum End {
    Start,
    End,
}

impl Level {
    fn check_vertex(&self, id: VertexId) -> Result<(), EditError> {
        if self.vertexes.contains(id) {
            Ok(())
        } else {
            Err(EditError::NoSuchVertex(id))
        }
    }

    fn check_sidedef(&self, id: Option<SidedefId>) -> Result<(), EditError> {
        match id {
            Some(id) if !self.sidedefs.contains(id) => Err(EditError::NoSuchSidedef(id)),
            _ => Ok(()),
        }
    }

    fn check_sector(&self, id: Option<SectorId>) -> Result<(), EditError> {
        match id {
            Some(id) if !self.sectors.contains(id) => Err(EditError::NoSuchSector(id)),
            _ => Ok(()),
        }
    }

    fn line_ref(&self, id: LinedefId) -> Result<&LineDef, EditError> {
        self.linedefs.get(id).ok_or(EditError::NoSuchLinedef(id))
    }

    fn adjust_degree(&mut self, id: VertexId, up: bool) {
        if let Some(v) = self.vertexes.get_mut(id) {
            if up {
                v.degree += 1;
            } else {
                v.degree = v.degree.saturating_sub(1);
            }
        }
    }

    /// Point `line`'s end at `to`, moving the line between the two vertex
    /// adjacency sets. Returns the vertex it was attached to.
    fn set_end(&mut self, line: LinedefId, end: End, to: VertexId) -> Result<VertexId, EditError> {
        let l = self.line_ref(line)?;
        self.check_vertex(to)?;
        let (old, other) = match end {
            End::Start => (l.v1, l.v2),
            End::End => (l.v2, l.v1),
        };
        if old == to {
            return Ok(old);
        }

        if let Some(l) = self.linedefs.get_mut(line) {
            match end {
                End::Start => l.v1 = to,
                End::End => l.v2 = to,
            }
        }
        // a line may loop back on a single vertex, keep it listed while either
        // end still touches
        if other != old {
            self.vertex_lines.unlink(old, line);
        }
        self.vertex_lines.link(to, line);
        self.adjust_degree(old, false);
        self.adjust_degree(to, true);
        Ok(old)
    }

    pub fn set_linedef_v1(&mut self, line: LinedefId, to: VertexId) -> Result<VertexId, EditError> {
        self.set_end(line, End::Start, to)
    }

    pub fn set_linedef_v2(&mut self, line: LinedefId, to: VertexId) -> Result<VertexId, EditError> {
        self.set_end(line, End::End, to)
    }

    /// Attach or detach a sidedef on one side of a line. Returns the sidedef
    /// that was there.
    pub fn set_linedef_side(
        &mut self,
        line: LinedefId,
        side: Side,
        to: Option<SidedefId>,
    ) -> Result<Option<SidedefId>, EditError> {
        let l = self.line_ref(line)?;
        self.check_sidedef(to)?;
        let (old, other) = match side {
            Side::Front => (l.front_sidedef, l.back_sidedef),
            Side::Back => (l.back_sidedef, l.front_sidedef),
        };
        if old == to {
            return Ok(old);
        }

        if let Some(l) = self.linedefs.get_mut(line) {
            match side {
                Side::Front => l.front_sidedef = to,
                Side::Back => l.back_sidedef = to,
            }
        }
        if let Some(old) = old {
            if other != Some(old) {
                self.sidedef_lines.unlink(old, line);
            }
        }
        if let Some(to) = to {
            self.sidedef_lines.link(to, line);
        }
        Ok(old)
    }

    pub fn set_linedef_front(
        &mut self,
        line: LinedefId,
        to: Option<SidedefId>,
    ) -> Result<Option<SidedefId>, EditError> {
        self.set_linedef_side(line, Side::Front, to)
    }

    pub fn set_linedef_back(
        &mut self,
        line: LinedefId,
        to: Option<SidedefId>,
    ) -> Result<Option<SidedefId>, EditError> {
        self.set_linedef_side(line, Side::Back, to)
    }

    /// Swap the start and end vertex, and with them the front and back sides
    pub fn flip_linedef(&mut self, line: LinedefId) -> Result<(), EditError> {
        let l = self
            .linedefs
            .get_mut(line)
            .ok_or(EditError::NoSuchLinedef(line))?;
        std::mem::swap(&mut l.v1, &mut l.v2);
        std::mem::swap(&mut l.front_sidedef, &mut l.back_sidedef);
        Ok(())
    }

    pub fn set_sidedef_sector(
        &mut self,
        side: SidedefId,
        to: Option<SectorId>,
    ) -> Result<Option<SectorId>, EditError> {
        self.check_sector(to)?;
        let s = self
            .sidedefs
            .get_mut(side)
            .ok_or(EditError::NoSuchSidedef(side))?;
        let old = std::mem::replace(&mut s.sector, to);
        self.sector_sides.relink(old, to, side);
        Ok(old)
    }

    pub fn add_vertex(&mut self, x: i16, y: i16) -> VertexId {
        self.vertexes.insert(Vertex::new(x, y))
    }

    pub fn move_vertex(&mut self, id: VertexId, to: Point) -> Result<(), EditError> {
        self.vertexes
            .get_mut(id)
            .ok_or(EditError::NoSuchVertex(id))?
            .set_position(to);
        Ok(())
    }

    /// Remove a vertex and every linedef that uses it, since a line can't
    /// exist without both ends
    pub fn remove_vertex(&mut self, id: VertexId) -> Result<Vertex, EditError> {
        self.check_vertex(id)?;
        let lines: Vec<LinedefId> = self.vertex_lines.get(id).collect();
        for line in &lines {
            self.remove_linedef(*line)?;
        }
        debug!("{}: removed vertex and {} linedefs", self.name(), lines.len());
        self.vertex_lines.take(id);
        self.vertexes.remove(id).ok_or(EditError::NoSuchVertex(id))
    }

    pub fn add_linedef(&mut self, v1: VertexId, v2: VertexId) -> Result<LinedefId, EditError> {
        self.check_vertex(v1)?;
        self.check_vertex(v2)?;
        let id = self.linedefs.insert(LineDef::new(v1, v2));
        for v in [v1, v2] {
            self.vertex_lines.link(v, id);
            self.adjust_degree(v, true);
        }
        Ok(id)
    }

    pub fn remove_linedef(&mut self, id: LinedefId) -> Result<LineDef, EditError> {
        let line = self.linedefs.remove(id).ok_or(EditError::NoSuchLinedef(id))?;
        for v in [line.v1, line.v2] {
            self.vertex_lines.unlink(v, id);
            self.adjust_degree(v, false);
        }
        for side in [line.front_sidedef, line.back_sidedef].into_iter().flatten() {
            self.sidedef_lines.unlink(side, id);
        }
        Ok(line)
    }

    pub fn add_sidedef(&mut self, side: SideDef, sector: Option<SectorId>) -> Result<SidedefId, EditError> {
        self.check_sector(sector)?;
        let mut side = side;
        side.sector = sector;
        let id = self.sidedefs.insert(side);
        if let Some(sector) = sector {
            self.sector_sides.link(sector, id);
        }
        Ok(id)
    }

    /// Remove a sidedef, clearing it from every linedef side that used it
    pub fn remove_sidedef(&mut self, id: SidedefId) -> Result<SideDef, EditError> {
        let side = self.sidedefs.remove(id).ok_or(EditError::NoSuchSidedef(id))?;
        for line in self.sidedef_lines.take(id) {
            if let Some(l) = self.linedefs.get_mut(line) {
                if l.front_sidedef == Some(id) {
                    l.front_sidedef = None;
                }
                if l.back_sidedef == Some(id) {
                    l.back_sidedef = None;
                }
            }
        }
        if let Some(sector) = side.sector {
            self.sector_sides.unlink(sector, id);
        }
        Ok(side)
    }

    pub fn add_sector(&mut self, sector: Sector) -> SectorId {
        self.sectors.insert(sector)
    }

    /// Remove a sector, leaving the sidedefs that faced it without one
    pub fn remove_sector(&mut self, id: SectorId) -> Result<Sector, EditError> {
        let sector = self.sectors.remove(id).ok_or(EditError::NoSuchSector(id))?;
        for side in self.sector_sides.take(id) {
            if let Some(s) = self.sidedefs.get_mut(side) {
                s.sector = None;
            }
        }
        Ok(sector)
    }

    pub fn add_thing(&mut self, thing: Thing) -> ThingId {
        self.things.insert(thing)
    }

    pub fn remove_thing(&mut self, id: ThingId) -> Result<Thing, EditError> {
        self.things.remove(id).ok_or(EditError::NoSuchThing(id))
    }

    pub fn move_thing(&mut self, id: ThingId, to: Point) -> Result<(), EditError> {
        self.things
            .get_mut(id)
            .ok_or(EditError::NoSuchThing(id))?
            .set_position(to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{EditError, Side};
    use crate::level::Level;
    use crate::map_defs::{Point, Sector, SideDef, Thing};
    use crate::store::{LinedefId, VertexId};
    use crate::test_utils::square_room;

    fn room() -> Level {
        Level::build(&square_room().archive(), 0).unwrap()
    }

    fn lines_at(level: &Level, v: VertexId) -> Vec<LinedefId> {
        level.vertex_linedefs(v).collect()
    }

    #[test]
    fn reassign_v1_moves_adjacency() {
        let mut level = room();
        let line = level.linedef_ids()[0];
        let a = level.vertex_ids()[0];
        let b = level.add_vertex(-64, 0);

        assert!(lines_at(&level, a).contains(&line));
        let old = level.set_linedef_v1(line, b).unwrap();
        assert_eq!(old, a);
        assert!(!lines_at(&level, a).contains(&line));
        assert_eq!(lines_at(&level, b), vec![line]);
        assert_eq!(level.vertex(a).unwrap().degree(), 1);
        assert_eq!(level.vertex(b).unwrap().degree(), 1);
        assert_eq!(level.linedef(line).unwrap().v1(), b);
    }

    #[test]
    fn failed_reassign_changes_nothing() {
        let mut level = room();
        let line = level.linedef_ids()[0];
        let gone = level.add_vertex(1, 1);
        level.remove_vertex(gone).unwrap();

        assert_eq!(level.set_linedef_v2(line, gone), Err(EditError::NoSuchVertex(gone)));
        let v2 = level.linedef(line).unwrap().v2();
        assert_eq!(v2, level.vertex_ids()[1]);
        assert!(lines_at(&level, v2).contains(&line));
    }

    #[test]
    fn loop_line_keeps_listing() {
        let mut level = room();
        let line = level.linedef_ids()[0];
        let v0 = level.vertex_ids()[0];
        let v1 = level.vertex_ids()[1];
        // both ends on v0, then move the start away again
        level.set_linedef_v2(line, v0).unwrap();
        assert_eq!(level.vertex(v0).unwrap().degree(), 3);
        assert!(!lines_at(&level, v1).contains(&line));
        level.set_linedef_v1(line, v1).unwrap();
        assert!(lines_at(&level, v0).contains(&line));
        assert!(lines_at(&level, v1).contains(&line));
    }

    #[test]
    fn sidedef_reassignment() {
        let mut level = room();
        let line = level.linedef_ids()[0];
        let front = level.sidedef_ids()[0];
        let new_side = level.add_sidedef(SideDef::default(), None).unwrap();

        assert_eq!(level.set_linedef_back(line, Some(new_side)), Ok(None));
        assert_eq!(level.sidedef_linedefs(new_side).collect::<Vec<_>>(), vec![line]);

        assert_eq!(level.set_linedef_front(line, None), Ok(Some(front)));
        assert_eq!(level.sidedef_linedefs(front).count(), 0);
    }

    #[test]
    fn shared_sidedef_stays_linked() {
        let mut level = room();
        let line = level.linedef_ids()[0];
        let front = level.sidedef_ids()[0];
        level.set_linedef_side(line, Side::Back, Some(front)).unwrap();
        level.set_linedef_front(line, None).unwrap();
        assert_eq!(level.sidedef_linedefs(front).collect::<Vec<_>>(), vec![line]);
    }

    #[test]
    fn sidedef_sector_reassignment() {
        let mut level = room();
        let side = level.sidedef_ids()[0];
        let old = level.sector_ids()[0];
        let new = level.add_sector(Sector::default());

        assert_eq!(level.set_sidedef_sector(side, Some(new)), Ok(Some(old)));
        assert_eq!(level.sector_sidedefs(old).count(), 3);
        assert_eq!(level.sector_sidedefs(new).collect::<Vec<_>>(), vec![side]);
        assert_eq!(level.sidedef(side).unwrap().sector(), Some(new));
    }

    #[test]
    fn remove_vertex_cascades() {
        let mut level = room();
        let v = level.vertex_ids()[0];
        let neighbour = level.vertex_ids()[1];
        let side = level.sidedef_ids()[0];
        level.remove_vertex(v).unwrap();

        assert_eq!(level.stats().linedefs, 2);
        assert_eq!(level.stats().vertexes, 3);
        assert_eq!(level.vertex(neighbour).unwrap().degree(), 1);
        assert_eq!(level.sidedef_linedefs(side).count(), 0);
    }

    #[test]
    fn remove_sidedef_clears_lines() {
        let mut level = room();
        let line = level.linedef_ids()[1];
        let side = level.sidedef_ids()[1];
        let sector = level.sector_ids()[0];
        level.remove_sidedef(side).unwrap();

        assert_eq!(level.linedef(line).unwrap().front_sidedef(), None);
        assert_eq!(level.sector_sidedefs(sector).count(), 3);
    }

    #[test]
    fn remove_sector_detaches_sides() {
        let mut level = room();
        let sector = level.sector_ids()[0];
        level.remove_sector(sector).unwrap();
        assert!(level.sidedefs().all(|(_, s)| s.sector().is_none()));

        let lumps = level.to_lumps();
        let sides: Vec<wad::lumps::WadSideDef> = wad::lumps::decode_lump(&lumps[2]).unwrap();
        assert!(sides.iter().all(|s| s.sector == -1));
    }

    #[test]
    fn add_line_and_save() {
        let mut level = Level::new("MAP01");
        let a = level.add_vertex(0, 0);
        let b = level.add_vertex(128, 0);
        let sector = level.add_sector(Sector::default());
        let side = level.add_sidedef(SideDef::default(), Some(sector)).unwrap();
        let line = level.add_linedef(b, a).unwrap();
        level.set_linedef_front(line, Some(side)).unwrap();
        assert_eq!(level.vertex(a).unwrap().degree(), 1);

        let lumps = level.to_lumps();
        let lines: Vec<wad::lumps::WadLineDef> = wad::lumps::decode_lump(&lumps[1]).unwrap();
        assert_eq!(lines[0].start_vertex, 1);
        assert_eq!(lines[0].end_vertex, 0);
        assert_eq!(lines[0].front_sidedef, 0);
        assert_eq!(lines[0].back_sidedef, -1);
    }

    #[test]
    fn flip_swaps_ends_and_sides() {
        let mut level = room();
        let line = level.linedef_ids()[0];
        let before = level.linedef(line).unwrap().clone();
        level.flip_linedef(line).unwrap();
        let after = level.linedef(line).unwrap();
        assert_eq!(after.v1(), before.v2());
        assert_eq!(after.back_sidedef(), before.front_sidedef());
    }

    #[test]
    fn things_and_moves() {
        let mut level = room();
        let t = level.add_thing(Thing::new(0, 0, 0, 2001, 7));
        level.move_thing(t, Point::new(8, 8)).unwrap();
        assert_eq!(level.thing(t).map(|t| (t.x(), t.y())), Some((8, 8)));
        level.remove_thing(t).unwrap();
        assert_eq!(level.move_thing(t, Point::new(0, 0)), Err(EditError::NoSuchThing(t)));

        let v = level.vertex_ids()[2];
        level.move_vertex(v, Point::new(100, 100)).unwrap();
        assert_eq!(level.vertex(v).unwrap().x(), 100);
    }
}
