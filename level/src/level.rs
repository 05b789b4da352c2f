use std::collections::HashMap;
use std::fmt;

use log::{debug, info, warn};
use wad::lumps::{
    BlockmapHeader, MapLump, NO_INDEX, NO_SIDEDEF, NodeChild, WadLineDef, WadNode, WadSector,
    WadSegment, WadSideDef, WadSubSector, WadThing, WadVertex, decode_lump, encode_lump,
};
use wad::{Archive, Lump, WadError};

use crate::backrefs::BackRefs;
use crate::locator::signature_matches;
use crate::map_defs::{LineDef, Node, Sector, Segment, SideDef, SubSector, Thing, Vertex};
use crate::store::{Handle, LinedefId, SectorId, SidedefId, Store, ThingId, VertexId};

/// One editable map: every entity plus the reverse references between them.
///
/// Entities refer to each other through handles. Reverse lookups (which lines
/// touch a vertex, which lines use a sidedef, which sidedefs face a sector)
/// are kept in separate indexes that only the mutating methods update.
#[derive(Debug, Clone, Default)]
pub struct Level {
    name: String,
    pub(crate) things: Store<ThingId, Thing>,
    pub(crate) vertexes: Store<VertexId, Vertex>,
    pub(crate) linedefs: Store<LinedefId, LineDef>,
    pub(crate) sidedefs: Store<SidedefId, SideDef>,
    pub(crate) sectors: Store<SectorId, Sector>,
    segments: Vec<Segment>,
    subsectors: Vec<SubSector>,
    nodes: Vec<Node>,
    reject: Vec<u8>,
    blockmap: Vec<i16>,
    pub(crate) vertex_lines: BackRefs<VertexId, LinedefId>,
    pub(crate) sidedef_lines: BackRefs<SidedefId, LinedefId>,
    pub(crate) sector_sides: BackRefs<SectorId, SidedefId>,
}

/// Look up a wire index in the handles built so far. `0xFFFF` and anything
/// past the end resolve to `None`.
fn resolve<H: Copy>(table: &[Option<H>], raw: i16) -> Option<H> {
    table.get(raw as u16 as usize).copied().flatten()
}

/// Wire index of a handle, or `NO_INDEX` if it has gone
fn wire_index<H: Handle>(positions: &HashMap<H, usize>, handle: Option<H>) -> i16 {
    handle
        .and_then(|h| positions.get(&h))
        .map_or(NO_INDEX, |i| *i as u16 as i16)
}

impl Level {
    /// An empty map with no lumps behind it
    pub fn new(name: impl Into<String>) -> Self {
        Level {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Decode the ten lumps after `marker` into a linked map.
    ///
    /// Out of range references degrade per field: a linedef needs both of its
    /// vertices and is dropped without them, while a missing sidedef or sector
    /// just leaves that link empty.
    pub fn build(archive: &Archive, marker: usize) -> Result<Level, WadError> {
        if !signature_matches(archive.lumps(), marker) {
            return Err(WadError::NotALevel { index: marker });
        }
        let lumps = archive.lumps();
        let lump = |kind: MapLump| &lumps[marker + kind.offset()];
        let name = lumps[marker].name.clone();
        let mut level = Level::new(name.as_str());

        let things: Vec<WadThing> = decode_lump(lump(MapLump::Things))?;
        let linedefs: Vec<WadLineDef> = decode_lump(lump(MapLump::LineDefs))?;
        let sidedefs: Vec<WadSideDef> = decode_lump(lump(MapLump::SideDefs))?;
        let vertexes: Vec<WadVertex> = decode_lump(lump(MapLump::Vertexes))?;
        let segments: Vec<WadSegment> = decode_lump(lump(MapLump::Segs))?;
        let subsectors: Vec<WadSubSector> = decode_lump(lump(MapLump::SSectors))?;
        let nodes: Vec<WadNode> = decode_lump(lump(MapLump::Nodes))?;
        let sectors: Vec<WadSector> = decode_lump(lump(MapLump::Sectors))?;
        level.reject = lump(MapLump::Reject).data.clone();
        level.blockmap = decode_lump(lump(MapLump::Blockmap))?;

        for t in &things {
            level
                .things
                .insert(Thing::new(t.x, t.y, t.angle, t.kind, t.flags));
        }
        info!("{}: Loaded {} things", name, things.len());

        let vertex_ids: Vec<Option<VertexId>> = vertexes
            .iter()
            .map(|v| Some(level.vertexes.insert(Vertex::new(v.x, v.y))))
            .collect();
        info!("{}: Loaded {} vertexes", name, vertex_ids.len());

        let sector_ids: Vec<Option<SectorId>> = sectors
            .into_iter()
            .map(|s| {
                Some(level.sectors.insert(Sector {
                    floor_height: s.floor_height,
                    ceil_height: s.ceil_height,
                    floor_tex: s.floor_tex,
                    ceil_tex: s.ceil_tex,
                    light_level: s.light_level,
                    special: s.kind,
                    tag: s.tag,
                }))
            })
            .collect();
        info!("{}: Loaded {} sectors", name, sector_ids.len());

        let sidedef_ids: Vec<Option<SidedefId>> = sidedefs
            .into_iter()
            .enumerate()
            .map(|(i, s)| {
                let sector = resolve(&sector_ids, s.sector);
                if sector.is_none() {
                    warn!("{}: sidedef {} has invalid sector {}", name, i, s.sector);
                }
                let mut side =
                    SideDef::new(s.x_offset, s.y_offset, s.upper_tex, s.lower_tex, s.middle_tex);
                side.sector = sector;
                Some(level.sidedefs.insert(side))
            })
            .collect();
        info!("{}: Loaded {} sidedefs", name, sidedef_ids.len());

        let mut dropped = 0;
        let linedef_ids: Vec<Option<LinedefId>> = linedefs
            .iter()
            .enumerate()
            .map(|(i, l)| {
                let (Some(v1), Some(v2)) = (
                    resolve(&vertex_ids, l.start_vertex),
                    resolve(&vertex_ids, l.end_vertex),
                ) else {
                    warn!(
                        "{}: dropping linedef {} with invalid vertexes {}, {}",
                        name, i, l.start_vertex as u16, l.end_vertex as u16
                    );
                    dropped += 1;
                    return None;
                };
                let side = |raw: i16, which: &str| {
                    let id = resolve(&sidedef_ids, raw);
                    if id.is_none() && raw != NO_SIDEDEF {
                        warn!("{}: linedef {} has invalid {} sidedef {}", name, i, which, raw as u16);
                    }
                    id
                };
                let mut line = LineDef::new(v1, v2);
                line.front_sidedef = side(l.front_sidedef, "front");
                line.back_sidedef = side(l.back_sidedef, "back");
                line.flags = l.flags;
                line.special = l.special;
                line.tag = l.sector_tag;
                Some(level.linedefs.insert(line))
            })
            .collect();
        info!(
            "{}: Loaded {} linedefs, dropped {}",
            name,
            level.linedefs.len(),
            dropped
        );

        level.segments = segments
            .iter()
            .map(|s| Segment {
                v1: resolve(&vertex_ids, s.start_vertex),
                v2: resolve(&vertex_ids, s.end_vertex),
                angle: s.angle,
                linedef: resolve(&linedef_ids, s.linedef),
                direction: s.direction,
                offset: s.offset,
            })
            .collect();
        level.subsectors = subsectors
            .iter()
            .map(|s| SubSector {
                seg_count: s.seg_count,
                start_seg: s.start_seg,
            })
            .collect();
        level.nodes = nodes
            .iter()
            .map(|n| Node {
                x: n.x,
                y: n.y,
                dx: n.dx,
                dy: n.dy,
                right_box: n.right_box,
                left_box: n.left_box,
                right_child: NodeChild::from_raw(n.right_child),
                left_child: NodeChild::from_raw(n.left_child),
            })
            .collect();
        info!(
            "{}: Loaded {} segments, {} subsectors, {} nodes",
            name,
            level.segments.len(),
            level.subsectors.len(),
            level.nodes.len()
        );

        level.rebuild_references();
        Ok(level)
    }

    /// Recompute vertex degrees and every reverse reference from the forward
    /// links. Run after any bulk load.
    pub fn rebuild_references(&mut self) {
        self.vertex_lines.clear();
        self.sidedef_lines.clear();
        self.sector_sides.clear();
        for v in self.vertexes.values_mut() {
            v.degree = 0;
        }

        for (id, line) in self.linedefs.iter() {
            if !self.vertexes.contains(line.v1) || !self.vertexes.contains(line.v2) {
                continue;
            }
            for v in [line.v1, line.v2] {
                if let Some(vertex) = self.vertexes.get_mut(v) {
                    vertex.degree += 1;
                }
                self.vertex_lines.link(v, id);
            }
            for side in [line.front_sidedef, line.back_sidedef].into_iter().flatten() {
                self.sidedef_lines.link(side, id);
            }
        }

        for (id, side) in self.sidedefs.iter() {
            if let Some(sector) = side.sector {
                self.sector_sides.link(sector, id);
            }
        }
    }

    /// Encode the map back to its ten data lumps, in wire order. Every
    /// reference is written as the current position of its target.
    pub fn to_lumps(&self) -> Vec<Lump> {
        let vertex_pos = self.vertexes.positions();
        let line_pos = self.linedefs.positions();
        let side_pos = self.sidedefs.positions();
        let sector_pos = self.sectors.positions();

        let things: Vec<WadThing> = self
            .things
            .iter()
            .map(|(_, t)| WadThing {
                x: t.x(),
                y: t.y(),
                angle: t.angle,
                kind: t.kind,
                flags: t.flags,
            })
            .collect();

        let linedefs: Vec<WadLineDef> = self
            .linedefs
            .iter()
            .map(|(_, l)| WadLineDef {
                start_vertex: wire_index(&vertex_pos, Some(l.v1)),
                end_vertex: wire_index(&vertex_pos, Some(l.v2)),
                flags: l.flags,
                special: l.special,
                sector_tag: l.tag,
                front_sidedef: wire_index(&side_pos, l.front_sidedef),
                back_sidedef: wire_index(&side_pos, l.back_sidedef),
            })
            .collect();

        let sidedefs: Vec<WadSideDef> = self
            .sidedefs
            .iter()
            .map(|(_, s)| WadSideDef {
                x_offset: s.x_offset,
                y_offset: s.y_offset,
                upper_tex: s.upper_tex.clone(),
                lower_tex: s.lower_tex.clone(),
                middle_tex: s.middle_tex.clone(),
                sector: wire_index(&sector_pos, s.sector),
            })
            .collect();

        let vertexes: Vec<WadVertex> = self
            .vertexes
            .iter()
            .map(|(_, v)| WadVertex::new(v.x(), v.y()))
            .collect();

        let mut stale = 0;
        let segments: Vec<WadSegment> = self
            .segments
            .iter()
            .map(|s| {
                let live = s.v1.is_some_and(|v| vertex_pos.contains_key(&v))
                    && s.v2.is_some_and(|v| vertex_pos.contains_key(&v))
                    && s.linedef.is_some_and(|l| line_pos.contains_key(&l));
                if !live {
                    stale += 1;
                }
                WadSegment {
                    start_vertex: wire_index(&vertex_pos, s.v1),
                    end_vertex: wire_index(&vertex_pos, s.v2),
                    angle: s.angle,
                    linedef: wire_index(&line_pos, s.linedef),
                    direction: s.direction,
                    offset: s.offset,
                }
            })
            .collect();
        if stale > 0 {
            debug!("{}: {} segs reference deleted geometry", self.name, stale);
        }

        let subsectors: Vec<WadSubSector> = self
            .subsectors
            .iter()
            .map(|s| WadSubSector {
                seg_count: s.seg_count,
                start_seg: s.start_seg,
            })
            .collect();

        let nodes: Vec<WadNode> = self
            .nodes
            .iter()
            .map(|n| WadNode {
                x: n.x,
                y: n.y,
                dx: n.dx,
                dy: n.dy,
                right_box: n.right_box,
                left_box: n.left_box,
                right_child: n.right_child.to_raw(),
                left_child: n.left_child.to_raw(),
            })
            .collect();

        let sectors: Vec<WadSector> = self
            .sectors
            .iter()
            .map(|(_, s)| WadSector {
                floor_height: s.floor_height,
                ceil_height: s.ceil_height,
                floor_tex: s.floor_tex.clone(),
                ceil_tex: s.ceil_tex.clone(),
                light_level: s.light_level,
                kind: s.special,
                tag: s.tag,
            })
            .collect();

        vec![
            encode_lump(MapLump::Things.name(), &things),
            encode_lump(MapLump::LineDefs.name(), &linedefs),
            encode_lump(MapLump::SideDefs.name(), &sidedefs),
            encode_lump(MapLump::Vertexes.name(), &vertexes),
            encode_lump(MapLump::Segs.name(), &segments),
            encode_lump(MapLump::SSectors.name(), &subsectors),
            encode_lump(MapLump::Nodes.name(), &nodes),
            encode_lump(MapLump::Sectors.name(), &sectors),
            Lump::new(MapLump::Reject.name(), self.reject.clone()),
            encode_lump(MapLump::Blockmap.name(), &self.blockmap),
        ]
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertexes.get(id)
    }

    /// Position and drag state only; links are changed through the edit
    /// methods
    pub fn vertex_mut(&mut self, id: VertexId) -> Option<&mut Vertex> {
        self.vertexes.get_mut(id)
    }

    pub fn vertexes(&self) -> impl Iterator<Item = (VertexId, &Vertex)> + '_ {
        self.vertexes.iter()
    }

    pub fn linedef(&self, id: LinedefId) -> Option<&LineDef> {
        self.linedefs.get(id)
    }

    pub fn linedef_mut(&mut self, id: LinedefId) -> Option<&mut LineDef> {
        self.linedefs.get_mut(id)
    }

    pub fn linedefs(&self) -> impl Iterator<Item = (LinedefId, &LineDef)> + '_ {
        self.linedefs.iter()
    }

    pub fn sidedef(&self, id: SidedefId) -> Option<&SideDef> {
        self.sidedefs.get(id)
    }

    pub fn sidedef_mut(&mut self, id: SidedefId) -> Option<&mut SideDef> {
        self.sidedefs.get_mut(id)
    }

    pub fn sidedefs(&self) -> impl Iterator<Item = (SidedefId, &SideDef)> + '_ {
        self.sidedefs.iter()
    }

    pub fn sector(&self, id: SectorId) -> Option<&Sector> {
        self.sectors.get(id)
    }

    pub fn sector_mut(&mut self, id: SectorId) -> Option<&mut Sector> {
        self.sectors.get_mut(id)
    }

    pub fn sectors(&self) -> impl Iterator<Item = (SectorId, &Sector)> + '_ {
        self.sectors.iter()
    }

    pub fn thing(&self, id: ThingId) -> Option<&Thing> {
        self.things.get(id)
    }

    pub fn thing_mut(&mut self, id: ThingId) -> Option<&mut Thing> {
        self.things.get_mut(id)
    }

    pub fn things(&self) -> impl Iterator<Item = (ThingId, &Thing)> + '_ {
        self.things.iter()
    }

    /// Handles in wire order, so `vertex_ids()[n]` is vertex `n` on save
    pub fn vertex_ids(&self) -> &[VertexId] {
        self.vertexes.ids()
    }

    pub fn linedef_ids(&self) -> &[LinedefId] {
        self.linedefs.ids()
    }

    pub fn sidedef_ids(&self) -> &[SidedefId] {
        self.sidedefs.ids()
    }

    pub fn sector_ids(&self) -> &[SectorId] {
        self.sectors.ids()
    }

    pub fn thing_ids(&self) -> &[ThingId] {
        self.things.ids()
    }

    /// Index the vertex will be written at, or `None` if it has been removed
    pub fn vertex_index(&self, id: VertexId) -> Option<usize> {
        self.vertexes.position(id)
    }

    pub fn linedef_index(&self, id: LinedefId) -> Option<usize> {
        self.linedefs.position(id)
    }

    pub fn sidedef_index(&self, id: SidedefId) -> Option<usize> {
        self.sidedefs.position(id)
    }

    pub fn sector_index(&self, id: SectorId) -> Option<usize> {
        self.sectors.position(id)
    }

    pub fn thing_index(&self, id: ThingId) -> Option<usize> {
        self.things.position(id)
    }

    /// No geometry and no things. The BSP lumps are not considered.
    pub fn is_empty(&self) -> bool {
        self.vertexes.is_empty() && self.things.is_empty()
    }

    /// True if either end of `line` is on `vertex`
    pub fn is_incident(&self, vertex: VertexId, line: LinedefId) -> bool {
        self.vertex_lines.contains(vertex, line)
    }

    /// How many linedefs use this sidedef. More than one means it is shared.
    pub fn sidedef_use_count(&self, id: SidedefId) -> usize {
        self.sidedef_lines.count(id)
    }

    /// How many sidedefs face into this sector
    pub fn sector_sidedef_count(&self, id: SectorId) -> usize {
        self.sector_sides.count(id)
    }

    /// Linedefs with an end on this vertex
    pub fn vertex_linedefs(&self, id: VertexId) -> impl Iterator<Item = LinedefId> + '_ {
        self.vertex_lines.get(id)
    }

    /// Linedefs using this sidedef on either side
    pub fn sidedef_linedefs(&self, id: SidedefId) -> impl Iterator<Item = LinedefId> + '_ {
        self.sidedef_lines.get(id)
    }

    /// Sidedefs facing into this sector
    pub fn sector_sidedefs(&self, id: SectorId) -> impl Iterator<Item = SidedefId> + '_ {
        self.sector_sides.get(id)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn subsectors(&self) -> &[SubSector] {
        &self.subsectors
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The last node is the root of the BSP
    pub fn root_node(&self) -> Option<&Node> {
        self.nodes.last()
    }

    pub fn reject(&self) -> &[u8] {
        &self.reject
    }

    pub fn blockmap(&self) -> &[i16] {
        &self.blockmap
    }

    pub fn blockmap_header(&self) -> Option<BlockmapHeader> {
        BlockmapHeader::from_entries(&self.blockmap)
    }

    pub fn stats(&self) -> LevelStats {
        LevelStats {
            things: self.things.len(),
            vertexes: self.vertexes.len(),
            linedefs: self.linedefs.len(),
            sidedefs: self.sidedefs.len(),
            sectors: self.sectors.len(),
            segments: self.segments.len(),
            subsectors: self.subsectors.len(),
            nodes: self.nodes.len(),
            reject_bytes: self.reject.len(),
            blockmap_entries: self.blockmap.len(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LevelStats {
    pub things: usize,
    pub vertexes: usize,
    pub linedefs: usize,
    pub sidedefs: usize,
    pub sectors: usize,
    pub segments: usize,
    pub subsectors: usize,
    pub nodes: usize,
    pub reject_bytes: usize,
    pub blockmap_entries: usize,
}

impl fmt::Display for LevelStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  things:     {}", self.things)?;
        writeln!(f, "  vertexes:   {}", self.vertexes)?;
        writeln!(f, "  linedefs:   {}", self.linedefs)?;
        writeln!(f, "  sidedefs:   {}", self.sidedefs)?;
        writeln!(f, "  sectors:    {}", self.sectors)?;
        writeln!(
            f,
            "  bsp:        {} segs, {} subsectors, {} nodes",
            self.segments, self.subsectors, self.nodes
        )?;
        write!(
            f,
            "  reject:     {} bytes, blockmap: {} entries",
            self.reject_bytes, self.blockmap_entries
        )
    }
}

#[cfg(test)]
mod tests {
    use wad::lumps::{MapLump, NO_INDEX, NodeChild, WadLineDef, WadThing, decode_lump};
    use wad::{Archive, WadError};

    use super::Level;
    use crate::test_utils::{MapBuilder, square_room};

    #[test]
    fn build_square_room() {
        let archive = square_room().archive();
        let level = Level::build(&archive, 0).unwrap();
        assert_eq!(level.name(), "E1M1");

        let stats = level.stats();
        assert_eq!(stats.vertexes, 4);
        assert_eq!(stats.linedefs, 4);
        assert_eq!(stats.sidedefs, 4);
        assert_eq!(stats.sectors, 1);
        assert_eq!(stats.things, 2);
        assert_eq!(stats.nodes, 1);

        for (_, v) in level.vertexes() {
            assert_eq!(v.degree(), 2);
        }
        let sector = level.sector_ids()[0];
        assert_eq!(level.sector_sidedefs(sector).count(), 4);
        let side = level.sidedef_ids()[2];
        let lines: Vec<_> = level.sidedef_linedefs(side).collect();
        assert_eq!(lines, vec![level.linedef_ids()[2]]);
        assert_eq!(level.root_node().map(|n| n.right_child), Some(NodeChild::SubSector(0)));
    }

    #[test]
    fn degree_counts_line_ends() {
        let mut map = MapBuilder::new("MAP01");
        map.vertex(0, 0).vertex(64, 0).vertex(64, 64);
        map.line(0, 1, -1, -1).line(1, 2, -1, -1);
        let level = Level::build(&map.archive(), 0).unwrap();

        let degrees: Vec<u32> = level.vertexes().map(|(_, v)| v.degree()).collect();
        assert_eq!(degrees, vec![1, 2, 1]);
        let middle = level.vertex_ids()[1];
        assert_eq!(level.vertex_linedefs(middle).count(), 2);
    }

    #[test]
    fn invalid_vertex_drops_linedef() {
        let mut map = MapBuilder::new("MAP01");
        for i in 0..10 {
            map.vertex(i * 8, 0);
        }
        map.sector();
        map.side(0);
        map.line(0, 1, 0, -1).line(2, 999, 0, -1).line(3, 4, 0, -1);
        let level = Level::build(&map.archive(), 0).unwrap();

        assert_eq!(level.stats().linedefs, 2);
        let v2 = level.vertex_ids()[2];
        assert_eq!(level.vertex(v2).map(|v| v.degree()), Some(0));
        assert_eq!(level.vertex_linedefs(v2).count(), 0);
    }

    #[test]
    fn invalid_sidedef_keeps_linedef() {
        let mut map = MapBuilder::new("MAP01");
        for i in 0..10 {
            map.vertex(i * 8, 0);
        }
        map.sector();
        map.side(0);
        map.line(0, 1, 999, 0);
        let level = Level::build(&map.archive(), 0).unwrap();

        assert_eq!(level.stats().linedefs, 1);
        let (_, line) = level.linedefs().next().unwrap();
        assert_eq!(line.front_sidedef(), None);
        assert_eq!(line.back_sidedef(), Some(level.sidedef_ids()[0]));
    }

    #[test]
    fn invalid_sector_leaves_sidedef_unlinked() {
        let mut map = MapBuilder::new("MAP01");
        map.sector();
        map.side(0).side(5);
        let level = Level::build(&map.archive(), 0).unwrap();

        let sides: Vec<_> = level.sidedefs().map(|(_, s)| s.sector()).collect();
        assert_eq!(sides, vec![Some(level.sector_ids()[0]), None]);
        assert_eq!(level.sector_sidedefs(level.sector_ids()[0]).count(), 1);
    }

    #[test]
    fn to_lumps_reproduces_input() {
        let archive = square_room().archive();
        let level = Level::build(&archive, 0).unwrap();
        let lumps = level.to_lumps();

        assert_eq!(lumps.len(), 10);
        for (kind, lump) in MapLump::ALL.iter().zip(&lumps) {
            let original = &archive.lumps()[kind.offset()];
            assert_eq!(lump.name, original.name);
            assert_eq!(lump.data, original.data, "{} differs", lump.name);
        }
    }

    #[test]
    fn dropped_linedef_shifts_indexes() {
        let mut map = MapBuilder::new("MAP01");
        map.vertex(0, 0).vertex(64, 0).vertex(64, 64);
        map.line(0, 9, -1, -1).line(1, 2, -1, -1);
        map.seg(1, 2, 1);
        let level = Level::build(&map.archive(), 0).unwrap();
        let lumps = level.to_lumps();

        let lines: Vec<WadLineDef> = decode_lump(&lumps[1]).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!((lines[0].start_vertex, lines[0].end_vertex), (1, 2));
        let segs: Vec<wad::lumps::WadSegment> = decode_lump(&lumps[4]).unwrap();
        assert_eq!(segs[0].linedef, 0);
    }

    #[test]
    fn build_rejects_non_level() {
        let archive = square_room().archive();
        assert_eq!(
            Level::build(&archive, 1).err(),
            Some(WadError::NotALevel { index: 1 })
        );
        assert!(Level::build(&Archive::default(), 0).is_err());
    }

    #[test]
    fn reference_queries() {
        let mut level = Level::build(&square_room().archive(), 0).unwrap();
        let ids = level.vertex_ids().to_vec();
        let lines = level.linedef_ids().to_vec();
        let side = level.sidedef_ids()[0];
        let sector = level.sector_ids()[0];

        assert!(level.is_incident(ids[0], lines[0]));
        assert!(!level.is_incident(ids[2], lines[0]));
        assert_eq!(level.sidedef_use_count(side), 1);
        assert_eq!(level.sector_sidedef_count(sector), 4);

        level.set_linedef_back(lines[1], Some(side)).unwrap();
        assert_eq!(level.sidedef_use_count(side), 2);
        level.remove_vertex(ids[0]).unwrap();
        assert!(!level.is_incident(ids[0], lines[0]));
        assert_eq!(level.sidedef_use_count(side), 1);
    }

    #[test]
    fn wire_indexes_follow_removals() {
        let mut level = Level::build(&square_room().archive(), 0).unwrap();
        let things = level.thing_ids().to_vec();
        let lines = level.linedef_ids().to_vec();
        assert_eq!(level.thing_index(things[1]), Some(1));
        assert_eq!(level.linedef_index(lines[3]), Some(3));

        level.remove_thing(things[0]).unwrap();
        level.remove_linedef(lines[0]).unwrap();
        assert_eq!(level.thing_index(things[0]), None);
        assert_eq!(level.thing_index(things[1]), Some(0));
        assert_eq!(level.linedef_index(lines[3]), Some(2));
        assert_eq!(level.vertex_index(level.vertex_ids()[3]), Some(3));
        assert_eq!(level.sidedef_index(level.sidedef_ids()[2]), Some(2));
        assert_eq!(level.sector_index(level.sector_ids()[0]), Some(0));
    }

    #[test]
    fn stale_seg_references_are_written_as_absent() {
        let mut level = Level::build(&square_room().archive(), 0).unwrap();
        let line = level.linedef_ids()[1];
        level.remove_linedef(line).unwrap();
        let lumps = level.to_lumps();

        let segs: Vec<wad::lumps::WadSegment> = decode_lump(&lumps[4]).unwrap();
        assert_eq!(segs[1].linedef, NO_INDEX);
        assert_eq!(segs[2].linedef, 1);
        assert_eq!((segs[1].start_vertex, segs[1].end_vertex), (1, 2));
    }

    #[test]
    fn empty_level() {
        let mut level = Level::new("MAP01");
        assert!(level.is_empty());
        level.add_vertex(0, 0);
        assert!(!level.is_empty());
        assert!(!Level::build(&square_room().archive(), 0).unwrap().is_empty());
    }

    #[test]
    fn thing_round_trip() {
        let archive = square_room().archive();
        let level = Level::build(&archive, 0).unwrap();
        let lumps = level.to_lumps();
        let things: Vec<WadThing> = decode_lump(&lumps[0]).unwrap();
        assert_eq!(things[0].kind, 1);
        assert_eq!(things[1].kind, 3004);
    }
}
