//! In-memory map fixtures, so tests don't need a WAD on disk.

use wad::lumps::{
    BoundingBox, MapLump, NodeChild, WadLineDef, WadNode, WadSector, WadSegment, WadSideDef,
    WadSubSector, WadThing, WadVertex, encode_lump,
};
use wad::{Archive, Lump, WadKind};

#[derive(Debug, Default)]
pub struct MapBuilder {
    name: String,
    things: Vec<WadThing>,
    vertexes: Vec<WadVertex>,
    linedefs: Vec<WadLineDef>,
    sidedefs: Vec<WadSideDef>,
    sectors: Vec<WadSector>,
    segments: Vec<WadSegment>,
    subsectors: Vec<WadSubSector>,
    nodes: Vec<WadNode>,
    reject: Vec<u8>,
    blockmap: Vec<i16>,
}

impl MapBuilder {
    pub fn new(name: &str) -> Self {
        MapBuilder {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn thing(&mut self, x: i16, y: i16, kind: i16) -> &mut Self {
        self.things.push(WadThing {
            x,
            y,
            angle: 90,
            kind,
            flags: 7,
        });
        self
    }

    pub fn vertex(&mut self, x: i16, y: i16) -> &mut Self {
        self.vertexes.push(WadVertex::new(x, y));
        self
    }

    pub fn line(&mut self, v1: i16, v2: i16, front: i16, back: i16) -> &mut Self {
        self.linedefs.push(WadLineDef {
            start_vertex: v1,
            end_vertex: v2,
            flags: 1,
            special: 0,
            sector_tag: 0,
            front_sidedef: front,
            back_sidedef: back,
        });
        self
    }

    pub fn side(&mut self, sector: i16) -> &mut Self {
        self.sidedefs.push(WadSideDef {
            x_offset: 0,
            y_offset: 0,
            upper_tex: "-".to_string(),
            lower_tex: "-".to_string(),
            middle_tex: "STARTAN3".to_string(),
            sector,
        });
        self
    }

    pub fn sector(&mut self) -> &mut Self {
        self.sectors.push(WadSector {
            floor_height: 0,
            ceil_height: 72,
            floor_tex: "FLOOR4_8".to_string(),
            ceil_tex: "CEIL3_5".to_string(),
            light_level: 160,
            kind: 0,
            tag: 0,
        });
        self
    }

    pub fn seg(&mut self, v1: i16, v2: i16, linedef: i16) -> &mut Self {
        self.segments.push(WadSegment {
            start_vertex: v1,
            end_vertex: v2,
            angle: 0,
            linedef,
            direction: 0,
            offset: 0,
        });
        self
    }

    pub fn subsector(&mut self, seg_count: i16, start_seg: i16) -> &mut Self {
        self.subsectors.push(WadSubSector {
            seg_count,
            start_seg,
        });
        self
    }

    pub fn node(&mut self, right: NodeChild, left: NodeChild) -> &mut Self {
        let bbox = BoundingBox {
            top: 64,
            bottom: 0,
            left: 0,
            right: 64,
        };
        self.nodes.push(WadNode {
            x: 0,
            y: 0,
            dx: 64,
            dy: 0,
            right_box: bbox,
            left_box: bbox,
            right_child: right.to_raw(),
            left_child: left.to_raw(),
        });
        self
    }

    pub fn reject(&mut self, data: Vec<u8>) -> &mut Self {
        self.reject = data;
        self
    }

    pub fn blockmap(&mut self, entries: Vec<i16>) -> &mut Self {
        self.blockmap = entries;
        self
    }

    /// Marker plus the ten map lumps
    pub fn lumps(&self) -> Vec<Lump> {
        vec![
            Lump::marker(self.name.as_str()),
            encode_lump(MapLump::Things.name(), &self.things),
            encode_lump(MapLump::LineDefs.name(), &self.linedefs),
            encode_lump(MapLump::SideDefs.name(), &self.sidedefs),
            encode_lump(MapLump::Vertexes.name(), &self.vertexes),
            encode_lump(MapLump::Segs.name(), &self.segments),
            encode_lump(MapLump::SSectors.name(), &self.subsectors),
            encode_lump(MapLump::Nodes.name(), &self.nodes),
            encode_lump(MapLump::Sectors.name(), &self.sectors),
            Lump::new(MapLump::Reject.name(), self.reject.clone()),
            encode_lump(MapLump::Blockmap.name(), &self.blockmap),
        ]
    }

    pub fn archive(&self) -> Archive {
        let mut archive = Archive::new(WadKind::PWad);
        for lump in self.lumps() {
            archive.push(lump);
        }
        archive
    }
}

/// A 64x64 one sector room with a player start and a trooper
pub fn square_room() -> MapBuilder {
    let mut map = MapBuilder::new("E1M1");
    map.vertex(0, 0).vertex(0, 64).vertex(64, 64).vertex(64, 0);
    map.sector();
    map.side(0).side(0).side(0).side(0);
    map.line(0, 1, 0, -1)
        .line(1, 2, 1, -1)
        .line(2, 3, 2, -1)
        .line(3, 0, 3, -1);
    map.thing(32, 32, 1).thing(16, 48, 3004);
    map.seg(0, 1, 0)
        .seg(1, 2, 1)
        .seg(2, 3, 2)
        .seg(3, 0, 3);
    map.subsector(4, 0);
    map.node(NodeChild::SubSector(0), NodeChild::SubSector(0));
    map.reject(vec![0]);
    map.blockmap(vec![0, 0, 1, 1, 5, 0, -1]);
    map
}
