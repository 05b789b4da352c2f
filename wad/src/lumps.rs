use crate::cursor::Cursor;
use crate::error::WadError;
use crate::wad::Lump;

/// The ten lumps that follow a map marker, in the order they must appear.
/// The discriminant is the offset from the marker lump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapLump {
    /// Position and angle for all monster, powerup and spawn location
    Things = 1,
    /// An array of lines referencing two vertices. Also points to one or two
    /// `SideDef` depending on if this line is a wall or a portal
    LineDefs,
    /// Defines upper, lower, and middle textures plus offsets
    SideDefs,
    /// An array of signed short X, Y pairs
    Vertexes,
    /// Portions of lines cut due to Binary Space Partitioning
    Segs,
    /// Set of segments of a `LineDef` representing a convex subspace
    SSectors,
    /// BSP with segs, nodes and sub-sector leaves
    Nodes,
    /// Area surrounded by lines, with set ceiling and floor textures/heights
    /// with light level
    Sectors,
    /// Sector-to-sector visibility matrix
    Reject,
    /// 128x128 grid partition of the map LINEDEFS to accelerate collision
    /// detection
    Blockmap,
}

impl MapLump {
    pub const ALL: [MapLump; 10] = [
        MapLump::Things,
        MapLump::LineDefs,
        MapLump::SideDefs,
        MapLump::Vertexes,
        MapLump::Segs,
        MapLump::SSectors,
        MapLump::Nodes,
        MapLump::Sectors,
        MapLump::Reject,
        MapLump::Blockmap,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            MapLump::Things => "THINGS",
            MapLump::LineDefs => "LINEDEFS",
            MapLump::SideDefs => "SIDEDEFS",
            MapLump::Vertexes => "VERTEXES",
            MapLump::Segs => "SEGS",
            MapLump::SSectors => "SSECTORS",
            MapLump::Nodes => "NODES",
            MapLump::Sectors => "SECTORS",
            MapLump::Reject => "REJECT",
            MapLump::Blockmap => "BLOCKMAP",
        }
    }

    /// Width of one record. `REJECT` is an opaque bitset so any length goes.
    pub const fn record_size(self) -> usize {
        match self {
            MapLump::Things => WadThing::SIZE,
            MapLump::LineDefs => WadLineDef::SIZE,
            MapLump::SideDefs => WadSideDef::SIZE,
            MapLump::Vertexes => WadVertex::SIZE,
            MapLump::Segs => WadSegment::SIZE,
            MapLump::SSectors => WadSubSector::SIZE,
            MapLump::Nodes => WadNode::SIZE,
            MapLump::Sectors => WadSector::SIZE,
            MapLump::Reject => 1,
            MapLump::Blockmap => <i16 as Record>::SIZE,
        }
    }

    pub const fn offset(self) -> usize {
        self as usize
    }
}

/// A fixed-width record inside a map lump
pub trait Record: Sized {
    const SIZE: usize;

    fn read<B: AsRef<[u8]>>(cursor: &mut Cursor<B>) -> Self;

    fn write(&self, cursor: &mut Cursor<Vec<u8>>);
}

/// Split a lump into records. The lump must be a whole number of records.
pub fn decode_lump<T: Record>(lump: &Lump) -> Result<Vec<T>, WadError> {
    if lump.data.len() % T::SIZE != 0 {
        return Err(WadError::BadRecordSize {
            lump: lump.name.clone(),
            size: lump.data.len(),
            record: T::SIZE,
        });
    }
    let count = lump.data.len() / T::SIZE;
    let mut cursor = Cursor::new(&lump.data);
    Ok((0..count).map(|_| T::read(&mut cursor)).collect())
}

pub fn encode_lump<T: Record>(name: &str, records: &[T]) -> Lump {
    let mut cursor = Cursor::new(Vec::with_capacity(records.len() * T::SIZE));
    for r in records {
        r.write(&mut cursor);
    }
    Lump::new(name, cursor.into_inner())
}

/// `BLOCKMAP` is kept as a flat run of shorts
impl Record for i16 {
    const SIZE: usize = 2;

    fn read<B: AsRef<[u8]>>(cursor: &mut Cursor<B>) -> Self {
        cursor.read_i16()
    }

    fn write(&self, cursor: &mut Cursor<Vec<u8>>) {
        cursor.write_i16(*self);
    }
}

/// Wire value for an absent reference. Read back as unsigned it is `0xFFFF`,
/// past the end of any table.
pub const NO_INDEX: i16 = -1;

/// Wire value for "no sidedef" in a linedef
pub const NO_SIDEDEF: i16 = NO_INDEX;

/// Linedef flag bits
pub struct LineDefFlags;

impl LineDefFlags {
    /// Players and monsters can't cross
    pub const BLOCKING: i16 = 0x0001;
    pub const BLOCK_MONSTERS: i16 = 0x0002;
    /// Has a back side; the middle texture may be see-through
    pub const TWO_SIDED: i16 = 0x0004;
    pub const DONT_PEG_TOP: i16 = 0x0008;
    pub const DONT_PEG_BOTTOM: i16 = 0x0010;
    /// Drawn as one sided on the automap
    pub const SECRET: i16 = 0x0020;
    pub const SOUND_BLOCK: i16 = 0x0040;
    pub const DONT_DRAW: i16 = 0x0080;
    pub const MAPPED: i16 = 0x0100;
}

/// A `Thing` describes only the position, type, and angle + spawn flags
///
/// | Field Size | Data Type | Content    |
/// |------------|-----------|------------|
/// |  0x00-0x01 |    i16    | X Position |
/// |  0x02-0x03 |    i16    | Y Position |
/// |  0x04-0x05 |    i16    | Angle      |
/// |  0x06-0x07 |    i16    | Type       |
/// |  0x08-0x09 |    i16    | Flags      |
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct WadThing {
    pub x: i16,
    pub y: i16,
    pub angle: i16,
    /// The doomednum
    pub kind: i16,
    pub flags: i16,
}

impl Record for WadThing {
    const SIZE: usize = 10;

    fn read<B: AsRef<[u8]>>(c: &mut Cursor<B>) -> Self {
        WadThing {
            x: c.read_i16(),
            y: c.read_i16(),
            angle: c.read_i16(),
            kind: c.read_i16(),
            flags: c.read_i16(),
        }
    }

    fn write(&self, c: &mut Cursor<Vec<u8>>) {
        c.write_i16(self.x);
        c.write_i16(self.y);
        c.write_i16(self.angle);
        c.write_i16(self.kind);
        c.write_i16(self.flags);
    }
}

/// Each linedef represents a line from one of the VERTEXES to another.
///
/// | Field Size | Data Type | Content                                   |
/// |------------|-----------|-------------------------------------------|
/// |  0x00-0x01 |    i16    | Start vertex                              |
/// |  0x02-0x03 |    i16    | End vertex                                |
/// |  0x04-0x05 |    i16    | Flags, see `LineDefFlags`                 |
/// |  0x06-0x07 |    i16    | Line type / Action                        |
/// |  0x08-0x09 |    i16    | Sector tag                                |
/// |  0x0A-0x0B |    i16    | Front sidedef ( 0xFFFF side not present ) |
/// |  0x0C-0x0D |    i16    | Back sidedef  ( 0xFFFF side not present ) |
///
/// Indexes are unsigned on the wire, read them through `as u16`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct WadLineDef {
    pub start_vertex: i16,
    pub end_vertex: i16,
    pub flags: i16,
    pub special: i16,
    /// Ties this line's effect to all SECTORS with the same tag
    pub sector_tag: i16,
    pub front_sidedef: i16,
    pub back_sidedef: i16,
}

impl Record for WadLineDef {
    const SIZE: usize = 14;

    fn read<B: AsRef<[u8]>>(c: &mut Cursor<B>) -> Self {
        WadLineDef {
            start_vertex: c.read_i16(),
            end_vertex: c.read_i16(),
            flags: c.read_i16(),
            special: c.read_i16(),
            sector_tag: c.read_i16(),
            front_sidedef: c.read_i16(),
            back_sidedef: c.read_i16(),
        }
    }

    fn write(&self, c: &mut Cursor<Vec<u8>>) {
        c.write_i16(self.start_vertex);
        c.write_i16(self.end_vertex);
        c.write_i16(self.flags);
        c.write_i16(self.special);
        c.write_i16(self.sector_tag);
        c.write_i16(self.front_sidedef);
        c.write_i16(self.back_sidedef);
    }
}

/// A sidedef is a definition of what wall texture(s) to draw along a
/// `LineDef`, and a group of sidedefs outline the space of a `Sector`
///
/// Each `SideDef` record is 30 bytes: two offsets, three 8 byte texture
/// names, then the sector index.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WadSideDef {
    pub x_offset: i16,
    pub y_offset: i16,
    /// Name of upper texture used for example in the upper of a window
    pub upper_tex: String,
    /// Name of lower texture used for example in the front of a step
    pub lower_tex: String,
    /// The regular part of a wall
    pub middle_tex: String,
    /// Sector that this sidedef faces or helps to surround
    pub sector: i16,
}

impl Record for WadSideDef {
    const SIZE: usize = 30;

    fn read<B: AsRef<[u8]>>(c: &mut Cursor<B>) -> Self {
        WadSideDef {
            x_offset: c.read_i16(),
            y_offset: c.read_i16(),
            upper_tex: c.read_name(),
            lower_tex: c.read_name(),
            middle_tex: c.read_name(),
            sector: c.read_i16(),
        }
    }

    fn write(&self, c: &mut Cursor<Vec<u8>>) {
        c.write_i16(self.x_offset);
        c.write_i16(self.y_offset);
        c.write_name(&self.upper_tex);
        c.write_name(&self.lower_tex);
        c.write_name(&self.middle_tex);
        c.write_i16(self.sector);
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct WadVertex {
    pub x: i16,
    pub y: i16,
}

impl WadVertex {
    pub fn new(x: i16, y: i16) -> WadVertex {
        WadVertex { x, y }
    }
}

impl Record for WadVertex {
    const SIZE: usize = 4;

    fn read<B: AsRef<[u8]>>(c: &mut Cursor<B>) -> Self {
        WadVertex {
            x: c.read_i16(),
            y: c.read_i16(),
        }
    }

    fn write(&self, c: &mut Cursor<Vec<u8>>) {
        c.write_i16(self.x);
        c.write_i16(self.y);
    }
}

/// The Segments (SEGS) are in a sequential order determined by the `SubSector`
/// (SSECTOR), which are part of the NODES recursive tree
///
/// | Field Size | Data Type | Content                                        |
/// |------------|-----------|------------------------------------------------|
/// |  0x00-0x01 |    i16    | Index to vertex the line starts from           |
/// |  0x02-0x03 |    i16    | Index to vertex the line ends with             |
/// |  0x04-0x05 |    i16    | Angle in Binary Angle Measurement (BAMS)       |
/// |  0x06-0x07 |    i16    | Index to the linedef this seg travels along    |
/// |  0x08-0x09 |    i16    | 0 == follows the line, 1 == opposite direction |
/// |  0x0A-0x0B |    i16    | Distance along the linedef to the seg start    |
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct WadSegment {
    pub start_vertex: i16,
    pub end_vertex: i16,
    pub angle: i16,
    pub linedef: i16,
    pub direction: i16,
    pub offset: i16,
}

impl WadSegment {
    /// Convert the BAM angle to degrees, 0..360
    pub fn angle_degrees(&self) -> f32 {
        self.angle as u16 as f32 * 360.0 / 65536.0
    }
}

impl Record for WadSegment {
    const SIZE: usize = 12;

    fn read<B: AsRef<[u8]>>(c: &mut Cursor<B>) -> Self {
        WadSegment {
            start_vertex: c.read_i16(),
            end_vertex: c.read_i16(),
            angle: c.read_i16(),
            linedef: c.read_i16(),
            direction: c.read_i16(),
            offset: c.read_i16(),
        }
    }

    fn write(&self, c: &mut Cursor<Vec<u8>>) {
        c.write_i16(self.start_vertex);
        c.write_i16(self.end_vertex);
        c.write_i16(self.angle);
        c.write_i16(self.linedef);
        c.write_i16(self.direction);
        c.write_i16(self.offset);
    }
}

/// A run of `seg_count` segs starting at `start_seg`, forming one convex
/// leaf of the BSP
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct WadSubSector {
    pub seg_count: i16,
    pub start_seg: i16,
}

impl Record for WadSubSector {
    const SIZE: usize = 4;

    fn read<B: AsRef<[u8]>>(c: &mut Cursor<B>) -> Self {
        WadSubSector {
            seg_count: c.read_i16(),
            start_seg: c.read_i16(),
        }
    }

    fn write(&self, c: &mut Cursor<Vec<u8>>) {
        c.write_i16(self.seg_count);
        c.write_i16(self.start_seg);
    }
}

/// Edges of a node's child bounding box, in wire order
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct BoundingBox {
    pub top: i16,
    pub bottom: i16,
    pub left: i16,
    pub right: i16,
}

impl BoundingBox {
    fn read<B: AsRef<[u8]>>(c: &mut Cursor<B>) -> Self {
        BoundingBox {
            top: c.read_i16(),
            bottom: c.read_i16(),
            left: c.read_i16(),
            right: c.read_i16(),
        }
    }

    fn write(&self, c: &mut Cursor<Vec<u8>>) {
        c.write_i16(self.top);
        c.write_i16(self.bottom);
        c.write_i16(self.left);
        c.write_i16(self.right);
    }
}

/// Set on a node child field when the child is a subsector leaf
pub const IS_SSECTOR_MASK: u16 = 0x8000;

/// What a node child field points at. The low 15 bits are the index.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NodeChild {
    Node(u16),
    SubSector(u16),
}

impl NodeChild {
    pub fn from_raw(raw: i16) -> Self {
        let raw = raw as u16;
        if raw & IS_SSECTOR_MASK != 0 {
            NodeChild::SubSector(raw & !IS_SSECTOR_MASK)
        } else {
            NodeChild::Node(raw)
        }
    }

    pub fn to_raw(self) -> i16 {
        match self {
            NodeChild::Node(n) => (n & !IS_SSECTOR_MASK) as i16,
            NodeChild::SubSector(n) => ((n & !IS_SSECTOR_MASK) | IS_SSECTOR_MASK) as i16,
        }
    }
}

/// A BSP split: the partition line, a bounding box per side, and the two
/// children. **The last node is the root node**
///
/// | Field Size | Content                                          |
/// |------------|--------------------------------------------------|
/// | 0x00-0x01  | X coordinate of the splitter                     |
/// | 0x02-0x03  | Y coordinate of the splitter                     |
/// | 0x04-0x05  | The amount to move in X to reach end of splitter |
/// | 0x06-0x07  | The amount to move in Y to reach end of splitter |
/// | 0x08-0x0F  | Right (front) box: top, bottom, left, right      |
/// | 0x10-0x17  | Left (back) box: top, bottom, left, right        |
/// | 0x18-0x19  | Right child index + sub-sector indicator         |
/// | 0x1A-0x1B  | Left child index + sub-sector indicator          |
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct WadNode {
    pub x: i16,
    pub y: i16,
    pub dx: i16,
    pub dy: i16,
    pub right_box: BoundingBox,
    pub left_box: BoundingBox,
    pub right_child: i16,
    pub left_child: i16,
}

impl Record for WadNode {
    const SIZE: usize = 28;

    fn read<B: AsRef<[u8]>>(c: &mut Cursor<B>) -> Self {
        WadNode {
            x: c.read_i16(),
            y: c.read_i16(),
            dx: c.read_i16(),
            dy: c.read_i16(),
            right_box: BoundingBox::read(c),
            left_box: BoundingBox::read(c),
            right_child: c.read_i16(),
            left_child: c.read_i16(),
        }
    }

    fn write(&self, c: &mut Cursor<Vec<u8>>) {
        c.write_i16(self.x);
        c.write_i16(self.y);
        c.write_i16(self.dx);
        c.write_i16(self.dy);
        self.right_box.write(c);
        self.left_box.write(c);
        c.write_i16(self.right_child);
        c.write_i16(self.left_child);
    }
}

/// A `Sector` is a horizontal area of the level where a floor height and
/// ceiling height is defined. Each `Sector` record is 26 bytes
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WadSector {
    pub floor_height: i16,
    pub ceil_height: i16,
    /// Floor texture name
    pub floor_tex: String,
    /// Ceiling texture name
    pub ceil_tex: String,
    /// Light level from 0-255
    pub light_level: i16,
    /// This determines some area-effects called special sectors
    pub kind: i16,
    /// a "tag" number corresponding to LINEDEF(s) with the same tag
    pub tag: i16,
}

impl Record for WadSector {
    const SIZE: usize = 26;

    fn read<B: AsRef<[u8]>>(c: &mut Cursor<B>) -> Self {
        WadSector {
            floor_height: c.read_i16(),
            ceil_height: c.read_i16(),
            floor_tex: c.read_name(),
            ceil_tex: c.read_name(),
            light_level: c.read_i16(),
            kind: c.read_i16(),
            tag: c.read_i16(),
        }
    }

    fn write(&self, c: &mut Cursor<Vec<u8>>) {
        c.write_i16(self.floor_height);
        c.write_i16(self.ceil_height);
        c.write_name(&self.floor_tex);
        c.write_name(&self.ceil_tex);
        c.write_i16(self.light_level);
        c.write_i16(self.kind);
        c.write_i16(self.tag);
    }
}

/// The `BLOCKMAP` header: the grid origin and its size in 128 unit blocks
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BlockmapHeader {
    pub x_origin: i16,
    pub y_origin: i16,
    pub columns: i16,
    pub rows: i16,
}

impl BlockmapHeader {
    pub fn from_entries(entries: &[i16]) -> Option<Self> {
        match entries {
            [x_origin, y_origin, columns, rows, ..] => Some(BlockmapHeader {
                x_origin: *x_origin,
                y_origin: *y_origin,
                columns: *columns,
                rows: *rows,
            }),
            _ => None,
        }
    }
}
