use glam::Vec2;
use wad::lumps::{BoundingBox, LineDefFlags, NodeChild};

use crate::store::{LinedefId, SectorId, SidedefId, VertexId};
use crate::thing_types::{ThingInfo, ThingTypes};

/// A map coordinate as stored in the WAD
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i16,
    pub y: i16,
}

impl Point {
    pub const fn new(x: i16, y: i16) -> Self {
        Point { x, y }
    }

    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }

    /// Shift by a delta, clamping to the coordinate range
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        let clamp = |v: i32| v.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        Point::new(clamp(self.x as i32 + dx), clamp(self.y as i32 + dy))
    }
}

/// Committed position plus the proposed one while the user drags.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    committed: Point,
    proposed: Option<Point>,
}

impl DragState {
    pub fn new(at: Point) -> Self {
        DragState {
            committed: at,
            proposed: None,
        }
    }
}

/// Something the user can pick up and move. Everything except the UI reads
/// the committed position; the proposed one only becomes real on
/// `end_drag`.
pub trait Draggable {
    fn drag_state(&self) -> &DragState;

    fn drag_state_mut(&mut self) -> &mut DragState;

    fn committed_position(&self) -> Point {
        self.drag_state().committed
    }

    /// Where the item appears: the proposed position mid-drag, else the
    /// committed one
    fn apparent_position(&self) -> Point {
        let state = self.drag_state();
        state.proposed.unwrap_or(state.committed)
    }

    fn is_dragging(&self) -> bool {
        self.drag_state().proposed.is_some()
    }

    fn begin_drag(&mut self) {
        let state = self.drag_state_mut();
        state.proposed = Some(state.committed);
    }

    /// Returns false if no drag is in progress
    fn drag_to(&mut self, to: Point) -> bool {
        match &mut self.drag_state_mut().proposed {
            Some(p) => {
                *p = to;
                true
            }
            None => false,
        }
    }

    /// Commit the proposed position. Returns true if the item moved.
    fn end_drag(&mut self) -> bool {
        let state = self.drag_state_mut();
        match state.proposed.take() {
            Some(p) if p != state.committed => {
                state.committed = p;
                true
            }
            _ => false,
        }
    }

    fn cancel_drag(&mut self) {
        self.drag_state_mut().proposed = None;
    }

    /// Move without going through a drag
    fn set_position(&mut self, to: Point) {
        let state = self.drag_state_mut();
        state.committed = to;
        state.proposed = None;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pos: DragState,
    pub(crate) degree: u32,
}

impl Vertex {
    pub fn new(x: i16, y: i16) -> Self {
        Vertex {
            pos: DragState::new(Point::new(x, y)),
            degree: 0,
        }
    }

    pub fn x(&self) -> i16 {
        self.pos.committed.x
    }

    pub fn y(&self) -> i16 {
        self.pos.committed.y
    }

    /// Number of linedef ends touching this vertex
    pub fn degree(&self) -> u32 {
        self.degree
    }
}

impl Draggable for Vertex {
    fn drag_state(&self) -> &DragState {
        &self.pos
    }

    fn drag_state_mut(&mut self) -> &mut DragState {
        &mut self.pos
    }
}

/// A wall between two vertices. The vertex and sidedef links are only
/// changed through `Level` so the reverse references stay in step.
#[derive(Debug, Clone, PartialEq)]
pub struct LineDef {
    pub(crate) v1: VertexId,
    pub(crate) v2: VertexId,
    pub(crate) front_sidedef: Option<SidedefId>,
    pub(crate) back_sidedef: Option<SidedefId>,
    pub flags: i16,
    pub special: i16,
    pub tag: i16,
}

impl LineDef {
    pub(crate) fn new(v1: VertexId, v2: VertexId) -> Self {
        LineDef {
            v1,
            v2,
            front_sidedef: None,
            back_sidedef: None,
            flags: 0,
            special: 0,
            tag: 0,
        }
    }

    pub fn v1(&self) -> VertexId {
        self.v1
    }

    pub fn v2(&self) -> VertexId {
        self.v2
    }

    pub fn front_sidedef(&self) -> Option<SidedefId> {
        self.front_sidedef
    }

    pub fn back_sidedef(&self) -> Option<SidedefId> {
        self.back_sidedef
    }

    pub fn is_blocking(&self) -> bool {
        self.flags & LineDefFlags::BLOCKING != 0
    }

    pub fn is_two_sided(&self) -> bool {
        self.flags & LineDefFlags::TWO_SIDED != 0
    }

    pub fn set_flag(&mut self, flag: i16, on: bool) {
        if on {
            self.flags |= flag;
        } else {
            self.flags &= !flag;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SideDef {
    pub x_offset: i16,
    pub y_offset: i16,
    pub upper_tex: String,
    pub lower_tex: String,
    pub middle_tex: String,
    pub(crate) sector: Option<SectorId>,
}

impl SideDef {
    pub fn new(
        x_offset: i16,
        y_offset: i16,
        upper_tex: impl Into<String>,
        lower_tex: impl Into<String>,
        middle_tex: impl Into<String>,
    ) -> Self {
        SideDef {
            x_offset,
            y_offset,
            upper_tex: upper_tex.into(),
            lower_tex: lower_tex.into(),
            middle_tex: middle_tex.into(),
            sector: None,
        }
    }

    pub fn sector(&self) -> Option<SectorId> {
        self.sector
    }
}

impl Default for SideDef {
    fn default() -> Self {
        SideDef::new(0, 0, "-", "-", "-")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sector {
    pub floor_height: i16,
    pub ceil_height: i16,
    pub floor_tex: String,
    pub ceil_tex: String,
    pub light_level: i16,
    pub special: i16,
    pub tag: i16,
}

impl Default for Sector {
    fn default() -> Self {
        Sector {
            floor_height: 0,
            ceil_height: 128,
            floor_tex: "FLOOR0_1".to_string(),
            ceil_tex: "CEIL1_1".to_string(),
            light_level: 160,
            special: 0,
            tag: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Thing {
    pos: DragState,
    pub angle: i16,
    /// The doomednum, resolved through `ThingTypes`
    pub kind: i16,
    pub flags: i16,
}

impl Thing {
    pub fn new(x: i16, y: i16, angle: i16, kind: i16, flags: i16) -> Self {
        Thing {
            pos: DragState::new(Point::new(x, y)),
            angle,
            kind,
            flags,
        }
    }

    pub fn x(&self) -> i16 {
        self.pos.committed.x
    }

    pub fn y(&self) -> i16 {
        self.pos.committed.y
    }

    pub fn info<'t>(&self, types: &'t ThingTypes) -> &'t ThingInfo {
        types.lookup(self.kind)
    }
}

impl Draggable for Thing {
    fn drag_state(&self) -> &DragState {
        &self.pos
    }

    fn drag_state_mut(&mut self) -> &mut DragState {
        &mut self.pos
    }
}

/// A piece of a linedef produced by the node builder. References go stale
/// when the geometry under them is deleted; the BSP is not rebuilt here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub v1: Option<VertexId>,
    pub v2: Option<VertexId>,
    /// Binary Angle Measurement
    pub angle: i16,
    pub linedef: Option<LinedefId>,
    /// 0 = follows the linedef, 1 = runs against it
    pub direction: i16,
    pub offset: i16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubSector {
    pub seg_count: i16,
    /// Index into the level's segments
    pub start_seg: i16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    pub x: i16,
    pub y: i16,
    pub dx: i16,
    pub dy: i16,
    pub right_box: BoundingBox,
    pub left_box: BoundingBox,
    pub right_child: NodeChild,
    pub left_child: NodeChild,
}
