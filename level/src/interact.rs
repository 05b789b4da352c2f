//! What the user can grab, and where.
//!
//! Picking works on apparent positions so a drag in progress is hit where it
//! is drawn. Everything else (saving, extents) reads committed positions.

use std::collections::BTreeSet;

use glam::Vec2;

use crate::level::Level;
use crate::map_defs::{Draggable, Point};
use crate::store::{LinedefId, SectorId, ThingId, VertexId};
use crate::thing_types::ThingTypes;

/// An item that moves when dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DragTarget {
    Vertex(VertexId),
    Thing(ThingId),
}

/// A selectable map element. Selecting one and dragging moves its
/// `draggables`; the other two say what needs redrawing.
pub trait Interactive {
    fn draggables(&self, level: &Level) -> Vec<DragTarget>;

    fn linedefs(&self, level: &Level) -> Vec<LinedefId>;

    fn sectors(&self, level: &Level) -> Vec<SectorId>;
}

fn line_sectors(level: &Level, line: LinedefId, out: &mut BTreeSet<SectorId>) {
    let Some(l) = level.linedef(line) else {
        return;
    };
    for side in [l.front_sidedef(), l.back_sidedef()].into_iter().flatten() {
        if let Some(sector) = level.sidedef(side).and_then(|s| s.sector()) {
            out.insert(sector);
        }
    }
}

impl Interactive for VertexId {
    fn draggables(&self, level: &Level) -> Vec<DragTarget> {
        if level.vertex(*self).is_some() {
            vec![DragTarget::Vertex(*self)]
        } else {
            Vec::new()
        }
    }

    fn linedefs(&self, level: &Level) -> Vec<LinedefId> {
        level.vertex_linedefs(*self).collect()
    }

    fn sectors(&self, level: &Level) -> Vec<SectorId> {
        let mut out = BTreeSet::new();
        for line in level.vertex_linedefs(*self) {
            line_sectors(level, line, &mut out);
        }
        out.into_iter().collect()
    }
}

impl Interactive for LinedefId {
    fn draggables(&self, level: &Level) -> Vec<DragTarget> {
        match level.linedef(*self) {
            Some(l) if l.v1() == l.v2() => vec![DragTarget::Vertex(l.v1())],
            Some(l) => vec![DragTarget::Vertex(l.v1()), DragTarget::Vertex(l.v2())],
            None => Vec::new(),
        }
    }

    fn linedefs(&self, level: &Level) -> Vec<LinedefId> {
        if level.linedef(*self).is_some() {
            vec![*self]
        } else {
            Vec::new()
        }
    }

    fn sectors(&self, level: &Level) -> Vec<SectorId> {
        let mut out = BTreeSet::new();
        line_sectors(level, *self, &mut out);
        out.into_iter().collect()
    }
}

impl Interactive for SectorId {
    fn draggables(&self, level: &Level) -> Vec<DragTarget> {
        let mut vertexes = BTreeSet::new();
        for line in self.linedefs(level) {
            if let Some(l) = level.linedef(line) {
                vertexes.insert(l.v1());
                vertexes.insert(l.v2());
            }
        }
        vertexes.into_iter().map(DragTarget::Vertex).collect()
    }

    fn linedefs(&self, level: &Level) -> Vec<LinedefId> {
        let lines: BTreeSet<LinedefId> = level
            .sector_sidedefs(*self)
            .flat_map(|side| level.sidedef_linedefs(side))
            .collect();
        lines.into_iter().collect()
    }

    fn sectors(&self, level: &Level) -> Vec<SectorId> {
        if level.sector(*self).is_some() {
            vec![*self]
        } else {
            Vec::new()
        }
    }
}

/// Bounding box of the committed vertex positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapExtents {
    pub min: Point,
    pub max: Point,
}

impl MapExtents {
    pub fn width(&self) -> i32 {
        self.max.x as i32 - self.min.x as i32
    }

    pub fn height(&self) -> i32 {
        self.max.y as i32 - self.min.y as i32
    }
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

impl Level {
    fn draggable_mut(&mut self, target: DragTarget) -> Option<&mut dyn Draggable> {
        match target {
            DragTarget::Vertex(id) => self.vertexes.get_mut(id).map(|v| v as &mut dyn Draggable),
            DragTarget::Thing(id) => self.things.get_mut(id).map(|t| t as &mut dyn Draggable),
        }
    }

    pub fn begin_drag(&mut self, targets: &[DragTarget]) {
        for target in targets {
            if let Some(item) = self.draggable_mut(*target) {
                item.begin_drag();
            }
        }
    }

    /// Propose every target at its committed position plus the delta
    pub fn drag_by(&mut self, targets: &[DragTarget], dx: i32, dy: i32) {
        for target in targets {
            if let Some(item) = self.draggable_mut(*target) {
                let to = item.committed_position().offset(dx, dy);
                item.drag_to(to);
            }
        }
    }

    /// Commit the drag. Returns how many targets actually moved.
    pub fn end_drag(&mut self, targets: &[DragTarget]) -> usize {
        let mut moved = 0;
        for target in targets {
            if let Some(item) = self.draggable_mut(*target) {
                if item.end_drag() {
                    moved += 1;
                }
            }
        }
        moved
    }

    pub fn cancel_drag(&mut self, targets: &[DragTarget]) {
        for target in targets {
            if let Some(item) = self.draggable_mut(*target) {
                item.cancel_drag();
            }
        }
    }

    /// Closest vertex to `point`, if any lies within `max_dist`
    pub fn nearest_vertex(&self, point: Vec2, max_dist: f32) -> Option<VertexId> {
        self.vertexes()
            .map(|(id, v)| (id, v.apparent_position().as_vec2().distance(point)))
            .filter(|(_, d)| *d <= max_dist)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Closest linedef to `point`, if any passes within `tolerance`
    pub fn linedef_at(&self, point: Vec2, tolerance: f32) -> Option<LinedefId> {
        self.linedefs()
            .filter_map(|(id, l)| {
                let a = self.vertex(l.v1())?.apparent_position().as_vec2();
                let b = self.vertex(l.v2())?.apparent_position().as_vec2();
                Some((id, distance_to_segment(point, a, b)))
            })
            .filter(|(_, d)| *d <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Thing whose square footprint covers `point`. Where several overlap the
    /// one with its centre closest wins.
    pub fn thing_at(&self, point: Vec2, types: &ThingTypes) -> Option<ThingId> {
        self.things()
            .filter_map(|(id, t)| {
                let centre = t.apparent_position().as_vec2();
                let radius = t.info(types).radius as f32;
                let d = (point - centre).abs();
                (d.x <= radius && d.y <= radius).then(|| (id, point.distance(centre)))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    pub fn extents(&self) -> Option<MapExtents> {
        let mut points = self.vertexes().map(|(_, v)| v.committed_position());
        let first = points.next()?;
        let mut ext = MapExtents {
            min: first,
            max: first,
        };
        for p in points {
            ext.min.x = ext.min.x.min(p.x);
            ext.min.y = ext.min.y.min(p.y);
            ext.max.x = ext.max.x.max(p.x);
            ext.max.y = ext.max.y.max(p.y);
        }
        Some(ext)
    }
}
