//! Placement session: request-scoped occupancy tracking for AI creates.
//!
//! DESIGN
//! ======
//! One session per AI request, owned by the request handler and
//! discarded when it finishes. Seeded from the board snapshot at the
//! start of the request, then grown as the request places objects, so
//! objects created within one batch avoid each other as well as
//! pre-existing board content. Frames and non-frames track occupancy
//! independently: frames are visual groupings that may overlap the
//! shapes placed inside them, but not each other. Connectors are
//! zero-extent and bypass placement entirely.
//!
//! Placements within a request must be resolved sequentially; each
//! result is recorded before the next proposal is resolved.

use crate::layout::{self, OVERLAP_GAP, Rect};
use crate::state::{BoardObject, ObjectKind, OccupancyPool};

pub struct PlacementSession {
    frames: Vec<Rect>,
    shapes: Vec<Rect>,
    /// Highest z-index seen at seed time, advanced by allocation.
    max_z: i32,
}

impl PlacementSession {
    /// Seed occupancy pools and the z-index high-water mark from the
    /// current board contents.
    #[must_use]
    pub fn seed(objects: &[BoardObject]) -> Self {
        let mut session = Self { frames: Vec::new(), shapes: Vec::new(), max_z: 0 };
        for obj in objects {
            session.max_z = session.max_z.max(obj.z_index);
            match obj.kind.occupancy_pool() {
                Some(OccupancyPool::Frames) => session.frames.push(obj.rect()),
                Some(OccupancyPool::Shapes) => session.shapes.push(obj.rect()),
                None => {}
            }
        }
        session
    }

    /// Resolve a non-overlapping position for `proposed` and record the
    /// result so subsequent placements in this session avoid it.
    ///
    /// Connectors come back unchanged and are never recorded.
    pub fn place(&mut self, kind: ObjectKind, proposed: Rect) -> (f64, f64) {
        let Some(pool) = kind.occupancy_pool() else {
            return (proposed.x, proposed.y);
        };
        let occupied = match pool {
            OccupancyPool::Frames => &mut self.frames,
            OccupancyPool::Shapes => &mut self.shapes,
        };
        let (x, y) = layout::resolve_position(proposed, occupied, OVERLAP_GAP);
        occupied.push(Rect { x, y, width: proposed.width, height: proposed.height });
        (x, y)
    }

    /// Next z-index, one past the current high-water mark.
    pub fn next_z(&mut self) -> i32 {
        self.max_z += 1;
        self.max_z
    }

    /// Reserve `count` consecutive z-indices, returning the first.
    pub fn allocate_z(&mut self, count: i32) -> i32 {
        let start = self.max_z + 1;
        self.max_z += count;
        start
    }
}

#[cfg(test)]
#[path = "placement_test.rs"]
mod tests;
