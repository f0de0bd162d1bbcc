//! Overlap-aware placement resolver.
//!
//! DESIGN
//! ======
//! Pure geometry, no state. Given a proposed rectangle and the rects
//! already occupying the board, find a nearby position where the
//! proposal fits with a minimum clearance. The search is a greedy
//! horizontal sweep: push the candidate right past every obstruction
//! it currently intersects, wrap to a new row when the current row is
//! exhausted. Produces a left-to-right, top-to-bottom packing, cheap
//! to compute, with no global optimization. Adequate for AI-driven
//! incremental placement where visual non-overlap matters more than
//! packing tightness.
//!
//! Callers are responsible for excluding non-spatial object kinds
//! (connectors) from occupancy sets; see `services::placement`.

use serde::{Deserialize, Serialize};

/// Minimum clearance between any two placed objects, in canvas units
/// (screen pixels at zoom level 1).
pub const OVERLAP_GAP: f64 = 20.0;

/// Sweep iteration cap. Guarantees termination on pathological
/// occupancy sets; not a domain value.
const MAX_SWEEP_ITERATIONS: usize = 200;

/// Horizontal displacement from the proposed x after which the current
/// row is treated as exhausted and the sweep wraps to a new row.
const ROW_WRAP_DISTANCE: f64 = 5000.0;

/// Axis-aligned bounding box in canvas world coordinates (top-left
/// origin, non-negative extents).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// True iff the gap-inflated rects intersect.
///
/// Rects separated by at least `gap` along either axis do not overlap;
/// exactly `gap` apart counts as separated. Pure and total: never
/// fails for finite inputs.
#[must_use]
pub fn rects_overlap(a: Rect, b: Rect, gap: f64) -> bool {
    !(a.x + a.width + gap <= b.x
        || b.x + b.width + gap <= a.x
        || a.y + a.height + gap <= b.y
        || b.y + b.height + gap <= a.y)
}

/// Find a position where `proposed` does not overlap any rect in
/// `occupied`, per [`rects_overlap`] with `gap`.
///
/// The proposed position is returned unchanged when already clear,
/// which is the common case when placing into open space. Otherwise
/// the candidate is swept right past the obstructions it intersects,
/// wrapping to a new row when the sweep travels too far. When the
/// iteration cap is hit, the last candidate is returned as-is:
/// placement degrades to a possible overlap rather than failing.
#[must_use]
pub fn resolve_position(proposed: Rect, occupied: &[Rect], gap: f64) -> (f64, f64) {
    let clear = |c: Rect| !occupied.iter().any(|o| rects_overlap(c, *o, gap));

    if clear(proposed) {
        return (proposed.x, proposed.y);
    }

    let mut cx = proposed.x;
    let mut cy = proposed.y;
    for _ in 0..MAX_SWEEP_ITERATIONS {
        let candidate = Rect { x: cx, y: cy, ..proposed };
        if clear(candidate) {
            return (cx, cy);
        }

        // Push past the right edge of everything the candidate
        // currently intersects, so one step clears all of them.
        let mut max_right = cx;
        for o in occupied {
            if rects_overlap(candidate, *o, gap) {
                max_right = max_right.max(o.x + o.width + gap);
            }
        }
        cx = max_right;

        if cx - proposed.x > ROW_WRAP_DISTANCE {
            // Row exhausted: retry from the left on the next row.
            cx = proposed.x;
            cy += proposed.height + gap;
        }
    }

    (cx, cy)
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod tests;
