//! Connection routing: curve geometry between two node bounding boxes.
//!
//! Pure geometry — no state. The presentation layer feeds the curve to
//! whatever it paints with; the engine only computes where it goes.

use crate::geometry::{Point, Rect};

/// Control-point reach is capped so long edges don't swing far outside the
/// viewport.
const MAX_CONTROL_LEN: f32 = 240.0;

/// Fraction of the anchor distance used for control-point reach.
const CURVATURE: f32 = 0.5;

/// A cubic bezier segment between two node borders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicCurve {
    pub start: Point,
    pub c1: Point,
    pub c2: Point,
    pub end: Point,
}

impl CubicCurve {
    /// Sample the curve at parameter `t` in `[0, 1]`.
    pub fn sample(&self, t: f32) -> Point {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;
        self.start * mt3 + self.c1 * (3.0 * mt2 * t) + self.c2 * (3.0 * mt * t2) + self.end * t3
    }
}

/// Compute the curve connecting `from` to `to`.
///
/// Anchors sit on each rect's border, found by casting a ray from the rect
/// center toward the other rect's center. Control points extend from the
/// anchors along the crossed face's outward normal.
pub fn route(from: Rect, to: Rect) -> CubicCurve {
    let start = border_anchor(from, to.center());
    let end = border_anchor(to, from.center());

    let delta = end - start;
    // Directionally-biased distance keeps curves stable for mostly-vertical
    // layouts and avoids overshooting control points.
    let reach = (delta.x.abs().max(delta.y.abs() * 0.5) * CURVATURE).min(MAX_CONTROL_LEN);

    CubicCurve {
        start,
        c1: start + face_normal(start, from) * reach,
        c2: end + face_normal(end, to) * reach,
        end,
    }
}

/// The point where the ray from `rect`'s center toward `target` crosses the
/// rect border. Falls back to the center for degenerate inputs (coincident
/// centers, zero-size rects).
fn border_anchor(rect: Rect, target: Point) -> Point {
    let center = rect.center();
    let dir = target - center;
    if dir.x * dir.x + dir.y * dir.y < 1.0 {
        return center;
    }

    let mut t_min = f32::INFINITY;

    if dir.x.abs() > f32::EPSILON {
        for side_x in [rect.left(), rect.right()] {
            let t = (side_x - center.x) / dir.x;
            let y = center.y + t * dir.y;
            if t > 0.0 && y >= rect.top() && y <= rect.bottom() {
                t_min = t_min.min(t);
            }
        }
    }
    if dir.y.abs() > f32::EPSILON {
        for side_y in [rect.top(), rect.bottom()] {
            let t = (side_y - center.y) / dir.y;
            let x = center.x + t * dir.x;
            if t > 0.0 && x >= rect.left() && x <= rect.right() {
                t_min = t_min.min(t);
            }
        }
    }

    if t_min.is_finite() {
        center + dir * t_min
    } else {
        center
    }
}

/// Outward unit normal of the rect face `anchor` sits on. Anchors in a corner
/// resolve to the horizontally-facing normal first.
fn face_normal(anchor: Point, rect: Rect) -> Point {
    const EDGE_EPS: f32 = 0.5;
    if (anchor.x - rect.left()).abs() < EDGE_EPS {
        Point::new(-1.0, 0.0)
    } else if (anchor.x - rect.right()).abs() < EDGE_EPS {
        Point::new(1.0, 0.0)
    } else if (anchor.y - rect.top()).abs() < EDGE_EPS {
        Point::new(0.0, -1.0)
    } else {
        Point::new(0.0, 1.0)
    }
}
