use serde::{Deserialize, Serialize};

use crate::Vector2;

/// Axis-aligned rectangle in pixel space. `(x, y)` is the top-left corner.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Hitbox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Hitbox {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// A box of the given size centered on `center`.
    pub fn centered(center: Vector2, size: BoxSize) -> Self {
        Self {
            x: center.x - size.w / 2.0,
            y: center.y - size.h / 2.0,
            w: size.w,
            h: size.h,
        }
    }

    pub fn translated(&self, offset: Vector2) -> Self {
        Self {
            x: self.x + offset.x,
            y: self.y + offset.y,
            ..*self
        }
    }

    /// Round every field to the nearest multiple of `grid`.
    pub fn snapped(&self, grid: f64) -> Self {
        Self {
            x: snap(self.x, grid),
            y: snap(self.y, grid),
            w: snap(self.w, grid),
            h: snap(self.h, grid),
        }
    }

    pub fn size(&self) -> BoxSize {
        BoxSize::new(self.w, self.h)
    }

    /// Whether `p` lies inside the box, edges included.
    pub fn contains(&self, p: Vector2) -> bool {
        p.x >= self.x && p.y >= self.y && p.x <= self.x + self.w && p.y <= self.y + self.h
    }

    /// The four boundary edges, clockwise from the top edge.
    pub fn edges(&self) -> [(Vector2, Vector2); 4] {
        let tl = Vector2::new(self.x, self.y);
        let tr = Vector2::new(self.x + self.w, self.y);
        let br = Vector2::new(self.x + self.w, self.y + self.h);
        let bl = Vector2::new(self.x, self.y + self.h);
        [(tl, tr), (tr, br), (br, bl), (bl, tl)]
    }
}

/// Width and height of a hitbox.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct BoxSize {
    pub w: f64,
    pub h: f64,
}

impl BoxSize {
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    /// Component-wise maximum.
    pub fn max(&self, other: &BoxSize) -> BoxSize {
        BoxSize::new(self.w.max(other.w), self.h.max(other.h))
    }

    pub fn scaled(&self, factor: f64) -> BoxSize {
        BoxSize::new(self.w * factor, self.h * factor)
    }
}

/// The line a player's weapon occupies for one frame.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct BladeSegment {
    /// Grip end, at the palm
    pub p1: Vector2,
    /// Tip end
    pub p2: Vector2,
}

impl BladeSegment {
    pub fn new(p1: Vector2, p2: Vector2) -> Self {
        Self { p1, p2 }
    }

    pub fn reversed(&self) -> Self {
        Self {
            p1: self.p2,
            p2: self.p1,
        }
    }

    pub fn length(&self) -> f64 {
        (self.p2 - self.p1).norm()
    }
}

/// Round `v` to the nearest multiple of `grid`.
pub fn snap(v: f64, grid: f64) -> f64 {
    (v / grid).round() * grid
}

/// Whether the segments `a1-a2` and `b1-b2` cross.
///
/// Solves for the parameters of both segments at the crossing point and checks that
/// both lie in `[0, 1]`. Parallel and collinear segments (zero determinant) never
/// intersect.
pub fn segments_intersect(a1: Vector2, a2: Vector2, b1: Vector2, b2: Vector2) -> bool {
    let s1 = a2 - a1;
    let s2 = b2 - b1;
    let det = -s2.x * s1.y + s1.x * s2.y;
    if det == 0.0 {
        return false;
    }

    let s = (-s1.y * (a1.x - b1.x) + s1.x * (a1.y - b1.y)) / det;
    let t = (s2.x * (a1.y - b1.y) - s2.y * (a1.x - b1.x)) / det;
    (0.0..=1.0).contains(&s) && (0.0..=1.0).contains(&t)
}

/// Whether a blade touches a hitbox: either endpoint inside the box (edges
/// included), or the blade crossing one of the box edges.
pub fn line_intersects_rect(segment: &BladeSegment, rect: &Hitbox) -> bool {
    if rect.contains(segment.p1) || rect.contains(segment.p2) {
        return true;
    }
    rect.edges()
        .iter()
        .any(|&(e1, e2)| segments_intersect(segment.p1, segment.p2, e1, e2))
}
