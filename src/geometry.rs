//! Planar geometry over grid locations: bridge segments, crossings and tile coverage.

use serde::{Deserialize, Serialize};
use unordered_pair::UnorderedPair;

use crate::location::Location;

/// The two endpoints of a placed bridge. `start` and `end` keep the order the caller placed them in.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// First endpoint.
    pub start: Location,
    /// Second endpoint.
    pub end: Location,
}

impl Span {
    /// A span from `start` to `end`.
    pub fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    #[inline]
    fn delta(&self) -> (i64, i64) {
        (self.end.0 as i64 - self.start.0 as i64, self.end.1 as i64 - self.start.1 as i64)
    }

    /// Endpoints without orientation, for counting bridges between a pair of islands.
    pub fn endpoints(&self) -> UnorderedPair<Location> {
        UnorderedPair::from((self.start, self.end))
    }

    /// Same row, different columns.
    pub fn is_horizontal(&self) -> bool {
        self.start.1 == self.end.1 && self.start.0 != self.end.0
    }

    /// Same column, different rows.
    pub fn is_vertical(&self) -> bool {
        self.start.0 == self.end.0 && self.start.1 != self.end.1
    }

    /// Horizontal or vertical.
    pub fn is_axis_aligned(&self) -> bool {
        self.is_horizontal() || self.is_vertical()
    }

    /// 45 degree spans, i.e. `|dx| == |dy|` and nonzero.
    pub fn is_diagonal(&self) -> bool {
        let (dx, dy) = self.delta();
        dx != 0 && dx.abs() == dy.abs()
    }

    /// Euclidean length.
    pub fn length(&self) -> f64 {
        let (dx, dy) = self.delta();
        ((dx * dx + dy * dy) as f64).sqrt()
    }

    /// Whether any endpoint of `self` is an endpoint of `other`.
    pub fn shares_endpoint(&self, other: &Span) -> bool {
        self.start == other.start || self.start == other.end || self.end == other.start || self.end == other.end
    }

    /// Strict segment intersection: each segment's endpoints lie on opposite sides of the other.
    ///
    /// Collinear or touching configurations are never reported; callers filter shared endpoints first.
    pub fn crosses(&self, other: &Span) -> bool {
        let d1 = orientation(other.start, other.end, self.start);
        let d2 = orientation(other.start, other.end, self.end);
        let d3 = orientation(self.start, self.end, other.start);
        let d4 = orientation(self.start, self.end, other.end);

        ((d1 > 0 && d2 < 0) || (d1 < 0 && d2 > 0)) && ((d3 > 0 && d4 < 0) || (d3 < 0 && d4 > 0))
    }

    /// Whether `location` sits on this segment, endpoints included.
    ///
    /// Each moving axis yields an interpolation parameter `t`; the parameters must agree and lie in `[0, 1]`
    /// within `tolerance`. An axis that does not move must match exactly.
    pub fn covers(&self, location: Location, tolerance: f64) -> bool {
        let (sx, sy) = self.start.as_f64();
        let (px, py) = location.as_f64();
        let (dx, dy) = self.delta();

        let t_x = if dx == 0 {
            if location.0 != self.start.0 {
                return false;
            }
            None
        } else {
            Some((px - sx) / dx as f64)
        };
        let t_y = if dy == 0 {
            if location.1 != self.start.1 {
                return false;
            }
            None
        } else {
            Some((py - sy) / dy as f64)
        };

        let t = match (t_x, t_y) {
            (Some(tx), Some(ty)) => {
                if (tx - ty).abs() > tolerance {
                    return false;
                }
                (tx + ty) / 2.0
            }
            (Some(t), None) | (None, Some(t)) => t,
            // degenerate span; both axes already matched exactly
            (None, None) => return true,
        };

        t >= -tolerance && t <= 1.0 + tolerance
    }

    /// Lattice tiles the segment passes through, excluding both endpoints.
    ///
    /// Axis-aligned and diagonal spans visit every tile in between; other slopes only hit the lattice
    /// at multiples of `gcd(|dx|, |dy|)`.
    pub fn tiles_between(&self) -> Vec<Location> {
        let (dx, dy) = self.delta();
        let steps = gcd(dx.unsigned_abs(), dy.unsigned_abs()) as i64;
        if steps <= 1 {
            return Vec::new();
        }
        let (step_x, step_y) = ((dx / steps) as isize, (dy / steps) as isize);

        (1..steps as isize)
            .map(|i| self.start.offset_by((step_x * i, step_y * i)))
            .collect()
    }
}

/// Twice the signed area of triangle `abc`; positive when `a -> b -> c` turns counter-clockwise.
pub(crate) fn orientation(a: Location, b: Location, c: Location) -> i64 {
    let (ax, ay) = (a.0 as i64, a.1 as i64);
    let (bx, by) = (b.0 as i64, b.1 as i64);
    let (cx, cy) = (c.0 as i64, c.1 as i64);
    (bx - ax) * (cy - ay) - (by - ay) * (cx - ax)
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 { a } else { gcd(b, a % b) }
}
