//! Pure slice geometry for the wheel.
//!
//! Angles are in degrees, measured clockwise from 12 o'clock — the pointer's
//! fixed position. Slice `i` of `n` spans `[i, i + 1) * 360/n`; rotating the
//! wheel adds to every slice's on-screen angle. Coordinates live in the
//! 0..100 square with the wheel centered at (50, 50).

use serde::Serialize;

pub const CENTER: f64 = 50.0;
pub const RADIUS: f64 = 50.0;
/// Label anchors sit inset from the rim so text stays inside the wedge.
pub const LABEL_RADIUS: f64 = 30.0;
pub const MAX_FONT_SIZE: f64 = 6.0;
pub const MIN_FONT_SIZE: f64 = 2.5;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// One pie wedge: center, the two straight edges, and the rim arc between
/// `start_angle` and `end_angle`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SlicePath {
    pub start_angle: f64,
    pub end_angle: f64,
    pub radius: f64,
    /// SVG large-arc flag. A span over 180 degrees needs it, which would
    /// take a wheel of fewer than 2 options; kept for the degenerate case.
    pub large_arc: bool,
}

/// Where and how a slice's label is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LabelPlacement {
    pub x: f64,
    pub y: f64,
    /// Rotation applied to the text, normalized so it never renders
    /// upside-down across the bottom half of the circle.
    pub rotation: f64,
    pub font_size: f64,
}

pub fn slice_angle(n: usize) -> f64 {
    360.0 / n as f64
}

/// Normalize to the half-open range [0, 360).
pub fn normalize_degrees(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

/// Point at `angle` degrees clockwise from 12 o'clock, `radius` out from
/// the wheel center, in screen coordinates (y grows downward).
pub fn point_at(angle_deg: f64, radius: f64) -> Point {
    let rad = angle_deg.to_radians();
    Point {
        x: CENTER + radius * rad.sin(),
        y: CENTER - radius * rad.cos(),
    }
}

pub fn slice_path(i: usize, n: usize) -> SlicePath {
    let angle = slice_angle(n);
    // Both boundaries come from the same `k * angle` expression so that a
    // slice's end is bit-identical to its neighbor's start.
    SlicePath {
        start_angle: i as f64 * angle,
        end_angle: (i + 1) as f64 * angle,
        radius: RADIUS,
        large_arc: angle > 180.0,
    }
}

impl SlicePath {
    pub fn start_point(&self) -> Point {
        point_at(self.start_angle, self.radius)
    }

    pub fn end_point(&self) -> Point {
        point_at(self.end_angle, self.radius)
    }

    /// SVG path data: move to the center, edge out to the arc start, sweep
    /// clockwise along the rim, close back to the center.
    pub fn d(&self) -> String {
        let start = self.start_point();
        let end = self.end_point();
        let large_arc = if self.large_arc { 1 } else { 0 };
        format!(
            "M {cx:.3} {cy:.3} L {sx:.3} {sy:.3} A {r:.3} {r:.3} 0 {large_arc} 1 {ex:.3} {ey:.3} Z",
            cx = CENTER,
            cy = CENTER,
            sx = start.x,
            sy = start.y,
            r = self.radius,
            ex = end.x,
            ey = end.y,
        )
    }

    /// Rim samples every `step_deg` degrees, endpoints included.
    pub fn arc_points(&self, step_deg: f64) -> Vec<Point> {
        arc_points(self.start_angle, self.end_angle, self.radius, step_deg)
    }
}

/// Samples along the arc from `start_deg` to `end_deg` at `radius`,
/// endpoints included. The terminal canvas draws arcs as point runs, with
/// the wheel's rotation already folded into the angles.
pub fn arc_points(start_deg: f64, end_deg: f64, radius: f64, step_deg: f64) -> Vec<Point> {
    let mut points = Vec::new();
    let mut angle = start_deg;
    while angle < end_deg {
        points.push(point_at(angle, radius));
        angle += step_deg;
    }
    points.push(point_at(end_deg, radius));
    points
}

pub fn label_placement(i: usize, n: usize) -> LabelPlacement {
    let angle = slice_angle(n);
    let midpoint = i as f64 * angle + angle / 2.0;
    let anchor = point_at(midpoint, LABEL_RADIUS);
    LabelPlacement {
        x: anchor.x,
        y: anchor.y,
        rotation: upright_rotation(midpoint),
        font_size: font_size(n),
    }
}

/// Labels rotate with their slice midpoint, except across the bottom half
/// of the circle where the raw angle would paint them upside-down; those
/// get a half turn subtracted.
fn upright_rotation(midpoint_deg: f64) -> f64 {
    let norm = normalize_degrees(midpoint_deg);
    if norm > 90.0 && norm < 270.0 {
        midpoint_deg - 180.0
    } else {
        midpoint_deg
    }
}

/// Shrinks as the wheel fills so labels keep fitting their wedge, clamped
/// to stay legible.
pub fn font_size(n: usize) -> f64 {
    (24.0 / n as f64).clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

/// Which slice rests under the pointer once the wheel stops at
/// `final_angle_deg` of clockwise rotation.
///
/// The wheel turns clockwise beneath a stationary pointer, so the slice now
/// at the top is the one whose unrotated position is `-final_angle` mod 360.
/// A resting angle exactly on a slice boundary resolves to the slice that
/// begins at that boundary: n=4 at 0 degrees gives index 0, at 90 degrees
/// index 3.
pub fn resolve_winner(final_angle_deg: f64, n: usize) -> usize {
    let resting = normalize_degrees(360.0 - normalize_degrees(final_angle_deg));
    (resting / slice_angle(n)).floor() as usize % n
}
