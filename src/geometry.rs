//! Circle geometry for the donut: angles are in degrees, 0° at twelve
//! o'clock, increasing clockwise.

use std::f64::consts::PI;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

pub fn polar_to_cartesian(cx: f64, cy: f64, radius: f64, angle_deg: f64) -> Point {
    let rad = (angle_deg - 90.0) * PI / 180.0;
    Point {
        x: cx + radius * rad.cos(),
        y: cy + radius * rad.sin(),
    }
}

/// SVG path data for the arc between two angles on a circle.
///
/// The path is drawn from `end_deg` back to `start_deg`; spans over 180°
/// set the large-arc flag.
pub fn describe_arc(cx: f64, cy: f64, radius: f64, start_deg: f64, end_deg: f64) -> String {
    let start = polar_to_cartesian(cx, cy, radius, end_deg);
    let end = polar_to_cartesian(cx, cy, radius, start_deg);
    let large_arc = if end_deg - start_deg <= 180.0 { 0 } else { 1 };
    format!(
        "M {:.3} {:.3} A {} {} 0 {} 0 {:.3} {:.3}",
        start.x, start.y, radius, radius, large_arc, end.x, end.y
    )
}
