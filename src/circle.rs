use geo::{Coord, LineString, Polygon};

fn project_away(pt: Coord, angle_degrees: f64, distance: f64) -> Coord {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    Coord {
        x: pt.x + distance * cos,
        y: pt.y + distance * sin,
    }
}

/// Approximates a circle with `segments` straight edges. Returns `None` for a non-positive radius
/// or fewer than 3 segments.
pub fn circle_polygon(center: Coord, radius: f64, segments: usize) -> Option<Polygon> {
    if radius <= 0.0 || segments < 3 {
        return None;
    }
    let pts: Vec<Coord> = (0..segments)
        .map(|i| project_away(center, (i as f64) / (segments as f64) * 360.0, radius))
        .collect();
    Some(Polygon::new(LineString::new(pts), Vec::new()))
}
