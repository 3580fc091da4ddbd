use geo::{Coord, Line, LineString};
use log::debug;

// Relative to the product of the two line lengths
const PARALLEL_EPSILON: f64 = 1e-12;
// Fraction along a piece
const ENDPOINT_EPSILON: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Crossing {
    None,
    /// `t` is the fraction along the first line, `u` along the second.
    Point { at: Coord, t: f64, u: f64 },
    /// The lines lie on top of each other for some stretch, so there's no single crossing point.
    Collinear,
}

fn cross(a: (f64, f64), b: (f64, f64)) -> f64 {
    a.0 * b.1 - a.1 * b.0
}

fn dot(a: (f64, f64), b: (f64, f64)) -> f64 {
    a.0 * b.0 + a.1 * b.1
}

// https://stackoverflow.com/a/565282, bounded to both segments
pub fn segment_intersection(line1: Line, line2: Line) -> Crossing {
    let p = line1.start;
    let q = line2.start;
    let r = (line1.dx(), line1.dy());
    let s = (line2.dx(), line2.dy());
    let r_len = r.0.hypot(r.1);
    let s_len = s.0.hypot(s.1);
    if r_len == 0.0 || s_len == 0.0 {
        return Crossing::None;
    }

    let r_cross_s = cross(r, s);
    let q_minus_p = (q.x - p.x, q.y - p.y);

    if r_cross_s.abs() <= PARALLEL_EPSILON * r_len * s_len {
        let q_minus_p_len = q_minus_p.0.hypot(q_minus_p.1);
        if cross(q_minus_p, r).abs() > PARALLEL_EPSILON * r_len * q_minus_p_len {
            // Parallel, but on different infinite lines
            return Crossing::None;
        }
        // On the same infinite line; do the ranges overlap?
        let t0 = dot(q_minus_p, r) / (r_len * r_len);
        let t1 = t0 + dot(s, r) / (r_len * r_len);
        if t0.max(t1) >= 0.0 && t0.min(t1) <= 1.0 {
            return Crossing::Collinear;
        }
        return Crossing::None;
    }

    let t = cross(q_minus_p, (s.0 / r_cross_s, s.1 / r_cross_s));
    let u = cross(q_minus_p, (r.0 / r_cross_s, r.1 / r_cross_s));
    if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
        return Crossing::None;
    }
    Crossing::Point {
        at: Coord {
            x: p.x + t * r.0,
            y: p.y + t * r.1,
        },
        t,
        u,
    }
}

/// Does `piece` hit the centerline somewhere strictly inside itself? Touching the centerline at
/// one of the piece's own endpoints doesn't count. Collinear overlap is numerically ambiguous and
/// treated as no crossing.
pub fn crosses_interior(piece: Line, centerline: &LineString) -> bool {
    for line in centerline.lines() {
        match segment_intersection(piece, line) {
            Crossing::Point { t, .. } => {
                if t > ENDPOINT_EPSILON && t < 1.0 - ENDPOINT_EPSILON {
                    return true;
                }
            }
            Crossing::Collinear => {
                debug!("Offset piece {piece:?} overlaps centerline piece {line:?}, not swapping");
            }
            Crossing::None => {}
        }
    }
    false
}

/// True if no two non-adjacent edges of the ring touch. The ring may or may not repeat its first
/// point at the end. Fewer than 3 distinct points never form a simple ring.
pub fn is_simple_ring(coords: &[Coord]) -> bool {
    let mut pts: Vec<Coord> = Vec::with_capacity(coords.len());
    for pt in coords {
        if pts.last() != Some(pt) {
            pts.push(*pt);
        }
    }
    if pts.len() > 1 && pts.first() == pts.last() {
        pts.pop();
    }
    let n = pts.len();
    if n < 3 {
        return false;
    }

    let edge = |i: usize| Line::new(pts[i], pts[(i + 1) % n]);
    for i in 0..n {
        for j in (i + 2)..n {
            // The last edge wraps around to share a point with the first
            if i == 0 && j == n - 1 {
                continue;
            }
            if segment_intersection(edge(i), edge(j)) != Crossing::None {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use geo::{coord, line_string};

    fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Line {
        Line::new(coord! { x: x1, y: y1 }, coord! { x: x2, y: y2 })
    }

    #[test]
    fn test_proper_crossing() {
        match segment_intersection(line(0., 0., 10., 10.), line(0., 10., 10., 0.)) {
            Crossing::Point { at, t, u } => {
                assert_abs_diff_eq!(at.x, 5.0);
                assert_abs_diff_eq!(at.y, 5.0);
                assert_abs_diff_eq!(t, 0.5);
                assert_abs_diff_eq!(u, 0.5);
            }
            x => panic!("expected a crossing, got {x:?}"),
        }
    }

    #[test]
    fn test_no_crossing() {
        assert_eq!(
            segment_intersection(line(0., 0., 1., 1.), line(5., 0., 6., -3.)),
            Crossing::None
        );
        // Parallel on different lines
        assert_eq!(
            segment_intersection(line(0., 0., 10., 0.), line(0., 1., 10., 1.)),
            Crossing::None
        );
        // Same infinite line, disjoint ranges
        assert_eq!(
            segment_intersection(line(0., 0., 1., 0.), line(2., 0., 3., 0.)),
            Crossing::None
        );
    }

    #[test]
    fn test_collinear_overlap() {
        assert_eq!(
            segment_intersection(line(0., 0., 5., 0.), line(3., 0., 8., 0.)),
            Crossing::Collinear
        );
    }

    #[test]
    fn test_crosses_interior() {
        let centerline = line_string![(x: 0., y: 0.), (x: 10., y: 0.)];
        assert!(crosses_interior(line(2., -1., 4., 1.), &centerline));
        // Starting on the centerline isn't a crossing
        assert!(!crosses_interior(line(0., 0., 10., -2.), &centerline));
        assert!(!crosses_interior(line(0., -1., 10., -1.), &centerline));
        // Overlap is ambiguous, so it doesn't count
        assert!(!crosses_interior(line(2., 0., 4., 0.), &centerline));
    }

    #[test]
    fn test_simple_rings() {
        let square = [
            coord! { x: 0., y: 0. },
            coord! { x: 1., y: 0. },
            coord! { x: 1., y: 1. },
            coord! { x: 0., y: 1. },
        ];
        assert!(is_simple_ring(&square));

        let bowtie = [
            coord! { x: 0., y: 0. },
            coord! { x: 1., y: 1. },
            coord! { x: 1., y: 0. },
            coord! { x: 0., y: 1. },
            coord! { x: 0., y: 0. },
        ];
        assert!(!is_simple_ring(&bowtie));

        assert!(!is_simple_ring(&square[..2]));
    }
}
