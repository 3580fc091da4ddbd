use geo::{Coord, Line, LineString};
use log::debug;

use crate::crossing::crosses_interior;

/// Stand-in for the infinite slope of a vertical normal, used when a segment is horizontal.
pub const HORIZONTAL_NORMAL_SLOPE: f64 = 1e8;

/// Where offset points get constructed along the centerline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Sampling {
    /// One offset point per input point, so N points in produce N points out. Interior normals
    /// follow the chord between the two neighbors.
    #[default]
    Vertices,
    /// The first point, the midpoint of every segment, and the last point. N points in produce
    /// N + 1 out, and each midpoint uses the mean distance of its segment.
    Midpoints,
}

impl Sampling {
    /// How many offset points each side gets for a centerline of `num_pts`.
    pub fn output_len(self, num_pts: usize) -> usize {
        if num_pts < 2 {
            return 0;
        }
        match self {
            Sampling::Vertices => num_pts,
            Sampling::Midpoints => num_pts + 1,
        }
    }
}

/// The two sides of an offset centerline. Both always have the same length.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OffsetLines {
    /// For every construction point, the candidate on the decreasing-x side of its normal, unless
    /// the swap pass moved it.
    pub left: Vec<Coord>,
    pub right: Vec<Coord>,
}

impl OffsetLines {
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

#[derive(Clone, Copy, Debug)]
struct ConstructionPoint {
    center: Coord,
    distance: f64,
    slope: f64,
    /// Local direction of travel along the centerline
    direction: (f64, f64),
}

impl ConstructionPoint {
    /// Sits at `center`, with a normal perpendicular to `from -> to`.
    fn along(center: Coord, distance: f64, from: Coord, to: Coord) -> Self {
        Self {
            center,
            distance,
            slope: normal_slope(from, to),
            direction: (to.x - from.x, to.y - from.y),
        }
    }

    /// The two points on the normal through `center`, `distance` away on either side.
    fn offset_pair(&self) -> (Coord, Coord) {
        let shift = (self.distance / (1.0 + self.slope.powi(2)).sqrt()).abs();
        let on_normal = |dx: f64| Coord {
            x: self.center.x + dx,
            y: self.center.y + self.slope * dx,
        };
        (on_normal(-shift), on_normal(shift))
    }

    /// 1 if `pt` is left of the direction of travel, -1 if right, 0 if on the centerline.
    fn side_of(&self, pt: Coord) -> i8 {
        let cross = self.direction.0 * (pt.y - self.center.y)
            - self.direction.1 * (pt.x - self.center.x);
        if cross > 0.0 {
            1
        } else if cross < 0.0 {
            -1
        } else {
            0
        }
    }
}

/// Slope of the line perpendicular to `from -> to`.
fn normal_slope(from: Coord, to: Coord) -> f64 {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dy.abs() <= f64::EPSILON * dx.abs() {
        HORIZONTAL_NORMAL_SLOPE
    } else {
        -dx / dy
    }
}

fn vertex_construction(points: &[Coord], distances: &[f64]) -> Vec<ConstructionPoint> {
    let last = points.len() - 1;
    (0..points.len())
        .map(|i| {
            let (from, to) = if i == 0 {
                (points[0], points[1])
            } else if i == last {
                (points[last - 1], points[last])
            } else if points[i - 1] == points[i + 1] {
                // A U-turn has no chord; use the incoming segment
                (points[i - 1], points[i])
            } else {
                (points[i - 1], points[i + 1])
            };
            ConstructionPoint::along(points[i], distances[i], from, to)
        })
        .collect()
}

fn midpoint_construction(points: &[Coord], distances: &[f64]) -> Vec<ConstructionPoint> {
    let last = points.len() - 1;
    let mut result = Vec::with_capacity(points.len() + 1);
    // The real endpoints use the normal of their segment
    result.push(ConstructionPoint::along(
        points[0],
        distances[0],
        points[0],
        points[1],
    ));
    for i in 0..last {
        let (pt1, pt2) = (points[i], points[i + 1]);
        let center = Coord {
            x: (pt1.x + pt2.x) / 2.0,
            y: (pt1.y + pt2.y) / 2.0,
        };
        let distance = (distances[i] + distances[i + 1]) / 2.0;
        result.push(ConstructionPoint::along(center, distance, pt1, pt2));
    }
    result.push(ConstructionPoint::along(
        points[last],
        distances[last],
        points[last - 1],
        points[last],
    ));
    result
}

/// Offsets `points` to both sides, with `distances[i]` as the half-width at `points[i]`. There
/// must be exactly one distance per point.
///
/// Offset points are placed on the normal at each construction point (see [`Sampling`]). Then,
/// walking along the left side, a point is swapped with the matching right point when the left
/// piece leading to it crosses the centerline and the swap puts it on the same side of travel as
/// the left points before it. This keeps the ribbon from folding over itself at sharp bends. A
/// chord cutting across the inside of a corner crosses the centerline without either point being
/// on the wrong side, so the crossing alone doesn't decide.
///
/// Fewer than 2 points, or two consecutive identical points, give empty output. The units of
/// `points` and `distances` must agree; nothing here projects.
pub fn offset_curve(points: &[Coord], distances: &[f64], sampling: Sampling) -> OffsetLines {
    assert_eq!(
        points.len(),
        distances.len(),
        "need one distance per centerline point"
    );
    if points.len() < 2 {
        return OffsetLines::default();
    }
    if let Some(idx) = (1..points.len()).find(|i| points[*i - 1] == points[*i]) {
        debug!("Not offsetting centerline with repeated point at {idx}");
        return OffsetLines::default();
    }

    let construction = match sampling {
        Sampling::Vertices => vertex_construction(points, distances),
        Sampling::Midpoints => midpoint_construction(points, distances),
    };

    let (mut left, mut right): (Vec<Coord>, Vec<Coord>) =
        construction.iter().map(|c| c.offset_pair()).unzip();

    let centerline = LineString::new(points.to_vec());
    // Which side of travel the left points are on, once any of them has non-zero width
    let mut left_side = construction[0].side_of(left[0]);
    for i in 1..left.len() {
        if crosses_interior(Line::new(left[i - 1], left[i]), &centerline) {
            let swapped_side = construction[i].side_of(right[i]);
            if left_side == 0 || swapped_side == left_side {
                std::mem::swap(&mut left[i], &mut right[i]);
            }
        }
        if left_side == 0 {
            left_side = construction[i].side_of(left[i]);
        }
    }

    OffsetLines { left, right }
}
