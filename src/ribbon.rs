use std::str::FromStr;

use anyhow::{bail, Result};
use geo::{Area, BooleanOps, Coord, LineString, MultiPolygon, Polygon};
use log::debug;

use crate::circle::circle_polygon;
use crate::offset_curve::{offset_curve, OffsetLines, Sampling};
use crate::Degenerate;

// Relative to the squared perimeter
const AREA_EPSILON: f64 = 1e-12;

/// How density is turned into width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WidthStyle {
    /// No polygon; the centerline itself is stroked with a variable width.
    #[default]
    Boxed,
    /// Fills `y ± width` (or `x ± width`, whichever axis the segment mostly doesn't run along).
    /// Cheap, but only an approximation for diagonal or curvy roads.
    #[cfg_attr(feature = "serde", serde(alias = "calligraphy"))]
    PerpendicularFill,
    /// A true variable-width offset on both sides of the centerline.
    Equidistant,
}

impl FromStr for WidthStyle {
    type Err = anyhow::Error;

    fn from_str(x: &str) -> Result<Self> {
        match x {
            "boxed" => Ok(WidthStyle::Boxed),
            "perpendicular_fill" | "calligraphy" => Ok(WidthStyle::PerpendicularFill),
            "equidistant" => Ok(WidthStyle::Equidistant),
            _ => bail!("unknown width style {x}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RibbonOptions {
    pub sampling: Sampling,
    /// How many edges approximate each round ending
    pub circle_segments: usize,
}

impl Default for RibbonOptions {
    fn default() -> Self {
        Self {
            sampling: Sampling::Vertices,
            circle_segments: 32,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Ribbon {
    /// Don't fill anything; stroke each piece of the centerline with the given full width. There's
    /// one width per pair of consecutive centerline points.
    Stroke { widths: Vec<f64>, round_caps: bool },
    /// Round endings (if any) come first, then the body.
    Polygons(Vec<Polygon>),
}

impl Ribbon {
    pub fn polygons(&self) -> &[Polygon] {
        match self {
            Ribbon::Stroke { .. } => &[],
            Ribbon::Polygons(polygons) => polygons,
        }
    }

    /// Merges the body with its endings.
    pub fn union(&self) -> MultiPolygon {
        union_all(self.polygons())
    }
}

pub fn union_all(polygons: &[Polygon]) -> MultiPolygon {
    let mut result = MultiPolygon::new(Vec::new());
    for polygon in polygons {
        result = result.union(polygon);
    }
    result
}

pub(crate) fn validate_centerline(pts: &[Coord]) -> Result<(), Degenerate> {
    if pts.len() < 2 {
        return Err(Degenerate::TooFewPoints(pts.len()));
    }
    if let Some(idx) = (1..pts.len()).find(|i| pts[*i - 1] == pts[*i]) {
        return Err(Degenerate::RepeatedPoint(idx));
    }
    Ok(())
}

/// Builds the shape representing `centerline` with a half-width of `widths[i]` at each point,
/// using default [`RibbonOptions`].
pub fn build_ribbon(
    centerline: &LineString,
    widths: &[f64],
    style: WidthStyle,
    round_edges: bool,
) -> Result<Ribbon, Degenerate> {
    build_ribbon_with(
        centerline,
        widths,
        style,
        round_edges,
        &RibbonOptions::default(),
    )
}

/// Like [`build_ribbon`], with control over sampling and round endings.
///
/// Panics if `widths` doesn't have one entry per centerline point. A geometric style with no
/// width anywhere produces `Degenerate::ZeroWidth` rather than a zero-area shape.
pub fn build_ribbon_with(
    centerline: &LineString,
    widths: &[f64],
    style: WidthStyle,
    round_edges: bool,
    options: &RibbonOptions,
) -> Result<Ribbon, Degenerate> {
    let pts = &centerline.0;
    validate_centerline(pts)?;
    assert_eq!(
        pts.len(),
        widths.len(),
        "need one half-width per centerline point"
    );

    if style != WidthStyle::Boxed && widths.iter().all(|w| *w <= 0.0) {
        return Err(Degenerate::ZeroWidth);
    }

    let body = match style {
        WidthStyle::Boxed => {
            return Ok(Ribbon::Stroke {
                widths: stroke_widths(widths),
                round_caps: round_edges,
            });
        }
        WidthStyle::PerpendicularFill => perpendicular_fill(pts, widths),
        WidthStyle::Equidistant => assemble_polygon(&offset_curve(pts, widths, options.sampling)),
    };

    let mut polygons = Vec::new();
    if round_edges {
        let last = pts.len() - 1;
        polygons.extend(circle_polygon(pts[0], widths[0], options.circle_segments));
        polygons.extend(circle_polygon(
            pts[last],
            widths[last],
            options.circle_segments,
        ));
    }
    if is_valid_polygon(&body) {
        polygons.push(body);
    } else {
        debug!("Dropping zero-area ribbon body for {style:?}");
    }

    if polygons.is_empty() {
        return Err(Degenerate::ZeroWidth);
    }
    Ok(Ribbon::Polygons(polygons))
}

/// Full stroke width per centerline piece, averaging the half-widths at both ends.
fn stroke_widths(widths: &[f64]) -> Vec<f64> {
    widths.windows(2).map(|pair| pair[0] + pair[1]).collect()
}

/// Make a polygon by gluing the left side to the reversed right side.
pub fn assemble_polygon(offset: &OffsetLines) -> Polygon {
    let mut pts = offset.left.clone();
    pts.extend(offset.right.iter().rev());
    Polygon::new(LineString(pts), Vec::new())
}

/// Shifts every point by its width along a single axis, perpendicular to the axis the segment
/// mostly runs along (judged from the first and last points).
pub fn perpendicular_fill(pts: &[Coord], widths: &[f64]) -> Polygon {
    assert_eq!(pts.len(), widths.len());
    assert!(!pts.is_empty(), "can't fill around an empty centerline");
    let (first, last) = (pts[0], pts[pts.len() - 1]);
    let mostly_horizontal = (first.x - last.x).abs() > (first.y - last.y).abs();
    let shift = |pt: &Coord, width: f64| {
        if mostly_horizontal {
            Coord {
                x: pt.x,
                y: pt.y + width,
            }
        } else {
            Coord {
                x: pt.x + width,
                y: pt.y,
            }
        }
    };

    let mut ring: Vec<Coord> = pts.iter().zip(widths).map(|(pt, w)| shift(pt, *w)).collect();
    ring.extend(pts.iter().zip(widths).rev().map(|(pt, w)| shift(pt, -*w)));
    Polygon::new(LineString(ring), Vec::new())
}

/// At least 3 distinct points enclosing some area.
pub fn is_valid_polygon(polygon: &Polygon) -> bool {
    let mut pts = polygon.exterior().0.clone();
    pts.dedup();
    if pts.len() > 1 && pts.first() == pts.last() {
        pts.pop();
    }
    if pts.len() < 3 {
        return false;
    }
    let perimeter: f64 = polygon
        .exterior()
        .lines()
        .map(|line| line.dx().hypot(line.dy()))
        .sum();
    polygon.unsigned_area() > AREA_EPSILON * perimeter * perimeter
}
