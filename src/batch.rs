use geo::{Line, LineString, Polygon};
use log::{debug, info};

use crate::ribbon::validate_centerline;
use crate::width_profile::resample;
use crate::{build_ribbon_with, Degenerate, Ribbon, RibbonConfig, WidthStyle, ZoomLevel};

/// One road segment to draw, with density sampled anywhere along it. A single density applies to
/// the whole segment; two are the start and end; more get spread evenly over the points.
#[derive(Clone, Debug, PartialEq)]
pub struct RoadSegment {
    pub centerline: LineString,
    pub densities: Vec<f64>,
    /// The OSM highway type, used for filtering by zoom level. Untagged segments always show.
    pub highway: Option<String>,
}

impl RoadSegment {
    pub fn new(centerline: LineString, densities: Vec<f64>) -> Self {
        Self {
            centerline,
            densities,
            highway: None,
        }
    }

    pub fn from_to(centerline: LineString, density_from: f64, density_to: f64) -> Self {
        Self::new(centerline, vec![density_from, density_to])
    }

    pub fn with_highway(mut self, highway: impl Into<String>) -> Self {
        self.highway = Some(highway.into());
        self
    }
}

/// Everything needed to draw one segment. The centerline is split into pieces, each colored by
/// its own density.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentRender {
    /// Index into the input segments
    pub index: usize,
    pub pieces: Vec<Line>,
    pub piece_densities: Vec<f64>,
    pub line_widths: Vec<f64>,
    pub round_caps: bool,
    pub polygons: Vec<Polygon>,
    /// Not shown at the current zoom level, so just a thin line
    pub hidden: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderBatch {
    pub segments: Vec<SegmentRender>,
    /// Input index and why that segment produced nothing
    pub skipped: Vec<(usize, Degenerate)>,
    pub total: usize,
}

/// Turns every segment into drawable geometry. Degenerate segments are skipped and reported, never
/// fatal.
pub fn render_segments(
    segments: &[RoadSegment],
    config: &RibbonConfig,
    zoom: Option<ZoomLevel>,
) -> RenderBatch {
    let mut batch = RenderBatch {
        total: segments.len(),
        ..Default::default()
    };
    for (idx, segment) in segments.iter().enumerate() {
        match render_segment(idx, segment, config, zoom) {
            Ok(render) => batch.segments.push(render),
            Err(err) => {
                debug!("Skipping segment {idx}: {err}");
                batch.skipped.push((idx, err));
            }
        }
    }
    if !batch.skipped.is_empty() {
        info!(
            "Skipped {} of {} segments",
            batch.skipped.len(),
            batch.total
        );
    }
    batch
}

fn render_segment(
    index: usize,
    segment: &RoadSegment,
    config: &RibbonConfig,
    zoom: Option<ZoomLevel>,
) -> Result<SegmentRender, Degenerate> {
    let pts = &segment.centerline.0;
    validate_centerline(pts)?;
    if segment.densities.is_empty() {
        return Err(Degenerate::NoDensities);
    }

    let point_densities = resample(&segment.densities, pts.len());
    let piece_densities: Vec<f64> = point_densities
        .windows(2)
        .map(|pair| (pair[0] + pair[1]) / 2.0)
        .collect();
    let hidden = match (zoom, &segment.highway) {
        (Some(zoom), Some(highway)) => !zoom.shows(highway),
        _ => false,
    };

    let mut render = SegmentRender {
        index,
        pieces: segment.centerline.lines().collect(),
        line_widths: vec![config.line_width; piece_densities.len()],
        piece_densities,
        round_caps: config.round_edges,
        polygons: Vec::new(),
        hidden,
    };
    if hidden {
        render.line_widths.fill(config.hidden_line_width);
        return Ok(render);
    }

    // Strokes stay in width units; anything geometric has to match the centerline
    let scale = if config.style == WidthStyle::Boxed {
        1.0
    } else {
        config.map_units_per_half_width_unit
    };
    let widths: Vec<f64> = config
        .width
        .compute(&point_densities)
        .into_iter()
        .map(|w| w * scale)
        .collect();

    match build_ribbon_with(
        &segment.centerline,
        &widths,
        config.style,
        config.round_edges,
        &config.ribbon_options(),
    ) {
        Ok(Ribbon::Stroke { widths, .. }) => {
            for (line_width, extra) in render.line_widths.iter_mut().zip(widths) {
                *line_width += extra;
            }
        }
        Ok(Ribbon::Polygons(polygons)) => {
            render.polygons = polygons;
        }
        // Still worth drawing the colored line
        Err(Degenerate::ZeroWidth) => {}
        Err(err) => return Err(err),
    }
    Ok(render)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use geo::line_string;

    fn equidistant_config() -> RibbonConfig {
        RibbonConfig {
            style: WidthStyle::Equidistant,
            round_edges: false,
            width: crate::WidthRange::new(0.0, 10.0, 2.0),
            ..Default::default()
        }
    }

    fn sample_segments() -> Vec<RoadSegment> {
        vec![
            RoadSegment::from_to(line_string![(x: 0., y: 0.), (x: 10., y: 0.)], 0.0, 10.0),
            RoadSegment::new(
                line_string![(x: 0., y: 0.), (x: 5., y: 0.), (x: 5., y: 5.)],
                vec![4.0],
            ),
            RoadSegment::new(line_string![(x: 1., y: 1.)], vec![3.0]),
            RoadSegment::new(line_string![(x: 0., y: 0.), (x: 1., y: 0.)], Vec::new()),
            RoadSegment::from_to(line_string![(x: 0., y: 0.), (x: 0., y: 8.)], 0.0, 0.0),
        ]
    }

    #[test]
    fn test_skips_are_counted() {
        let batch = render_segments(&sample_segments(), &equidistant_config(), None);
        assert_eq!(batch.total, 5);
        assert_eq!(
            batch.skipped,
            vec![
                (2, Degenerate::TooFewPoints(1)),
                (3, Degenerate::NoDensities)
            ]
        );
        let indices: Vec<usize> = batch.segments.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 4]);

        // Zero density still draws the line, just without a ribbon
        let flat = &batch.segments[2];
        assert_eq!(flat.pieces.len(), 1);
        assert!(flat.polygons.is_empty());
    }

    #[test]
    fn test_wedge_segment() {
        let batch = render_segments(&sample_segments()[..1], &equidistant_config(), None);
        let render = &batch.segments[0];
        assert_eq!(render.piece_densities, vec![5.0]);
        assert_eq!(render.line_widths, vec![3.0]);
        assert_eq!(render.polygons.len(), 1);
        assert_abs_diff_eq!(
            geo::Area::unsigned_area(&render.polygons[0]),
            20.0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_map_units() {
        let config = RibbonConfig {
            map_units_per_half_width_unit: 0.5,
            ..equidistant_config()
        };
        let batch = render_segments(&sample_segments()[..1], &config, None);
        assert_abs_diff_eq!(
            geo::Area::unsigned_area(&batch.segments[0].polygons[0]),
            10.0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_boxed_strokes() {
        let config = RibbonConfig {
            style: WidthStyle::Boxed,
            line_width: 2.0,
            // Doesn't apply to strokes
            map_units_per_half_width_unit: 0.001,
            ..equidistant_config()
        };
        let segment = RoadSegment::new(
            line_string![(x: 0., y: 0.), (x: 1., y: 0.), (x: 2., y: 0.)],
            vec![0.0, 10.0],
        );
        let batch = render_segments(&[segment], &config, None);
        let render = &batch.segments[0];
        assert!(render.polygons.is_empty());
        assert_eq!(render.piece_densities, vec![2.5, 7.5]);
        // Half-widths are 0, 1, 2
        assert_eq!(render.line_widths, vec![3.0, 5.0]);
    }

    #[test]
    fn test_zoom_filter() {
        let config = RibbonConfig {
            hidden_line_width: 0.5,
            ..equidistant_config()
        };
        let segments = vec![
            RoadSegment::from_to(line_string![(x: 0., y: 0.), (x: 10., y: 0.)], 5.0, 5.0)
                .with_highway("residential"),
            RoadSegment::from_to(line_string![(x: 0., y: 5.), (x: 10., y: 5.)], 5.0, 5.0)
                .with_highway("motorway"),
            RoadSegment::from_to(line_string![(x: 0., y: 9.), (x: 10., y: 9.)], 5.0, 5.0),
        ];
        let batch = render_segments(&segments, &config, Some(ZoomLevel::One));
        assert_eq!(batch.segments.len(), 3);

        let residential = &batch.segments[0];
        assert!(residential.hidden);
        assert!(residential.polygons.is_empty());
        assert_eq!(residential.line_widths, vec![0.5]);

        assert!(!batch.segments[1].hidden);
        assert_eq!(batch.segments[1].polygons.len(), 1);
        assert!(!batch.segments[2].hidden);

        // Without a zoom level, nothing is filtered
        let batch = render_segments(&segments, &config, None);
        assert!(batch.segments.iter().all(|s| !s.hidden));
    }

    #[test]
    fn test_deterministic_across_threads() {
        let segments = sample_segments();
        let config = RibbonConfig {
            round_edges: true,
            ..equidistant_config()
        };
        let expected = render_segments(&segments, &config, None);
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| render_segments(&segments, &config, None)))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
