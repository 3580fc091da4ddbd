use geo::LineString;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};

use crate::ribbon::union_all;
use crate::{RenderBatch, RibbonConfig};

fn feature(value: Value) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: None,
        foreign_members: None,
    }
}

impl RenderBatch {
    /// Hands the batch to a renderer: every colored centerline piece becomes a LineString, and
    /// every ribbon a Polygon, or a MultiPolygon when it has round endings merged in.
    pub fn to_geojson(&self, config: &RibbonConfig) -> FeatureCollection {
        let mut features = Vec::new();
        for segment in &self.segments {
            for ((piece, density), line_width) in segment
                .pieces
                .iter()
                .zip(&segment.piece_densities)
                .zip(&segment.line_widths)
            {
                let mut f = feature(Value::from(&LineString::from(*piece)));
                f.set_property("kind", "piece");
                f.set_property("segment", segment.index);
                f.set_property("density", *density);
                f.set_property("color_scalar", config.color.normalize(*density));
                f.set_property("stroke-width", *line_width);
                f.set_property("round_caps", segment.round_caps);
                f.set_property("hidden", segment.hidden);
                features.push(f);
            }

            if segment.polygons.is_empty() {
                continue;
            }
            let value = if segment.polygons.len() == 1 {
                Value::from(&segment.polygons[0])
            } else {
                Value::from(&union_all(&segment.polygons))
            };
            let density = segment.piece_densities.iter().sum::<f64>()
                / segment.piece_densities.len() as f64;
            let mut f = feature(value);
            f.set_property("kind", "ribbon");
            f.set_property("segment", segment.index);
            f.set_property("density", density);
            f.set_property("color_scalar", config.color.normalize(density));
            features.push(f);
        }

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }

    pub fn to_geojson_string(&self, config: &RibbonConfig) -> String {
        GeoJson::from(self.to_geojson(config)).to_string()
    }
}
