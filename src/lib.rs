//! Draws traffic density onto road centerlines: each segment becomes a colored line whose width
//! encodes density, either as a variable stroke or as a filled ribbon polygon around it.

mod batch;
mod circle;
mod config;
pub mod crossing;
mod error;
mod export;
mod offset_curve;
mod ribbon;
mod width_profile;
mod zoom;

pub use self::batch::{render_segments, RenderBatch, RoadSegment, SegmentRender};
pub use self::circle::circle_polygon;
pub use self::config::RibbonConfig;
pub use self::error::Degenerate;
pub use self::offset_curve::{offset_curve, OffsetLines, Sampling, HORIZONTAL_NORMAL_SLOPE};
pub use self::ribbon::{
    assemble_polygon, build_ribbon, build_ribbon_with, is_valid_polygon, perpendicular_fill,
    union_all, Ribbon, RibbonOptions, WidthStyle,
};
pub use self::width_profile::{compute_widths, distribute, resample, DensityRange, WidthRange};
pub use self::zoom::ZoomLevel;
