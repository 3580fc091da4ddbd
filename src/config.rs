use anyhow::{bail, Result};

use crate::{DensityRange, RibbonOptions, Sampling, WidthRange, WidthStyle};

/// Everything that controls how a batch of road segments is drawn.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RibbonConfig {
    /// Scope of the color gradient
    pub color: DensityRange,
    /// Scope of the width change. `max_half_width` is in abstract width units.
    pub width: WidthRange,
    /// Converts width units into the units of the centerline coordinates. For lon/lat input, this
    /// is something small like 0.001.
    pub map_units_per_half_width_unit: f64,
    pub style: WidthStyle,
    /// Add circles at both ends of geometric ribbons, or round caps for strokes
    pub round_edges: bool,
    pub sampling: Sampling,
    pub circle_segments: usize,
    /// Stroke width of the colored centerline pieces. For `WidthStyle::Boxed`, the ribbon width is
    /// added on top of this.
    pub line_width: f64,
    /// Stroke width of segments hidden at the current zoom level
    pub hidden_line_width: f64,
}

impl Default for RibbonConfig {
    fn default() -> Self {
        Self {
            color: DensityRange::default(),
            width: WidthRange::default(),
            map_units_per_half_width_unit: 1.0,
            style: WidthStyle::default(),
            round_edges: true,
            sampling: Sampling::default(),
            circle_segments: 32,
            line_width: 3.0,
            hidden_line_width: 1.0,
        }
    }
}

impl RibbonConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.map_units_per_half_width_unit > 0.0) {
            bail!(
                "map_units_per_half_width_unit must be positive, not {}",
                self.map_units_per_half_width_unit
            );
        }
        if !(self.width.max_half_width >= 0.0) {
            bail!(
                "max_half_width can't be negative: {}",
                self.width.max_half_width
            );
        }
        if self.circle_segments < 3 {
            bail!("circles need at least 3 segments, not {}", self.circle_segments);
        }
        if self.line_width < 0.0 || self.hidden_line_width < 0.0 {
            bail!("line widths can't be negative");
        }
        Ok(())
    }

    pub fn ribbon_options(&self) -> RibbonOptions {
        RibbonOptions {
            sampling: self.sampling,
            circle_segments: self.circle_segments,
        }
    }

    /// Parses and validates a config. Missing fields take their default value.
    #[cfg(feature = "serde")]
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }
}
