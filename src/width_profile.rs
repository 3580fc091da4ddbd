/// Maps density onto a half-width. Densities at or below `min_density` get no width, at or above
/// `max_density` get `max_half_width`, and everything in between is linear.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WidthRange {
    pub min_density: f64,
    pub max_density: f64,
    pub max_half_width: f64,
}

impl WidthRange {
    pub fn new(min_density: f64, max_density: f64, max_half_width: f64) -> Self {
        Self {
            min_density,
            max_density,
            max_half_width,
        }
    }

    pub fn half_width(&self, density: f64) -> f64 {
        // Missing measurements come through as NaN
        if !density.is_finite() {
            return 0.0;
        }
        // An empty range becomes a step at min_density
        if self.max_density <= self.min_density {
            return if density < self.min_density {
                0.0
            } else {
                self.max_half_width
            };
        }
        let pct = ((density - self.min_density) / (self.max_density - self.min_density))
            .clamp(0.0, 1.0);
        pct * self.max_half_width
    }

    pub fn compute(&self, densities: &[f64]) -> Vec<f64> {
        densities.iter().map(|d| self.half_width(*d)).collect()
    }
}

impl Default for WidthRange {
    fn default() -> Self {
        Self::new(10.0, 50.0, 1.0)
    }
}

/// The scope of the color gradient. Densities are normalized into [0, 1] before a colormap is
/// applied by the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DensityRange {
    pub min: f64,
    pub max: f64,
}

impl DensityRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn normalize(&self, density: f64) -> f64 {
        if self.max <= self.min {
            return if density < self.min { 0.0 } else { 1.0 };
        }
        ((density - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }
}

impl Default for DensityRange {
    fn default() -> Self {
        Self::new(1.0, 10.0)
    }
}

/// Linearly maps every density onto `[0, max_half_width]`, clamping outside
/// `[min_density, max_density]`. The output has the same length as the input.
pub fn compute_widths(
    densities: &[f64],
    min_density: f64,
    max_density: f64,
    max_half_width: f64,
) -> Vec<f64> {
    WidthRange::new(min_density, max_density, max_half_width).compute(densities)
}

/// Spreads `from` and `to` across `n` points. Index 0 is `from`, index `n - 1` is `to`.
pub fn distribute(from: f64, to: f64, n: usize) -> Vec<f64> {
    resample(&[from, to], n)
}

/// Stretches a list of values over `n` points, keeping the first and last value at the ends and
/// interpolating linearly in between. Empty input gives empty output.
pub fn resample(values: &[f64], n: usize) -> Vec<f64> {
    if values.is_empty() || n == 0 {
        return Vec::new();
    }
    if n == 1 || values.len() == 1 {
        return vec![values[0]; n];
    }

    let last = values.len() - 1;
    (0..n)
        .map(|i| {
            let pos = (i as f64) * (last as f64) / ((n - 1) as f64);
            let lo = (pos.floor() as usize).min(last);
            let hi = (lo + 1).min(last);
            let frac = pos - lo as f64;
            values[lo] + (values[hi] - values[lo]) * frac
        })
        .collect()
}
