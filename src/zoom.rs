const KM_PER_DEGREE: f64 = 111.0;
const INCHES_PER_KM: f64 = 39370.0787;

/// How far the map is zoomed out, which decides which road types are worth drawing with width.
/// Each level's scale denominator is the lower bound for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ZoomLevel {
    One,
    Two,
    Three,
    Four,
}

impl ZoomLevel {
    pub const ALL: [ZoomLevel; 4] = [
        ZoomLevel::One,
        ZoomLevel::Two,
        ZoomLevel::Three,
        ZoomLevel::Four,
    ];

    pub fn min_scale(self) -> f64 {
        match self {
            ZoomLevel::One => 320_000.0,
            ZoomLevel::Two => 161_000.0,
            ZoomLevel::Three => 40_000.0,
            ZoomLevel::Four => 0.0,
        }
    }

    /// `denominator` is the map scale, as in 1:denominator.
    pub fn from_scale(denominator: f64) -> ZoomLevel {
        Self::ALL
            .into_iter()
            .find(|level| denominator > level.min_scale())
            .unwrap_or(ZoomLevel::Four)
    }

    /// For a lon/lat view `span_degrees` wide, drawn into a window `window_width_inches` wide.
    pub fn from_extent(span_degrees: f64, window_width_inches: f64) -> ZoomLevel {
        Self::from_scale(span_degrees / window_width_inches * KM_PER_DEGREE * INCHES_PER_KM)
    }

    /// OSM highway types shown at this level. Zooming in only adds types.
    pub fn highway_types(self) -> Vec<&'static str> {
        let mut types = vec!["motorway", "motorway_link", "primary", "primary_link"];
        if self >= ZoomLevel::Two {
            types.extend(["secondary", "secondary_link"]);
        }
        if self >= ZoomLevel::Three {
            types.extend(["tertiary", "tertiary_link"]);
        }
        if self >= ZoomLevel::Four {
            types.extend(["unclassified", "residential"]);
        }
        types
    }

    pub fn shows(self, highway: &str) -> bool {
        self.highway_types().contains(&highway)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_scale() {
        assert_eq!(ZoomLevel::from_scale(1_000_000.0), ZoomLevel::One);
        assert_eq!(ZoomLevel::from_scale(200_000.0), ZoomLevel::Two);
        assert_eq!(ZoomLevel::from_scale(161_000.0), ZoomLevel::Three);
        assert_eq!(ZoomLevel::from_scale(5_000.0), ZoomLevel::Four);
        assert_eq!(ZoomLevel::from_scale(0.0), ZoomLevel::Four);
    }

    #[test]
    fn test_from_extent() {
        // A whole degree in a 10 inch window is roughly 1:437,000
        assert_eq!(ZoomLevel::from_extent(1.0, 10.0), ZoomLevel::One);
        assert_eq!(ZoomLevel::from_extent(0.01, 10.0), ZoomLevel::Four);
    }

    #[test]
    fn test_highway_types() {
        assert!(ZoomLevel::One.shows("motorway"));
        assert!(!ZoomLevel::One.shows("secondary"));
        assert!(ZoomLevel::Two.shows("secondary_link"));
        assert!(!ZoomLevel::Three.shows("residential"));
        assert!(ZoomLevel::Four.shows("residential"));
        assert!(ZoomLevel::Four.shows("tertiary"));
        for pair in ZoomLevel::ALL.windows(2) {
            let outer = pair[0].highway_types();
            let inner = pair[1].highway_types();
            assert!(outer.iter().all(|t| inner.contains(t)));
        }
    }
}
