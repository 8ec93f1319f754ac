/// Fill for shapes that could not be joined to a data row.
pub const NEUTRAL_FILL: &str = "#cccccc";

/// Two-endpoint RGB interpolation scheme.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ColorScheme {
    pub low: [u8; 3],
    pub high: [u8; 3],
}

/// Blue gradient for the depression-rate layer: light (#deebf7) → dark (#08519c).
pub const BLUES: ColorScheme = ColorScheme { low: [0xde, 0xeb, 0xf7], high: [0x08, 0x51, 0x9c] };

/// Red gradient for the needs-index layer: light (#fee0d2) → dark (#99000d).
pub const REDS: ColorScheme = ColorScheme { low: [0xfe, 0xe0, 0xd2], high: [0x99, 0x00, 0x0d] };

/// A pure value → hex-color mapping over a numeric domain. Swappable at
/// runtime (depression domain vs. needs-index domain) without touching the
/// entities it colors.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorRamp {
    pub min: f64,
    pub max: f64,
    pub scheme: ColorScheme,
}

impl ColorRamp {
    pub fn new(min: f64, max: f64, scheme: ColorScheme) -> Self {
        Self { min, max, scheme }
    }

    /// Build a ramp spanning the min/max of `values`. Empty input falls back
    /// to a unit domain.
    pub fn from_values(values: impl IntoIterator<Item = f64>, scheme: ColorScheme) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values {
            min = min.min(v);
            max = max.max(v);
        }
        if min > max {
            (min, max) = (0.0, 1.0);
        }
        Self { min, max, scheme }
    }

    /// Map a value to a hex color, clamped to the domain. A degenerate
    /// domain (max <= min) maps everything to the low end.
    pub fn color(&self, value: f64) -> String {
        let range = if self.max > self.min { self.max - self.min } else { 1.0 };
        let t = ((value - self.min) / range).clamp(0.0, 1.0);

        let lerp = |a: u8, b: u8| -> u8 {
            (a as f64 + (b as f64 - a as f64) * t)
                .round()
                .clamp(0.0, 255.0) as u8
        };

        let r = lerp(self.scheme.low[0], self.scheme.high[0]);
        let g = lerp(self.scheme.low[1], self.scheme.high[1]);
        let b = lerp(self.scheme.low[2], self.scheme.high[2]);
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

#[cfg(test)]
mod tests {
    use super::{BLUES, ColorRamp, REDS};

    #[test]
    fn endpoints_match_the_scheme() {
        let ramp = ColorRamp::new(0.0, 100.0, BLUES);
        assert_eq!(ramp.color(0.0), "#deebf7");
        assert_eq!(ramp.color(100.0), "#08519c");
    }

    #[test]
    fn out_of_domain_values_clamp() {
        let ramp = ColorRamp::new(10.0, 20.0, REDS);
        assert_eq!(ramp.color(-5.0), ramp.color(10.0));
        assert_eq!(ramp.color(99.0), ramp.color(20.0));
    }

    #[test]
    fn degenerate_domain_maps_to_low_end() {
        let ramp = ColorRamp::new(7.0, 7.0, BLUES);
        assert_eq!(ramp.color(7.0), "#deebf7");
    }

    #[test]
    fn from_values_spans_the_data() {
        let ramp = ColorRamp::from_values([3.0, 9.0, 6.0], BLUES);
        assert_eq!(ramp.min, 3.0);
        assert_eq!(ramp.max, 9.0);

        let empty = ColorRamp::from_values([], BLUES);
        assert_eq!((empty.min, empty.max), (0.0, 1.0));
    }
}
