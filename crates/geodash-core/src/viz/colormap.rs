//! Numeric-to-color mapping for choropleth layers.
//!
//! A `ColorScale` is fitted once per rendered page from the selected
//! metric's series and shared by the map and the chart, so both views
//! encode values identically. Nulls always map to the neutral sentinel;
//! a degenerate range (all values equal) yields a single-color map.

use serde::{Deserialize, Serialize};

use crate::models::Direction;

/// Fixed neutral color for missing values.
pub const NEUTRAL_COLOR: Color = Color { r: 0xcc, g: 0xcc, b: 0xcc };

/// An RGB display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` hex string.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear interpolation between two colors, `t` clamped to [0, 1].
    pub fn lerp(a: Color, b: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |x: u8, y: u8| -> u8 { (x as f64 + (y as f64 - x as f64) * t).round() as u8 };
        Color::rgb(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// An ordered gradient: index 0 is the favorable end, the last stop is the
/// warning end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorRamp {
    stops: Vec<Color>,
}

impl ColorRamp {
    /// Build a ramp from hex stops. Needs at least one stop.
    pub fn from_hex_stops(stops: &[&str]) -> Option<Self> {
        if stops.is_empty() {
            return None;
        }
        let parsed: Option<Vec<Color>> = stops.iter().map(|s| Color::from_hex(s)).collect();
        parsed.map(|stops| Self { stops })
    }

    /// Warm single-hue ramp (yellow to dark red), the default warning ramp.
    pub fn ylorrd() -> Self {
        Self::from_hex_stops(&[
            "#ffffcc", "#ffeda0", "#fed976", "#feb24c", "#fd8d3c", "#fc4e2a", "#e31a1c",
            "#bd0026", "#800026",
        ])
        .unwrap()
    }

    /// Diverging green-to-red ramp: favorable values green, warning values red.
    pub fn green_to_red() -> Self {
        Self::from_hex_stops(&[
            "#1a9850", "#66bd63", "#a6d96a", "#d9ef8b", "#fee08b", "#fdae61", "#f46d43",
            "#d73027",
        ])
        .unwrap()
    }

    /// Color at fraction `t` in [0, 1] along the ramp (1 = warning end),
    /// piecewise-linear between stops.
    pub fn sample(&self, t: f64) -> Color {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        if self.stops.len() == 1 {
            return self.stops[0];
        }
        let segments = (self.stops.len() - 1) as f64;
        let x = t * segments;
        let i = (x.floor() as usize).min(self.stops.len() - 2);
        let frac = x - i as f64;
        Color::lerp(self.stops[i], self.stops[i + 1], frac)
    }

    /// The favorable-end color, used for single-valued series.
    pub fn first(&self) -> Color {
        self.stops[0]
    }
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self::green_to_red()
    }
}

/// A fitted value-to-color mapping.
#[derive(Debug, Clone)]
pub struct ColorScale {
    ramp: ColorRamp,
    direction: Direction,

    /// (min, max) of the non-null values, None when the series had none.
    range: Option<(f64, f64)>,
}

impl ColorScale {
    /// Fit a scale to a series. Nulls are excluded from range computation;
    /// a series with no non-null values yields a scale that evaluates to
    /// the neutral color everywhere.
    pub fn fit<I>(values: I, direction: Direction, ramp: ColorRamp) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut range: Option<(f64, f64)> = None;
        for v in values.into_iter().flatten() {
            if !v.is_finite() {
                continue;
            }
            range = Some(match range {
                None => (v, v),
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
            });
        }
        Self { ramp, direction, range }
    }

    /// The fitted (min, max), if any value was numeric.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.range
    }

    /// Fraction of the way toward the warning end for a value, in [0, 1].
    ///
    /// A degenerate range (min == max) pins every value at 0 so the map is
    /// single-colored without dividing by zero.
    pub fn position(&self, value: f64) -> f64 {
        let Some((lo, hi)) = self.range else {
            return 0.0;
        };
        if hi == lo {
            return 0.0;
        }
        let t = ((value - lo) / (hi - lo)).clamp(0.0, 1.0);
        match self.direction {
            Direction::UnfavorableHigh => t,
            Direction::FavorableHigh => 1.0 - t,
        }
    }

    /// Color for a possibly-null value. Null, or any value when the series
    /// had no numeric data, maps to the neutral sentinel.
    pub fn color_for(&self, value: Option<f64>) -> Color {
        match (value, self.range) {
            (Some(v), Some(_)) if v.is_finite() => self.ramp.sample(self.position(v)),
            _ => NEUTRAL_COLOR,
        }
    }

    /// Evenly spaced legend stops from the favorable to the warning end of
    /// the fitted range. Empty when no data; a single stop for a degenerate
    /// range.
    pub fn legend(&self, steps: usize) -> Vec<(f64, Color)> {
        let Some((lo, hi)) = self.range else {
            return Vec::new();
        };
        if hi == lo || steps < 2 {
            return vec![(lo, self.ramp.first())];
        }
        (0..steps)
            .map(|i| {
                let v = lo + (hi - lo) * (i as f64 / (steps - 1) as f64);
                (v, self.color_for(Some(v)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fit(values: &[Option<f64>], direction: Direction) -> ColorScale {
        ColorScale::fit(values.iter().copied(), direction, ColorRamp::green_to_red())
    }

    #[test]
    fn test_null_maps_to_neutral() {
        let scale = fit(&[Some(1.0), Some(5.0), None], Direction::UnfavorableHigh);
        assert_eq!(scale.color_for(None), NEUTRAL_COLOR);
    }

    #[test]
    fn test_empty_series_is_all_neutral() {
        let scale = fit(&[None, None], Direction::UnfavorableHigh);
        assert_eq!(scale.range(), None);
        assert_eq!(scale.color_for(Some(3.0)), NEUTRAL_COLOR);
        assert_eq!(scale.color_for(None), NEUTRAL_COLOR);
        assert!(scale.legend(5).is_empty());
    }

    #[test]
    fn test_degenerate_range_is_single_color() {
        let scale = fit(&[Some(7.0), Some(7.0), None], Direction::UnfavorableHigh);
        assert_eq!(scale.range(), Some((7.0, 7.0)));

        let c = scale.color_for(Some(7.0));
        assert_eq!(c, ColorRamp::green_to_red().first());
        // evaluation away from the pinned value still does not error
        assert_eq!(scale.color_for(Some(100.0)), c);
        assert_eq!(scale.legend(5), vec![(7.0, c)]);
    }

    #[test]
    fn test_single_value_series() {
        let scale = fit(&[Some(42.0)], Direction::UnfavorableHigh);
        assert_eq!(scale.range(), Some((42.0, 42.0)));
        assert_ne!(scale.color_for(Some(42.0)), NEUTRAL_COLOR);
    }

    #[test]
    fn test_unfavorable_high_puts_max_toward_warning_end() {
        let scale = fit(&[Some(0.0), Some(10.0), Some(4.0)], Direction::UnfavorableHigh);
        assert!(scale.position(10.0) > scale.position(0.0));
        assert_eq!(scale.position(10.0), 1.0);
        assert_eq!(scale.position(0.0), 0.0);
    }

    #[test]
    fn test_favorable_high_reverses_orientation() {
        let scale = fit(&[Some(0.0), Some(10.0)], Direction::FavorableHigh);
        assert!(scale.position(0.0) > scale.position(10.0));
        assert_eq!(scale.position(10.0), 0.0);
    }

    #[test]
    fn test_directions_disagree_on_extremes() {
        let values = [Some(1.0), Some(2.0), Some(9.0)];
        let unfavorable = fit(&values, Direction::UnfavorableHigh);
        let favorable = fit(&values, Direction::FavorableHigh);
        assert_eq!(
            unfavorable.color_for(Some(9.0)),
            favorable.color_for(Some(1.0))
        );
    }

    #[test]
    fn test_hex_roundtrip() {
        let c = Color::from_hex("#d73027").unwrap();
        assert_eq!(c.to_hex(), "#d73027");
        assert_eq!(Color::from_hex("d73027"), None);
        assert_eq!(Color::from_hex("#xyzxyz"), None);
    }

    #[test]
    fn test_ramp_sample_endpoints() {
        let ramp = ColorRamp::ylorrd();
        assert_eq!(ramp.sample(0.0), Color::from_hex("#ffffcc").unwrap());
        assert_eq!(ramp.sample(1.0), Color::from_hex("#800026").unwrap());
    }

    proptest! {
        /// Evaluation never panics and always yields a color, whatever the
        /// series or probe value.
        #[test]
        fn prop_color_for_total(
            values in proptest::collection::vec(proptest::option::of(-1e9f64..1e9f64), 0..50),
            probe in proptest::option::of(-1e9f64..1e9f64),
        ) {
            let scale = ColorScale::fit(
                values.iter().copied(),
                Direction::UnfavorableHigh,
                ColorRamp::green_to_red(),
            );
            let _ = scale.color_for(probe);
        }

        /// Position is monotone toward the warning end for unfavorable-high.
        #[test]
        fn prop_position_ordering(lo in -1e6f64..1e6f64, delta in 1e-3f64..1e6f64) {
            let hi = lo + delta;
            let scale = ColorScale::fit(
                [Some(lo), Some(hi)],
                Direction::UnfavorableHigh,
                ColorRamp::green_to_red(),
            );
            prop_assert!(scale.position(hi) > scale.position(lo));
        }
    }
}
