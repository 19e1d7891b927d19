//! Choropleth binding: one fitted scale applied to every region, producing
//! the rows both the map styling and the chart consume.

use serde::Serialize;

use crate::models::{Direction, RegionDataset};
use crate::viz::colormap::{Color, ColorRamp, ColorScale};
use crate::viz::selection::RegionIndex;

/// One region bound to the selected metric.
#[derive(Debug, Clone, Serialize)]
pub struct RegionRow {
    pub index: RegionIndex,

    /// Display name (from the configured name column).
    pub name: String,

    /// Metric value, None when missing or non-numeric.
    pub value: Option<f64>,

    /// Fill color under the shared scale.
    pub color: Color,
}

/// A legend entry: a representative value and its color.
#[derive(Debug, Clone, Serialize)]
pub struct LegendStop {
    pub value: f64,
    pub color: Color,
}

/// The bound layer: shared scale plus per-region rows.
#[derive(Debug, Clone)]
pub struct Choropleth {
    pub scale: ColorScale,
    pub rows: Vec<RegionRow>,
}

impl Choropleth {
    /// Bind a dataset's metric column to a freshly fitted scale.
    pub fn bind(
        dataset: &RegionDataset,
        name_column: &str,
        metric_column: &str,
        direction: Direction,
        ramp: ColorRamp,
    ) -> Self {
        let series = dataset.numeric_series(metric_column);
        let scale = ColorScale::fit(series.iter().copied(), direction, ramp);

        let rows = dataset
            .features
            .iter()
            .enumerate()
            .map(|(index, feature)| {
                let value = series[index];
                let name = match feature.text(name_column) {
                    s if s.is_empty() => feature.id.clone(),
                    s => s,
                };
                RegionRow { index, name, value, color: scale.color_for(value) }
            })
            .collect();

        Self { scale, rows }
    }

    /// Rows with a value, sorted descending. Chart and ranking order.
    pub fn ranked(&self) -> Vec<&RegionRow> {
        let mut rows: Vec<&RegionRow> = self.rows.iter().filter(|r| r.value.is_some()).collect();
        rows.sort_by(|a, b| {
            b.value
                .partial_cmp(&a.value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        rows
    }

    /// Top-`n` and bottom-`n` rows of the ranking, for the summary panel.
    pub fn top_bottom(&self, n: usize) -> (Vec<&RegionRow>, Vec<&RegionRow>) {
        let ranked = self.ranked();
        let top = ranked.iter().take(n).copied().collect();
        let bottom = ranked.iter().rev().take(n).copied().collect();
        (top, bottom)
    }

    pub fn legend(&self, steps: usize) -> Vec<LegendStop> {
        self.scale
            .legend(steps)
            .into_iter()
            .map(|(value, color)| LegendStop { value, color })
            .collect()
    }
}
