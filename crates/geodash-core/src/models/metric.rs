//! Metric catalog types: codes, labels, direction flags, and reference means.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fixed width of canonical metric codes. Shorter raw codes are zero-padded.
pub const METRIC_CODE_WIDTH: usize = 3;

/// Zero-padded fixed-width identifier for a social/economic indicator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetricCode(String);

impl MetricCode {
    /// Normalize a raw code: trim and left-pad with zeros to the fixed width.
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.len() >= METRIC_CODE_WIDTH {
            Self(trimmed.to_string())
        } else {
            Self(format!("{:0>width$}", trimmed, width = METRIC_CODE_WIDTH))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MetricCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether high values of a metric are socially favorable or unfavorable.
///
/// Controls gradient orientation: unfavorable-high metrics render large
/// values on the warning end of the ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    UnfavorableHigh,
    FavorableHigh,
}

/// Display language for labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Fr,
    Ar,
}

/// Catalog entry for one metric code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricInfo {
    pub code: MetricCode,

    /// French display label
    pub label_fr: String,

    /// Arabic display label
    pub label_ar: String,

    /// Thematic group, e.g. "sante" or "education"
    pub group: Option<String>,

    pub direction: Direction,
}

impl MetricInfo {
    pub fn label(&self, lang: Lang) -> &str {
        match lang {
            Lang::Fr => &self.label_fr,
            Lang::Ar => &self.label_ar,
        }
    }
}

/// Ordered catalog mapping canonical codes to labels and direction flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricCatalog {
    entries: Vec<MetricInfo>,
}

impl MetricCatalog {
    pub fn new(entries: Vec<MetricInfo>) -> Self {
        Self { entries }
    }

    pub fn get(&self, code: &MetricCode) -> Option<&MetricInfo> {
        self.entries.iter().find(|e| &e.code == code)
    }

    /// Entries in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &MetricInfo> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Direction for a code, falling back to the default when the code is
    /// not cataloged.
    pub fn direction(&self, code: &MetricCode) -> Direction {
        self.get(code).map(|e| e.direction).unwrap_or_default()
    }
}

/// Per-metric scalar aggregates at higher administrative levels, used as
/// reference lines on charts. Any level may be absent for a given metric.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MeanLevels {
    pub provincial: Option<f64>,
    pub regional: Option<f64>,
    pub national: Option<f64>,
}

/// Reference means keyed by metric code.
#[derive(Debug, Clone, Default)]
pub struct ReferenceMeans {
    by_code: HashMap<MetricCode, MeanLevels>,
}

impl ReferenceMeans {
    pub fn new(by_code: HashMap<MetricCode, MeanLevels>) -> Self {
        Self { by_code }
    }

    pub fn get(&self, code: &MetricCode) -> MeanLevels {
        self.by_code.get(code).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_zero_padding() {
        assert_eq!(MetricCode::new("7").as_str(), "007");
        assert_eq!(MetricCode::new("42").as_str(), "042");
        assert_eq!(MetricCode::new("123").as_str(), "123");
        assert_eq!(MetricCode::new(" 5 ").as_str(), "005");
    }

    #[test]
    fn test_code_wider_than_fixed_width_kept() {
        assert_eq!(MetricCode::new("1234").as_str(), "1234");
    }

    #[test]
    fn test_default_direction_is_unfavorable_high() {
        let catalog = MetricCatalog::default();
        assert_eq!(
            catalog.direction(&MetricCode::new("001")),
            Direction::UnfavorableHigh
        );
    }

    #[test]
    fn test_label_by_lang() {
        let info = MetricInfo {
            code: MetricCode::new("001"),
            label_fr: "Taux de pauvreté".to_string(),
            label_ar: "معدل الفقر".to_string(),
            group: None,
            direction: Direction::UnfavorableHigh,
        };
        assert_eq!(info.label(Lang::Fr), "Taux de pauvreté");
        assert_eq!(info.label(Lang::Ar), "معدل الفقر");
    }
}
