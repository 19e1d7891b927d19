//! Batch resolution of a metric catalog against a dataset's columns.

use crate::error::{DashError, Result};
use crate::metrics::alias::AliasTable;
use crate::models::{MetricCatalog, MetricCode, RegionDataset};

/// One catalog metric resolved to an actual dataset column.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMetric {
    pub code: MetricCode,

    /// Column name as spelled in the dataset.
    pub column: String,
}

/// Outcome of resolving a catalog against one dataset.
#[derive(Debug, Clone, Default)]
pub struct ResolvedMetrics {
    /// Selectable metrics, in catalog order.
    pub available: Vec<ResolvedMetric>,

    /// Cataloged codes with no matching column in this dataset.
    pub unresolved: Vec<MetricCode>,
}

impl ResolvedMetrics {
    pub fn column_for(&self, code: &MetricCode) -> Option<&str> {
        self.available
            .iter()
            .find(|m| &m.code == code)
            .map(|m| m.column.as_str())
    }

    pub fn contains(&self, code: &MetricCode) -> bool {
        self.column_for(code).is_some()
    }

    /// First selectable metric, the page default.
    pub fn first(&self) -> Option<&ResolvedMetric> {
        self.available.first()
    }
}

/// Resolve every cataloged metric against the dataset's column set.
///
/// Unresolved metrics are excluded from the selectable set and logged;
/// when nothing resolves the caller gets `NoMetricsResolved` so the view
/// can fail fast at startup instead of rendering an empty selector.
pub fn resolve_metrics(
    catalog: &MetricCatalog,
    aliases: &AliasTable,
    dataset: &RegionDataset,
) -> Result<ResolvedMetrics> {
    let columns = dataset.columns();

    let mut resolved = ResolvedMetrics::default();
    for info in catalog.iter() {
        match aliases.resolve(info.code.as_str(), &columns) {
            Some(column) => resolved
                .available
                .push(ResolvedMetric { code: info.code.clone(), column }),
            None => resolved.unresolved.push(info.code.clone()),
        }
    }

    if !resolved.unresolved.is_empty() {
        tracing::warn!(
            dataset = %dataset.name,
            unresolved = ?resolved.unresolved.iter().map(|c| c.as_str()).collect::<Vec<_>>(),
            "Metrics excluded: no matching column"
        );
    }

    if resolved.available.is_empty() {
        return Err(DashError::NoMetricsResolved { dataset: dataset.name.clone() });
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, MetricInfo, RegionFeature};
    use serde_json::json;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn catalog(codes: &[&str]) -> MetricCatalog {
        MetricCatalog::new(
            codes
                .iter()
                .map(|c| MetricInfo {
                    code: MetricCode::new(c),
                    label_fr: format!("Indice {}", c),
                    label_ar: format!("مؤشر {}", c),
                    group: None,
                    direction: Direction::UnfavorableHigh,
                })
                .collect(),
        )
    }

    fn dataset(columns: &[&str]) -> RegionDataset {
        let properties: HashMap<String, serde_json::Value> =
            columns.iter().map(|c| (c.to_string(), json!(1.0))).collect();
        RegionDataset {
            name: "ct_driouch".to_string(),
            path: PathBuf::from("ct_driouch.geojson"),
            features: vec![RegionFeature {
                id: "0".to_string(),
                geometry: None,
                properties,
            }],
        }
    }

    #[test]
    fn test_resolution_keeps_catalog_order_and_excludes_missing() {
        let catalog = catalog(&["001", "002", "003"]);
        let dataset = dataset(&["commune_fr", "003", "001"]);
        let aliases = AliasTable::default();

        let resolved = resolve_metrics(&catalog, &aliases, &dataset).unwrap();

        let codes: Vec<&str> = resolved.available.iter().map(|m| m.code.as_str()).collect();
        assert_eq!(codes, vec!["001", "003"]);
        assert_eq!(resolved.unresolved, vec![MetricCode::new("002")]);
        assert_eq!(resolved.first().unwrap().code.as_str(), "001");
    }

    #[test]
    fn test_nothing_resolves_is_an_error() {
        let catalog = catalog(&["001", "002"]);
        let dataset = dataset(&["commune_fr", "Population"]);
        let aliases = AliasTable::default();

        let err = resolve_metrics(&catalog, &aliases, &dataset).unwrap_err();
        assert!(matches!(err, DashError::NoMetricsResolved { .. }));
    }

    #[test]
    fn test_alias_variant_resolves_to_dataset_spelling() {
        let catalog = catalog(&["001"]);
        let dataset = dataset(&["IND_001"]);
        let mut map = HashMap::new();
        map.insert("001".to_string(), vec!["IND_001".to_string()]);
        let aliases = AliasTable::new(map, false);

        let resolved = resolve_metrics(&catalog, &aliases, &dataset).unwrap();
        assert_eq!(resolved.column_for(&MetricCode::new("001")), Some("IND_001"));
    }
}
