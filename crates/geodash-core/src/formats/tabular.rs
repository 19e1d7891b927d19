//! CSV readers for the metric catalog and the reference means.
//!
//! Expected catalog columns: `code`, `signification_fr`, `signification_ar`,
//! optional `groupe`, optional `direction` (favorable_high/unfavorable_high).
//! Expected means columns: `code`, then any of `moy_prov`, `moy_reg`,
//! `moy_nat`. Codes are zero-padded on read.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{DashError, Result};
use crate::models::metric::MeanLevels;
use crate::models::{Direction, MetricCatalog, MetricCode, MetricInfo, ReferenceMeans};

/// Read the metric catalog from a CSV file.
pub fn read_metric_catalog(path: &Path) -> Result<MetricCatalog> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| catalog_invalid(path, format!("cannot open: {}", e)))?;

    let headers = reader
        .headers()
        .map_err(|e| catalog_invalid(path, format!("missing header row: {}", e)))?
        .clone();

    let idx = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

    let code_idx =
        idx("code").ok_or_else(|| catalog_invalid(path, "missing 'code' column".to_string()))?;
    let fr_idx = idx("signification_fr")
        .ok_or_else(|| catalog_invalid(path, "missing 'signification_fr' column".to_string()))?;
    let ar_idx = idx("signification_ar");
    let group_idx = idx("groupe");
    let direction_idx = idx("direction");

    let mut entries = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record =
            record.map_err(|e| catalog_invalid(path, format!("row {}: {}", line + 2, e)))?;

        let raw_code = record.get(code_idx).unwrap_or_default();
        if raw_code.is_empty() {
            continue;
        }

        let label_fr = record.get(fr_idx).unwrap_or_default().to_string();
        let label_ar = ar_idx
            .and_then(|i| record.get(i))
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| label_fr.clone());

        let direction = match direction_idx.and_then(|i| record.get(i)) {
            Some(raw) if !raw.is_empty() => parse_direction(raw)
                .ok_or_else(|| catalog_invalid(path, format!("row {}: unknown direction '{}'", line + 2, raw)))?,
            _ => Direction::default(),
        };

        entries.push(MetricInfo {
            code: MetricCode::new(raw_code),
            label_fr,
            label_ar,
            group: group_idx
                .and_then(|i| record.get(i))
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            direction,
        });
    }

    if entries.is_empty() {
        return Err(catalog_invalid(path, "catalog has no entries".to_string()));
    }

    Ok(MetricCatalog::new(entries))
}

/// Read the reference means from a CSV file. Metrics absent from the file
/// simply have no reference lines; non-numeric cells coerce to absent.
pub fn read_reference_means(path: &Path) -> Result<ReferenceMeans> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| catalog_invalid(path, format!("cannot open: {}", e)))?;

    let headers = reader
        .headers()
        .map_err(|e| catalog_invalid(path, format!("missing header row: {}", e)))?
        .clone();

    let idx = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

    let code_idx =
        idx("code").ok_or_else(|| catalog_invalid(path, "missing 'code' column".to_string()))?;
    let prov_idx = idx("moy_prov");
    let reg_idx = idx("moy_reg");
    let nat_idx = idx("moy_nat");

    let cell = |record: &csv::StringRecord, i: Option<usize>| -> Option<f64> {
        i.and_then(|i| record.get(i))
            .and_then(|s| s.trim().replace(',', ".").parse::<f64>().ok())
            .filter(|v| v.is_finite())
    };

    let mut by_code = HashMap::new();
    for record in reader.records() {
        let record = record.map_err(|e| catalog_invalid(path, e.to_string()))?;
        let raw_code = record.get(code_idx).unwrap_or_default();
        if raw_code.is_empty() {
            continue;
        }

        by_code.insert(
            MetricCode::new(raw_code),
            MeanLevels {
                provincial: cell(&record, prov_idx),
                regional: cell(&record, reg_idx),
                national: cell(&record, nat_idx),
            },
        );
    }

    Ok(ReferenceMeans::new(by_code))
}

fn parse_direction(raw: &str) -> Option<Direction> {
    match raw.to_lowercase().as_str() {
        "favorable_high" | "favorable" => Some(Direction::FavorableHigh),
        "unfavorable_high" | "unfavorable" => Some(Direction::UnfavorableHigh),
        _ => None,
    }
}

fn catalog_invalid(path: &Path, reason: String) -> DashError {
    DashError::CatalogInvalid { path: path.to_path_buf(), reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_read_catalog_pads_codes() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("social_codes.csv");
        fs::write(
            &path,
            "code,signification_fr,signification_ar,groupe,direction\n\
             1,Taux de pauvreté,معدل الفقر,social,unfavorable_high\n\
             12,Accès à l'eau potable,الماء الصالح للشرب,aep,favorable_high\n",
        )
        .unwrap();

        let catalog = read_metric_catalog(&path).unwrap();
        assert_eq!(catalog.len(), 2);

        let poverty = catalog.get(&MetricCode::new("001")).unwrap();
        assert_eq!(poverty.label_fr, "Taux de pauvreté");
        assert_eq!(poverty.direction, Direction::UnfavorableHigh);

        let water = catalog.get(&MetricCode::new("012")).unwrap();
        assert_eq!(water.direction, Direction::FavorableHigh);
    }

    #[test]
    fn test_catalog_direction_defaults_to_unfavorable_high() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("codes.csv");
        fs::write(&path, "code,signification_fr\n005,Analphabétisme\n").unwrap();

        let catalog = read_metric_catalog(&path).unwrap();
        assert_eq!(
            catalog.direction(&MetricCode::new("005")),
            Direction::UnfavorableHigh
        );
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("codes.csv");
        fs::write(&path, "code,signification_fr\n").unwrap();

        assert!(matches!(
            read_metric_catalog(&path),
            Err(DashError::CatalogInvalid { .. })
        ));
    }

    #[test]
    fn test_read_means_with_gaps() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("reference_means.csv");
        fs::write(
            &path,
            "code,moy_prov,moy_reg,moy_nat\n\
             001,10.2,11.5,13.1\n\
             002,,8.0,\n\
             003,n/a,,5.5\n",
        )
        .unwrap();

        let means = read_reference_means(&path).unwrap();

        let m1 = means.get(&MetricCode::new("001"));
        assert_eq!(m1.provincial, Some(10.2));
        assert_eq!(m1.regional, Some(11.5));
        assert_eq!(m1.national, Some(13.1));

        let m2 = means.get(&MetricCode::new("002"));
        assert_eq!(m2.provincial, None);
        assert_eq!(m2.regional, Some(8.0));

        // non-numeric cell coerces to absent
        let m3 = means.get(&MetricCode::new("003"));
        assert_eq!(m3.provincial, None);
        assert_eq!(m3.national, Some(5.5));

        // uncataloged code has no means at all
        let m9 = means.get(&MetricCode::new("999"));
        assert_eq!(m9.national, None);
    }
}
