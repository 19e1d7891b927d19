//! GeoJSON layer reader.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{DashError, Result};
use crate::models::{Geometry, RegionDataset, RegionFeature};

/// Read a GeoJSON file into a `RegionDataset`.
///
/// A missing file maps to `DatasetNotFound` and a malformed one to
/// `LayerUnreadable`, so callers can decide whether the layer is required
/// for the page or silently omitted.
pub fn read_layer(path: &Path) -> Result<RegionDataset> {
    if !path.exists() {
        return Err(DashError::DatasetNotFound { path: path.to_path_buf() });
    }

    let content = fs::read_to_string(path)?;

    let geojson: geojson::GeoJson = content.parse().map_err(|e| DashError::LayerUnreadable {
        path: path.to_path_buf(),
        reason: format!("invalid GeoJSON: {}", e),
    })?;

    let features = extract_features(&geojson)?;

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed")
        .to_string();

    tracing::debug!(layer = %name, features = features.len(), "Loaded GeoJSON layer");

    Ok(RegionDataset { name, path: path.to_path_buf(), features })
}

fn extract_features(geojson: &geojson::GeoJson) -> Result<Vec<RegionFeature>> {
    match geojson {
        geojson::GeoJson::FeatureCollection(fc) => Ok(fc
            .features
            .iter()
            .enumerate()
            .map(|(idx, feature)| convert_feature(feature, idx))
            .collect()),
        geojson::GeoJson::Feature(feature) => Ok(vec![convert_feature(feature, 0)]),
        geojson::GeoJson::Geometry(geom) => {
            let geometry_json = serde_json::to_value(geom)
                .map_err(|e| DashError::Serialization(format!("geometry: {}", e)))?;
            Ok(vec![RegionFeature {
                id: "0".to_string(),
                geometry: Geometry::from_geojson(&geometry_json),
                properties: HashMap::new(),
            }])
        }
    }
}

fn convert_feature(feature: &geojson::Feature, idx: usize) -> RegionFeature {
    let id = feature
        .id
        .as_ref()
        .map(|id| match id {
            geojson::feature::Id::String(s) => s.clone(),
            geojson::feature::Id::Number(n) => n.to_string(),
        })
        .unwrap_or_else(|| idx.to_string());

    let geometry = feature
        .geometry
        .as_ref()
        .and_then(|geom| serde_json::to_value(geom).ok())
        .and_then(|value| Geometry::from_geojson(&value));

    let properties = feature
        .properties
        .as_ref()
        .map(|props| props.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default();

    RegionFeature { id, geometry, properties }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_feature_collection() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("communes.geojson");

        let content = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "id": "drh-01",
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
                    },
                    "properties": {"commune_fr": "Driouch", "Population": 12000}
                }
            ]
        }"#;
        fs::write(&file_path, content).unwrap();

        let dataset = read_layer(&file_path).unwrap();
        assert_eq!(dataset.name, "communes");
        assert_eq!(dataset.features.len(), 1);
        assert_eq!(dataset.features[0].id, "drh-01");
        assert_eq!(dataset.features[0].text("commune_fr"), "Driouch");
        assert_eq!(dataset.features[0].numeric("Population"), Some(12000.0));
        assert!(dataset.features[0].geometry.as_ref().unwrap().is_areal());
    }

    #[test]
    fn test_missing_file_is_dataset_not_found() {
        let err = read_layer(Path::new("/nonexistent/layer.geojson")).unwrap_err();
        assert!(matches!(err, DashError::DatasetNotFound { .. }));
    }

    #[test]
    fn test_malformed_file_is_layer_unreadable() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("bad.geojson");
        fs::write(&file_path, "not valid json").unwrap();

        let err = read_layer(&file_path).unwrap_err();
        assert!(matches!(err, DashError::LayerUnreadable { .. }));
    }

    #[test]
    fn test_feature_without_id_uses_index() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("pts.geojson");

        let content = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}, "properties": {}},
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [3.0, 4.0]}, "properties": {}}
            ]
        }"#;
        fs::write(&file_path, content).unwrap();

        let dataset = read_layer(&file_path).unwrap();
        assert_eq!(dataset.features[0].id, "0");
        assert_eq!(dataset.features[1].id, "1");
    }
}
