//! Per-session context and dataset memoization.
//!
//! Datasets are read-only after load, so each session memoizes layers by
//! path for its lifetime with no eviction. The context is passed explicitly
//! to view assembly; nothing here is process-global.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::error::Result;
use crate::formats::geojson::read_layer;
use crate::models::{RegionDataset, Role};

/// Load-once cache of geographic layers, keyed by path.
///
/// `RwLock::unwrap()` is intentional here, as in the in-memory stores: lock
/// poisoning only follows a panic while holding the lock.
#[derive(Debug, Default)]
pub struct DatasetCache {
    layers: RwLock<HashMap<PathBuf, Arc<RegionDataset>>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached layer, loading it on first access.
    pub fn get_or_load(&self, path: &Path) -> Result<Arc<RegionDataset>> {
        if let Some(layer) = self.layers.read().unwrap().get(path) {
            return Ok(Arc::clone(layer));
        }

        let layer = Arc::new(read_layer(path)?);

        let mut layers = self.layers.write().unwrap();
        // A concurrent request may have loaded the same path; keep the first.
        let entry = layers.entry(path.to_path_buf()).or_insert(layer);
        Ok(Arc::clone(entry))
    }

    pub fn len(&self) -> usize {
        self.layers.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An authenticated session: who is logged in, plus their dataset cache.
#[derive(Debug)]
pub struct SessionContext {
    pub username: String,
    pub role: Role,
    pub cache: DatasetCache,
}

impl SessionContext {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self { username: username.into(), role, cache: DatasetCache::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const POINT_LAYER: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [0.0, 0.0]}, "properties": {"Douar": "A"}}
        ]
    }"#;

    #[test]
    fn test_loads_once_per_session() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("douars.geojson");
        fs::write(&path, POINT_LAYER).unwrap();

        let cache = DatasetCache::new();
        let first = cache.get_or_load(&path).unwrap();

        // Removing the file proves the second access is served from memory.
        fs::remove_file(&path).unwrap();
        let second = cache.get_or_load(&path).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_missing_layer_error_is_not_cached() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("late.geojson");

        let cache = DatasetCache::new();
        assert!(cache.get_or_load(&path).is_err());
        assert!(cache.is_empty());

        // The layer appearing later loads normally.
        fs::write(&path, POINT_LAYER).unwrap();
        assert!(cache.get_or_load(&path).is_ok());
    }

    #[test]
    fn test_distinct_paths_cached_separately() {
        let temp_dir = tempfile::tempdir().unwrap();
        let a = temp_dir.path().join("a.geojson");
        let b = temp_dir.path().join("b.geojson");
        fs::write(&a, POINT_LAYER).unwrap();
        fs::write(&b, POINT_LAYER).unwrap();

        let cache = DatasetCache::new();
        cache.get_or_load(&a).unwrap();
        cache.get_or_load(&b).unwrap();
        assert_eq!(cache.len(), 2);
    }
}
