//! Region dataset types.
//!
//! A `RegionDataset` is one loaded geographic layer: administrative polygons
//! (communes, provinces) or point overlays, each feature carrying a property
//! map of attribute columns. These types bridge GeoJSON serialization and
//! the computational `geo` crate types.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

/// GeoJSON-compatible geometry representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: [f64; 2],
    },
    LineString {
        coordinates: Vec<[f64; 2]>,
    },
    Polygon {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPoint {
        coordinates: Vec<[f64; 2]>,
    },
    MultiLineString {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
}

impl Geometry {
    pub fn point(x: f64, y: f64) -> Self {
        Geometry::Point { coordinates: [x, y] }
    }

    pub fn polygon(rings: Vec<Vec<[f64; 2]>>) -> Self {
        Geometry::Polygon { coordinates: rings }
    }

    /// Try to parse from a serde_json::Value (GeoJSON geometry object).
    pub fn from_geojson(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Convert to a serde_json::Value (GeoJSON geometry object).
    pub fn to_geojson(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// True for polygonal geometries that can contain a point.
    pub fn is_areal(&self) -> bool {
        matches!(self, Geometry::Polygon { .. } | Geometry::MultiPolygon { .. })
    }
}

/// Convert a canonical Geometry to a geo::Geometry for spatial algorithms.
pub fn to_geo_geometry(geom: &Geometry) -> geo::Geometry {
    fn ring(coords: &[[f64; 2]]) -> geo::LineString {
        geo::LineString::new(coords.iter().map(|c| geo::Coord { x: c[0], y: c[1] }).collect())
    }
    fn polygon(rings: &[Vec<[f64; 2]>]) -> geo::Polygon {
        if rings.is_empty() {
            geo::Polygon::new(geo::LineString::new(vec![]), vec![])
        } else {
            let exterior = ring(&rings[0]);
            let interiors = rings[1..].iter().map(|r| ring(r)).collect();
            geo::Polygon::new(exterior, interiors)
        }
    }

    match geom {
        Geometry::Point { coordinates } => {
            geo::Geometry::Point(geo::Point::new(coordinates[0], coordinates[1]))
        }
        Geometry::LineString { coordinates } => geo::Geometry::LineString(ring(coordinates)),
        Geometry::Polygon { coordinates } => geo::Geometry::Polygon(polygon(coordinates)),
        Geometry::MultiPoint { coordinates } => geo::Geometry::MultiPoint(geo::MultiPoint::new(
            coordinates.iter().map(|c| geo::Point::new(c[0], c[1])).collect(),
        )),
        Geometry::MultiLineString { coordinates } => geo::Geometry::MultiLineString(
            geo::MultiLineString::new(coordinates.iter().map(|l| ring(l)).collect()),
        ),
        Geometry::MultiPolygon { coordinates } => geo::Geometry::MultiPolygon(
            geo::MultiPolygon::new(coordinates.iter().map(|p| polygon(p)).collect()),
        ),
    }
}

/// One region or point feature with its attribute columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionFeature {
    pub id: String,
    pub geometry: Option<Geometry>,
    pub properties: HashMap<String, serde_json::Value>,
}

impl RegionFeature {
    /// Raw property lookup.
    pub fn property(&self, column: &str) -> Option<&serde_json::Value> {
        self.properties.get(column)
    }

    /// Property as a display string, empty when absent or null.
    pub fn text(&self, column: &str) -> String {
        match self.properties.get(column) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }

    /// Property coerced to a number. Strings holding numbers are parsed;
    /// anything else coerces to None rather than raising.
    pub fn numeric(&self, column: &str) -> Option<f64> {
        coerce_numeric(self.properties.get(column)?)
    }
}

/// Coerce a JSON value to a finite f64, mirroring a lenient numeric cast:
/// numbers pass through, numeric strings parse (accepting a decimal comma),
/// everything else is null.
pub fn coerce_numeric(value: &serde_json::Value) -> Option<f64> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// A loaded geographic layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionDataset {
    /// Layer name, derived from the file stem.
    pub name: String,

    /// Path the layer was loaded from.
    pub path: PathBuf,

    pub features: Vec<RegionFeature>,
}

impl RegionDataset {
    /// The union of attribute columns across all features.
    pub fn columns(&self) -> Vec<String> {
        let mut set = BTreeSet::new();
        for feature in &self.features {
            for key in feature.properties.keys() {
                set.insert(key.clone());
            }
        }
        set.into_iter().collect()
    }

    /// The column's value for every feature, coerced to numeric.
    pub fn numeric_series(&self, column: &str) -> Vec<Option<f64>> {
        self.features.iter().map(|f| f.numeric(column)).collect()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
