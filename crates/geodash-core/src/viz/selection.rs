//! Cross-view selection state and map-click hit-testing.

use geo::algorithm::bounding_rect::BoundingRect;
use geo::algorithm::contains::Contains;
use rstar::{RTree, RTreeObject, AABB};
use serde::{Deserialize, Serialize};

use crate::models::{to_geo_geometry, MetricCode, RegionDataset};

/// Index of a feature within its dataset.
pub type RegionIndex = usize;

/// The selection shared by the map and the companion chart/table within one
/// page render. Both views derive their encoding from the same state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    pub metric: MetricCode,

    /// Region picked by clicking the map, if any.
    pub region: Option<RegionIndex>,
}

impl SelectionState {
    pub fn new(metric: MetricCode) -> Self {
        Self { metric, region: None }
    }

    pub fn with_region(metric: MetricCode, region: Option<RegionIndex>) -> Self {
        Self { metric, region }
    }
}

/// Feature envelope for the bounding-box pre-filter.
struct IndexedEnvelope {
    index: RegionIndex,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Resolve a geographic coordinate to the containing region polygon.
///
/// Candidates come from an R-tree over feature bounding boxes; the exact
/// test is polygon containment. Non-areal features never match. A point
/// outside every polygon is `None` ("no selection").
pub fn hit_test(dataset: &RegionDataset, lng: f64, lat: f64) -> Option<RegionIndex> {
    let geo_geoms: Vec<Option<geo::Geometry>> = dataset
        .features
        .iter()
        .map(|f| {
            f.geometry
                .as_ref()
                .filter(|g| g.is_areal())
                .map(to_geo_geometry)
        })
        .collect();

    let envelopes: Vec<IndexedEnvelope> = geo_geoms
        .iter()
        .enumerate()
        .filter_map(|(index, geom)| {
            let rect = geom.as_ref()?.bounding_rect()?;
            Some(IndexedEnvelope {
                index,
                envelope: AABB::from_corners(
                    [rect.min().x, rect.min().y],
                    [rect.max().x, rect.max().y],
                ),
            })
        })
        .collect();

    let tree = RTree::bulk_load(envelopes);
    let point = geo::Point::new(lng, lat);

    let mut candidates: Vec<RegionIndex> = tree
        .locate_in_envelope_intersecting(&AABB::from_point([lng, lat]))
        .map(|e| e.index)
        .collect();
    candidates.sort_unstable();

    candidates.into_iter().find(|&index| {
        geo_geoms[index]
            .as_ref()
            .map(|geom| geom.contains(&point))
            .unwrap_or(false)
    })
}
