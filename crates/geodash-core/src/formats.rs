//! Input file readers: GeoJSON layers and tabular reference files.

pub mod geojson;
pub mod tabular;

pub use geojson::read_layer;
pub use tabular::{read_metric_catalog, read_reference_means};
