//! Server-side HTML generation.
//!
//! Pages are self-contained documents assembled with `format!`: embedded
//! CSS, an inline Leaflet map, and an inline SVG chart. No template engine,
//! no client-side state beyond the map widget.

pub mod chart;
pub mod map;
pub mod page;
