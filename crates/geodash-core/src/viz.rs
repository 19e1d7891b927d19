//! Visualization building blocks: colormaps, choropleth styling, and the
//! cross-view selection state.

pub mod choropleth;
pub mod colormap;
pub mod selection;

pub use choropleth::{Choropleth, LegendStop, RegionRow};
pub use colormap::{Color, ColorRamp, ColorScale, NEUTRAL_COLOR};
pub use selection::{hit_test, RegionIndex, SelectionState};
