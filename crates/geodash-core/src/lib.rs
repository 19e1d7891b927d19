//! GeoDash Core - Domain models, dataset loading, and the choropleth binding layer
//!
//! This crate contains the metric alias resolver, the colormap builder, the
//! cross-view selection state, and the per-session dataset cache shared by
//! both portals.

pub mod config;
pub mod error;
pub mod formats;
pub mod metrics;
pub mod models;
pub mod session;
pub mod view;
pub mod viz;

pub use error::{DashError, Result};
