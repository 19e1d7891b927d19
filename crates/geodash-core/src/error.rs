//! Error types for GeoDash

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashError {
    // Dataset errors
    #[error("Dataset not found at {path}")]
    DatasetNotFound { path: PathBuf },

    #[error("Failed to read layer {path}: {reason}")]
    LayerUnreadable { path: PathBuf, reason: String },

    #[error("View not found: {slug}")]
    ViewNotFound { slug: String },

    // Metric resolution errors
    #[error("No configured metric resolves to a column of dataset '{dataset}'")]
    NoMetricsResolved { dataset: String },

    #[error("Metric catalog invalid at {path}: {reason}")]
    CatalogInvalid { path: PathBuf, reason: String },

    // Store errors
    #[error("Username already exists: {username}")]
    DuplicateUser { username: String },

    #[error("Facility already exists: {name} ({commune})")]
    DuplicateFacility { name: String, commune: String },

    #[error("Storage error: {0}")]
    Storage(String),

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, DashError>;
