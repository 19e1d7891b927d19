//! Portal configuration.
//!
//! One TOML file drives both portals: storage locations, the HTTP listener,
//! and the table of dashboard views. Each view entry captures what the
//! legacy per-page scripts hard-coded (dataset path, name column, metric
//! subset, alias table, overlay layers, map framing), so page variants are
//! configuration rather than copied code.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DashError, Result};
use crate::metrics::AliasTable;
use crate::viz::colormap::ColorRamp;

/// Gradient choice for a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RampKind {
    /// Diverging green-to-red (favorable to warning).
    #[default]
    GreenToRed,
    /// Warm yellow-to-dark-red single-hue ramp.
    Ylorrd,
}

impl RampKind {
    pub fn ramp(&self) -> ColorRamp {
        match self {
            RampKind::GreenToRed => ColorRamp::green_to_red(),
            RampKind::Ylorrd => ColorRamp::ylorrd(),
        }
    }
}

/// A point or polygon layer drawn on top of the choropleth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Layer name shown in the map's layer control.
    pub name: String,

    /// File path relative to the data directory.
    pub file: String,

    /// Column used for marker tooltips.
    #[serde(default)]
    pub label_column: Option<String>,
}

/// One configured dashboard view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// URL path segment identifying the view.
    pub slug: String,

    pub title_fr: String,

    #[serde(default)]
    pub title_ar: Option<String>,

    /// Primary polygon dataset, relative to the data directory.
    pub dataset: String,

    /// Column holding the region display name.
    #[serde(default = "default_name_column")]
    pub name_column: String,

    /// Catalog codes selectable in this view; empty means the whole catalog.
    #[serde(default)]
    pub codes: Vec<String>,

    /// Column synonym table for this view's dataset family.
    #[serde(default)]
    pub aliases: AliasTable,

    #[serde(default)]
    pub overlays: Vec<OverlayConfig>,

    #[serde(default)]
    pub ramp: RampKind,

    /// Map framing: [lat, lng].
    #[serde(default = "default_center")]
    pub center: [f64; 2],

    #[serde(default = "default_zoom")]
    pub zoom: u8,

    /// Wire map clicks to region selection.
    #[serde(default = "default_true")]
    pub click_select: bool,
}

fn default_name_column() -> String {
    "commune_fr".to_string()
}

fn default_center() -> [f64; 2] {
    [34.95, -3.39]
}

fn default_zoom() -> u8 {
    9
}

fn default_true() -> bool {
    true
}

impl ViewConfig {
    pub fn title(&self, arabic: bool) -> &str {
        if arabic {
            self.title_ar.as_deref().unwrap_or(&self.title_fr)
        } else {
            &self.title_fr
        }
    }
}

/// Top-level portal configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Directory holding geospatial and tabular inputs.
    pub data_dir: PathBuf,

    /// SQLite database file for accounts and facilities.
    #[serde(default = "default_database")]
    pub database: PathBuf,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Metric catalog CSV, relative to the data directory.
    #[serde(default = "default_catalog_file")]
    pub catalog_file: String,

    /// Reference means CSV, relative to the data directory.
    #[serde(default = "default_means_file")]
    pub means_file: String,

    #[serde(default, rename = "view")]
    pub views: Vec<ViewConfig>,
}

fn default_database() -> PathBuf {
    PathBuf::from("geodash.db")
}

fn default_port() -> u16 {
    3080
}

fn default_catalog_file() -> String {
    "social_codes.csv".to_string()
}

fn default_means_file() -> String {
    "reference_means.csv".to_string()
}

impl PortalConfig {
    /// Load from a TOML file, then apply `GEODASH_*` environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| DashError::ConfigInvalid {
            key: "file".to_string(),
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut config: PortalConfig =
            toml::from_str(&content).map_err(|e| DashError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("failed to parse TOML: {}", e),
            })?;

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Environment overrides, highest precedence.
    fn apply_env(&mut self) {
        if let Ok(dir) = env::var("GEODASH_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Ok(db) = env::var("GEODASH_DATABASE") {
            self.database = PathBuf::from(db);
        }
        if let Ok(port_str) = env::var("GEODASH_PORT") {
            match port_str.parse::<u16>() {
                Ok(port) => self.port = port,
                Err(_) => tracing::warn!(
                    "Invalid GEODASH_PORT value '{}': expected integer port",
                    port_str
                ),
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.views.is_empty() {
            return Err(DashError::ConfigMissing { key: "view".to_string() });
        }
        for view in &self.views {
            if view.slug.is_empty() {
                return Err(DashError::ConfigInvalid {
                    key: "view.slug".to_string(),
                    reason: "empty slug".to_string(),
                });
            }
        }
        let mut slugs: Vec<&str> = self.views.iter().map(|v| v.slug.as_str()).collect();
        slugs.sort_unstable();
        slugs.dedup();
        if slugs.len() != self.views.len() {
            return Err(DashError::ConfigInvalid {
                key: "view.slug".to_string(),
                reason: "duplicate view slugs".to_string(),
            });
        }
        Ok(())
    }

    pub fn data_path(&self, relative: &str) -> PathBuf {
        self.data_dir.join(relative)
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.data_path(&self.catalog_file)
    }

    pub fn means_path(&self) -> PathBuf {
        self.data_path(&self.means_file)
    }

    pub fn view(&self, slug: &str) -> Result<&ViewConfig> {
        self.views
            .iter()
            .find(|v| v.slug == slug)
            .ok_or_else(|| DashError::ViewNotFound { slug: slug.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
data_dir = "shared_data"
database = "db/portal.db"
port = 8090

[[view]]
slug = "social"
title_fr = "Indices sociaux par commune"
title_ar = "المؤشرات الاجتماعية"
dataset = "geojson_files/ct_driouch.geojson"
ramp = "ylorrd"

[view.aliases]
case_insensitive = true
[view.aliases.aliases]
"001" = ["IND_001", "ind_001"]

[[view.overlays]]
name = "Douars"
file = "geojson_files/douars.geojson"
label_column = "Douar"

[[view]]
slug = "education"
title_fr = "Éducation"
dataset = "geojson_files/educ_commune.geojson"
codes = ["010", "011"]
zoom = 10
"#;

    fn write_sample() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_full_config() {
        let file = write_sample();
        let config = PortalConfig::load(file.path()).unwrap();

        assert_eq!(config.port, 8090);
        assert_eq!(config.views.len(), 2);

        let social = config.view("social").unwrap();
        assert_eq!(social.ramp, RampKind::Ylorrd);
        assert!(social.aliases.case_insensitive);
        assert_eq!(social.overlays.len(), 1);
        assert_eq!(social.center, [34.95, -3.39]);
        assert!(social.click_select);
        assert_eq!(social.title(true), "المؤشرات الاجتماعية");

        let educ = config.view("education").unwrap();
        assert_eq!(educ.codes, vec!["010", "011"]);
        assert_eq!(educ.zoom, 10);
        assert_eq!(educ.ramp, RampKind::GreenToRed);
        // no Arabic title configured: French is the fallback
        assert_eq!(educ.title(true), "Éducation");
    }

    #[test]
    fn test_unknown_view_is_error() {
        let file = write_sample();
        let config = PortalConfig::load(file.path()).unwrap();
        assert!(matches!(
            config.view("routes"),
            Err(DashError::ViewNotFound { .. })
        ));
    }

    #[test]
    fn test_config_without_views_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"data_dir = \"data\"\n").unwrap();
        assert!(matches!(
            PortalConfig::load(file.path()),
            Err(DashError::ConfigMissing { .. })
        ));
    }

    #[test]
    fn test_duplicate_slugs_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"
data_dir = "data"
[[view]]
slug = "a"
title_fr = "A"
dataset = "a.geojson"
[[view]]
slug = "a"
title_fr = "A bis"
dataset = "b.geojson"
"#,
        )
        .unwrap();
        assert!(matches!(
            PortalConfig::load(file.path()),
            Err(DashError::ConfigInvalid { .. })
        ));
    }
}
