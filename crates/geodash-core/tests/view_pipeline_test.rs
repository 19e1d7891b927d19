//! End-to-end view pipeline: configuration, dataset loading, metric
//! resolution, and synchronized state assembly against fixture files.

use std::fs;
use std::path::Path;

use geodash_core::config::PortalConfig;
use geodash_core::formats::{read_metric_catalog, read_reference_means};
use geodash_core::models::{Lang, MetricCode, Role};
use geodash_core::session::SessionContext;
use geodash_core::view::DashboardView;
use geodash_core::viz::selection::SelectionState;
use geodash_core::DashError;

const COMMUNES: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "geometry": {"type": "Polygon", "coordinates": [[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]]]},
            "properties": {"commune_fr": "Midar", "IND_001": 12.5, "002": 40}
        },
        {
            "type": "Feature",
            "geometry": {"type": "Polygon", "coordinates": [[[20.0, 0.0], [30.0, 0.0], [30.0, 10.0], [20.0, 10.0], [20.0, 0.0]]]},
            "properties": {"commune_fr": "Driouch", "IND_001": "7,5", "002": null}
        }
    ]
}"#;

const DOUARS: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {"type": "Feature", "geometry": {"type": "Point", "coordinates": [5.0, 5.0]}, "properties": {"Douar": "Ait Ali"}}
    ]
}"#;

const CATALOG: &str = "code,signification_fr,signification_ar,direction\n\
                       1,Taux de pauvreté,معدل الفقر,unfavorable_high\n\
                       2,Accès à l'eau,الماء,favorable_high\n\
                       3,Analphabétisme,الأمية,unfavorable_high\n";

const MEANS: &str = "code,moy_prov,moy_reg,moy_nat\n001,9.0,10.0,11.0\n";

const CONFIG: &str = r#"
data_dir = "{DATA}"

[[view]]
slug = "social"
title_fr = "Indices sociaux"
dataset = "communes.geojson"

[view.aliases]
case_insensitive = false
[view.aliases.aliases]
"001" = ["IND_001"]

[[view.overlays]]
name = "Douars"
file = "douars.geojson"
label_column = "Douar"

[[view.overlays]]
name = "Puits"
file = "missing_puits.geojson"
"#;

fn write_fixtures(dir: &Path) -> PortalConfig {
    fs::write(dir.join("communes.geojson"), COMMUNES).unwrap();
    fs::write(dir.join("douars.geojson"), DOUARS).unwrap();
    fs::write(dir.join("social_codes.csv"), CATALOG).unwrap();
    fs::write(dir.join("reference_means.csv"), MEANS).unwrap();

    let config_path = dir.join("geodash.toml");
    fs::write(&config_path, CONFIG.replace("{DATA}", dir.to_str().unwrap())).unwrap();
    PortalConfig::load(&config_path).unwrap()
}

#[test]
fn resolves_views_and_assembles_synchronized_state() {
    let temp_dir = tempfile::tempdir().unwrap();
    let portal = write_fixtures(temp_dir.path());

    let catalog = read_metric_catalog(&portal.catalog_path()).unwrap();
    let means = read_reference_means(&portal.means_path()).unwrap();
    let session = SessionContext::new("aicha", Role::Client);

    let views = DashboardView::resolve_all(&portal, &catalog, &session).unwrap();
    assert_eq!(views.len(), 1);
    let view = &views[0];

    // 001 resolves through its alias, 002 directly; 003 has no column.
    let codes: Vec<&str> = view.metrics.available.iter().map(|m| m.code.as_str()).collect();
    assert_eq!(codes, vec!["001", "002"]);
    assert_eq!(view.metrics.unresolved, vec![MetricCode::new("003")]);

    let state = view.state(
        &portal,
        &means,
        &session,
        SelectionState::new(MetricCode::new("001")),
        Lang::Fr,
    );

    assert_eq!(state.metric_column, "IND_001");
    assert_eq!(state.metric_label, "Taux de pauvreté");
    assert_eq!(state.means.national, Some(11.0));

    // Map and chart share one scale: every row's color re-derives from it.
    for row in &state.choropleth.rows {
        assert_eq!(row.color, state.choropleth.scale.color_for(row.value));
    }

    // The comma-decimal string coerced instead of raising.
    let driouch = state.choropleth.rows.iter().find(|r| r.name == "Driouch").unwrap();
    assert_eq!(driouch.value, Some(7.5));

    // The missing overlay was omitted, the present one loaded.
    assert_eq!(state.overlays.len(), 1);
    assert_eq!(state.overlays[0].name, "Douars");

    // Click-to-select: inside Midar, between polygons, and far away.
    assert_eq!(view.select_at(5.0, 5.0), Some(0));
    assert_eq!(view.select_at(25.0, 5.0), Some(1));
    assert_eq!(view.select_at(15.0, 5.0), None);
}

#[test]
fn unresolved_requested_metric_falls_back_to_default() {
    let temp_dir = tempfile::tempdir().unwrap();
    let portal = write_fixtures(temp_dir.path());

    let catalog = read_metric_catalog(&portal.catalog_path()).unwrap();
    let means = read_reference_means(&portal.means_path()).unwrap();
    let session = SessionContext::new("aicha", Role::Client);

    let views = DashboardView::resolve_all(&portal, &catalog, &session).unwrap();
    let state = views[0].state(
        &portal,
        &means,
        &session,
        SelectionState::new(MetricCode::new("003")),
        Lang::Ar,
    );

    assert_eq!(state.metric, MetricCode::new("001"));
    assert_eq!(state.metric_label, "معدل الفقر");
}

#[test]
fn view_with_no_resolvable_metrics_fails_fast() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dir = temp_dir.path();

    fs::write(dir.join("bare.geojson"), r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "geometry": null, "properties": {"commune_fr": "X"}}
        ]
    }"#).unwrap();
    fs::write(dir.join("social_codes.csv"), CATALOG).unwrap();

    let config_path = dir.join("geodash.toml");
    fs::write(
        &config_path,
        format!(
            "data_dir = \"{}\"\n[[view]]\nslug = \"bare\"\ntitle_fr = \"Bare\"\ndataset = \"bare.geojson\"\n",
            dir.to_str().unwrap()
        ),
    )
    .unwrap();

    let portal = PortalConfig::load(&config_path).unwrap();
    let catalog = read_metric_catalog(&portal.catalog_path()).unwrap();
    let session = SessionContext::new("admin", Role::Admin);

    let err = DashboardView::resolve_all(&portal, &catalog, &session).unwrap_err();
    assert!(matches!(err, DashError::NoMetricsResolved { .. }));
}

#[test]
fn datasets_load_once_across_renders() {
    let temp_dir = tempfile::tempdir().unwrap();
    let portal = write_fixtures(temp_dir.path());

    let catalog = read_metric_catalog(&portal.catalog_path()).unwrap();
    let means = read_reference_means(&portal.means_path()).unwrap();
    let session = SessionContext::new("aicha", Role::Client);

    let views = DashboardView::resolve_all(&portal, &catalog, &session).unwrap();

    // Re-render with a different metric; the cache holds the commune layer
    // and the one readable overlay, nothing more.
    let _ = views[0].state(
        &portal,
        &means,
        &session,
        SelectionState::new(MetricCode::new("002")),
        Lang::Fr,
    );
    let _ = views[0].state(
        &portal,
        &means,
        &session,
        SelectionState::new(MetricCode::new("001")),
        Lang::Fr,
    );
    assert_eq!(session.cache.len(), 2);
}
