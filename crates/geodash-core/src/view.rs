//! Dashboard view assembly.
//!
//! `DashboardView::resolve` binds one configured view to its loaded dataset
//! and resolved metric set (failing fast when nothing resolves), and
//! `DashboardView::state` assembles the per-render `ViewState` that the map,
//! chart and table all consume: one fitted scale, one selection.

use std::sync::Arc;

use crate::config::{OverlayConfig, PortalConfig, ViewConfig};
use crate::error::Result;
use crate::metrics::{resolve_metrics, ResolvedMetrics};
use crate::models::metric::MeanLevels;
use crate::models::{Lang, MetricCatalog, MetricCode, RegionDataset, ReferenceMeans};
use crate::session::SessionContext;
use crate::viz::choropleth::Choropleth;
use crate::viz::selection::{RegionIndex, SelectionState};

/// A selectable metric in the page selector.
#[derive(Debug, Clone)]
pub struct MetricOption {
    pub code: MetricCode,
    pub label: String,
    pub selected: bool,
}

/// A loaded overlay layer.
#[derive(Debug, Clone)]
pub struct OverlayLayer {
    pub name: String,
    pub label_column: Option<String>,
    pub dataset: Arc<RegionDataset>,
}

/// One configured view bound to its data.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub config: ViewConfig,
    pub dataset: Arc<RegionDataset>,
    pub metrics: ResolvedMetrics,

    /// Catalog restricted to this view's configured codes.
    catalog: MetricCatalog,
}

impl DashboardView {
    /// Bind a configured view: load its dataset through the session cache
    /// and resolve the catalog against the dataset's columns. Errors here
    /// are startup diagnostics; a view that resolves no metrics never
    /// reaches rendering.
    pub fn resolve(
        portal: &PortalConfig,
        view: &ViewConfig,
        catalog: &MetricCatalog,
        session: &SessionContext,
    ) -> Result<Self> {
        let dataset = session.cache.get_or_load(&portal.data_path(&view.dataset))?;
        let catalog = restrict_catalog(catalog, &view.codes);
        let metrics = resolve_metrics(&catalog, &view.aliases, &dataset)?;

        Ok(Self { config: view.clone(), dataset, metrics, catalog })
    }

    /// Resolve every configured view, failing on the first startup problem.
    pub fn resolve_all(
        portal: &PortalConfig,
        catalog: &MetricCatalog,
        session: &SessionContext,
    ) -> Result<Vec<Self>> {
        portal
            .views
            .iter()
            .map(|view| Self::resolve(portal, view, catalog, session))
            .collect()
    }

    /// The metric rendered when the request names none, or names one this
    /// view cannot resolve.
    pub fn default_metric(&self) -> MetricCode {
        self.metrics
            .first()
            .map(|m| m.code.clone())
            .expect("resolve() guarantees at least one metric")
    }

    /// Clamp a requested selection to this view's resolved metrics.
    pub fn clamp_selection(&self, requested: Option<SelectionState>) -> SelectionState {
        match requested {
            Some(state) if self.metrics.contains(&state.metric) => state,
            Some(state) => {
                tracing::warn!(
                    view = %self.config.slug,
                    metric = %state.metric,
                    "Requested metric not resolved for view, falling back to default"
                );
                SelectionState::new(self.default_metric())
            }
            None => SelectionState::new(self.default_metric()),
        }
    }

    /// Assemble the synchronized render state for one page.
    pub fn state(
        &self,
        portal: &PortalConfig,
        means: &ReferenceMeans,
        session: &SessionContext,
        selection: SelectionState,
        lang: Lang,
    ) -> ViewState {
        let selection = self.clamp_selection(Some(selection));
        let column = self
            .metrics
            .column_for(&selection.metric)
            .expect("clamped selection always resolves")
            .to_string();

        let direction = self.catalog.direction(&selection.metric);
        let choropleth = Choropleth::bind(
            &self.dataset,
            &self.config.name_column,
            &column,
            direction,
            self.config.ramp.ramp(),
        );

        let metric_label = self
            .catalog
            .get(&selection.metric)
            .map(|info| info.label(lang).to_string())
            .unwrap_or_else(|| selection.metric.to_string());

        let selector = self
            .metrics
            .available
            .iter()
            .map(|m| MetricOption {
                code: m.code.clone(),
                label: self
                    .catalog
                    .get(&m.code)
                    .map(|info| info.label(lang).to_string())
                    .unwrap_or_else(|| m.code.to_string()),
                selected: m.code == selection.metric,
            })
            .collect();

        let overlays = load_overlays(portal, &self.config.overlays, session);

        ViewState {
            slug: self.config.slug.clone(),
            title: self.config.title(lang == Lang::Ar).to_string(),
            lang,
            metric: selection.metric.clone(),
            metric_label,
            metric_column: column,
            selector,
            dataset: Arc::clone(&self.dataset),
            choropleth,
            selected_region: selection.region,
            means: means.get(&selection.metric),
            overlays,
            center: self.config.center,
            zoom: self.config.zoom,
            click_select: self.config.click_select,
        }
    }

    /// Hit-test a map click against this view's regions.
    pub fn select_at(&self, lng: f64, lat: f64) -> Option<RegionIndex> {
        crate::viz::selection::hit_test(&self.dataset, lng, lat)
    }
}

/// Overlay loading: a missing or unreadable overlay is omitted from the
/// page with a warning, never a failed render.
fn load_overlays(
    portal: &PortalConfig,
    configs: &[OverlayConfig],
    session: &SessionContext,
) -> Vec<OverlayLayer> {
    configs
        .iter()
        .filter_map(|overlay| {
            match session.cache.get_or_load(&portal.data_path(&overlay.file)) {
                Ok(dataset) => Some(OverlayLayer {
                    name: overlay.name.clone(),
                    label_column: overlay.label_column.clone(),
                    dataset,
                }),
                Err(e) => {
                    tracing::warn!(layer = %overlay.name, error = %e, "Overlay omitted");
                    None
                }
            }
        })
        .collect()
}

fn restrict_catalog(catalog: &MetricCatalog, codes: &[String]) -> MetricCatalog {
    if codes.is_empty() {
        return catalog.clone();
    }
    let wanted: Vec<MetricCode> = codes.iter().map(|c| MetricCode::new(c)).collect();
    MetricCatalog::new(
        catalog
            .iter()
            .filter(|info| wanted.contains(&info.code))
            .cloned()
            .collect(),
    )
}

/// Everything one page render needs, derived from a single selection and a
/// single fitted scale so map and chart encodings cannot diverge.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub slug: String,
    pub title: String,
    pub lang: Lang,

    pub metric: MetricCode,
    pub metric_label: String,

    /// Dataset column backing the selected metric.
    pub metric_column: String,

    pub selector: Vec<MetricOption>,
    pub dataset: Arc<RegionDataset>,
    pub choropleth: Choropleth,
    pub selected_region: Option<RegionIndex>,
    pub means: MeanLevels,
    pub overlays: Vec<OverlayLayer>,

    /// Map framing: [lat, lng].
    pub center: [f64; 2],
    pub zoom: u8,
    pub click_select: bool,
}

impl ViewState {
    /// GeoJSON geometry for a choropleth row, if the feature has one.
    pub fn region_geometry(&self, index: RegionIndex) -> Option<serde_json::Value> {
        self.dataset
            .features
            .get(index)?
            .geometry
            .as_ref()
            .map(|g| g.to_geojson())
    }
}
