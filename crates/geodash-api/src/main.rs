use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use geodash_core::config::PortalConfig;
use geodash_core::formats::{read_metric_catalog, read_reference_means};
use geodash_core::models::{ReferenceMeans, Role};
use geodash_core::session::SessionContext;
use geodash_core::view::DashboardView;
use geodash_store::sqlite::SqliteStore;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use geodash_api::router::create_router;
use geodash_api::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geodash_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = env::var("GEODASH_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("geodash.toml"));

    let portal = match PortalConfig::load(&config_path) {
        Ok(portal) => portal,
        Err(e) => {
            tracing::error!(path = %config_path.display(), error = %e, "Configuration failed to load");
            std::process::exit(1);
        }
    };

    let catalog = match read_metric_catalog(&portal.catalog_path()) {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!(error = %e, "Metric catalog failed to load");
            tracing::error!(
                "Remediation:\n\
                1. Check that the data directory exists\n\
                2. Verify {} is a CSV with 'code' and 'signification_fr' columns",
                portal.catalog_path().display()
            );
            std::process::exit(1);
        }
    };

    // Reference means are optional: charts simply render without the lines.
    let means = match read_reference_means(&portal.means_path()) {
        Ok(means) => means,
        Err(e) => {
            tracing::warn!(error = %e, "Reference means unavailable, charts render without them");
            ReferenceMeans::default()
        }
    };

    // Startup diagnostic: every configured view must load its dataset and
    // resolve at least one metric before the server accepts traffic.
    let boot_session = SessionContext::new("startup-check", Role::Admin);
    match DashboardView::resolve_all(&portal, &catalog, &boot_session) {
        Ok(views) => {
            for view in &views {
                tracing::info!(
                    view = %view.config.slug,
                    metrics = view.metrics.available.len(),
                    unresolved = view.metrics.unresolved.len(),
                    "View resolved"
                );
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "View validation failed");
            tracing::error!(
                "Remediation: run 'geodash doctor' for a per-view resolution report"
            );
            std::process::exit(1);
        }
    }

    let store = match SqliteStore::connect(&portal.database).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(error = %e, "Failed to open the database");
            std::process::exit(1);
        }
    };
    let store = Arc::new(store);

    let port = portal.port;
    let state = Arc::new(AppState::new(
        portal,
        catalog,
        means,
        store.clone(),
        store,
    ));

    let app = create_router(state).layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.unwrap();
}
