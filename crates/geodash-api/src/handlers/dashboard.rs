//! Client portal: view list, dashboard pages, and click-to-select.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};
use geodash_core::models::{Lang, MetricCode, Role};
use geodash_core::session::SessionContext;
use geodash_core::view::DashboardView;
use geodash_core::viz::SelectionState;
use serde::Deserialize;

use crate::error::ApiError;
use crate::handlers::auth::session_from_headers;
use crate::render::page;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub metric: Option<String>,
    pub lang: Option<String>,
    pub region: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SelectQuery {
    pub lng: f64,
    pub lat: f64,
    pub metric: Option<String>,
    pub lang: Option<String>,
}

fn parse_lang(raw: Option<&str>) -> Lang {
    match raw {
        Some("ar") => Lang::Ar,
        _ => Lang::Fr,
    }
}

/// The client portal admits clients only, mirroring the role gate of the
/// admin portal. No session redirects to the login page.
fn require_client(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Arc<SessionContext>, Response> {
    match session_from_headers(state, headers) {
        Some((_, session)) if session.role == Role::Client => Ok(session),
        Some(_) => Err(ApiError::forbidden("Réservé au portail client").into_response()),
        None => Err(Redirect::to("/").into_response()),
    }
}

pub async fn view_list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let session = match require_client(&state, &headers) {
        Ok(session) => session,
        Err(response) => return Ok(response),
    };

    Ok(Html(page::view_list_page(&session.username, &state.portal.views)).into_response())
}

pub async fn view_page(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<DashboardQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let session = match require_client(&state, &headers) {
        Ok(session) => session,
        Err(response) => return Ok(response),
    };

    let view_config = state.portal.view(&slug)?;
    let view = DashboardView::resolve(&state.portal, view_config, &state.catalog, &session)?;

    let selection = query
        .metric
        .as_deref()
        .map(|raw| SelectionState::with_region(MetricCode::new(raw), query.region));
    let selection = view.clamp_selection(selection);

    let view_state = view.state(
        &state.portal,
        &state.means,
        &session,
        selection,
        parse_lang(query.lang.as_deref()),
    );

    Ok(Html(page::dashboard_page(&session.username, &view_state)).into_response())
}

/// Resolve a map click to the containing region and reload the page with
/// that region highlighted; a miss reloads with no selection.
pub async fn select_region(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<SelectQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let session = match require_client(&state, &headers) {
        Ok(session) => session,
        Err(response) => return Ok(response),
    };

    let view_config = state.portal.view(&slug)?;
    let view = DashboardView::resolve(&state.portal, view_config, &state.catalog, &session)?;

    let metric = view
        .clamp_selection(query.metric.as_deref().map(|raw| {
            SelectionState::new(MetricCode::new(raw))
        }))
        .metric;

    let lang = query.lang.as_deref().unwrap_or("fr");
    let target = match view.select_at(query.lng, query.lat) {
        Some(region) => {
            tracing::debug!(view = %slug, region, "Map click resolved");
            format!("/dashboard/{}?metric={}&lang={}&region={}", slug, metric, lang, region)
        }
        None => format!("/dashboard/{}?metric={}&lang={}", slug, metric, lang),
    };

    Ok(Redirect::to(&target).into_response())
}
