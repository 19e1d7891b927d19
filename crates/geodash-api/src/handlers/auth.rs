//! Login, logout and session extraction.

use std::sync::Arc;

use axum::{
    extract::{Form, State},
    http::{header, HeaderMap, HeaderValue},
    response::{Html, IntoResponse, Redirect, Response},
};
use geodash_core::session::SessionContext;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::render::page;
use crate::state::{AppState, SESSION_COOKIE};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Pull the session out of the request's cookie header.
pub fn session_from_headers(
    state: &AppState,
    headers: &HeaderMap,
) -> Option<(Uuid, Arc<SessionContext>)> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    let raw_token = cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then_some(value)
    })?;
    let token = Uuid::parse_str(raw_token).ok()?;
    let context = state.session(token)?;
    Some((token, context))
}

/// Landing page: the login form, shared by both portals.
pub async fn login_form() -> Html<String> {
    Html(page::login_page(None))
}

/// Verify credentials and open a session. The role decides the portal:
/// admin/editor land on data entry, clients on the dashboards. Unknown
/// credentials re-render the form, never a 500.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let role = state
        .users
        .verify_user(&form.username, &form.password)
        .await
        .map_err(ApiError::from)?;

    let Some(role) = role else {
        tracing::warn!(username = %form.username, "Rejected login");
        return Ok(Html(page::login_page(Some(
            "Identifiants invalides ou non autorisés.",
        )))
        .into_response());
    };

    let token = state.create_session(&form.username, role);
    let target = if role.can_edit_data() { "/admin" } else { "/dashboard" };

    let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, token);
    let mut response = Redirect::to(target).into_response();
    response.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie)
            .map_err(|e| ApiError::internal("Invalid session cookie").with_details(e.to_string()))?,
    );
    Ok(response)
}

/// Discard the session and clear the cookie.
pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some((token, _)) = session_from_headers(&state, &headers) {
        state.drop_session(token);
    }

    let expired = format!("{}=; Path=/; HttpOnly; Max-Age=0", SESSION_COOKIE);
    let mut response = Redirect::to("/").into_response();
    if let Ok(value) = HeaderValue::from_str(&expired) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    response
}
