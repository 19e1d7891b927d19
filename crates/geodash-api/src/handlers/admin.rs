//! Admin portal: facility data entry and user management.

use std::sync::Arc;

use axum::{
    extract::{Form, Query, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};
use geodash_core::models::{NewFacility, NewUser, Role};
use geodash_core::session::SessionContext;
use geodash_core::DashError;
use serde::Deserialize;

use crate::error::ApiError;
use crate::handlers::auth::session_from_headers;
use crate::render::page;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FacilityForm {
    pub province: String,
    pub commune: String,
    pub kind: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
pub struct UserForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Admin portal gate: admin and editor only.
fn require_editor(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Arc<SessionContext>, Response> {
    match session_from_headers(state, headers) {
        Some((_, session)) if session.role.can_edit_data() => Ok(session),
        Some(_) => Err(ApiError::forbidden("Réservé au portail d'administration").into_response()),
        None => Err(Redirect::to("/").into_response()),
    }
}

fn require_admin(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Arc<SessionContext>, Response> {
    match session_from_headers(state, headers) {
        Some((_, session)) if session.role.can_manage_users() => Ok(session),
        Some(_) => Err(ApiError::forbidden("Réservé aux administrateurs").into_response()),
        None => Err(Redirect::to("/").into_response()),
    }
}

fn notice_text(code: &str) -> Option<&'static str> {
    match code {
        "facility_added" => Some("Équipement ajouté."),
        "user_added" => Some("Compte créé."),
        _ => None,
    }
}

pub async fn admin_home(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NoticeQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let session = match require_editor(&state, &headers) {
        Ok(session) => session,
        Err(response) => return Ok(response),
    };

    let facilities = state.facilities.list_facilities().await?;
    let notice = query.notice.as_deref().and_then(notice_text);

    Ok(Html(page::admin_page(
        &session.username,
        &facilities,
        session.role.can_manage_users(),
        notice,
    ))
    .into_response())
}

/// Facility insert. A duplicate is a rejected operation shown inline, not
/// a crash.
pub async fn create_facility(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<FacilityForm>,
) -> Result<Response, ApiError> {
    let session = match require_editor(&state, &headers) {
        Ok(session) => session,
        Err(response) => return Ok(response),
    };

    let facility = NewFacility {
        province: form.province,
        commune: form.commune,
        kind: form.kind,
        name: form.name,
        latitude: form.latitude,
        longitude: form.longitude,
    };

    match state.facilities.create_facility(&facility).await {
        Ok(id) => {
            tracing::info!(id = id.0, name = %facility.name, "Facility added");
            Ok(Redirect::to("/admin?notice=facility_added").into_response())
        }
        Err(err @ DashError::DuplicateFacility { .. }) => {
            let facilities = state.facilities.list_facilities().await?;
            Ok(Html(page::admin_page(
                &session.username,
                &facilities,
                session.role.can_manage_users(),
                Some(&err.to_string()),
            ))
            .into_response())
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn manage_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NoticeQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let session = match require_admin(&state, &headers) {
        Ok(session) => session,
        Err(response) => return Ok(response),
    };

    let users = state.users.list_users().await?;
    let notice = query.notice.as_deref().and_then(notice_text);

    Ok(Html(page::users_page(&session.username, &users, notice)).into_response())
}

/// Account insert. A duplicate username is reported as "already exists";
/// the existing account is untouched.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<UserForm>,
) -> Result<Response, ApiError> {
    let session = match require_admin(&state, &headers) {
        Ok(session) => session,
        Err(response) => return Ok(response),
    };

    let Some(role) = Role::parse(&form.role) else {
        return Err(ApiError::bad_request("Rôle inconnu"));
    };

    let user = NewUser {
        username: form.username,
        email: form.email,
        password: form.password,
        role,
    };

    match state.users.create_user(&user).await {
        Ok(()) => {
            tracing::info!(username = %user.username, role = %role, "User created");
            Ok(Redirect::to("/admin/users?notice=user_added").into_response())
        }
        Err(DashError::DuplicateUser { username }) => {
            let users = state.users.list_users().await?;
            let message = format!("Le nom d'utilisateur '{}' existe déjà.", username);
            Ok(Html(page::users_page(&session.username, &users, Some(&message))).into_response())
        }
        Err(err) => Err(err.into()),
    }
}
