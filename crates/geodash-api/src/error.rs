//! Unified API error type.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use geodash_core::DashError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: message.into(), details: None }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self { status: StatusCode::UNAUTHORIZED, message: message.into(), details: None }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self { status: StatusCode::FORBIDDEN, message: message.into(), details: None }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self { status: StatusCode::NOT_FOUND, message: message.into(), details: None }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self { status: StatusCode::CONFLICT, message: message.into(), details: None }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: message.into(), details: None }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = crate::render::page::error_page(&self.message, self.details.as_deref());
        (self.status, Html(body)).into_response()
    }
}

impl From<DashError> for ApiError {
    fn from(err: DashError) -> Self {
        match &err {
            DashError::ViewNotFound { .. } | DashError::DatasetNotFound { .. } => {
                Self::not_found("Page introuvable").with_details(err.to_string())
            }
            DashError::DuplicateUser { .. } | DashError::DuplicateFacility { .. } => {
                Self::conflict("Déjà existant").with_details(err.to_string())
            }
            DashError::NoMetricsResolved { .. } => {
                Self::internal("Aucun indice disponible").with_details(err.to_string())
            }
            _ => Self::internal("Erreur interne").with_details(err.to_string()),
        }
    }
}
