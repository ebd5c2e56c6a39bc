use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::catalog::CatalogError;
use crate::session::SessionError;

/// Failures that abort a page render.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to load models")]
    ModelsUnavailable(#[source] CatalogError),

    #[error("session error")]
    Session(#[from] SessionError),

    #[error("Failed to render page")]
    Render(#[from] minijinja::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::ModelsUnavailable(e) => error!(name: "page.models.failed", error = %e, "Models fetch failed"),
            AppError::Session(e) => error!(name: "page.session.failed", error = %e, "Session unavailable"),
            AppError::Render(e) => error!(name: "page.render.failed", error = ?e, "Template rendering failed"),
        }
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        AppError::Session(self).into_response()
    }
}

/// JSON error body for script-driven endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

pub fn json_error(status: StatusCode, error: &'static str) -> Response {
    (status, Json(ErrorBody { error })).into_response()
}
