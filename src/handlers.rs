//! Route handlers.
//!
//! Form-driven routes never show an error page for session or catalog
//! trouble: they log and redirect. Only the home listing (without models
//! there is nothing to show) and the AJAX favorite toggle report failures.

use axum::{
    Form, Json,
    extract::{RawQuery, State, rejection::FormRejection},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

use crate::AppState;
use crate::catalog::{CatalogFilter, ModelId};
use crate::error::{AppError, json_error};
use crate::lists::{self, ListError};
use crate::session::{SessionError, VisitorSession, codec};
use crate::views::{ComparisonsView, HomeView};

#[derive(Debug, Deserialize)]
pub struct CompareForm {
    compare: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IdForm {
    id: Option<String>,
}

/// Body returned to script-driven favorite toggles.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToggleResponse {
    pub added: bool,
    pub id: ModelId,
}

/// GET / - Filtered catalog plus the visitor's favorites.
pub async fn home(
    State(state): State<AppState>,
    session: Result<VisitorSession, SessionError>,
    RawQuery(query): RawQuery,
) -> Result<Html<String>, AppError> {
    let filter = CatalogFilter::from_query_string(query.as_deref());

    let models = state
        .catalog
        .fetch_models()
        .await
        .map_err(AppError::ModelsUnavailable)?;

    let (categories, manufacturers) = tokio::join!(
        state.catalog.fetch_categories(),
        state.catalog.fetch_manufacturers()
    );
    let categories = categories.unwrap_or_else(|e| {
        warn!(name: "catalog.categories.failed", error = %e, "Rendering without categories");
        Vec::new()
    });
    let manufacturers = manufacturers.unwrap_or_else(|e| {
        warn!(name: "catalog.manufacturers.failed", error = %e, "Rendering without manufacturers");
        Vec::new()
    });

    let favorites = session
        .and_then(|VisitorSession(s)| codec::read_favorites(&s))
        .unwrap_or_else(|e| {
            warn!(name: "favorites.read.failed", error = %e, "Rendering without favorites");
            Vec::new()
        });

    let view = HomeView::new(&models, filter, categories, manufacturers, &favorites);
    Ok(Html(state.templates.render("index.html", &view)?))
}

/// POST /action - Add a model to the comparison list.
pub async fn add_comparison(
    State(state): State<AppState>,
    session: Result<VisitorSession, SessionError>,
    form: Result<Form<CompareForm>, FormRejection>,
) -> Redirect {
    let home = Redirect::to("/");

    let VisitorSession(mut session) = match session {
        Ok(s) => s,
        Err(e) => {
            warn!(name: "comparison.session.failed", error = %e, "Session unavailable");
            return home;
        }
    };
    let Some(raw) = form_value(form.map(|Form(f)| f.compare)) else {
        return home;
    };

    let id = parse_id(&raw);
    if id <= 0 {
        warn!(name: "comparison.invalid_id", raw = %raw, "Ignoring invalid model id");
        return home;
    }

    let model = match state.catalog.fetch_model_by_id(id).await {
        Ok(model) => model,
        Err(e) => {
            warn!(name: "comparison.fetch.failed", model_id = id, error = %e, "Model lookup failed");
            return home;
        }
    };

    match lists::add_comparison(&mut session, model, state.config.comparison.max_items) {
        Ok(true) => info!(name: "comparison.added", model_id = id, "Model added to comparisons"),
        Ok(false) => info!(name: "comparison.duplicate", model_id = id, "Already in comparisons"),
        Err(e) => warn!(name: "comparison.add.failed", model_id = id, error = %e, "Could not add comparison"),
    }
    home
}

/// GET /comparisons - Show the comparison list.
pub async fn comparisons(
    State(state): State<AppState>,
    session: Result<VisitorSession, SessionError>,
) -> Result<Html<String>, AppError> {
    let VisitorSession(session) = session?;

    let models = codec::read_comparisons(&session).unwrap_or_else(|e| {
        warn!(name: "comparisons.read.failed", error = %e, "Rendering empty comparisons");
        Vec::new()
    });

    let view = ComparisonsView::new(models);
    Ok(Html(state.templates.render("comparisons.html", &view)?))
}

/// POST /comparisons/remove - Drop a model from the comparison list.
pub async fn remove_comparison(
    session: Result<VisitorSession, SessionError>,
    form: Result<Form<IdForm>, FormRejection>,
) -> Redirect {
    let back = Redirect::to("/comparisons");

    let VisitorSession(mut session) = match session {
        Ok(s) => s,
        Err(e) => {
            warn!(name: "comparison.session.failed", error = %e, "Session unavailable");
            return back;
        }
    };
    let id = form_value(form.map(|Form(f)| f.id)).map_or(0, |raw| parse_id(&raw));

    match lists::remove_comparison(&mut session, id) {
        Ok(true) => info!(name: "comparison.removed", model_id = id, "Model removed from comparisons"),
        Ok(false) => {}
        Err(e) => warn!(name: "comparison.remove.failed", model_id = id, error = %e, "Could not remove comparison"),
    }
    back
}

/// POST /favorite/toggle - Flip a model in the favorites set.
///
/// Script requests get JSON; plain form posts are redirected back.
pub async fn toggle_favorite(
    headers: HeaderMap,
    session: Result<VisitorSession, SessionError>,
    form: Result<Form<IdForm>, FormRejection>,
) -> Response {
    let ajax = is_ajax(&headers);
    let fail = |status: StatusCode, error: &'static str| {
        if ajax {
            json_error(status, error)
        } else {
            Redirect::to("/").into_response()
        }
    };

    let VisitorSession(mut session) = match session {
        Ok(s) => s,
        Err(e) => {
            warn!(name: "favorite.session.failed", error = %e, "Session unavailable");
            return fail(StatusCode::INTERNAL_SERVER_ERROR, "session error");
        }
    };
    let Some(raw) = form_value(form.map(|Form(f)| f.id)) else {
        return fail(StatusCode::BAD_REQUEST, "missing id");
    };

    let id = parse_id(&raw);
    match lists::toggle_favorite(&mut session, id) {
        Ok(added) => {
            info!(name: "favorite.toggled", model_id = id, added, "Favorite toggled");
            if ajax {
                Json(ToggleResponse { added, id }).into_response()
            } else {
                let back = local_referer(&headers).unwrap_or_else(|| "/".to_string());
                Redirect::to(&back).into_response()
            }
        }
        Err(ListError::InvalidId(_)) => fail(StatusCode::BAD_REQUEST, "invalid id"),
        Err(e) => {
            warn!(name: "favorite.toggle.failed", model_id = id, error = %e, "Could not toggle favorite");
            fail(StatusCode::INTERNAL_SERVER_ERROR, "toggle error")
        }
    }
}

/// Non-empty form field, or `None` if the body was unreadable.
fn form_value(field: Result<Option<String>, FormRejection>) -> Option<String> {
    field.ok().flatten().filter(|v| !v.is_empty())
}

/// Unparseable ids become 0, which every operation rejects as invalid.
fn parse_id(raw: &str) -> ModelId {
    raw.trim().parse().unwrap_or(0)
}

fn is_ajax(headers: &HeaderMap) -> bool {
    let is = |name: &str, expected: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.eq_ignore_ascii_case(expected))
    };
    is("x-requested-with", "XMLHttpRequest") || is("hx-request", "true")
}

/// The `Referer` as a local redirect target.
///
/// Relative paths are kept as-is. Absolute URLs must point at the host the
/// request was sent to and are reduced to path and query. Anything else is
/// rejected so the redirect cannot leave the site.
fn local_referer(headers: &HeaderMap) -> Option<String> {
    let raw = headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())?;

    if raw.starts_with('/') {
        return (!raw.starts_with("//") && !raw.starts_with("/\\")).then(|| raw.to_string());
    }

    let url = Url::parse(raw).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    let authority = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        (None, _) => return None,
    };
    let host = headers.get(header::HOST).and_then(|v| v.to_str().ok())?;
    if !host.eq_ignore_ascii_case(&authority) {
        return None;
    }

    Some(match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    })
}
