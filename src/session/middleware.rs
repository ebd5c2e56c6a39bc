//! Session cookie handling and the visitor session extractor.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderValue, header, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{debug, warn};

use super::{Session, SessionError, SessionId};
use crate::AppState;

/// Resolve the visitor's session id from the cookie, minting one if needed.
///
/// The id is placed in the request extensions for [`VisitorSession`]. A newly
/// minted id is sent back as a `Set-Cookie` header on the response.
pub async fn session_cookie_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let cookie_name = state.config.session.cookie_name.clone();
    let existing = CookieJar::from_headers(request.headers())
        .get(&cookie_name)
        .and_then(|cookie| SessionId::parse(cookie.value()));

    let (id, issued) = match existing {
        Some(id) => (id, false),
        None => (SessionId::new(), true),
    };
    request.extensions_mut().insert(id);

    let mut response = next.run(request).await;

    if issued {
        let cookie = Cookie::build((cookie_name, id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build();
        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
                debug!(name: "session.issued", session_id = %id, "Session cookie issued");
            }
            Err(e) => warn!(name: "session.cookie.invalid", error = %e, "Could not encode session cookie"),
        }
    }

    response
}

/// The current visitor's session, loaded from the store.
///
/// Handlers take `Result<VisitorSession, SessionError>` so that a missing or
/// failing store can be degraded gracefully instead of rejecting the request.
#[derive(Debug)]
pub struct VisitorSession(pub Session);

impl FromRequestParts<AppState> for VisitorSession {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let id = parts
            .extensions
            .get::<SessionId>()
            .copied()
            .ok_or_else(|| SessionError::Unavailable("no session id on request".to_string()))?;

        Session::load(id, Arc::clone(&state.sessions)).map(VisitorSession)
    }
}
