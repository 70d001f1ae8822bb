//! Session middleware.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{debug, warn};

use crate::session::{Session, SessionChange, SessionData};
use crate::state::AppState;

/// Load the session named by the request cookie, expose it to handlers and
/// persist whatever they changed.
///
/// An unknown or expired cookie id starts an empty session; the id it
/// carried is never reused.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let cookie_name = state.config.session.cookie_name.clone();
    let jar = CookieJar::from_headers(request.headers());
    let had_cookie = jar.get(&cookie_name).is_some();

    let loaded = match jar.get(&cookie_name) {
        Some(cookie) => match state.sessions.load(cookie.value()).await {
            Ok(data) => data.map(|data| (cookie.value().to_string(), data)),
            Err(e) => return e.into_response(),
        },
        None => None,
    };

    let session = match loaded {
        Some((id, data)) => Session::new(Some(id), data),
        None => {
            if had_cookie {
                debug!("Session cookie did not match a stored session");
            }
            Session::new(None, SessionData::default())
        }
    };

    request.extensions_mut().insert(session.clone());
    let response = next.run(request).await;

    match session.change().await {
        SessionChange::Unchanged => response,
        SessionChange::Save { id, stale, data } => {
            if let Some(stale) = stale {
                if let Err(e) = state.sessions.delete(&stale).await {
                    warn!("Failed to drop rotated session: {}", e);
                }
            }
            if let Err(e) = state.sessions.save(&id, &data, state.session_ttl()).await {
                return e.into_response();
            }

            let cookie = Cookie::build((cookie_name, id))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .secure(state.config.session.cookie_secure)
                .build();
            (jar.add(cookie), response).into_response()
        }
        SessionChange::Delete { id } => {
            if let Some(id) = id {
                if let Err(e) = state.sessions.delete(&id).await {
                    warn!("Failed to delete flushed session: {}", e);
                }
            }
            if had_cookie {
                (jar.remove(Cookie::build(cookie_name).path("/")), response).into_response()
            } else {
                response
            }
        }
    }
}
