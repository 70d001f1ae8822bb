//! Login gate.

use axum::{
    body::Body,
    extract::{OriginalUri, State},
    http::{Request, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use common::AppError;
use domain::Driver;

use crate::session::Session;
use crate::state::AppState;
use crate::types::Found;

/// Where anonymous clients are sent
pub const LOGIN_URL: &str = "/accounts/login";

/// Authenticated driver for the current request.
#[derive(Debug, Clone)]
pub struct CurrentDriver(pub Driver);

/// Redirect to the login page, remembering the requested location.
pub fn login_redirect(uri: &Uri) -> Found {
    let next = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    Found::to(format!("{}?next={}", LOGIN_URL, urlencoding::encode(next)))
}

/// Let the request through only for a session bound to an existing driver.
pub async fn require_login(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    session: Session,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(driver_id) = session.driver_id().await else {
        return Ok(login_redirect(&uri).into_response());
    };

    match state.services.drivers.get_driver(driver_id).await {
        Ok(driver) => {
            request.extensions_mut().insert(CurrentDriver(driver));
            Ok(next.run(request).await)
        }
        Err(AppError::NotFound) => {
            warn!(driver_id = %driver_id, "Session refers to a deleted driver");
            session.flush().await;
            Ok(login_redirect(&uri).into_response())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_redirect_keeps_path_and_query() {
        let uri: Uri = "/cars?model=bmw&page=2".parse().unwrap();
        assert_eq!(
            login_redirect(&uri),
            Found::to("/accounts/login?next=%2Fcars%3Fmodel%3Dbmw%26page%3D2")
        );
    }

    #[test]
    fn test_login_redirect_plain_path() {
        let uri: Uri = "/drivers".parse().unwrap();
        assert_eq!(login_redirect(&uri).0, "/accounts/login?next=%2Fdrivers");
    }
}
