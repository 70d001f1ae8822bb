//! Login and logout.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use common::AppResult;

use crate::extractors::ValidatedForm;
use crate::middleware::LOGIN_URL;
use crate::session::Session;
use crate::state::AppState;
use crate::types::Found;

/// Login form
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    #[schema(example = "admin.user")]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    #[schema(example = "1qazcde3")]
    pub password: String,
}

/// Location to return to after logging in
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NextParam {
    pub next: Option<String>,
}

/// Login page description
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginInfo {
    pub message: String,
    pub login_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/logout", post(logout))
}

/// Keep only local paths so logging in cannot redirect off-site.
fn safe_next(next: Option<String>) -> String {
    next.filter(|n| {
        n.starts_with('/')
            && !n.starts_with("//")
            && !n.contains('\\')
            && !n.chars().any(|c| c.is_control())
    })
    .unwrap_or_else(|| "/".to_string())
}

/// Describe how to log in
#[utoipa::path(
    get,
    path = "/accounts/login",
    tag = "Accounts",
    params(NextParam),
    responses(
        (status = 200, description = "Login instructions", body = LoginInfo)
    )
)]
pub async fn login_page(Query(params): Query<NextParam>) -> Json<LoginInfo> {
    Json(LoginInfo {
        message: "Submit username and password as a form to log in".to_string(),
        login_url: LOGIN_URL.to_string(),
        next: params.next,
    })
}

/// Log in and bind the session to the driver
#[utoipa::path(
    post,
    path = "/accounts/login",
    tag = "Accounts",
    params(NextParam),
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Logged in, redirect to `next` or `/`"),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Query(params): Query<NextParam>,
    session: Session,
    ValidatedForm(form): ValidatedForm<LoginForm>,
) -> AppResult<Found> {
    let driver = state
        .services
        .auth
        .authenticate(&form.username, &form.password)
        .await?;

    session.login(driver.id).await;
    Ok(Found::to(safe_next(params.next)))
}

/// Log out and drop the session
#[utoipa::path(
    post,
    path = "/accounts/logout",
    tag = "Accounts",
    responses(
        (status = 302, description = "Logged out, redirect to the login page")
    )
)]
pub async fn logout(session: Session) -> Found {
    session.flush().await;
    Found::to(LOGIN_URL)
}
