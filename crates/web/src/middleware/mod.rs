//! Middleware for sessions and the login gate.

mod auth;
mod session;

pub use auth::{login_redirect, require_login, CurrentDriver, LOGIN_URL};
pub use session::session_middleware;
