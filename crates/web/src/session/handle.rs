//! Per-request session handle.
//!
//! The session middleware loads the stored data once, hands handlers a
//! [`Session`] through request extensions and writes the data back after the
//! handler returns. Two requests on the same session therefore race: the
//! last one to finish wins.

use std::sync::Arc;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tokio::sync::Mutex;
use uuid::Uuid;

use common::AppError;
use domain::record_visit;

use super::SessionData;

#[derive(Debug)]
struct SessionState {
    id: Option<String>,
    data: SessionData,
    modified: bool,
    rotate: bool,
    flushed: bool,
}

/// What the middleware must do with the session once the handler is done.
#[derive(Debug, PartialEq)]
pub enum SessionChange {
    Unchanged,
    /// Store `data` under `id`, dropping `stale` first when the key rotated.
    Save {
        id: String,
        stale: Option<String>,
        data: SessionData,
    },
    /// Drop the stored session and clear the cookie.
    Delete { id: Option<String> },
}

/// Shared handle on the current request's session.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<Mutex<SessionState>>,
}

impl Session {
    /// Wrap loaded session data. `id` is `None` for a new session.
    pub fn new(id: Option<String>, data: SessionData) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionState {
                id,
                data,
                modified: false,
                rotate: false,
                flushed: false,
            })),
        }
    }

    pub async fn id(&self) -> Option<String> {
        self.inner.lock().await.id.clone()
    }

    pub async fn driver_id(&self) -> Option<Uuid> {
        self.inner.lock().await.data.driver_id()
    }

    /// Count a dashboard visit and return the new total.
    pub async fn record_visit(&self) -> u64 {
        let mut state = self.inner.lock().await;
        state.modified = true;
        record_visit(&mut state.data)
    }

    /// Bind the session to a driver. The session id is rotated on save.
    /// Data is kept for an anonymous session or the same driver and dropped
    /// when another driver was logged in.
    pub async fn login(&self, driver_id: Uuid) {
        let mut state = self.inner.lock().await;
        if state.data.driver_id().is_some_and(|current| current != driver_id) {
            state.data.clear();
        }
        state.data.set_driver_id(driver_id);
        state.modified = true;
        state.rotate = true;
        state.flushed = false;
    }

    /// Drop all session data.
    pub async fn flush(&self) {
        let mut state = self.inner.lock().await;
        state.data.clear();
        state.modified = false;
        state.rotate = false;
        state.flushed = true;
    }

    /// Pending change for the store, generating a fresh id when needed.
    pub async fn change(&self) -> SessionChange {
        let state = self.inner.lock().await;

        if state.flushed {
            return SessionChange::Delete {
                id: state.id.clone(),
            };
        }
        if !state.modified {
            return SessionChange::Unchanged;
        }

        match (&state.id, state.rotate) {
            (Some(id), false) => SessionChange::Save {
                id: id.clone(),
                stale: None,
                data: state.data.clone(),
            },
            (existing, _) => SessionChange::Save {
                id: new_session_id(),
                stale: existing.clone(),
                data: state.data.clone(),
            },
        }
    }
}

/// Random session key: 256 bits from two v4 UUIDs, hex encoded.
pub fn new_session_id() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::internal("Session middleware is not installed"))
    }
}
