use axum::{
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
};

/// `302 Found` redirect, the answer to every successful form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Found(pub String);

impl Found {
    pub fn to(location: impl Into<String>) -> Self {
        Self(location.into())
    }
}

impl IntoResponse for Found {
    fn into_response(self) -> Response {
        (StatusCode::FOUND, [(LOCATION, self.0)]).into_response()
    }
}
