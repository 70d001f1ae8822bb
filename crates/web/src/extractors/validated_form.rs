//! Validated form extractor.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
};
use axum_extra::extract::Form;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use common::{AppError, FieldErrors};

/// URL-encoded form extractor that validates the payload and reports every
/// failing field. Repeated keys (multi-select fields) deserialize into `Vec`s.
pub struct ValidatedForm<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        value
            .validate()
            .map_err(|e| AppError::InvalidForm(field_errors(&e)))?;

        Ok(ValidatedForm(value))
    }
}

/// Flatten validator output into per-field messages.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|error| match &error.message {
                    Some(message) => message.to_string(),
                    None => error.code.to_string(),
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}
