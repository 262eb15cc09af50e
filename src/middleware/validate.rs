use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::error::ApiError;

/// JSON body that deserialized and passed its `Validate` rules.
/// Anything else is a 400 listing the problems.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

/// Query string counterpart of `ValidatedJson`
#[derive(Debug)]
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::validation_error(vec![rejection.body_text()]))?;
        value
            .validate()
            .map_err(|errors| ApiError::validation_error(validation_messages(&errors)))?;
        Ok(ValidatedJson(value))
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::validation_error(vec![rejection.body_text()]))?;
        value
            .validate()
            .map_err(|errors| ApiError::validation_error(validation_messages(&errors)))?;
        Ok(ValidatedQuery(value))
    }
}

/// One `field: problem` line per failed rule, sorted for stable output
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => format!("{}: {}", field, message),
                None => format!("{}: failed {} validation", field, e.code),
            })
        })
        .collect();
    messages.sort();
    messages
}
