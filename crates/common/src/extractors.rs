//! Custom axum extractors for Parley
//!
//! Handlers never see raw input: each extractor either yields the typed,
//! validated value or rejects the request with a 400 and field-level errors.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Query, RawPathParams, Request},
    http::request::Parts,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::error::{Error, FieldError};
use crate::response::PageRequest;

/// Maximum page size for list endpoints
pub const MAX_LIMIT: i64 = 100;

/// Flatten validator output into `{field, message}` pairs with dotted paths,
/// sorted so responses are stable.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    collect_field_errors(None, errors, &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    out
}

fn collect_field_errors(
    prefix: Option<&str>,
    errors: &ValidationErrors,
    out: &mut Vec<FieldError>,
) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(prefix) => format!("{}.{}", prefix, field),
            None => field.to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                out.extend(list.iter().map(|e| FieldError::new(path.clone(), describe(e))));
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(Some(&path), inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_errors(Some(&format!("{}.{}", path, index)), inner, out);
                }
            }
        }
    }
}

fn describe(error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => format!("Invalid value ({})", error.code),
    }
}

/// `validator` custom check for identifiers carried as strings in bodies
pub fn validate_identifier(value: &str) -> Result<(), ValidationError> {
    Uuid::parse_str(value)
        .map(|_| ())
        .map_err(|_| ValidationError::new("identifier").with_message("Invalid ID format".into()))
}

/// `validator` custom check rejecting whitespace-only text
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("Must not be blank".into()));
    }
    Ok(())
}

/// Pagination query parameters for list endpoints
#[derive(Debug, Clone, Copy, Default, Deserialize, Validate)]
pub struct PageQuery {
    #[serde(default)]
    #[validate(range(min = 1, message = "Page must be a positive integer"))]
    pub page: Option<i64>,

    #[serde(default)]
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<i64>,
}

impl PageQuery {
    /// Resolve to a concrete window, applying the endpoint's default page size
    pub fn resolve(&self, default_limit: i64) -> PageRequest {
        PageRequest {
            page: self.page.unwrap_or(1),
            limit: self.limit.unwrap_or(default_limit).min(MAX_LIMIT),
        }
    }
}

/// JSON extractor that validates the deserialized value automatically.
///
/// Replaces `Json<T>` + manual `.validate()` calls in handlers.
/// Requires `T: DeserializeOwned + Validate`.
///
/// All input errors (deserialization + validation) return 400. An empty
/// body reads as `{}` so that all-optional payloads need no body at all.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| Error::invalid_body(vec![FieldError::new("body", e.body_text())]))?;
        let bytes = if bytes.iter().all(u8::is_ascii_whitespace) {
            Bytes::from_static(b"{}")
        } else {
            bytes
        };
        let Json(value) = Json::<T>::from_bytes(&bytes)
            .map_err(|e| Error::invalid_body(vec![FieldError::new("body", e.body_text())]))?;
        value
            .validate()
            .map_err(|e| Error::invalid_body(field_errors(&e)))?;
        Ok(ValidatedJson(value))
    }
}

/// Query string extractor with the same contract as [`ValidatedJson`]
#[derive(Debug)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| Error::invalid_query(vec![FieldError::new("query", e.body_text())]))?;
        value
            .validate()
            .map_err(|e| Error::invalid_query(field_errors(&e)))?;
        Ok(ValidatedQuery(value))
    }
}

/// Path extractor for resource routes.
///
/// Every route parameter in this API names a resource, so each raw segment
/// must be a well-formed UUID before `T` is deserialized.
#[derive(Debug)]
pub struct ValidatedPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let raw = RawPathParams::from_request_parts(parts, state)
            .await
            .map_err(|e| Error::invalid_params(vec![FieldError::new("params", e.body_text())]))?;

        let mut errors: Vec<FieldError> = raw
            .iter()
            .filter(|(_, value)| Uuid::parse_str(value).is_err())
            .map(|(key, _)| FieldError::new(key, "Invalid ID format"))
            .collect();
        if !errors.is_empty() {
            errors.sort_by(|a, b| a.field.cmp(&b.field));
            return Err(Error::invalid_params(errors));
        }

        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| Error::invalid_params(vec![FieldError::new("params", e.body_text())]))?;
        Ok(ValidatedPath(value))
    }
}
