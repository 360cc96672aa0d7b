//! Request binding
//!
//! Create binds the raw body straight into a payload struct. Update serializes the
//! stored record into the same payload, overlays the body's top-level fields on it
//! and binds the result, so absent fields keep their stored values.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query},
    http::request::Parts,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Integer primary key taken from the single path parameter
#[derive(Debug, Clone, Copy)]
pub struct PathId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        raw.trim()
            .parse::<i64>()
            .map(PathId)
            .map_err(|_| AppError::BadRequest(format!("invalid id: {}", raw)))
    }
}

/// Query string parameters; a malformed query is a 400 in the JSON error envelope
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(QueryParams(params))
    }
}

/// Deserialize and validate a request body
pub fn bind<T>(body: &[u8]) -> AppResult<T>
where
    T: DeserializeOwned + Validate,
{
    let value: Value = serde_json::from_slice(body)?;
    bind_value(value)
}

/// Overlay a request body onto `current` and validate the merged payload
pub fn overlay<T>(current: &T, body: &[u8]) -> AppResult<T>
where
    T: Serialize + DeserializeOwned + Validate,
{
    let patch: Value = serde_json::from_slice(body)?;
    let Value::Object(patch) = patch else {
        return Err(AppError::BadRequest(
            "request body must be a JSON object".to_string(),
        ));
    };

    let mut merged = serde_json::to_value(current)?;
    if let Value::Object(base) = &mut merged {
        base.extend(patch);
    }

    bind_value(merged)
}

fn bind_value<T>(value: Value) -> AppResult<T>
where
    T: DeserializeOwned + Validate,
{
    if !value.is_object() {
        return Err(AppError::BadRequest(
            "request body must be a JSON object".to_string(),
        ));
    }
    let payload: T = serde_json::from_value(value)?;
    payload.validate()?;
    Ok(payload)
}

/// Serde helpers for `Option<NaiveDate>` fields that accept either a plain
/// `YYYY-MM-DD` date or a full RFC 3339 timestamp.
pub mod flexible_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{de, Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }

        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Ok(Some(date));
        }
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| Some(dt.date_naive()))
            .map_err(|_| de::Error::custom(format!("invalid date '{}'", raw)))
    }
}
