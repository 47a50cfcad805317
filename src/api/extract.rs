//! Request body extraction.

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde_json::Value;

use super::errors::ApiError;
use crate::store::Document;

/// A JSON object request body; anything else is a 400
#[derive(Debug, Clone)]
pub struct JsonBody(pub Document);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state).await?;
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(ApiError::BadRequest(
                "Request body must be a JSON object".to_string(),
            )),
        }
    }
}
