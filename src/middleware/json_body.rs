use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::CareError;

/// JSON body whose rejections use the service's `{"error": ...}` shape.
pub struct CareJson<T>(pub T);

impl<S, T> FromRequest<S> for CareJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = CareError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(body)) => Ok(Self(body)),
            Err(rejection) => Err(map_rejection(rejection)),
        }
    }
}

fn map_rejection(rejection: JsonRejection) -> CareError {
    debug!(reason = %rejection.body_text(), "rejected JSON body");
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        CareError::PayloadTooLarge
    } else {
        CareError::validation("Invalid JSON body")
    }
}
