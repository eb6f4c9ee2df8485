//! Session extraction.
//!
//! Authentication is terminated upstream; the proxy forwards the
//! verified member id in the `x-user-id` header. Handlers that need an
//! acting member take [`AuthSession`]; surfaces that also work for
//! anonymous visitors take [`MaybeSession`].

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::ApiError;

const USER_ID_HEADER: &str = "x-user-id";

/// The acting member, taken from the `x-user-id` header.
#[derive(Debug, Clone, Copy)]
pub struct AuthSession {
    pub user_id: Uuid,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing x-user-id header".to_string()))?;

        let user_id = header
            .parse::<Uuid>()
            .map_err(|_| ApiError::BadRequest("Malformed x-user-id header".to_string()))?;

        Ok(Self { user_id })
    }
}

/// An optional session for surfaces open to anonymous visitors.
///
/// Absent header means anonymous; a present but malformed header is
/// still rejected.
#[derive(Debug, Clone, Copy)]
pub struct MaybeSession(pub Option<Uuid>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.headers.get(USER_ID_HEADER) {
            None => Ok(Self(None)),
            Some(value) => {
                let user_id = value
                    .to_str()
                    .ok()
                    .and_then(|v| v.parse::<Uuid>().ok())
                    .ok_or_else(|| {
                        ApiError::BadRequest("Malformed x-user-id header".to_string())
                    })?;
                Ok(Self(Some(user_id)))
            }
        }
    }
}
