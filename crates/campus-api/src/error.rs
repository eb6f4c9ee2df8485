//! HTTP error mapping.
//!
//! Every failure leaves the server as a JSON body `{"error": message}`
//! with a status from the taxonomy below. Unique-constraint violations
//! from the database surface as 409 rather than 500.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

/// Handler-level result alias.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    Internal(campus_core::Error),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
}

impl From<campus_core::Error> for ApiError {
    fn from(err: campus_core::Error) -> Self {
        use campus_core::Error;
        match &err {
            Error::NotFound(msg) => ApiError::NotFound(msg.clone()),
            Error::ProfileNotFound(id) => ApiError::NotFound(format!("Profile {} not found", id)),
            Error::ResourceNotFound(id) => {
                ApiError::NotFound(format!("Resource {} not found", id))
            }
            Error::EventNotFound(id) => ApiError::NotFound(format!("Event {} not found", id)),
            Error::ConversationNotFound(id) => {
                ApiError::NotFound(format!("Conversation {} not found", id))
            }
            Error::InvalidInput(msg) => ApiError::BadRequest(msg.clone()),
            Error::Unauthorized(msg) => ApiError::Unauthorized(msg.clone()),
            Error::Forbidden(msg) => ApiError::Forbidden(msg.clone()),
            Error::Database(sqlx_err) => {
                let msg = sqlx_err.to_string();
                if msg.contains("duplicate key") || msg.contains("unique constraint") {
                    let friendly_msg = if msg.contains("connections") {
                        "A connection request between these members already exists".to_string()
                    } else {
                        msg
                    };
                    return ApiError::Conflict(friendly_msg);
                }
                ApiError::Internal(err)
            }
            _ => ApiError::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Internal(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_variants_map_to_404() {
        let id = uuid::Uuid::new_v4();
        for err in [
            campus_core::Error::ProfileNotFound(id),
            campus_core::Error::ResourceNotFound(id),
            campus_core::Error::EventNotFound(id),
            campus_core::Error::ConversationNotFound(id),
            campus_core::Error::NotFound("gone".to_string()),
        ] {
            assert!(matches!(ApiError::from(err), ApiError::NotFound(_)));
        }
    }

    #[test]
    fn test_duplicate_key_maps_to_conflict() {
        let err = campus_core::Error::Database(sqlx::Error::Protocol(
            "duplicate key value violates unique constraint \"connections_pair_idx\"".to_string(),
        ));
        assert!(matches!(ApiError::from(err), ApiError::Conflict(_)));
    }

    #[test]
    fn test_invalid_input_maps_to_bad_request() {
        let err = campus_core::Error::InvalidInput("bad".to_string());
        assert!(matches!(ApiError::from(err), ApiError::BadRequest(_)));
    }
}
