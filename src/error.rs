use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::backend::LoginError;

#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    BadRequest(String),
    NotFound(String),
    BadGateway(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
        };
        (status, Json(serde_json::json!({ "error": msg }))).into_response()
    }
}

impl From<LoginError> for ApiError {
    fn from(value: LoginError) -> Self {
        match value {
            LoginError::EmptyIdentifier => ApiError::BadRequest(value.to_string()),
            LoginError::Rejected(msg) => ApiError::Unauthorized(msg),
            LoginError::Transport(ref err) => {
                error!("Backend error: {err}");
                ApiError::BadGateway(value.to_string())
            }
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        ApiError::BadRequest(value.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        ApiError::BadRequest(value.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_error_mapping() {
        assert!(matches!(
            ApiError::from(LoginError::EmptyIdentifier),
            ApiError::BadRequest(msg) if msg == "Please enter Membership No, Email, or Mobile No."
        ));
        assert!(matches!(
            ApiError::from(LoginError::Rejected("Member not found".into())),
            ApiError::Unauthorized(msg) if msg == "Member not found"
        ));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Unauthorized("x".into()).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::BadRequest("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::BadGateway("x".into()).into_response().status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
