use crate::models::RecordError;
use axum::{extract::rejection::JsonRejection, http::StatusCode};

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<RecordError> for AppError {
    fn from(err: RecordError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn record_errors_are_bad_requests() {
        let err = AppError::from(RecordError::MissingField("covers"));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("covers"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
