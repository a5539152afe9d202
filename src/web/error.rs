// Error types for the HTTP API

use crate::{
    executor::ExecuteError,
    resize::{ResizeError, ValidationError},
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    UnsupportedMediaType(String),
    UnprocessableEntity(String),
    InternalServerError(String),

    // Input bytes could not be decoded as an image
    ImageDecodeError(String),
    // Resized pixels could not be serialised
    ImageEncodeError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::UnsupportedMediaType(msg) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, msg),
            Self::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            Self::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            Self::ImageDecodeError(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::ImageEncodeError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": {
                "status": status.as_u16(),
                "message": error_message,
            }
        }));

        (status, body).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        Self::UnprocessableEntity(error.to_string())
    }
}

impl From<ExecuteError> for ApiError {
    fn from(error: ExecuteError) -> Self {
        match error {
            ExecuteError::Resize(err @ ResizeError::Decode(_)) => {
                Self::ImageDecodeError(err.to_string())
            }
            ExecuteError::Resize(err @ ResizeError::Encode { .. }) => {
                Self::ImageEncodeError(err.to_string())
            }
            ExecuteError::Resize(err @ ResizeError::EmptyDimensions { .. }) => {
                Self::UnprocessableEntity(err.to_string())
            }
            ExecuteError::Worker(msg) => Self::InternalServerError(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_maps_to_bad_request() {
        let err = ApiError::from(ExecuteError::Resize(ResizeError::Decode("eof".into())));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_encode_error_maps_to_internal() {
        let err = ApiError::from(ExecuteError::Resize(ResizeError::Encode {
            format: "dds",
            message: "unsupported".into(),
        }));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_error_maps_to_unprocessable() {
        let err = ApiError::from(ValidationError::TooLarge {
            axis: "width",
            value: 5000,
        });
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
