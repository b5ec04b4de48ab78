// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::generation::{GenerationResponse, GenerationResult, ResultCode};

/// Failures the generation endpoint reports to callers.
///
/// Every variant maps onto one of the envelope codes; nothing escapes
/// the endpoint as an unstructured failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid request: {0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    pub fn code(&self) -> ResultCode {
        match self {
            ApiError::Unauthorized(_) => ResultCode::Unauthorized,
            ApiError::ValidationError(_) => ResultCode::BadRequest,
            ApiError::InternalError(_) => ResultCode::Internal,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.code().http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Unauthorized(msg)
            | ApiError::ValidationError(msg)
            | ApiError::InternalError(msg) => msg,
        }
    }

    pub fn to_response(&self) -> GenerationResponse {
        GenerationResponse {
            code: self.code().as_u16(),
            message: self.message().to_string(),
            data: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}

impl From<ApiError> for GenerationResult {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized(message) => GenerationResult::AuthExpired { message },
            ApiError::ValidationError(message) => GenerationResult::ValidationFailed { message },
            ApiError::InternalError(message) => GenerationResult::InternalError { message },
        }
    }
}
