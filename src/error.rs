// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("이미 해당 날짜에 기록이 존재합니다.")]
    Duplicate,

    /// Notion answered with a non-2xx status.
    #[error("{message}")]
    NotionApi {
        status: StatusCode,
        message: String,
        body: Option<Value>,
    },

    /// Notion answered 429. Pagination treats this as the end of the scan.
    #[error("{message}")]
    RateLimited { message: String },

    /// A Notion rejection whose status is handed back to the client as-is.
    #[error("{message}")]
    NotionRejected {
        status: StatusCode,
        message: String,
        body: Option<Value>,
    },

    /// An error annotated with an endpoint-specific description.
    #[error("{source}")]
    Failed {
        details: &'static str,
        source: Box<AppError>,
    },

    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duplicate: Option<bool>,
}

impl AppError {
    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Duplicate => StatusCode::CONFLICT,
            AppError::NotionRejected { status, .. } => *status,
            AppError::Failed { source, .. } => source.status(),
            AppError::NotionApi { .. } | AppError::RateLimited { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AppError::RateLimited { .. })
    }

    /// Attach a fixed description to server-side failures.
    ///
    /// Client errors (400/405/409) pass through untouched.
    pub fn describe(self, details: &'static str) -> Self {
        if self.status().is_server_error() {
            AppError::Failed {
                details,
                source: Box::new(self),
            }
        } else {
            self
        }
    }

    /// Hand a Notion rejection back to the client with Notion's own status.
    pub fn passthrough(self) -> Self {
        match self {
            AppError::NotionApi {
                status,
                message,
                body,
            } => {
                let has_message = body.as_ref().and_then(|b| b.get("message")).is_some();
                AppError::NotionRejected {
                    status,
                    message: if has_message {
                        message
                    } else {
                        "Notion API 오류".to_string()
                    },
                    body,
                }
            }
            AppError::RateLimited { message } => AppError::NotionRejected {
                status: StatusCode::TOO_MANY_REQUESTS,
                message,
                body: None,
            },
            other => other,
        }
    }

    fn body(&self) -> ErrorResponse {
        let (details, duplicate) = match self {
            AppError::Duplicate => (None, Some(true)),
            AppError::NotionApi { body, .. } | AppError::NotionRejected { body, .. } => {
                (body.clone(), None)
            }
            AppError::Failed { details, .. } => (Some(Value::from(*details)), None),
            _ => (None, None),
        };

        ErrorResponse {
            error: self.to_string(),
            details,
            duplicate,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        }

        (status, Json(self.body())).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
