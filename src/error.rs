// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Problem-detail error responses.
//!
//! Every error the API emits is an RFC 7807-style object with a stable
//! machine-readable `error` code. Handlers return [`ApiError`] and the
//! `IntoResponse` impl takes care of the JSON shape.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

pub const TYPE_ABOUT_BLANK: &str = "about:blank";

pub const ERROR_INVALID_REQUEST: &str = "invalid_request";
pub const ERROR_INVALID_CREDENTIALS: &str = "invalid_credentials";
pub const ERROR_INVALID_TOKEN: &str = "invalid_token";
pub const ERROR_ACCESS_DENIED: &str = "access_denied";
pub const ERROR_RESOURCE_CONFLICT: &str = "resource_conflict";
pub const ERROR_RESOURCE_NOT_FOUND: &str = "resource_not_found";
pub const ERROR_INTERNAL_SERVER: &str = "server_error";

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// Code of the validation rule that was violated (e.g. `min`, `max`).
    pub code: String,
    /// Field that failed validation.
    pub field: String,
    /// The rejected value.
    pub rejected_value: String,
    /// Human-readable message for the violation.
    pub message: String,
}

impl Violation {
    pub fn new(
        code: impl Into<String>,
        field: impl Into<String>,
        rejected_value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            field: field.into(),
            rejected_value: rejected_value.into(),
            message: message.into(),
        }
    }
}

/// Structured error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProblemDetail {
    /// Error type, usually a URI identifying the error class.
    #[serde(rename = "type")]
    pub kind: String,
    /// Short, human-readable summary.
    pub title: String,
    /// HTTP status code.
    pub status: u16,
    /// Detailed explanation.
    pub detail: String,
    /// Path of the request that produced the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// Machine-readable error code.
    pub error: String,
    /// Field-level validation failures, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<Violation>>,
}

/// Application-level error carried through handlers.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub detail: String,
    pub code: &'static str,
    pub violations: Option<Vec<Violation>>,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        title: &'static str,
        code: &'static str,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            status,
            title,
            detail: detail.into(),
            code,
            violations: None,
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "Not Found",
            ERROR_RESOURCE_NOT_FOUND,
            detail,
        )
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::CONFLICT,
            "Conflict",
            ERROR_RESOURCE_CONFLICT,
            detail,
        )
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "Bad Request",
            ERROR_INVALID_REQUEST,
            detail,
        )
    }

    pub fn validation(violations: Vec<Violation>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            title: "Bad Request",
            detail: "Validation error occurred.".to_string(),
            code: ERROR_INVALID_REQUEST,
            violations: Some(violations),
        }
    }

    pub fn invalid_credentials() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "Unauthorized",
            ERROR_INVALID_CREDENTIALS,
            "Invalid username or password.",
        )
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
            ERROR_INTERNAL_SERVER,
            detail,
        )
    }

    /// Build the problem-detail body for this error.
    pub fn to_problem(&self, instance: Option<String>) -> ProblemDetail {
        ProblemDetail {
            kind: TYPE_ABOUT_BLANK.to_string(),
            title: self.title.to_string(),
            status: self.status.as_u16(),
            detail: self.detail.clone(),
            instance,
            error: self.code.to_string(),
            violations: self.violations.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        let body = self.to_problem(None);
        (status, Json(body)).into_response()
    }
}
