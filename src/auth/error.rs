// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use super::token::TokenError;
use crate::error::{ProblemDetail, ERROR_ACCESS_DENIED, ERROR_INVALID_TOKEN, TYPE_ABOUT_BLANK};

/// Errors produced by the authentication and authority middleware.
///
/// Every variant renders as a problem-detail body. Token failures never
/// leak which validation stage rejected the token; clients only see a
/// generic unauthorized response.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authorization header is required")]
    MissingHeader,
    #[error("Invalid authorization header format (expected 'Bearer <token>')")]
    InvalidHeaderFormat,
    #[error("The access token is invalid or has expired")]
    InvalidToken(#[from] TokenError),
    #[error("Authentication claims are missing from the request")]
    MissingClaims,
    #[error("Missing authorities claim")]
    MissingAuthorities,
    #[error("Insufficient permissions for this operation")]
    InsufficientPermissions,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingHeader
            | AuthError::InvalidHeaderFormat
            | AuthError::InvalidToken(_)
            | AuthError::MissingClaims => StatusCode::UNAUTHORIZED,
            AuthError::MissingAuthorities | AuthError::InsufficientPermissions => {
                StatusCode::FORBIDDEN
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthorities | AuthError::InsufficientPermissions => {
                ERROR_ACCESS_DENIED
            }
            _ => ERROR_INVALID_TOKEN,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            AuthError::MissingAuthorities | AuthError::InsufficientPermissions => "Access Denied",
            _ => "Unauthorized",
        }
    }

    /// Build the problem-detail body for this error.
    pub fn to_problem(&self, instance: Option<String>) -> ProblemDetail {
        ProblemDetail {
            kind: TYPE_ABOUT_BLANK.to_string(),
            title: self.title().to_string(),
            status: self.status_code().as_u16(),
            detail: self.to_string(),
            instance,
            error: self.error_code().to_string(),
            violations: None,
        }
    }

    /// Render a response carrying the request path as the instance.
    pub fn into_response_at(self, instance: &str) -> Response {
        let status = self.status_code();
        let body = self.to_problem(Some(instance.to_string()));
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = self.to_problem(None);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn missing_header_returns_401_problem() {
        let response = AuthError::MissingHeader.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["type"], "about:blank");
        assert_eq!(body["title"], "Unauthorized");
        assert_eq!(body["status"], 401);
        assert_eq!(body["error"], "invalid_token");
    }

    #[tokio::test]
    async fn insufficient_permissions_returns_403() {
        let response = AuthError::InsufficientPermissions.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["title"], "Access Denied");
        assert_eq!(body["error"], "access_denied");
    }

    #[tokio::test]
    async fn instance_carries_the_request_path() {
        let response = AuthError::InvalidToken(TokenError::Expired).into_response_at("/api/hello");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["instance"], "/api/hello");
    }

    #[test]
    fn missing_claims_is_an_authentication_failure() {
        assert_eq!(AuthError::MissingClaims.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn token_errors_convert() {
        let err: AuthError = TokenError::Signature.into();
        assert_eq!(err, AuthError::InvalidToken(TokenError::Signature));
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }
}
