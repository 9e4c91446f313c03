// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request authentication and authority checks.
//!
//! [`require_auth`] guards a router subtree: it validates the bearer
//! token and stores the resulting [`TokenClaims`] in the request
//! extensions for handlers and later middleware to read. Short-circuits
//! on failure, so handlers never run without claims.
//!
//! [`require_authority`] layers on individual routes that need a
//! specific role on top of authentication.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use super::claims::TokenClaims;
use super::error::AuthError;
use crate::state::AppState;

/// Authenticate the request with a bearer token.
///
/// On success the validated claims are inserted into the request
/// extensions and the request proceeds. Any failure produces a 401
/// problem-detail response carrying the request path.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let token = match bearer_token(request.headers()) {
        Ok(token) => token,
        Err(err) => return err.into_response_at(&path),
    };

    match state.tokens.validate(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(err) => AuthError::from(err).into_response_at(&path),
    }
}

/// Require a specific authority on an already authenticated request.
///
/// Expects [`require_auth`] to have run first. Absent claims are treated
/// as an authentication failure, not an authorization one: without
/// claims there is no identity to authorize.
pub async fn require_authority(required: &'static str, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();

    let Some(claims) = request.extensions().get::<TokenClaims>() else {
        return AuthError::MissingClaims.into_response_at(&path);
    };
    // A token with no authorities at all is reported distinctly from one
    // that merely lacks the required role.
    if claims.authorities.is_empty() {
        return AuthError::MissingAuthorities.into_response_at(&path);
    }
    if !claims.has_authority(required) {
        return AuthError::InsufficientPermissions.into_response_at(&path);
    }

    next.run(request).await
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers.get(AUTHORIZATION).ok_or(AuthError::MissingHeader)?;
    let value = header.to_str().map_err(|_| AuthError::InvalidHeaderFormat)?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidHeaderFormat)?;
    if !is_token68(token) {
        return Err(AuthError::InvalidHeaderFormat);
    }
    Ok(token)
}

// RFC 6750 token68 charset, padding only at the end.
fn is_token68(token: &str) -> bool {
    let trimmed = token.trim_end_matches('=');
    !trimmed.is_empty()
        && trimmed
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~' | b'+' | b'/'))
}
