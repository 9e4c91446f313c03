// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use tracing::{info, warn};

use crate::error::{ApiError, ProblemDetail, Violation};
use crate::models::{LoginRequest, TokenResponse};
use crate::state::AppState;
use crate::store::{verify_password, User};

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 50;
const PASSWORD_MIN: usize = 4;
const PASSWORD_MAX: usize = 100;

/// Authenticate with username and password.
///
/// Unknown users, disabled accounts and wrong passwords all produce the
/// same `invalid_credentials` response, so the endpoint does not reveal
/// which part of the credentials was wrong.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authentication succeeded", body = TokenResponse),
        (status = 400, description = "Malformed credentials", body = ProblemDetail),
        (status = 401, description = "Invalid username or password", body = ProblemDetail)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    validate_credentials(&request)?;

    let Some(user) = find_user(&state, &request.username).await else {
        return Err(ApiError::invalid_credentials());
    };
    if !user.enabled || !verify_password(&request.password, &user.password_hash) {
        warn!(username = %request.username, "rejected login attempt");
        return Err(ApiError::invalid_credentials());
    }

    let token = state.tokens.issue(&user.id, user.roles.clone()).map_err(|e| {
        tracing::error!(error = %e, "token issuance failed");
        ApiError::internal("Failed to issue access token.")
    })?;
    info!(username = %user.username, "user logged in");

    Ok(Json(TokenResponse {
        access_token: token.access_token,
        token_type: token.token_type,
        access_token_expires_in: token.expires_in,
    }))
}

async fn find_user(state: &AppState, username: &str) -> Option<User> {
    let cache_key = format!("user:{username}");
    if let Some(user) = state.users.get(&cache_key) {
        return Some(user);
    }

    let user = state.store.read().await.find_user_by_username(username)?;
    state.users.put(cache_key, user.clone());
    Some(user)
}

fn validate_credentials(request: &LoginRequest) -> Result<(), ApiError> {
    let mut violations = Vec::new();

    let username_len = request.username.chars().count();
    if username_len < USERNAME_MIN {
        violations.push(Violation::new(
            "min",
            "username",
            &request.username,
            format!("The username must be at least {USERNAME_MIN} characters long"),
        ));
    } else if username_len > USERNAME_MAX {
        violations.push(Violation::new(
            "max",
            "username",
            &request.username,
            format!("The username must be at most {USERNAME_MAX} characters long"),
        ));
    }

    // The password is never echoed back in the rejected value.
    let password_len = request.password.chars().count();
    if password_len < PASSWORD_MIN {
        violations.push(Violation::new(
            "min",
            "password",
            "",
            format!("The password must be at least {PASSWORD_MIN} characters long"),
        ));
    } else if password_len > PASSWORD_MAX {
        violations.push(Violation::new(
            "max",
            "password",
            "",
            format!("The password must be at most {PASSWORD_MAX} characters long"),
        ));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation(violations))
    }
}
