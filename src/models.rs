// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request/response models for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored greeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Greeting {
    /// Identifier of the greeting.
    pub id: u64,
    /// The greeting text.
    pub message: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or updating a greeting.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GreetingInput {
    /// The greeting text (3 to 100 characters).
    pub message: String,
}

/// Static greeting returned by the admin-only hello endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct GreetingMessage {
    pub message: String,
}

/// Login request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Username (3 to 50 characters).
    pub username: String,
    /// Password (4 to 100 characters).
    pub password: String,
}

/// Token response returned after a successful login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// Compact serialized access token.
    pub access_token: String,
    /// Token type, always `Bearer`.
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub access_token_expires_in: i64,
}

/// Health status body for liveness/readiness probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    /// `UP` when the service is running.
    pub status: String,
}
