// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::Json;

use crate::models::HealthStatus;

/// Liveness probe handler.
///
/// Always returns 200 if the process is running.
#[utoipa::path(
    get,
    path = "/health/liveness",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthStatus)
    )
)]
pub async fn liveness() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "UP".to_string(),
    })
}

/// Readiness probe handler.
///
/// The store and key material live in process memory, so readiness has
/// no external dependencies to check.
#[utoipa::path(
    get,
    path = "/health/readiness",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = HealthStatus)
    )
)]
pub async fn readiness() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "UP".to_string(),
    })
}
