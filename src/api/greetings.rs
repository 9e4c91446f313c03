// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::error::{ApiError, ProblemDetail, Violation};
use crate::models::{Greeting, GreetingInput, GreetingMessage};
use crate::state::AppState;

const MESSAGE_MIN: usize = 3;
const MESSAGE_MAX: usize = 100;

fn cache_key(id: u64) -> String {
    format!("greeting:{id}")
}

/// Static hello, restricted to administrators by the route layer.
#[utoipa::path(
    get,
    path = "/api/hello",
    tag = "Greetings",
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Static greeting", body = GreetingMessage),
        (status = 401, description = "Not authenticated", body = ProblemDetail),
        (status = 403, description = "Missing the admin role", body = ProblemDetail)
    )
)]
pub async fn hello() -> Json<GreetingMessage> {
    Json(GreetingMessage {
        message: "Hello, World!".to_string(),
    })
}

/// List all greetings ordered by id.
#[utoipa::path(
    get,
    path = "/api/greetings",
    tag = "Greetings",
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "All stored greetings", body = [Greeting]),
        (status = 401, description = "Not authenticated", body = ProblemDetail)
    )
)]
pub async fn list_greetings(State(state): State<AppState>) -> Json<Vec<Greeting>> {
    Json(state.store.read().await.list_greetings())
}

/// Fetch a single greeting by id.
#[utoipa::path(
    get,
    path = "/api/greetings/{id}",
    tag = "Greetings",
    security(("bearer_token" = [])),
    params(("id" = u64, Path, description = "Greeting identifier")),
    responses(
        (status = 200, description = "The greeting", body = Greeting),
        (status = 404, description = "No greeting with that id", body = ProblemDetail)
    )
)]
pub async fn get_greeting(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Greeting>, ApiError> {
    let key = cache_key(id);
    if let Some(greeting) = state.greetings.get(&key) {
        debug!(id, "greeting served from cache");
        return Ok(Json(greeting));
    }

    let greeting = state.store.read().await.greeting_by_id(id)?;
    state.greetings.put(key, greeting.clone());
    Ok(Json(greeting))
}

/// Create a greeting.
#[utoipa::path(
    post,
    path = "/api/greetings",
    tag = "Greetings",
    security(("bearer_token" = [])),
    request_body = GreetingInput,
    responses(
        (status = 201, description = "Greeting created", body = Greeting),
        (status = 400, description = "Invalid message", body = ProblemDetail),
        (status = 409, description = "Duplicate message", body = ProblemDetail)
    )
)]
pub async fn create_greeting(
    State(state): State<AppState>,
    Json(input): Json<GreetingInput>,
) -> Result<(StatusCode, Json<Greeting>), ApiError> {
    validate_message(&input.message)?;

    let greeting = state.store.write().await.create_greeting(input)?;
    state.greetings.put(cache_key(greeting.id), greeting.clone());
    Ok((StatusCode::CREATED, Json(greeting)))
}

/// Update a greeting's message.
#[utoipa::path(
    put,
    path = "/api/greetings/{id}",
    tag = "Greetings",
    security(("bearer_token" = [])),
    params(("id" = u64, Path, description = "Greeting identifier")),
    request_body = GreetingInput,
    responses(
        (status = 200, description = "Greeting updated", body = Greeting),
        (status = 400, description = "Invalid message", body = ProblemDetail),
        (status = 404, description = "No greeting with that id", body = ProblemDetail),
        (status = 409, description = "Duplicate message", body = ProblemDetail)
    )
)]
pub async fn update_greeting(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(input): Json<GreetingInput>,
) -> Result<Json<Greeting>, ApiError> {
    validate_message(&input.message)?;

    let greeting = state.store.write().await.update_greeting(id, input)?;
    state.greetings.put(cache_key(id), greeting.clone());
    Ok(Json(greeting))
}

/// Delete a greeting.
#[utoipa::path(
    delete,
    path = "/api/greetings/{id}",
    tag = "Greetings",
    security(("bearer_token" = [])),
    params(("id" = u64, Path, description = "Greeting identifier")),
    responses(
        (status = 204, description = "Greeting deleted"),
        (status = 404, description = "No greeting with that id", body = ProblemDetail)
    )
)]
pub async fn delete_greeting(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    state.store.write().await.delete_greeting(id)?;
    state.greetings.invalidate(&cache_key(id));
    Ok(StatusCode::NO_CONTENT)
}

fn validate_message(message: &str) -> Result<(), ApiError> {
    let len = message.chars().count();
    if len < MESSAGE_MIN {
        return Err(ApiError::validation(vec![Violation::new(
            "min",
            "message",
            message,
            format!("The message must be at least {MESSAGE_MIN} characters long"),
        )]));
    }
    if len > MESSAGE_MAX {
        return Err(ApiError::validation(vec![Violation::new(
            "max",
            "message",
            message,
            format!("The message must be at most {MESSAGE_MAX} characters long"),
        )]));
    }
    Ok(())
}
