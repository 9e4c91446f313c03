// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::middleware::{require_auth, require_authority},
    auth::roles::ROLE_ADMIN,
    error::{ProblemDetail, Violation},
    models::{Greeting, GreetingInput, GreetingMessage, HealthStatus, LoginRequest, TokenResponse},
    state::AppState,
};

pub mod auth;
pub mod greetings;
pub mod health;

pub fn router(state: AppState) -> Router {
    // Everything here sits behind the auth middleware; /api/hello
    // additionally requires the admin role.
    let protected = Router::new()
        .route(
            "/hello",
            get(greetings::hello).route_layer(middleware::from_fn(|request, next| {
                require_authority(ROLE_ADMIN, request, next)
            })),
        )
        .route(
            "/greetings",
            get(greetings::list_greetings).post(greetings::create_greeting),
        )
        .route(
            "/greetings/{id}",
            get(greetings::get_greeting)
                .put(greetings::update_greeting)
                .delete(greetings::delete_greeting),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let api = Router::new()
        .route("/auth/login", post(auth::login))
        .merge(protected);

    Router::new()
        .nest("/api", api)
        .route("/health/liveness", get(health::liveness))
        .route("/health/readiness", get(health::readiness))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login,
        greetings::hello,
        greetings::list_greetings,
        greetings::get_greeting,
        greetings::create_greeting,
        greetings::update_greeting,
        greetings::delete_greeting,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            Greeting,
            GreetingInput,
            GreetingMessage,
            LoginRequest,
            TokenResponse,
            HealthStatus,
            ProblemDetail,
            Violation
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login and token issuance"),
        (name = "Greetings", description = "Greeting management"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
