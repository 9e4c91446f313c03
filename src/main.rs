// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use greeting_service::{
    api::router,
    auth::{roles, RsaKeyPair, TokenService},
    config::Config,
    state::AppState,
    store::InMemoryStore,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = Config::from_env().expect("Failed to load configuration");

    let (sign_keys, enc_keys) = match &config.key_paths {
        Some(paths) => {
            let sign_keys = RsaKeyPair::from_pem_files(&paths.sign_private, &paths.sign_public)
                .expect("Failed to load signing keys");
            let enc_keys = RsaKeyPair::from_pem_files(&paths.enc_private, &paths.enc_public)
                .expect("Failed to load encryption keys");
            (sign_keys, enc_keys)
        }
        None => {
            warn!("no key files configured, generating ephemeral keys; tokens will not survive a restart");
            (
                RsaKeyPair::generate(2048).expect("Failed to generate signing keys"),
                RsaKeyPair::generate(2048).expect("Failed to generate encryption keys"),
            )
        }
    };

    let tokens = TokenService::new(sign_keys, enc_keys, config.token_duration, &config.token_issuer);

    let mut store = InMemoryStore::new();
    store
        .seed_user(
            "admin",
            &config.seed_admin_password,
            vec![roles::ROLE_ADMIN.to_string(), roles::ROLE_USER.to_string()],
        )
        .expect("Failed to seed admin user");
    store
        .seed_user("user", &config.seed_user_password, vec![roles::ROLE_USER.to_string()])
        .expect("Failed to seed user");

    let state = AppState::new(store, tokens);
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Failed to parse bind address");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");
    info!("greeting service listening on http://{addr} (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("shutdown signal received");
}
