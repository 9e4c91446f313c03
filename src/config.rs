// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the startup loader.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `TOKEN_SIGN_PRIVATE_KEY` | PEM file with the RSA signing private key | Ephemeral keys |
//! | `TOKEN_SIGN_PUBLIC_KEY` | PEM file with the RSA signing public key | Ephemeral keys |
//! | `TOKEN_ENC_PRIVATE_KEY` | PEM file with the RSA encryption private key | Ephemeral keys |
//! | `TOKEN_ENC_PUBLIC_KEY` | PEM file with the RSA encryption public key | Ephemeral keys |
//! | `TOKEN_DURATION_SECS` | Access token lifetime in seconds | `3600` |
//! | `TOKEN_ISSUER` | Issuer claim stamped into tokens | `greeting-service` |
//! | `SEED_ADMIN_PASSWORD` | Password for the seeded `admin` account | `admin` |
//! | `SEED_USER_PASSWORD` | Password for the seeded `user` account | `user` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//!
//! The four key variables are all-or-nothing: when none is set the
//! server generates an ephemeral pair per process (tokens do not survive
//! a restart), when only some are set startup fails.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const TOKEN_SIGN_PRIVATE_KEY_ENV: &str = "TOKEN_SIGN_PRIVATE_KEY";
pub const TOKEN_SIGN_PUBLIC_KEY_ENV: &str = "TOKEN_SIGN_PUBLIC_KEY";
pub const TOKEN_ENC_PRIVATE_KEY_ENV: &str = "TOKEN_ENC_PRIVATE_KEY";
pub const TOKEN_ENC_PUBLIC_KEY_ENV: &str = "TOKEN_ENC_PUBLIC_KEY";
pub const TOKEN_DURATION_SECS_ENV: &str = "TOKEN_DURATION_SECS";
pub const TOKEN_ISSUER_ENV: &str = "TOKEN_ISSUER";
pub const SEED_ADMIN_PASSWORD_ENV: &str = "SEED_ADMIN_PASSWORD";
pub const SEED_USER_PASSWORD_ENV: &str = "SEED_USER_PASSWORD";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TOKEN_DURATION_SECS: u64 = 3600;
const DEFAULT_TOKEN_ISSUER: &str = "greeting-service";
const DEFAULT_SEED_ADMIN_PASSWORD: &str = "admin";
const DEFAULT_SEED_USER_PASSWORD: &str = "user";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
    #[error("token key files must be configured together; {missing} is not set")]
    PartialKeyConfig { missing: &'static str },
}

/// Paths to the four PEM key files.
#[derive(Debug, Clone)]
pub struct KeyPaths {
    pub sign_private: PathBuf,
    pub sign_public: PathBuf,
    pub enc_private: PathBuf,
    pub enc_public: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// `None` means generate ephemeral keys at startup.
    pub key_paths: Option<KeyPaths>,
    pub token_duration: Duration,
    pub token_issuer: String,
    pub seed_admin_password: String,
    pub seed_user_password: String,
}

impl Config {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var(HOST_ENV).unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = match std::env::var(PORT_ENV) {
            Ok(value) => value.parse::<u16>().map_err(|_| ConfigError::Invalid {
                var: PORT_ENV,
                value,
            })?,
            Err(_) => DEFAULT_PORT,
        };

        let duration_secs = match std::env::var(TOKEN_DURATION_SECS_ENV) {
            Ok(value) => value.parse::<u64>().map_err(|_| ConfigError::Invalid {
                var: TOKEN_DURATION_SECS_ENV,
                value,
            })?,
            Err(_) => DEFAULT_TOKEN_DURATION_SECS,
        };

        Ok(Self {
            host,
            port,
            key_paths: key_paths_from_env()?,
            token_duration: Duration::from_secs(duration_secs),
            token_issuer: std::env::var(TOKEN_ISSUER_ENV)
                .unwrap_or_else(|_| DEFAULT_TOKEN_ISSUER.to_string()),
            seed_admin_password: std::env::var(SEED_ADMIN_PASSWORD_ENV)
                .unwrap_or_else(|_| DEFAULT_SEED_ADMIN_PASSWORD.to_string()),
            seed_user_password: std::env::var(SEED_USER_PASSWORD_ENV)
                .unwrap_or_else(|_| DEFAULT_SEED_USER_PASSWORD.to_string()),
        })
    }
}

fn key_paths_from_env() -> Result<Option<KeyPaths>, ConfigError> {
    let vars = [
        TOKEN_SIGN_PRIVATE_KEY_ENV,
        TOKEN_SIGN_PUBLIC_KEY_ENV,
        TOKEN_ENC_PRIVATE_KEY_ENV,
        TOKEN_ENC_PUBLIC_KEY_ENV,
    ];
    if vars.iter().all(|v| std::env::var(v).is_err()) {
        return Ok(None);
    }

    let require = |var: &'static str| {
        std::env::var(var)
            .map(PathBuf::from)
            .map_err(|_| ConfigError::PartialKeyConfig { missing: var })
    };
    Ok(Some(KeyPaths {
        sign_private: require(TOKEN_SIGN_PRIVATE_KEY_ENV)?,
        sign_public: require(TOKEN_SIGN_PUBLIC_KEY_ENV)?,
        enc_private: require(TOKEN_ENC_PRIVATE_KEY_ENV)?,
        enc_public: require(TOKEN_ENC_PUBLIC_KEY_ENV)?,
    }))
}
