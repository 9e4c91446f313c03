// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Greeting Service - Token-Secured Greeting API
//!
//! A small CRUD service for greetings, secured with signed-then-encrypted
//! bearer tokens issued at login.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token issuance, validation and request middleware
//! - `cache` - In-process TTL cache
//! - `store` - In-memory greeting and user store

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
