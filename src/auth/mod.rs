// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Self-contained token authentication for the greeting API.
//!
//! ## Token Flow
//!
//! 1. Client logs in with username and password at `/api/auth/login`
//! 2. [`TokenService`] issues a signed-then-encrypted token:
//!    claims → RS256 JWS → RSA-OAEP-256 / A256GCM JWE
//! 3. Client sends `Authorization: Bearer <token>` on API requests
//! 4. [`middleware::require_auth`] decrypts, verifies and time-checks
//!    the token, then stores the claims in the request extensions
//! 5. [`middleware::require_authority`] gates individual routes on a
//!    required role
//!
//! ## Security
//!
//! - Validation is stateless; no token is stored server-side
//! - Algorithm headers are pinned, tokens using any other algorithm
//!   are rejected before key material is touched
//! - No clock skew leeway; a token is valid through `exp` inclusive

pub mod claims;
pub mod error;
pub mod keys;
pub mod middleware;
pub mod roles;
pub mod token;

mod jose;

pub use claims::{IssuedToken, TokenClaims};
pub use error::AuthError;
pub use keys::{KeyError, RsaKeyPair};
pub use token::{Clock, IssueError, SystemClock, TokenError, TokenService};
