// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and the issued-token envelope.

use serde::{Deserialize, Serialize};

/// Claims carried inside a token.
///
/// All temporal and identity fields are set by the token service at
/// issuance; callers only supply `subject` and `authorities`. Claims are
/// immutable once issued; validation only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Principal the token was issued for.
    #[serde(rename = "sub")]
    pub subject: String,
    /// Role names granted to the principal. May be empty.
    pub authorities: Vec<String>,
    /// Issuance time (Unix seconds).
    #[serde(rename = "iat")]
    pub issued_at: i64,
    /// Expiry time (Unix seconds). Valid through this instant inclusive.
    #[serde(rename = "exp")]
    pub expires_at: i64,
    /// Not-before time (Unix seconds).
    #[serde(rename = "nbf")]
    pub not_before: i64,
    /// Unique token id, fresh per issuance. Traceability only.
    #[serde(rename = "jti")]
    pub token_id: String,
    /// Issuer, static per deployment.
    #[serde(rename = "iss")]
    pub issuer: String,
}

impl TokenClaims {
    /// Check whether a given authority was granted.
    pub fn has_authority(&self, required: &str) -> bool {
        self.authorities.iter().any(|a| a == required)
    }
}

/// Result of a successful token issuance.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Compact serialized JWE string.
    pub access_token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}
