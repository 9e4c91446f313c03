// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance and validation.
//!
//! Tokens are signed then encrypted: the claims JSON is wrapped in an
//! RS256 compact JWS, and that string becomes the plaintext of an
//! RSA-OAEP-256 / A256GCM compact JWE. Validation mirrors the steps in
//! reverse: decrypt, verify, deserialize, then check the time window.
//! Verification is purely stateless; no token is stored server-side.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use super::claims::{IssuedToken, TokenClaims};
use super::jose::{self, JoseError};
use super::keys::RsaKeyPair;

/// Time source, injectable so expiry tests are deterministic.
pub trait Clock: Send + Sync {
    fn now_unix(&self) -> i64;
}

/// Wall-clock time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Failure while issuing a token. Indicates a server-side problem
/// (unencodable claims or bad key material), not a client fault.
#[derive(Debug, Error)]
pub enum IssueError {
    #[error("failed to serialize claims: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to sign claims: {0}")]
    Sign(JoseError),
    #[error("failed to encrypt payload: {0}")]
    Encrypt(JoseError),
}

/// Failure while validating a token. Every variant maps to an
/// unauthorized response; the variants only differ in which stage
/// rejected the token.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("failed to parse encrypted token")]
    MalformedEncrypted,
    #[error("failed to decrypt token")]
    Decrypt,
    #[error("failed to parse signed payload")]
    MalformedSigned,
    #[error("signature verification failed")]
    Signature,
    #[error("failed to deserialize claims")]
    Claims,
    #[error("token has expired")]
    Expired,
    #[error("token is not valid yet")]
    NotYetValid,
}

/// Issues and validates signed-then-encrypted bearer tokens.
///
/// Holds two read-only key pairs (signing, encryption) and may be shared
/// across concurrent requests without synchronization.
pub struct TokenService {
    sign_keys: RsaKeyPair,
    enc_keys: RsaKeyPair,
    token_duration: Duration,
    issuer: String,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(
        sign_keys: RsaKeyPair,
        enc_keys: RsaKeyPair,
        token_duration: Duration,
        issuer: impl Into<String>,
    ) -> Self {
        Self {
            sign_keys,
            enc_keys,
            token_duration,
            issuer: issuer.into(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source. Used by tests.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Issue a token for `subject` carrying `authorities`.
    ///
    /// All temporal fields derive from a single clock read, so
    /// `iat == nbf <= exp` holds by construction.
    pub fn issue(
        &self,
        subject: impl Into<String>,
        authorities: Vec<String>,
    ) -> Result<IssuedToken, IssueError> {
        let now = self.clock.now_unix();
        // Saturate instead of overflowing for absurdly large configured
        // durations; the token simply never expires.
        let lifetime = i64::try_from(self.token_duration.as_secs()).unwrap_or(i64::MAX);
        let claims = TokenClaims {
            subject: subject.into(),
            authorities,
            issued_at: now,
            expires_at: now.saturating_add(lifetime),
            not_before: now,
            token_id: Uuid::new_v4().to_string(),
            issuer: self.issuer.clone(),
        };

        let payload = serde_json::to_vec(&claims)?;
        let signed =
            jose::sign_compact(&payload, &self.sign_keys.private_key).map_err(IssueError::Sign)?;
        let access_token = jose::encrypt_compact(signed.as_bytes(), &self.enc_keys.public_key)
            .map_err(IssueError::Encrypt)?;

        Ok(IssuedToken {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: lifetime,
        })
    }

    /// Validate a compact token string and return its claims.
    ///
    /// Single pass, no retries: decrypt, verify signature, deserialize,
    /// temporal check. Any failing step rejects the whole token.
    pub fn validate(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let signed_bytes =
            jose::decrypt_compact(token, &self.enc_keys.private_key).map_err(|e| match e {
                JoseError::Malformed | JoseError::AlgorithmMismatch => {
                    TokenError::MalformedEncrypted
                }
                _ => TokenError::Decrypt,
            })?;
        let signed = String::from_utf8(signed_bytes).map_err(|_| TokenError::MalformedSigned)?;

        let payload =
            jose::verify_compact(&signed, &self.sign_keys.public_key).map_err(|e| match e {
                JoseError::Malformed | JoseError::AlgorithmMismatch => TokenError::MalformedSigned,
                _ => TokenError::Signature,
            })?;

        let claims: TokenClaims =
            serde_json::from_slice(&payload).map_err(|_| TokenError::Claims)?;

        // Strict comparisons: a token is still valid at exactly `exp`
        // and already valid at exactly `nbf`.
        let now = self.clock.now_unix();
        if now > claims.expires_at {
            return Err(TokenError::Expired);
        }
        if now < claims.not_before {
            return Err(TokenError::NotYetValid);
        }

        Ok(claims)
    }
}

#[cfg(test)]
pub(crate) struct FixedClock(pub i64);

#[cfg(test)]
impl Clock for FixedClock {
    fn now_unix(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::keys::test_key_pairs;

    const NOW: i64 = 1700000000;
    const DURATION_SECS: u64 = 3600;

    fn service_at(now: i64) -> TokenService {
        let (sign_keys, enc_keys) = test_key_pairs();
        TokenService::new(
            sign_keys.clone(),
            enc_keys.clone(),
            Duration::from_secs(DURATION_SECS),
            "greeting-service",
        )
        .with_clock(Arc::new(FixedClock(now)))
    }

    #[test]
    fn issue_populates_temporal_and_identity_fields() {
        let service = service_at(NOW);
        let token = service
            .issue("u1", vec!["ROLE_ADMIN".to_string()])
            .unwrap();

        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 3600);

        let claims = service.validate(&token.access_token).unwrap();
        assert_eq!(claims.subject, "u1");
        assert_eq!(claims.authorities, vec!["ROLE_ADMIN".to_string()]);
        assert_eq!(claims.issued_at, NOW);
        assert_eq!(claims.not_before, NOW);
        assert_eq!(claims.expires_at, NOW + 3600);
        assert_eq!(claims.issuer, "greeting-service");
        assert!(!claims.token_id.is_empty());
    }

    #[test]
    fn token_ids_are_unique_per_issuance() {
        let service = service_at(NOW);
        let first = service.issue("u1", vec![]).unwrap();
        let second = service.issue("u1", vec![]).unwrap();

        let first_claims = service.validate(&first.access_token).unwrap();
        let second_claims = service.validate(&second.access_token).unwrap();
        assert_ne!(first_claims.token_id, second_claims.token_id);
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let token = service_at(NOW).issue("u1", vec![]).unwrap();

        // Still valid at exactly exp.
        assert!(service_at(NOW + 3600).validate(&token.access_token).is_ok());
        // One second past exp is expired.
        assert_eq!(
            service_at(NOW + 3601).validate(&token.access_token),
            Err(TokenError::Expired)
        );
        // Just before exp is fine.
        assert!(service_at(NOW + 3599).validate(&token.access_token).is_ok());
    }

    #[test]
    fn token_is_rejected_before_not_before() {
        let token = service_at(NOW).issue("u1", vec![]).unwrap();

        assert_eq!(
            service_at(NOW - 1).validate(&token.access_token),
            Err(TokenError::NotYetValid)
        );
        // Valid at exactly nbf.
        assert!(service_at(NOW).validate(&token.access_token).is_ok());
    }

    #[test]
    fn flipping_bytes_never_yields_claims() {
        let service = service_at(NOW);
        let token = service.issue("u1", vec!["ROLE_ADMIN".to_string()]).unwrap();
        let original = token.access_token;

        // Corrupt one character at several positions across the compact
        // string; every mutation must be rejected at some stage.
        let len = original.len();
        for position in [0, len / 5, 2 * len / 5, 3 * len / 5, len - 1] {
            let mut bytes = original.clone().into_bytes();
            bytes[position] = if bytes[position] == b'A' { b'B' } else { b'A' };
            let Ok(tampered) = String::from_utf8(bytes) else {
                continue;
            };
            if tampered == original {
                continue;
            }
            assert!(
                service.validate(&tampered).is_err(),
                "corruption at {position} was accepted"
            );
        }
    }

    #[test]
    fn huge_duration_saturates_instead_of_overflowing() {
        let (sign_keys, enc_keys) = test_key_pairs();
        let service = TokenService::new(
            sign_keys.clone(),
            enc_keys.clone(),
            Duration::from_secs(u64::MAX),
            "greeting-service",
        )
        .with_clock(Arc::new(FixedClock(NOW)));

        let token = service.issue("u1", vec![]).unwrap();
        assert_eq!(token.expires_in, i64::MAX);

        let claims = service.validate(&token.access_token).unwrap();
        assert_eq!(claims.expires_at, i64::MAX);
    }

    #[test]
    fn non_claims_payload_fails_deserialization() {
        let (sign_keys, enc_keys) = test_key_pairs();
        let service = service_at(NOW);

        let signed = jose::sign_compact(b"{\"not\":\"claims\"}", &sign_keys.private_key).unwrap();
        let token = jose::encrypt_compact(signed.as_bytes(), &enc_keys.public_key).unwrap();

        assert_eq!(service.validate(&token), Err(TokenError::Claims));
    }

    #[test]
    fn plain_jws_is_rejected_as_malformed() {
        let (sign_keys, _) = test_key_pairs();
        let service = service_at(NOW);

        // A bare signed token (3 parts) is not a valid encrypted token.
        let signed = jose::sign_compact(b"{}", &sign_keys.private_key).unwrap();
        assert_eq!(
            service.validate(&signed),
            Err(TokenError::MalformedEncrypted)
        );
    }

    #[test]
    fn empty_authorities_round_trip() {
        let service = service_at(NOW);
        let token = service.issue("u1", vec![]).unwrap();
        let claims = service.validate(&token.access_token).unwrap();
        assert!(claims.authorities.is_empty());
    }
}
