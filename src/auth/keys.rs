// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! RSA key material for token signing and encryption.
//!
//! Keys are loaded once at startup from PEM files (PKCS#8 private,
//! SPKI public) and shared read-only for the lifetime of the token
//! service. Tests and the dev fallback generate ephemeral pairs.

use std::path::Path;

use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("failed to read key file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse private key: {0}")]
    PrivateKey(#[from] rsa::pkcs8::Error),
    #[error("failed to parse public key: {0}")]
    PublicKey(#[from] rsa::pkcs8::spki::Error),
    #[error("key generation failed: {0}")]
    Generate(#[from] rsa::Error),
}

/// An RSA private/public key pair.
#[derive(Debug, Clone)]
pub struct RsaKeyPair {
    pub private_key: RsaPrivateKey,
    pub public_key: RsaPublicKey,
}

impl RsaKeyPair {
    /// Load a key pair from PEM files.
    pub fn from_pem_files(private_path: &Path, public_path: &Path) -> Result<Self, KeyError> {
        let private_pem = read_file(private_path)?;
        let private_key = RsaPrivateKey::from_pkcs8_pem(&private_pem)?;

        let public_pem = read_file(public_path)?;
        let public_key = RsaPublicKey::from_public_key_pem(&public_pem)?;

        Ok(Self {
            private_key,
            public_key,
        })
    }

    /// Generate a fresh key pair.
    ///
    /// Used by tests and as the dev fallback when no key files are
    /// configured; production deployments load PEM files instead.
    pub fn generate(bits: usize) -> Result<Self, KeyError> {
        let mut rng = rand::thread_rng();
        let private_key = RsaPrivateKey::new(&mut rng, bits)?;
        let public_key = RsaPublicKey::from(&private_key);
        Ok(Self {
            private_key,
            public_key,
        })
    }
}

fn read_file(path: &Path) -> Result<String, KeyError> {
    std::fs::read_to_string(path).map_err(|source| KeyError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Shared signing/encryption pairs for tests.
///
/// RSA key generation is slow in debug builds, so tests share one
/// lazily generated set instead of generating per test.
#[cfg(test)]
pub(crate) fn test_key_pairs() -> &'static (RsaKeyPair, RsaKeyPair) {
    use std::sync::OnceLock;

    static KEYS: OnceLock<(RsaKeyPair, RsaKeyPair)> = OnceLock::new();
    KEYS.get_or_init(|| {
        (
            RsaKeyPair::generate(2048).expect("signing key generation"),
            RsaKeyPair::generate(2048).expect("encryption key generation"),
        )
    })
}
