// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Compact JWS/JWE serialization.
//!
//! Exactly one algorithm suite is supported: RS256 signatures and
//! RSA-OAEP-256 key wrap with A256GCM content encryption. Parsing
//! rejects any token declaring a different algorithm before touching
//! key material, which closes off algorithm-confusion attacks.

use aes_gcm::aead::{Aead, Payload};
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, RngCore};
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use thiserror::Error;

pub const JWS_ALG: &str = "RS256";
pub const JWE_ALG: &str = "RSA-OAEP-256";
pub const JWE_ENC: &str = "A256GCM";

const CEK_LEN: usize = 32;
const IV_LEN: usize = 12;
const TAG_LEN: usize = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum JoseError {
    #[error("malformed compact serialization")]
    Malformed,
    #[error("unexpected algorithm in header")]
    AlgorithmMismatch,
    #[error("signing failed")]
    Sign,
    #[error("signature verification failed")]
    Verify,
    #[error("key encryption failed")]
    EncryptKey,
    #[error("key decryption failed")]
    DecryptKey,
    #[error("content encryption failed")]
    EncryptContent,
    #[error("content decryption failed")]
    DecryptContent,
}

/// Sign `payload` as an RS256 compact JWS.
pub fn sign_compact(payload: &[u8], key: &RsaPrivateKey) -> Result<String, JoseError> {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload);
    let signing_input = format!("{header}.{body}");

    let signing_key = SigningKey::<Sha256>::new(key.clone());
    let signature: Signature = signing_key
        .try_sign(signing_input.as_bytes())
        .map_err(|_| JoseError::Sign)?;

    let encoded_signature = URL_SAFE_NO_PAD.encode(signature.to_vec());
    Ok(format!("{signing_input}.{encoded_signature}"))
}

/// Verify an RS256 compact JWS and return its payload bytes.
pub fn verify_compact(token: &str, key: &RsaPublicKey) -> Result<Vec<u8>, JoseError> {
    let parts: Vec<&str> = token.split('.').collect();
    let [header, body, signature] = parts.as_slice() else {
        return Err(JoseError::Malformed);
    };

    check_header(header, &[("alg", JWS_ALG)])?;

    let payload = URL_SAFE_NO_PAD
        .decode(body)
        .map_err(|_| JoseError::Malformed)?;
    let signature_bytes = URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|_| JoseError::Malformed)?;
    let signature = Signature::try_from(signature_bytes.as_slice()).map_err(|_| JoseError::Verify)?;

    let signing_input = format!("{header}.{body}");
    let verifying_key = VerifyingKey::<Sha256>::new(key.clone());
    verifying_key
        .verify(signing_input.as_bytes(), &signature)
        .map_err(|_| JoseError::Verify)?;

    Ok(payload)
}

/// Encrypt `plaintext` as an RSA-OAEP-256 / A256GCM compact JWE.
pub fn encrypt_compact(plaintext: &[u8], key: &RsaPublicKey) -> Result<String, JoseError> {
    let protected = URL_SAFE_NO_PAD.encode(r#"{"alg":"RSA-OAEP-256","enc":"A256GCM"}"#);

    let mut cek = [0u8; CEK_LEN];
    OsRng.fill_bytes(&mut cek);
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);

    let encrypted_key = key
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), &cek)
        .map_err(|_| JoseError::EncryptKey)?;

    let cipher = Aes256Gcm::new_from_slice(&cek).map_err(|_| JoseError::EncryptContent)?;
    // The protected header doubles as GCM additional authenticated data,
    // binding the header to the ciphertext.
    let sealed = cipher
        .encrypt(
            Nonce::from_slice(&iv),
            Payload {
                msg: plaintext,
                aad: protected.as_bytes(),
            },
        )
        .map_err(|_| JoseError::EncryptContent)?;

    let (ciphertext, tag) = sealed.split_at(sealed.len() - TAG_LEN);

    Ok(format!(
        "{protected}.{}.{}.{}.{}",
        URL_SAFE_NO_PAD.encode(encrypted_key),
        URL_SAFE_NO_PAD.encode(iv),
        URL_SAFE_NO_PAD.encode(ciphertext),
        URL_SAFE_NO_PAD.encode(tag),
    ))
}

/// Decrypt an RSA-OAEP-256 / A256GCM compact JWE and return the plaintext.
pub fn decrypt_compact(token: &str, key: &RsaPrivateKey) -> Result<Vec<u8>, JoseError> {
    let parts: Vec<&str> = token.split('.').collect();
    let [protected, encrypted_key, iv, ciphertext, tag] = parts.as_slice() else {
        return Err(JoseError::Malformed);
    };

    check_header(protected, &[("alg", JWE_ALG), ("enc", JWE_ENC)])?;

    let encrypted_key = URL_SAFE_NO_PAD
        .decode(encrypted_key)
        .map_err(|_| JoseError::Malformed)?;
    let iv = URL_SAFE_NO_PAD.decode(iv).map_err(|_| JoseError::Malformed)?;
    let ciphertext = URL_SAFE_NO_PAD
        .decode(ciphertext)
        .map_err(|_| JoseError::Malformed)?;
    let tag = URL_SAFE_NO_PAD.decode(tag).map_err(|_| JoseError::Malformed)?;

    if iv.len() != IV_LEN || tag.len() != TAG_LEN {
        return Err(JoseError::Malformed);
    }

    let cek = key
        .decrypt(Oaep::new::<Sha256>(), &encrypted_key)
        .map_err(|_| JoseError::DecryptKey)?;

    let cipher = Aes256Gcm::new_from_slice(&cek).map_err(|_| JoseError::DecryptContent)?;
    let mut sealed = ciphertext;
    sealed.extend_from_slice(&tag);
    cipher
        .decrypt(
            Nonce::from_slice(&iv),
            Payload {
                msg: &sealed,
                aad: protected.as_bytes(),
            },
        )
        .map_err(|_| JoseError::DecryptContent)
}

/// Decode a base64url header and require exact matches for the given fields.
fn check_header(encoded: &str, expected: &[(&str, &str)]) -> Result<(), JoseError> {
    let header_bytes = URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|_| JoseError::Malformed)?;
    let header: serde_json::Value =
        serde_json::from_slice(&header_bytes).map_err(|_| JoseError::Malformed)?;

    for (field, value) in expected {
        if header.get(*field).and_then(|v| v.as_str()) != Some(*value) {
            return Err(JoseError::AlgorithmMismatch);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::keys::test_key_pairs;

    #[test]
    fn sign_verify_round_trip() {
        let keys = &test_key_pairs().0;
        let token = sign_compact(b"hello claims", &keys.private_key).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let payload = verify_compact(&token, &keys.public_key).unwrap();
        assert_eq!(payload, b"hello claims");
    }

    #[test]
    fn verify_rejects_tampered_payload() {
        let keys = &test_key_pairs().0;
        let token = sign_compact(b"hello claims", &keys.private_key).unwrap();

        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        parts[1] = URL_SAFE_NO_PAD.encode(b"other claims");
        let tampered = parts.join(".");

        assert_eq!(
            verify_compact(&tampered, &keys.public_key),
            Err(JoseError::Verify)
        );
    }

    #[test]
    fn verify_rejects_wrong_key() {
        let (sign_keys, enc_keys) = test_key_pairs();
        let token = sign_compact(b"hello", &sign_keys.private_key).unwrap();

        assert_eq!(
            verify_compact(&token, &enc_keys.public_key),
            Err(JoseError::Verify)
        );
    }

    #[test]
    fn verify_rejects_foreign_algorithm() {
        let keys = &test_key_pairs().0;
        let token = sign_compact(b"hello", &keys.private_key).unwrap();

        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        parts[0] = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS384","typ":"JWT"}"#);
        let swapped = parts.join(".");

        assert_eq!(
            verify_compact(&swapped, &keys.public_key),
            Err(JoseError::AlgorithmMismatch)
        );
    }

    #[test]
    fn verify_rejects_wrong_part_count() {
        let keys = &test_key_pairs().0;
        assert_eq!(
            verify_compact("only.two", &keys.public_key),
            Err(JoseError::Malformed)
        );
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let keys = &test_key_pairs().1;
        let token = encrypt_compact(b"signed payload", &keys.public_key).unwrap();
        assert_eq!(token.split('.').count(), 5);

        let plaintext = decrypt_compact(&token, &keys.private_key).unwrap();
        assert_eq!(plaintext, b"signed payload");
    }

    #[test]
    fn decrypt_rejects_tampered_ciphertext() {
        let keys = &test_key_pairs().1;
        let token = encrypt_compact(b"signed payload", &keys.public_key).unwrap();

        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        let mut ciphertext = URL_SAFE_NO_PAD.decode(&parts[3]).unwrap();
        ciphertext[0] ^= 0x01;
        parts[3] = URL_SAFE_NO_PAD.encode(&ciphertext);
        let tampered = parts.join(".");

        assert_eq!(
            decrypt_compact(&tampered, &keys.private_key),
            Err(JoseError::DecryptContent)
        );
    }

    #[test]
    fn decrypt_rejects_header_change_via_aad() {
        let keys = &test_key_pairs().1;
        let token = encrypt_compact(b"signed payload", &keys.public_key).unwrap();

        // Same algorithms, different header bytes: the AAD no longer matches.
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        parts[0] = URL_SAFE_NO_PAD.encode(r#"{"enc":"A256GCM","alg":"RSA-OAEP-256"}"#);
        let reordered = parts.join(".");

        assert_eq!(
            decrypt_compact(&reordered, &keys.private_key),
            Err(JoseError::DecryptContent)
        );
    }

    #[test]
    fn decrypt_rejects_foreign_algorithms() {
        let keys = &test_key_pairs().1;
        let token = encrypt_compact(b"signed payload", &keys.public_key).unwrap();

        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        parts[0] = URL_SAFE_NO_PAD.encode(r#"{"alg":"RSA1_5","enc":"A256GCM"}"#);
        assert_eq!(
            decrypt_compact(&parts.join("."), &keys.private_key),
            Err(JoseError::AlgorithmMismatch)
        );

        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        parts[0] = URL_SAFE_NO_PAD.encode(r#"{"alg":"RSA-OAEP-256","enc":"A128GCM"}"#);
        assert_eq!(
            decrypt_compact(&parts.join("."), &keys.private_key),
            Err(JoseError::AlgorithmMismatch)
        );
    }

    #[test]
    fn decrypt_rejects_wrong_key() {
        let (sign_keys, enc_keys) = test_key_pairs();
        let token = encrypt_compact(b"signed payload", &enc_keys.public_key).unwrap();

        assert_eq!(
            decrypt_compact(&token, &sign_keys.private_key),
            Err(JoseError::DecryptKey)
        );
    }
}
