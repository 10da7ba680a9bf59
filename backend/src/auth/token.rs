//! Token issuance and verification
//!
//! Tokens are a three-part `header.payload.signature` string. Header
//! and payload are base64url-encoded JSON (no padding); the signature
//! is the base64url SHA-256 digest of `"<header>.<payload>.<secret>"`.
//! Any bit change to header or payload invalidates the signature.
//!
//! The codec is pure computation with no I/O, so it is testable
//! independently of the user store. One codec, one lifetime: every
//! route issues and verifies tokens through this service.

use anyhow::Result;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Token header, fixed for every issued token
#[derive(Debug, Serialize, Deserialize)]
struct TokenHeader {
    alg: String,
    typ: String,
}

impl TokenHeader {
    fn new() -> Self {
        Self {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
        }
    }
}

/// Token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject user id
    #[serde(rename = "userId")]
    pub user_id: i64,
    /// Subject email
    pub email: String,
    /// Subject role id
    pub role: i16,
    /// Issued-at (Unix timestamp, seconds)
    #[serde(rename = "issuedAt")]
    pub issued_at: i64,
    /// Expiry (Unix timestamp, seconds); validity requires now < expiresAt
    #[serde(rename = "expiresAt")]
    pub expires_at: i64,
}

/// Token codec service
///
/// Built once from configuration at startup and shared through
/// AppState; the secret never leaves this type.
#[derive(Clone)]
pub struct TokenService {
    secret: Arc<str>,
    lifetime_secs: i64,
}

impl TokenService {
    pub fn new(secret: &str, lifetime_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            lifetime_secs,
        }
    }

    /// Token validity window in seconds
    #[inline]
    pub fn lifetime_secs(&self) -> i64 {
        self.lifetime_secs
    }

    /// Issue a token for a verified identity
    pub fn issue(&self, user_id: i64, email: &str, role: i16) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id,
            email: email.to_string(),
            role,
            issued_at: now,
            expires_at: now + self.lifetime_secs,
        };

        let header = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&TokenHeader::new())?);
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
        let signature = self.sign(&header, &payload);

        Ok(format!("{}.{}.{}", header, payload, signature))
    }

    /// Verify a token and return its claims
    ///
    /// Returns `None` on any failure: wrong shape, signature mismatch,
    /// undecodable payload, or expiry. Callers get no detail about
    /// which check rejected the token.
    pub fn verify(&self, token: &str) -> Option<Claims> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify against an explicit clock, so expiry is testable
    fn verify_at(&self, token: &str, now: i64) -> Option<Claims> {
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 3 {
            return None;
        }
        let (header, payload, signature) = (parts[0], parts[1], parts[2]);

        let expected = self.sign(header, payload);
        if !bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
            return None;
        }

        let payload_bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
        let claims: Claims = serde_json::from_slice(&payload_bytes).ok()?;

        if now >= claims.expires_at {
            return None;
        }

        Some(claims)
    }

    /// Compute the signature segment for an encoded header and payload
    fn sign(&self, header: &str, payload: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(header.as_bytes());
        hasher.update(b".");
        hasher.update(payload.as_bytes());
        hasher.update(b".");
        hasher.update(self.secret.as_bytes());
        URL_SAFE_NO_PAD.encode(hasher.finalize())
    }
}
