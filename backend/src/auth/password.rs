//! Credential digests and the stored-credential format state machine
//!
//! The user store carries credentials in three historical encodings,
//! inherited from the stacks that ran this shop before. A single
//! classification produces a closed enum and every verification
//! dispatches on it; no call site inspects the raw string shape.
//!
//! All comparisons are constant-time, and every branch reports failure
//! through the same `Verification::Rejected`, so a caller (or an
//! attacker) cannot tell which encoding a stored credential uses.

use sha2::{Digest, Sha256};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Encoding of a stored credential, recovered from the string's shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialFormat {
    /// bcrypt hash from the pre-migration stack (`$2y$`/`$2b$` prefix).
    /// No bcrypt engine is available; these accounts fail verification
    /// until an out-of-band password reset.
    LegacyIncompatible,
    /// 64 hex characters: our salted SHA-256 digest
    Strong,
    /// Anything else: a plaintext credential from the oldest accounts,
    /// rewritten to the strong form on the next successful login
    PlaintextLegacy,
}

impl CredentialFormat {
    /// Classify a stored credential by its shape
    pub fn classify(stored: &str) -> Self {
        if stored.starts_with("$2y$") || stored.starts_with("$2b$") {
            CredentialFormat::LegacyIncompatible
        } else if stored.len() == 64 && stored.bytes().all(|b| b.is_ascii_hexdigit()) {
            CredentialFormat::Strong
        } else {
            CredentialFormat::PlaintextLegacy
        }
    }
}

/// Outcome of verifying a login attempt against a stored credential
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// Attempt does not match, or the stored format cannot be verified
    Rejected,
    /// Attempt matches a credential already in the strong format
    Valid,
    /// Attempt matches a legacy credential; the caller must rewrite the
    /// stored value with [`PasswordService::digest`]
    ValidNeedsUpgrade,
}

impl Verification {
    pub fn is_valid(self) -> bool {
        !matches!(self, Verification::Rejected)
    }
}

/// Salted-digest service for credential hashing and verification
///
/// Pure computation, no I/O. Built once from configuration at startup
/// and shared through AppState.
#[derive(Clone)]
pub struct PasswordService {
    salt: Arc<str>,
}

impl PasswordService {
    pub fn new(salt: &str) -> Self {
        Self { salt: salt.into() }
    }

    /// Compute the strong-form digest of a password: lowercase hex of
    /// SHA-256 over the password concatenated with the site salt.
    /// Always 64 hex characters, the shape `CredentialFormat::Strong`
    /// recognizes.
    pub fn digest(&self, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        hasher.update(self.salt.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Verify a login attempt against the stored credential
    ///
    /// Legacy rows written by the old stack may carry NUL padding and
    /// trailing whitespace; the stored value is cleaned before
    /// classification.
    pub fn verify(&self, attempt: &str, stored: &str) -> Verification {
        let cleaned = clean_stored(stored);

        match CredentialFormat::classify(&cleaned) {
            CredentialFormat::LegacyIncompatible => {
                // Burn the same digest work as the strong branch so the
                // rejection timing does not reveal the stored format.
                let _ = self.digest(attempt);
                Verification::Rejected
            }
            CredentialFormat::Strong => {
                if constant_time_eq(self.digest(attempt).as_bytes(), cleaned.as_bytes()) {
                    Verification::Valid
                } else {
                    Verification::Rejected
                }
            }
            CredentialFormat::PlaintextLegacy => {
                if constant_time_eq(attempt.as_bytes(), cleaned.as_bytes()) {
                    Verification::ValidNeedsUpgrade
                } else {
                    Verification::Rejected
                }
            }
        }
    }
}

/// Strip NUL padding and surrounding whitespace from a stored value
fn clean_stored(stored: &str) -> String {
    stored.replace('\0', "").trim().to_string()
}

/// Constant-time comparison of two byte slices
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
