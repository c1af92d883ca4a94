//! The persisted editor credential.
//!
//! A single shared password guards the whole editor. Its derived hash and
//! salt live in `auth.json` next to the site data; the record is created on
//! first startup from an operator-supplied password and never rotated.

use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// PBKDF2-HMAC-SHA256 rounds. Changing this invalidates every persisted
/// credential record, so it is fixed for the lifetime of the format.
const PBKDF2_ROUNDS: u32 = 100_000;

/// Derived key length in bytes.
const KEY_LEN: usize = 32;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed credential file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no editor password set")]
    MissingPassword,
}

/// Salted password hash, stored as a single JSON object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    hash: String,
    salt: String,
}

impl Credentials {
    /// Load the credential record, or derive and persist one from
    /// `operator_password` when the file does not exist yet.
    ///
    /// Errors if the stored hash or salt is empty, or if no password is
    /// available on first startup — the server must not come up without an
    /// editor credential.
    pub fn load_or_init(
        path: &Path,
        operator_password: Option<&str>,
    ) -> Result<Self, CredentialError> {
        if path.exists() {
            let creds: Credentials = serde_json::from_str(&fs::read_to_string(path)?)?;
            if creds.hash.is_empty() || creds.salt.is_empty() {
                return Err(CredentialError::MissingPassword);
            }
            return Ok(creds);
        }

        let password = operator_password
            .filter(|p| !p.is_empty())
            .ok_or(CredentialError::MissingPassword)?;

        let mut salt_bytes = [0u8; 16];
        rand::thread_rng().fill(&mut salt_bytes);
        let salt = hex::encode(salt_bytes);

        let creds = Credentials {
            hash: derive_hash(password, &salt),
            salt,
        };
        fs::write(path, serde_json::to_string(&creds)?)?;
        Ok(creds)
    }

    /// Verify a login attempt against the stored hash.
    ///
    /// The recomputed digest is compared in constant time so response timing
    /// does not leak how much of the hash matched.
    pub fn verify(&self, password: &str) -> bool {
        let candidate = derive_hash(password, &self.salt);
        constant_time_eq(candidate.as_bytes(), self.hash.as_bytes())
    }
}

fn derive_hash(password: &str, salt: &str) -> String {
    let mut out = [0u8; KEY_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), PBKDF2_ROUNDS, &mut out);
    hex::encode(out)
}

/// Constant-time comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
