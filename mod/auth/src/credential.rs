//! Password credential storage.
//!
//! A credential is a (salt, hash) pair, both hex encoded at rest. The
//! plaintext password is never stored or logged. Hashing is
//! PBKDF2-HMAC-SHA-512 with a fresh 16-byte random salt per derivation.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha512;
use subtle::ConstantTimeEq;

const SALT_BYTES: usize = 16;
const ROUNDS: u32 = 1000;
const HASH_BYTES: usize = 64;

/// Salted one-way password hash stored on a user record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    #[serde(default)]
    pub salt: String,
    #[serde(default)]
    pub hash: String,
}

impl Credential {
    /// Derive a fresh credential from a plaintext password.
    ///
    /// Each call generates a new random salt, so deriving the same
    /// password twice yields different stored values.
    pub fn derive(password: &str) -> Self {
        let mut salt = [0u8; SALT_BYTES];
        rand::rngs::OsRng.fill_bytes(&mut salt);
        let hash = derive_hash(password, &salt);
        Credential {
            salt: hex::encode(salt),
            hash: hex::encode(hash),
        }
    }

    /// Verify a candidate password against the stored pair.
    ///
    /// Returns false — never an error — when the record has no
    /// credential or the stored fields don't decode. Comparison is
    /// constant-time.
    pub fn verify(&self, candidate: &str) -> bool {
        let Ok(salt) = hex::decode(&self.salt) else {
            return false;
        };
        let Ok(stored) = hex::decode(&self.hash) else {
            return false;
        };
        if salt.is_empty() || stored.len() != HASH_BYTES {
            return false;
        }
        let computed = derive_hash(candidate, &salt);
        computed[..].ct_eq(&stored[..]).into()
    }

    /// True when no password has ever been set on this record.
    pub fn is_unset(&self) -> bool {
        self.salt.is_empty() && self.hash.is_empty()
    }
}

fn derive_hash(password: &str, salt: &[u8]) -> [u8; HASH_BYTES] {
    let mut out = [0u8; HASH_BYTES];
    pbkdf2::pbkdf2_hmac::<Sha512>(password.as_bytes(), salt, ROUNDS, &mut out);
    out
}
