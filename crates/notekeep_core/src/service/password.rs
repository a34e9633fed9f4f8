//! Argon2id password hashing.
//!
//! # Invariants
//! - Every hash gets a fresh random salt and is stored as a PHC string.
//! - Cost parameters are fixed per hasher instance.
//! - Verification compares digests in constant time (argon2 verifier).
//! - The decoy hash exists from construction on, so every decoy check costs
//!   exactly one verification.

use crate::config::{ConfigError, PasswordHashConfig};
use crate::error::CoreResult;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash, PasswordHashString, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::{Algorithm, Argon2, Version};
use log::warn;

const DECOY_PASSWORD: &str = "notekeep-decoy-credential";

/// One-way salted password hasher.
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
    decoy_hash: PasswordHashString,
}

impl CredentialHasher {
    /// Builds a hasher with fixed cost parameters.
    ///
    /// # Errors
    /// - Returns `ConfigError::InvalidPasswordHash` for out-of-range costs or
    ///   when the decoy hash cannot be computed with them.
    pub fn new(config: PasswordHashConfig) -> Result<Self, ConfigError> {
        let params = config.to_params()?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let salt = SaltString::generate(&mut OsRng);
        let decoy_hash = argon2
            .hash_password(DECOY_PASSWORD.as_bytes(), &salt)
            .map_err(|err| ConfigError::InvalidPasswordHash(err.to_string()))?
            .serialize();

        Ok(Self { argon2, decoy_hash })
    }

    /// Hashes `password` with a freshly generated salt.
    pub fn hash(&self, password: &str) -> CoreResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self.argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    /// Returns whether `password` matches `stored_hash`.
    ///
    /// An unparsable stored hash counts as a mismatch.
    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        match PasswordHash::new(stored_hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(err) => {
                warn!(
                    "event=credential_verify module=credentials status=error error_code=stored_hash_unparsable error={}",
                    err
                );
                false
            }
        }
    }

    /// Spends one verification's worth of work against a throwaway hash.
    ///
    /// Called for unknown usernames so their latency matches a wrong password.
    pub fn verify_decoy(&self, password: &str) {
        let _ = self
            .argon2
            .verify_password(password.as_bytes(), &self.decoy_hash.password_hash());
    }
}
