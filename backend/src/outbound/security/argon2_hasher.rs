//! Argon2id password hashing adapter.

use argon2::Argon2;
use argon2::password_hash::{
    Error as HashError, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
};
use rand::RngCore;

use crate::domain::PasswordDigest;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Salt length in bytes.
const SALT_LEN: usize = 16;

/// Hashes passwords with Argon2id default parameters into PHC strings.
#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<PasswordDigest, PasswordHashError> {
        let mut salt_bytes = [0_u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|err| PasswordHashError::hash(err.to_string()))?;
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| PasswordHashError::hash(err.to_string()))?;
        Ok(PasswordDigest::new(hash.to_string()))
    }

    fn verify(&self, password: &str, digest: &PasswordDigest) -> Result<bool, PasswordHashError> {
        let parsed = PasswordHash::new(digest.as_str())
            .map_err(|err| PasswordHashError::malformed_digest(err.to_string()))?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(err) => Err(PasswordHashError::hash(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Argon2PasswordHasher {
        Argon2PasswordHasher::new()
    }

    #[rstest]
    fn hashes_verify_against_the_original_password(hasher: Argon2PasswordHasher) {
        let digest = hasher.hash("password123").expect("hash");

        assert!(digest.as_str().starts_with("$argon2id$"));
        assert!(hasher.verify("password123", &digest).expect("verify"));
        assert!(!hasher.verify("password124", &digest).expect("verify"));
    }

    #[rstest]
    fn salts_differ_between_hashes(hasher: Argon2PasswordHasher) {
        let first = hasher.hash("secret1").expect("hash");
        let second = hasher.hash("secret1").expect("hash");

        assert_ne!(first, second);
    }

    #[rstest]
    fn malformed_digests_are_reported(hasher: Argon2PasswordHasher) {
        let error = hasher
            .verify("secret1", &PasswordDigest::new("not-a-phc-string"))
            .expect_err("malformed digest");

        assert!(matches!(error, PasswordHashError::MalformedDigest { .. }));
    }
}
