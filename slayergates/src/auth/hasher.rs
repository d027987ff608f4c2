//! Credential hashing.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::errors::{CoreError, CoreResult};

/// Hash-and-verify capability used by the account manager
pub trait CredentialHasher: Send + Sync {
    /// Produce a self-describing hash of `secret`
    fn hash(&self, secret: &str) -> CoreResult<String>;

    /// True if `secret` matches `hash`
    fn verify(&self, secret: &str, hash: &str) -> bool;
}

/// Argon2id hasher with a server-side pepper
#[derive(Clone)]
pub struct Argon2Hasher {
    pepper: String,
}

impl Argon2Hasher {
    /// Create a hasher
    ///
    /// # Arguments
    ///
    /// * `pepper` - Server-side secret appended to every password before hashing
    pub fn new(pepper: impl Into<String>) -> Self {
        Self {
            pepper: pepper.into(),
        }
    }

    fn peppered(&self, secret: &str) -> String {
        format!("{}{}", secret, self.pepper)
    }
}

impl std::fmt::Debug for Argon2Hasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argon2Hasher")
            .field("pepper", &"<redacted>")
            .finish()
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, secret: &str) -> CoreResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(self.peppered(secret).as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| CoreError::HashingFailed)
    }

    fn verify(&self, secret: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(self.peppered(secret).as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = Argon2Hasher::new("pepper-for-tests-only");
        let hash = hasher.hash("Xq7#Lm2!Rt9$").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("Xq7#Lm2!Rt9$", &hash));
        assert!(!hasher.verify("Xq7#Lm2!Rt9%", &hash));
    }

    #[test]
    fn test_pepper_is_part_of_the_secret() {
        let hash = Argon2Hasher::new("pepper-one-abcdef").hash("secret-pass").unwrap();
        assert!(!Argon2Hasher::new("pepper-two-abcdef").verify("secret-pass", &hash));
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        let hasher = Argon2Hasher::new("pepper");
        assert!(!hasher.verify("anything", "not-a-phc-string"));
    }

    #[test]
    fn test_debug_redacts_pepper() {
        let debug = format!("{:?}", Argon2Hasher::new("top-secret-pepper"));
        assert!(!debug.contains("top-secret"));
    }
}
