//! Password hashing shared by staff accounts and members.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;

use crate::config::MIN_PASSWORD_LENGTH;
use crate::errors::{AppError, AppResult};

/// Hash verified against when the login name is unknown, so a miss costs
/// the same as a wrong password.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| Password::hash("dummy-password-for-timing").ok());

/// Argon2 password hash.
#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    hash: String,
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plain-text password after checking its minimum length.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        if plain_text.chars().count() < MIN_PASSWORD_LENGTH as usize {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let hash = Self::hash(plain_text)?;
        Ok(Self { hash })
    }

    /// Wrap a stored hash.
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn into_string(self) -> String {
        self.hash
    }

    pub fn verify(&self, plain_text: &str) -> bool {
        Self::verify_hash(plain_text, &self.hash).unwrap_or(false)
    }

    /// Verify against a stored hash, or burn a dummy verification when there
    /// is none. Always false in the latter case.
    pub fn verify_or_dummy(stored: Option<&str>, plain_text: &str) -> bool {
        match stored {
            Some(hash) => Self::verify_hash(plain_text, hash).unwrap_or(false),
            None => {
                if let Some(dummy) = DUMMY_HASH.as_deref() {
                    let _ = Self::verify_hash(plain_text, dummy);
                }
                false
            }
        }
    }

    fn hash(plain_text: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_hash(plain_text: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid hash format: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok())
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let password = Password::new("cashier-pass-1").unwrap();
        assert!(password.verify("cashier-pass-1"));
        assert!(!password.verify("cashier-pass-2"));
    }

    #[test]
    fn restored_hash_still_verifies() {
        let password = Password::new("restored-pass").unwrap();
        let restored = Password::from_hash(password.as_str().to_string());
        assert!(restored.verify("restored-pass"));
    }

    #[test]
    fn salts_differ() {
        let a = Password::new("same-password").unwrap();
        let b = Password::new("same-password").unwrap();
        assert_ne!(a.as_str(), b.as_str());
    }

    #[test]
    fn too_short_is_rejected() {
        assert!(Password::new("short").is_err());
        assert!(Password::new("12345678").is_ok());
    }

    #[test]
    fn missing_hash_never_verifies() {
        assert!(!Password::verify_or_dummy(None, "anything-at-all"));
        let password = Password::new("member-pass").unwrap();
        assert!(Password::verify_or_dummy(Some(password.as_str()), "member-pass"));
    }
}
