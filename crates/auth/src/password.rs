use crate::error::{AuthError, Result};

/// bcrypt work factor used for new hashes
pub const BCRYPT_COST: u32 = 10;

pub struct PasswordHasher;

impl PasswordHasher {
    /// Hash a password using bcrypt
    pub fn hash(password: &str) -> Result<String> {
        Self::validate_password(password)?;

        Ok(bcrypt::hash(password, BCRYPT_COST)?)
    }

    /// Verify a password against a stored hash
    pub fn verify(password: &str, hash: &str) -> Result<bool> {
        Ok(bcrypt::verify(password, hash)?)
    }

    fn validate_password(password: &str) -> Result<()> {
        let min_length = std::env::var("PASSWORD_MIN_LENGTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8);

        if password.chars().count() < min_length {
            return Err(AuthError::WeakPassword(format!(
                "Password must be at least {} characters",
                min_length
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "consigna-2024";
        let hash = PasswordHasher::hash(password).expect("Failed to hash password");

        assert!(hash.starts_with("$2"));
        assert!(PasswordHasher::verify(password, &hash).unwrap());
        assert!(!PasswordHasher::verify("consigna-2025", &hash).unwrap());
    }

    #[test]
    fn test_short_password_rejected() {
        assert!(matches!(
            PasswordHasher::hash("short"),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_verify_with_malformed_hash() {
        assert!(matches!(
            PasswordHasher::verify("whatever1", "not-a-bcrypt-hash"),
            Err(AuthError::PasswordHashError(_))
        ));
    }
}
