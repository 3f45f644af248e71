/// Password hashing and verification using Argon2id
use crate::error::{AppError, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a password using Argon2id with a random per-password salt.
///
/// Returns a PHC-formatted hash string safe for database storage. Rejects
/// passwords that fail the strength policy.
pub fn hash_password(password: &str) -> Result<String> {
    validate_password_strength(password)?;

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against its stored PHC hash.
///
/// Uses the constant-time comparison provided by the argon2 crate. A
/// mismatched password is `Ok(false)`, not an error.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash format: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::Internal(format!(
            "Password verification failed: {}",
            e
        ))),
    }
}

/// Validate password strength using composition rules.
///
/// Requirements: minimum 8 characters, at least one uppercase letter, one
/// lowercase letter, and one digit.
fn validate_password_strength(password: &str) -> Result<()> {
    if password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let has_uppercase = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lowercase = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !has_uppercase {
        return Err(AppError::Validation(
            "Password must contain at least one uppercase letter".to_string(),
        ));
    }
    if !has_lowercase {
        return Err(AppError::Validation(
            "Password must contain at least one lowercase letter".to_string(),
        ));
    }
    if !has_digit {
        return Err(AppError::Validation(
            "Password must contain at least one digit".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("Correct1Horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("Correct1Horse", &hash).unwrap());
        assert!(!verify_password("Wrong1Horse", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("Correct1Horse").unwrap();
        let b = hash_password("Correct1Horse").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn weak_passwords_are_rejected() {
        assert!(hash_password("Short1").is_err());
        assert!(hash_password("alllowercase1").is_err());
        assert!(hash_password("ALLUPPERCASE1").is_err());
        assert!(hash_password("NoDigitsHere").is_err());
    }

    #[test]
    fn malformed_hash_is_an_error_not_a_mismatch() {
        assert!(verify_password("whatever", "not-a-phc-string").is_err());
    }
}
