/// Bearer-token issuing and validation (HS256)
///
/// Litaria issues and validates its own tokens, so a single shared secret
/// is sufficient; the config layer refuses the default secret in
/// production.
use crate::error::Result;
use crate::models::User;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims carried by Litaria access tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Email address
    pub email: String,
    /// Display name
    pub name: String,
}

/// Issue an access token for an authenticated user.
pub fn issue_token(secret: &str, user: &User, expiry_hours: i64) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(expiry_hours)).timestamp(),
        email: user.email.clone(),
        name: user.name.clone(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Validate a token and return its claims. Expired or tampered tokens fail
/// with an authentication error.
pub fn validate_token(secret: &str, token: &str) -> Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Ayesha".to_string(),
            email: "ayesha@example.com".to_string(),
            password_hash: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn issued_tokens_validate_with_same_secret() {
        let user = test_user();
        let token = issue_token("secret-a", &user, 24).unwrap();
        let claims = validate_token("secret-a", &token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, user.email);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_token("secret-a", &test_user(), 24).unwrap();
        assert!(validate_token("secret-b", &token).is_err());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let token = issue_token("secret-a", &test_user(), -1).unwrap();
        assert!(validate_token("secret-a", &token).is_err());
    }
}
