use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// JWT Claims structure. Tokens are minted by the platform's auth service;
/// this service only needs to verify and read them.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Username
    pub uid: i32,    // User ID
    pub exp: usize,  // Expiration timestamp
}

/// Sign a new JWT token for a user. Used by tests and local tooling; in
/// production the auth service issues tokens with the shared secret.
pub fn sign(secret: &[u8], user_id: i32, username: &str) -> Result<String> {
    let expiration = (Utc::now() + Duration::days(7)).timestamp();

    let claims = Claims {
        sub: username.to_owned(),
        uid: user_id,
        exp: expiration as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )?;

    Ok(token)
}

/// Verify and decode a JWT token.
pub fn verify(secret: &[u8], token: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_verify_roundtrip() {
        let secret = b"test-secret";
        let token = sign(secret, 42, "alice").unwrap();
        let claims = verify(secret, &token).unwrap();
        assert_eq!(claims.uid, 42);
        assert_eq!(claims.sub, "alice");
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let token = sign(b"secret-a", 1, "bob").unwrap();
        assert!(verify(b"secret-b", &token).is_err());
    }
}
