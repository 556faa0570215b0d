use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Username of the authenticated account.
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(username: &str) -> Self {
        let now = Utc::now();
        let expire_minutes = config::config().security.token_expire_minutes;
        let exp = (now + Duration::minutes(expire_minutes)).timestamp();

        Self {
            sub: username.to_string(),
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token generation error: {0}")]
    TokenGeneration(String),

    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("invalid token")]
    InvalidToken,

    #[error("password hashing error: {0}")]
    Hash(String),
}

/// Sign an access token for the given claims with the configured secret.
pub fn generate_token(claims: &Claims) -> Result<String, AuthError> {
    let secret = &config::config().security.secret_key;

    if secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// Decode and verify a token, including its expiry.
pub fn validate_token(token: &str) -> Result<Claims, AuthError> {
    let secret = &config::config().security.secret_key;

    if secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data =
        decode::<Claims>(token, &decoding_key, &validation).map_err(|_| AuthError::InvalidToken)?;

    Ok(token_data.claims)
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

pub fn verify_password(password: &str, hashed: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hashed).map_err(|e| AuthError::Hash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
