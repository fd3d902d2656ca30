use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// JWT claims carried by mobile app sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Signup record id.
    pub sub: String,
    /// "driver" or "investor".
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

pub fn issue_token(config: &Config, subject: &str, role: &str) -> AppResult<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: subject.to_string(),
        role: role.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(config.jwt.expiration_hours)).timestamp(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt.secret.as_bytes()),
    )?;
    Ok(token)
}

pub fn verify_token(config: &Config, token: &str) -> AppResult<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt.secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

pub fn hash_password(password: &str) -> AppResult<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let config = Config::default();
        let token = issue_token(&config, "signup-1", "driver").unwrap();
        let claims = verify_token(&config, &token).unwrap();
        assert_eq!(claims.sub, "signup-1");
        assert_eq!(claims.role, "driver");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let config = Config::default();
        let token = issue_token(&config, "signup-1", "driver").unwrap();

        let mut other = Config::default();
        other.jwt.secret = "different".to_string();
        assert!(verify_token(&other, &token).is_err());
    }

    #[test]
    fn password_hash_verifies() {
        let hash = bcrypt::hash("secret123", 4).unwrap();
        assert!(verify_password("secret123", &hash));
        assert!(!verify_password("wrong", &hash));
    }
}
