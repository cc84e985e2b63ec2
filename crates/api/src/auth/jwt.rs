//! Bearer tokens for the crew accounts.
//!
//! The access token is what the auth extractor reads: its `role` claim
//! decides whether a caller acts as a maker, a checker or a super admin.
//! Refresh tokens are opaque and rotate through `user_sessions`, where only
//! their SHA-256 digest is kept.

use haulage_core::types::DbId;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Payload of an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// `users.id` of the signed-in crew member.
    pub sub: DbId,
    /// `super_admin`, `checker` or `maker`.
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

/// Token lifetimes and the signing secret.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
    /// Lifetime of a `user_sessions` row created at login or refresh.
    pub refresh_token_expiry_days: i64,
}

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 7;

fn env_i64(key: &str, default: i64) -> i64 {
    std::env::var(key)
        .map(|raw| raw.parse().unwrap_or_else(|_| panic!("{key} must be a whole number")))
        .unwrap_or(default)
}

impl JwtConfig {
    /// `JWT_SECRET` is required. `JWT_ACCESS_EXPIRY_MINS` (15) and
    /// `JWT_REFRESH_EXPIRY_DAYS` (7) are optional.
    ///
    /// # Panics
    ///
    /// Panics when the secret is missing or empty, or a lifetime is not a number.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        Self {
            secret,
            access_token_expiry_mins: env_i64("JWT_ACCESS_EXPIRY_MINS", DEFAULT_ACCESS_EXPIRY_MINS),
            refresh_token_expiry_days: env_i64(
                "JWT_REFRESH_EXPIRY_DAYS",
                DEFAULT_REFRESH_EXPIRY_DAYS,
            ),
        }
    }

    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.secret.as_bytes())
    }

    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.secret.as_bytes())
    }
}

/// Sign an HS256 access token carrying the user's role.
pub fn generate_access_token(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let iat = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp: iat + config.access_token_expiry_mins * 60,
        iat,
        jti: Uuid::new_v4().to_string(),
    };
    encode(&Header::default(), &claims, &config.encoding_key())
}

/// Check signature and expiry, then hand back the claims.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(token, &config.decoding_key(), &Validation::default())
        .map(|data| data.claims)
}

/// A fresh refresh token and the digest stored for its session.
pub fn generate_refresh_token() -> (String, String) {
    let plaintext = Uuid::new_v4().to_string();
    let digest = hash_refresh_token(&plaintext);
    (plaintext, digest)
}

/// Lowercase hex SHA-256, matching `user_sessions.refresh_token_hash`.
pub fn hash_refresh_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}
