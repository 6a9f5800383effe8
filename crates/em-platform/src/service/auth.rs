//! Authentication Service
//!
//! HS256 JWT issuing and validation. Access and refresh tokens share the
//! claim set and are told apart by `token_type`.

use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::User;
use crate::error::{PlatformError, Result};

pub const ACCESS_TOKEN_TYPE: &str = "access";
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub secret_key: String,
    pub issuer: String,
    pub access_token_expiry_secs: i64,
    pub refresh_token_expiry_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: "dev-secret-change-me".to_string(),
            issuer: "event-management".to_string(),
            access_token_expiry_secs: 300,
            refresh_token_expiry_secs: 86400,
        }
    }
}

/// Claims carried by both token kinds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// User id
    pub sub: String,
    pub email: String,
    pub token_type: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// Access and refresh token issued together on login
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

pub struct AuthService {
    config: AuthConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret_key.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret_key.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    pub fn access_token_expiry_secs(&self) -> i64 {
        self.config.access_token_expiry_secs
    }

    fn issue(&self, user_id: &str, email: &str, token_type: &str, ttl_secs: i64) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = AccessTokenClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            token_type: token_type.to_string(),
            iss: self.config.issuer.clone(),
            iat: now,
            exp: now + ttl_secs,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            PlatformError::internal(format!("Failed to sign token: {}", e))
        })
    }

    pub fn generate_access_token(&self, user: &User) -> Result<String> {
        self.issue(
            &user.id,
            &user.email,
            ACCESS_TOKEN_TYPE,
            self.config.access_token_expiry_secs,
        )
    }

    pub fn generate_token_pair(&self, user: &User) -> Result<TokenPair> {
        Ok(TokenPair {
            access: self.generate_access_token(user)?,
            refresh: self.issue(
                &user.id,
                &user.email,
                REFRESH_TOKEN_TYPE,
                self.config.refresh_token_expiry_secs,
            )?,
        })
    }

    fn decode(&self, token: &str, expected_type: &str) -> Result<AccessTokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.config.issuer.as_str()]);
        validation.leeway = 0;

        let claims = decode::<AccessTokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => PlatformError::TokenExpired,
                _ => PlatformError::InvalidToken { message: e.to_string() },
            })?
            .claims;

        if claims.token_type != expected_type {
            return Err(PlatformError::InvalidToken {
                message: format!("Expected {} token", expected_type),
            });
        }
        Ok(claims)
    }

    /// Validate an access token presented on a request
    pub fn validate_token(&self, token: &str) -> Result<AccessTokenClaims> {
        self.decode(token, ACCESS_TOKEN_TYPE)
    }

    pub fn validate_refresh_token(&self, token: &str) -> Result<AccessTokenClaims> {
        self.decode(token, REFRESH_TOKEN_TYPE)
    }
}

/// Token part of an `Authorization: Bearer <token>` header value
pub fn extract_bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
