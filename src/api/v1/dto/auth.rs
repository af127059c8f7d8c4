/*
 * Responsibility
 * - DTOs for the /auth routes
 * - Field validation beyond "present and JSON" happens in SessionIssuer
 */
use serde::{Deserialize, Serialize};

use crate::services::auth::session::IssuedTokenPair;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    // Older clients send `passwordVerify` (or `password_verify`).
    #[serde(alias = "passwordVerify", alias = "password_verify")]
    pub password_confirmation: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always "Bearer"
    pub token_type: &'static str,
    /// Seconds until the access token expires.
    pub expires_in: u64,
    pub refresh_token: String,
    /// Seconds until the refresh token expires.
    pub refresh_expires_in: u64,
}

impl From<IssuedTokenPair> for TokenResponse {
    fn from(pair: IssuedTokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            token_type: pair.token_type,
            expires_in: pair.expires_in,
            refresh_token: pair.refresh_token,
            refresh_expires_in: pair.refresh_expires_in,
        }
    }
}
