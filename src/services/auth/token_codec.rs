//! HS256 token codec shared by the session issuer and the request authenticator.
//!
//! Decode order is fixed: signature (and structure) first, expiry second. `jsonwebtoken` is only
//! asked to verify the signature; expiry is checked here against a single `now` with no leeway.
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Why a token was rejected. Only ever logged; clients see a generic 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed token")]
    Malformed,
    #[error("bad token signature")]
    BadSignature,
    #[error("token expired")]
    Expired,
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("signing secret is empty")]
    EmptySecret,
    #[error("failed to sign token: {0}")]
    Sign(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenClaims {
    sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    typ: TokenKind,
    iat: i64,
    exp: i64,
    jti: String,
}

/// A freshly signed token and its absolute expiry (unix seconds).
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: i64,
}

/// Verified payload of a token that passed signature and expiry checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedToken {
    pub subject_id: String,
    pub role: Option<String>,
    pub kind: TokenKind,
    pub issued_at: i64,
    pub expires_at: i64,
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenCodec")
            .field("algorithm", &Algorithm::HS256)
            .finish()
    }
}

impl TokenCodec {
    pub fn new(secret: &str) -> Result<Self, CodecError> {
        if secret.is_empty() {
            return Err(CodecError::EmptySecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp", "iat"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    pub fn encode(
        &self,
        subject_id: &str,
        role: Option<&str>,
        kind: TokenKind,
        ttl_seconds: u64,
    ) -> Result<IssuedToken, CodecError> {
        self.encode_at(subject_id, role, kind, ttl_seconds, now_unix())
    }

    pub fn encode_at(
        &self,
        subject_id: &str,
        role: Option<&str>,
        kind: TokenKind,
        ttl_seconds: u64,
        now: i64,
    ) -> Result<IssuedToken, CodecError> {
        let ttl = i64::try_from(ttl_seconds).unwrap_or(i64::MAX);
        let claims = TokenClaims {
            sub: subject_id.to_string(),
            role: role.map(str::to_string),
            typ: kind,
            iat: now,
            exp: now.saturating_add(ttl),
            jti: Uuid::new_v4().to_string(),
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        let token = jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign JWT");
            CodecError::Sign(e)
        })?;

        Ok(IssuedToken {
            token,
            expires_at: claims.exp,
        })
    }

    pub fn decode(&self, token: &str) -> Result<DecodedToken, DecodeError> {
        self.decode_at(token, now_unix())
    }

    pub fn decode_at(&self, token: &str, now: i64) -> Result<DecodedToken, DecodeError> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => DecodeError::BadSignature,
                _ => DecodeError::Malformed,
            })?;
        let claims = data.claims;

        if claims.sub.trim().is_empty() {
            return Err(DecodeError::Malformed);
        }
        if now > claims.exp {
            return Err(DecodeError::Expired);
        }

        Ok(DecodedToken {
            subject_id: claims.sub,
            role: claims.role,
            kind: claims.typ,
            issued_at: claims.iat,
            expires_at: claims.exp,
        })
    }
}

pub(crate) fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}
