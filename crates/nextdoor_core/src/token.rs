//! crates/nextdoor_core/src/token.rs
//!
//! Stateless admin session tokens.
//!
//! A token is `v1.<issued_at_ms>.<hex hmac-sha256>` where the MAC covers
//! `v1.<issued_at_ms>`. The only shared state is the server secret, so any
//! process holding the same secret can verify a token it did not issue.

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const TOKEN_VERSION: &str = "v1";

/// Seven days, in seconds. Also the cookie `Max-Age`.
pub const TOKEN_TTL_SECS: i64 = 60 * 60 * 24 * 7;
pub const TOKEN_TTL_MS: i64 = TOKEN_TTL_SECS * 1000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// No secret is configured, so tokens can be neither issued nor verified.
    #[error("Admin cookie secret is not configured")]
    MissingSecret,
    /// The secret was rejected as an HMAC key.
    #[error("Admin cookie secret cannot be used as a signing key")]
    InvalidSecret,
}

/// Outcome of checking a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCheck {
    Valid,
    MissingSecret,
    MissingToken,
    Malformed,
    BadSignature,
    BadTimestamp,
    Expired,
}

impl TokenCheck {
    pub fn is_valid(self) -> bool {
        self == TokenCheck::Valid
    }
}

/// Issues and verifies tokens with one server secret.
#[derive(Clone)]
pub struct TokenSigner {
    secret: Option<String>,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("configured", &self.secret.is_some())
            .finish()
    }
}

impl TokenSigner {
    /// An empty secret is treated the same as no secret.
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    pub fn issue(&self) -> Result<String, TokenError> {
        self.issue_at(Utc::now().timestamp_millis())
    }

    pub fn issue_at(&self, now_ms: i64) -> Result<String, TokenError> {
        let secret = self.secret.as_deref().ok_or(TokenError::MissingSecret)?;
        let payload = format!("{}.{}", TOKEN_VERSION, now_ms);
        let signature = sign(secret, &payload)?;
        Ok(format!("{}.{}", payload, signature))
    }

    pub fn check(&self, token: Option<&str>) -> TokenCheck {
        self.check_at(token, Utc::now().timestamp_millis())
    }

    pub fn check_at(&self, token: Option<&str>, now_ms: i64) -> TokenCheck {
        check_token(token, now_ms, self.secret.as_deref())
    }

    /// Boolean form of [`TokenSigner::check`]. Never fails.
    pub fn validate(&self, token: Option<&str>) -> bool {
        self.check(token).is_valid()
    }
}

/// Checks `token` against `secret` at `now_ms`.
pub fn check_token(token: Option<&str>, now_ms: i64, secret: Option<&str>) -> TokenCheck {
    let Some(secret) = secret.filter(|s| !s.is_empty()) else {
        return TokenCheck::MissingSecret;
    };
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return TokenCheck::MissingToken;
    };

    let parts: Vec<&str> = token.split('.').collect();
    let [version, issued_at, signature] = parts.as_slice() else {
        return TokenCheck::Malformed;
    };

    let payload = format!("{}.{}", version, issued_at);
    match sign(secret, &payload) {
        Ok(expected) if expected == *signature => {}
        Ok(_) => return TokenCheck::BadSignature,
        Err(_) => return TokenCheck::MissingSecret,
    }

    let Ok(issued_at_ms) = issued_at.parse::<i64>() else {
        return TokenCheck::BadTimestamp;
    };

    if now_ms.saturating_sub(issued_at_ms) > TOKEN_TTL_MS {
        return TokenCheck::Expired;
    }
    TokenCheck::Valid
}

fn sign(secret: &str, payload: &str) -> Result<String, TokenError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| TokenError::InvalidSecret)?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}
