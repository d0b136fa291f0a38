use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use hmac::{digest::InvalidLength, Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

use crate::{error::ApiError, state::AppState};

pub const SESSION_COOKIE: &str = "session";
/// Signing key used when no override is configured. The dashboard is a mock;
/// this key only keeps casual edits of the cookie from passing.
pub const DEFAULT_SESSION_KEY: &str = "super_secret_key_for_ai_bot_dashboard";

const AUTHENTICATED_FLAG: &str = "authenticated";
const COOKIE_ATTRIBUTES: &str = "Path=/; HttpOnly; SameSite=Lax";

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error)]
pub enum SessionKeyError {
    #[error("session key must not be empty")]
    Empty,
    #[error("session key rejected: {0}")]
    Invalid(#[from] InvalidLength),
}

/// Issues and checks the signed cookie carrying the authenticated flag.
#[derive(Clone)]
pub struct SessionSigner {
    mac: HmacSha256,
}

impl SessionSigner {
    pub fn new(key: impl AsRef<[u8]>) -> Result<Self, SessionKeyError> {
        let key = key.as_ref();
        if key.is_empty() {
            return Err(SessionKeyError::Empty);
        }

        Ok(Self {
            mac: HmacSha256::new_from_slice(key)?,
        })
    }

    /// Cookie value: `authenticated.<hex hmac>`.
    pub fn issue(&self) -> String {
        let tag = hex::encode(self.tag(AUTHENTICATED_FLAG));
        format!("{AUTHENTICATED_FLAG}.{tag}")
    }

    pub fn verify(&self, value: &str) -> bool {
        let Some((flag, tag_hex)) = value.split_once('.') else {
            return false;
        };
        if flag != AUTHENTICATED_FLAG {
            return false;
        }
        let Ok(tag) = hex::decode(tag_hex) else {
            return false;
        };

        let mut mac = self.mac.clone();
        mac.update(flag.as_bytes());
        mac.verify_slice(&tag).is_ok()
    }

    pub fn login_cookie(&self) -> String {
        let value = self.issue();
        format!("{SESSION_COOKIE}={value}; {COOKIE_ATTRIBUTES}")
    }

    pub fn logout_cookie() -> String {
        format!("{SESSION_COOKIE}=; {COOKIE_ATTRIBUTES}; Max-Age=0")
    }

    pub fn is_authenticated(&self, headers: &HeaderMap) -> bool {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .any(|(name, value)| name == SESSION_COOKIE && self.verify(value))
    }

    fn tag(&self, payload: &str) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

impl std::fmt::Debug for SessionSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionSigner { .. }")
    }
}

/// Session flag of the current request. Never rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    authenticated: bool,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self {
            authenticated: state.sessions().is_authenticated(&parts.headers),
        })
    }
}

/// Guard for API routes: rejects with 401 when the session flag is missing.
#[derive(Debug, Clone, Copy)]
pub struct Authenticated;

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if state.sessions().is_authenticated(&parts.headers) {
            Ok(Self)
        } else {
            Err(ApiError::Unauthorized)
        }
    }
}
