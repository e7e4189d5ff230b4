//! Credential decoding
//!
//! Callers authenticate with a Basic-Auth style header:
//!
//! ```text
//! Authorization: Basic base64("<email>:<api token>")
//! ```
//!
//! The decoded pair is handed to the DNS provider unchanged. Whether the token
//! is actually valid is decided by the provider, not here.

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http::HeaderMap;
use http::header::AUTHORIZATION;
use std::fmt;

/// Provider credentials for a single request
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account email
    pub email: String,

    /// API token
    /// ⚠️ NEVER log this value
    pub token: String,
}

// Custom Debug implementation that hides the API token
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("token", &"<REDACTED>")
            .finish()
    }
}

impl Credentials {
    /// Create credentials from an email and token
    pub fn new(email: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            token: token.into(),
        }
    }

    /// Extract credentials from the `Authorization` request header
    pub fn from_headers(headers: &HeaderMap) -> Result<Self> {
        let value = headers
            .get(AUTHORIZATION)
            .ok_or_else(|| Error::unauthenticated("Missing Authorization header"))?;

        let value = value
            .to_str()
            .map_err(|_| Error::unauthenticated("Invalid Authorization header"))?;

        Self::from_authorization(value)
    }

    /// Decode a `<scheme> <base64(email:token)>` header value
    pub fn from_authorization(value: &str) -> Result<Self> {
        let payload = value
            .trim()
            .split_once(char::is_whitespace)
            .map(|(_scheme, payload)| payload.trim())
            .filter(|payload| !payload.is_empty())
            .ok_or_else(|| Error::unauthenticated("Invalid Authorization header"))?;

        let decoded = STANDARD
            .decode(payload)
            .map_err(|_| Error::unauthenticated("Invalid Authorization header"))?;

        if decoded.iter().any(|b| b.is_ascii_control()) {
            return Err(Error::unauthenticated("Invalid Authorization value"));
        }

        let decoded = String::from_utf8(decoded)
            .map_err(|_| Error::unauthenticated("Invalid Authorization value"))?;

        let (email, token) = decoded
            .split_once(':')
            .ok_or_else(|| Error::unauthenticated("Invalid Authorization value"))?;

        Ok(Self::new(email, token))
    }
}
