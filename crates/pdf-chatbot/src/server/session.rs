//! Signed session cookie
//!
//! The cookie holds `base64url(user_id|issued_at).hex(hmac_sha256(payload))`.
//! Nothing is stored server side; a session ends when the cookie is cleared or
//! its `issued_at` falls outside the configured lifetime.

use axum::http::{header, HeaderMap};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::types::UserId;

type HmacSha256 = Hmac<Sha256>;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "session";

/// Issues and verifies session cookies
pub struct SessionSigner {
    key: Vec<u8>,
    ttl_secs: i64,
    secure: bool,
}

impl SessionSigner {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            key: config.secret.as_bytes().to_vec(),
            ttl_secs: i64::try_from(config.ttl_secs).unwrap_or(i64::MAX),
            secure: config.secure_cookie,
        }
    }

    fn mac(&self) -> Result<HmacSha256> {
        HmacSha256::new_from_slice(&self.key)
            .map_err(|e| Error::internal(format!("Failed to create session MAC: {}", e)))
    }

    /// Sign a session token for `user` issued now
    pub fn sign(&self, user: &UserId) -> Result<String> {
        self.sign_at(user, Utc::now().timestamp())
    }

    fn sign_at(&self, user: &UserId, issued_at: i64) -> Result<String> {
        let payload = URL_SAFE_NO_PAD.encode(format!("{}|{}", user, issued_at));

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        Ok(format!("{}.{}", payload, signature))
    }

    /// User id of a valid, unexpired token
    pub fn verify(&self, token: &str) -> Option<UserId> {
        self.verify_at(token, Utc::now().timestamp())
    }

    fn verify_at(&self, token: &str, now: i64) -> Option<UserId> {
        let (payload, signature) = token.split_once('.')?;
        let signature = hex::decode(signature).ok()?;

        let mut mac = self.mac().ok()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature).ok()?;

        let decoded = String::from_utf8(URL_SAFE_NO_PAD.decode(payload).ok()?).ok()?;
        let (user, issued_at) = decoded.rsplit_once('|')?;
        let issued_at: i64 = issued_at.parse().ok()?;

        let age = now.checked_sub(issued_at)?;
        if user.is_empty() || age < 0 || age >= self.ttl_secs {
            return None;
        }

        Some(UserId::new(user))
    }

    /// Session carried by the request's `Cookie` headers, if any
    pub fn session_user(&self, headers: &HeaderMap) -> Option<UserId> {
        cookie_value(headers, SESSION_COOKIE).and_then(|token| self.verify(token))
    }

    /// `Set-Cookie` value that starts a session for `user`
    pub fn session_cookie(&self, user: &UserId) -> Result<String> {
        let token = self.sign(user)?;
        Ok(self.cookie(&token, self.ttl_secs))
    }

    /// `Set-Cookie` value that ends the session
    pub fn clear_cookie(&self) -> String {
        self.cookie("", 0)
    }

    fn cookie(&self, value: &str, max_age: i64) -> String {
        let mut cookie = format!(
            "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
            SESSION_COOKIE, value, max_age
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// First value of cookie `name` across all `Cookie` headers
fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}
