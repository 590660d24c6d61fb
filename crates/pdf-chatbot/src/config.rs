//! Configuration for the chatbot
//!
//! Everything is read from environment variables once at startup and passed
//! to the server as an explicit [`AppConfig`].

use std::str::FromStr;

use crate::error::{Error, Result};

/// Main application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// LLM provider configuration
    pub llm: LlmConfig,
    /// Identity provider configuration
    pub identity: IdentityConfig,
    /// Session cookie configuration
    pub session: SessionConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 25MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            enable_cors: false,
            max_upload_size: 25 * 1024 * 1024,
        }
    }
}

/// Chat-completion provider configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API base URL, without the `/chat/completions` suffix
    pub base_url: String,
    /// Bearer token
    pub api_key: String,
    /// Model identifier sent with every request
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4o".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Identity provider (Firebase Identity Toolkit) configuration
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// REST API base URL
    pub base_url: String,
    /// Web API key of the project
    pub api_key: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            base_url: "https://identitytoolkit.googleapis.com".to_string(),
            api_key: String::new(),
        }
    }
}

/// Session cookie configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HMAC secret used to sign the session cookie
    pub secret: String,
    /// Session lifetime in seconds
    pub ttl_secs: u64,
    /// Mark the cookie `Secure` (HTTPS only)
    pub secure_cookie: bool,
}

/// Shortest accepted session secret, in bytes
pub const MIN_SESSION_SECRET_LEN: usize = 16;

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            ttl_secs: 24 * 60 * 60,
            secure_cookie: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let env = EnvReader { lookup };

        let config = Self {
            server: ServerConfig {
                host: env.string_or("HOST", defaults.server.host),
                port: env.parse_or("PORT", defaults.server.port)?,
                enable_cors: env.bool_or("ENABLE_CORS", defaults.server.enable_cors)?,
                max_upload_size: env.parse_or("MAX_UPLOAD_SIZE", defaults.server.max_upload_size)?,
            },
            llm: LlmConfig {
                base_url: env.string_or("OPENAI_BASE_URL", defaults.llm.base_url),
                api_key: env.required("OPENAI_API_KEY")?,
                model: env.string_or("OPENAI_MODEL", defaults.llm.model),
                timeout_secs: env.parse_or("LLM_TIMEOUT_SECS", defaults.llm.timeout_secs)?,
            },
            identity: IdentityConfig {
                base_url: env.string_or("IDENTITY_BASE_URL", defaults.identity.base_url),
                api_key: env.required("API_KEY")?,
            },
            session: SessionConfig {
                secret: env.required("SESSION_SECRET")?,
                ttl_secs: env.parse_or("SESSION_TTL_SECS", defaults.session.ttl_secs)?,
                secure_cookie: env.bool_or("SESSION_COOKIE_SECURE", defaults.session.secure_cookie)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Check invariants the loaders cannot express
    pub fn validate(&self) -> Result<()> {
        if self.session.secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(Error::Config(format!(
                "SESSION_SECRET must be at least {} bytes",
                MIN_SESSION_SECRET_LEN
            )));
        }
        if self.llm.timeout_secs == 0 {
            return Err(Error::Config("LLM_TIMEOUT_SECS must be positive".to_string()));
        }
        if self.session.ttl_secs == 0 {
            return Err(Error::Config("SESSION_TTL_SECS must be positive".to_string()));
        }
        Ok(())
    }
}

struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, key: &str) -> Result<String> {
        self.get(key)
            .ok_or_else(|| Error::Config(format!("missing required environment variable {}", key)))
    }

    fn string_or(&self, key: &str, default: String) -> String {
        self.get(key).unwrap_or(default)
    }

    fn parse_or<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            Some(raw) => raw
                .parse()
                .map_err(|e| Error::Config(format!("invalid {} '{}': {}", key, raw, e))),
            None => Ok(default),
        }
    }

    fn bool_or(&self, key: &str, default: bool) -> Result<bool> {
        match self.get(key) {
            Some(raw) => match raw.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(Error::Config(format!("invalid {} '{}': expected a boolean", key, raw))),
            },
            None => Ok(default),
        }
    }
}
