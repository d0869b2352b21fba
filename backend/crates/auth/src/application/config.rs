//! Application Configuration
//!
//! Configuration for the Auth application layer, read from the environment.

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use thiserror::Error;

use crate::application::protected_paths::ProtectedPaths;

/// Re-export cookie types from platform
pub use platform::cookie::{CookieConfig, SameSite};

/// Default token lifetime (7 days)
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(7 * 24 * 3600);

/// Longest accepted token lifetime (365 days)
pub const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(365 * 24 * 3600);

/// Environments where the cookie is sent without `Secure`
const INSECURE_ENVIRONMENTS: [&str; 2] = ["development", "local"];

/// Rejected configuration value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthConfigError {
    #[error("invalid token lifetime {0:?}: expected e.g. 7d, 24h, 30m, 15s or a number of seconds")]
    InvalidTokenLifetime(String),

    #[error("token lifetime {0:?} exceeds the 365 day maximum")]
    TokenLifetimeTooLong(String),
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC signing secret; `None` makes every issue/verify fail
    pub jwt_secret: Option<SecretString>,
    /// Token lifetime, also the cookie `Max-Age`
    pub token_lifetime: Duration,
    /// Attributes of the `token` cookie
    pub cookie: CookieConfig,
    /// Paths the request gate applies to
    pub protected_paths: ProtectedPaths,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<SecretString>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_lifetime: DEFAULT_TOKEN_LIFETIME,
            cookie: CookieConfig::default(),
            protected_paths: ProtectedPaths::default(),
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    /// Load from process environment
    ///
    /// `JWT_SECRET`, `JWT_EXPIRES_IN`, `APP_ENV`, `PROTECTED_PATHS`,
    /// `PASSWORD_PEPPER`.
    pub fn from_env() -> Result<Self, AuthConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AuthConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token_lifetime = match non_empty("JWT_EXPIRES_IN") {
            Some(raw) => parse_token_lifetime(&raw)?,
            None => DEFAULT_TOKEN_LIFETIME,
        };

        let app_env = non_empty("APP_ENV").unwrap_or_else(|| "production".to_string());
        let secure = !INSECURE_ENVIRONMENTS.contains(&app_env.trim().to_lowercase().as_str());

        let protected_paths = non_empty("PROTECTED_PATHS")
            .map(|raw| ProtectedPaths::parse(&raw))
            .unwrap_or_default();

        Ok(Self {
            jwt_secret: non_empty("JWT_SECRET").map(SecretString::from),
            token_lifetime,
            cookie: CookieConfig {
                secure,
                ..CookieConfig::default()
            },
            protected_paths,
            password_pepper: non_empty("PASSWORD_PEPPER").map(SecretString::from),
        })
    }

    /// Config for tests and local runs with a fixed secret and insecure cookie
    pub fn development(secret: &str) -> Self {
        Self {
            jwt_secret: Some(SecretString::from(secret.to_string())),
            cookie: CookieConfig {
                secure: false,
                ..CookieConfig::default()
            },
            ..Self::default()
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper
            .as_ref()
            .map(|pepper| pepper.expose_secret().as_bytes())
    }
}

/// Parse a token lifetime: `7d`, `24h`, `30m`, `15s` or bare seconds
///
/// Zero is rejected; a token that expires on issue is a misconfiguration.
/// Anything above [`MAX_TOKEN_LIFETIME`] is rejected too.
pub fn parse_token_lifetime(raw: &str) -> Result<Duration, AuthConfigError> {
    let invalid = || AuthConfigError::InvalidTokenLifetime(raw.to_string());
    let value = raw.trim();

    let (digits, unit_secs) = match value.char_indices().last() {
        Some((idx, 'd')) => (&value[..idx], 24 * 3600),
        Some((idx, 'h')) => (&value[..idx], 3600),
        Some((idx, 'm')) => (&value[..idx], 60),
        Some((idx, 's')) => (&value[..idx], 1),
        Some(_) => (value, 1),
        None => return Err(invalid()),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let amount: u64 = digits.parse().map_err(|_| invalid())?;
    let secs = amount.checked_mul(unit_secs).ok_or_else(invalid)?;

    if secs == 0 {
        return Err(invalid());
    }

    let lifetime = Duration::from_secs(secs);
    if lifetime > MAX_TOKEN_LIFETIME {
        return Err(AuthConfigError::TokenLifetimeTooLong(raw.to_string()));
    }
    Ok(lifetime)
}
