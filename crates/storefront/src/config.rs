//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_SESSION_SECRET` - Session signing secret (min 32 chars, high entropy)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL (default: <http://localhost:3000>, `https` enables secure cookies)
//! - `STOREFRONT_SESSION_TTL_HOURS` - Session lifetime, 1 to 8760 (default: 24)
//! - `STOREFRONT_SEED_CATALOG` - Load the default catalog at startup (default: true)
//! - `STOREFRONT_STATIC_DIR` - Directory of frontend files served as the fallback
//! - `STOREFRONT_CORS_ORIGIN` - Allowed cross-origin caller for the JSON API
//! - `ADMIN_NAME`, `ADMIN_EMAIL`, `ADMIN_PASSWORD` or `ADMIN_PASSWORD_HASH` - Fixed admin account
//! - `CUSTOMER_NAME`, `CUSTOMER_EMAIL`, `CUSTOMER_PASSWORD` or `CUSTOMER_PASSWORD_HASH` - Fixed customer account
//! - `ANTHROPIC_API_KEY` - Enables AI chat replies
//! - `ANTHROPIC_MODEL` - Model ID (default: claude-3-5-haiku-latest)
//! - `ANTHROPIC_API_URL` - Messages endpoint override
//! - `CHAT_TIMEOUT_SECS` - Deadline for the AI call (default: 8)
//! - `SHOP_CONTACT_EMAIL`, `SHOP_CONTACT_PHONE` - Used in chat replies
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use petal_core::{Email, Role};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
/// One year.
const MAX_SESSION_TTL_HOURS: i64 = 8760;

/// Default Messages API endpoint.
pub const DEFAULT_ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
/// Default model for chat replies.
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-latest";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Absolute session lifetime in hours
    pub session_ttl_hours: i64,
    /// Whether to load the default catalog at startup
    pub seed_catalog: bool,
    /// Frontend directory served for non-API paths
    pub static_dir: Option<PathBuf>,
    /// Allowed CORS origin
    pub cors_origin: Option<String>,
    /// Accounts created from the environment at startup
    pub accounts: Vec<FixedAccount>,
    /// Anthropic configuration (chat falls back to local replies without it)
    pub claude: Option<ClaudeConfig>,
    /// Shop contact details quoted by chat replies
    pub contact: ShopContact,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
}

/// A login seeded from environment variables.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct FixedAccount {
    /// Display name
    pub name: String,
    /// Login email
    pub email: Email,
    /// Role granted to the account
    pub role: Role,
    /// Plaintext password or precomputed Argon2 hash
    pub password: AccountPassword,
}

/// Credential source for a [`FixedAccount`].
#[derive(Clone)]
pub enum AccountPassword {
    /// Plaintext from `*_PASSWORD`, hashed at startup.
    Plain(SecretString),
    /// PHC string from `*_PASSWORD_HASH`.
    Hash(String),
}

impl std::fmt::Debug for FixedAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedAccount")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Anthropic Messages API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct ClaudeConfig {
    /// Anthropic API key
    pub api_key: SecretString,
    /// Model ID (e.g., claude-3-5-haiku-latest)
    pub model: String,
    /// Messages endpoint
    pub api_url: String,
    /// Deadline for a single chat completion
    pub timeout: Duration,
}

impl std::fmt::Debug for ClaudeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaudeConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Contact details the chat assistant hands out.
#[derive(Debug, Clone)]
pub struct ShopContact {
    pub email: String,
    pub phone: String,
}

impl Default for ShopContact {
    fn default() -> Self {
        Self {
            email: "hello@petal.shop".to_string(),
            phone: "+1 (555) 010-2030".to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_parsed_env::<IpAddr>("STOREFRONT_HOST", "127.0.0.1")?;
        let port = get_parsed_env::<u16>("STOREFRONT_PORT", "3000")?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000");
        url::Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_string(), e.to_string())
        })?;

        let session_secret = get_validated_secret("STOREFRONT_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "STOREFRONT_SESSION_SECRET")?;

        let session_ttl_hours = validate_session_ttl(
            get_parsed_env::<i64>("STOREFRONT_SESSION_TTL_HOURS", "24")?,
            "STOREFRONT_SESSION_TTL_HOURS",
        )?;

        let seed_catalog = get_bool_env("STOREFRONT_SEED_CATALOG", true)?;
        let static_dir = get_optional_env("STOREFRONT_STATIC_DIR").map(PathBuf::from);
        let cors_origin = get_optional_env("STOREFRONT_CORS_ORIGIN");

        let accounts = [
            FixedAccount::from_env("ADMIN", Role::Admin, "Shop Admin")?,
            FixedAccount::from_env("CUSTOMER", Role::Customer, "Demo Customer")?,
        ]
        .into_iter()
        .flatten()
        .collect();

        let claude = ClaudeConfig::from_env()?;
        let contact = ShopContact::from_env();
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            base_url,
            session_secret,
            session_ttl_hours,
            seed_catalog,
            static_dir,
            cors_origin,
            accounts,
            claude,
            contact,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl FixedAccount {
    /// Read `{prefix}_EMAIL` and friends. Returns `None` when no email is set.
    fn from_env(prefix: &str, role: Role, default_name: &str) -> Result<Option<Self>, ConfigError> {
        let email_key = format!("{prefix}_EMAIL");
        let Some(raw_email) = get_optional_env(&email_key) else {
            return Ok(None);
        };
        let email = Email::parse(&raw_email)
            .map_err(|e| ConfigError::InvalidEnvVar(email_key, e.to_string()))?;

        let password = if let Some(hash) = get_optional_env(&format!("{prefix}_PASSWORD_HASH")) {
            AccountPassword::Hash(hash)
        } else if let Some(plain) = get_optional_env(&format!("{prefix}_PASSWORD")) {
            AccountPassword::Plain(SecretString::from(plain))
        } else {
            return Err(ConfigError::MissingEnvVar(format!(
                "{prefix}_PASSWORD or {prefix}_PASSWORD_HASH"
            )));
        };

        Ok(Some(Self {
            name: get_env_or_default(&format!("{prefix}_NAME"), default_name),
            email,
            role,
            password,
        }))
    }
}

impl ClaudeConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(api_key) = get_optional_env("ANTHROPIC_API_KEY") else {
            return Ok(None);
        };
        let timeout_secs = get_parsed_env::<u64>("CHAT_TIMEOUT_SECS", "8")?;

        Ok(Some(Self {
            api_key: SecretString::from(api_key),
            model: get_env_or_default("ANTHROPIC_MODEL", DEFAULT_ANTHROPIC_MODEL),
            api_url: get_env_or_default("ANTHROPIC_API_URL", DEFAULT_ANTHROPIC_API_URL),
            timeout: Duration::from_secs(timeout_secs),
        }))
    }
}

impl ShopContact {
    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            email: get_optional_env("SHOP_CONTACT_EMAIL").unwrap_or(defaults.email),
            phone: get_optional_env("SHOP_CONTACT_PHONE").unwrap_or(defaults.phone),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Blank values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn get_parsed_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn get_bool_env(key: &str, default: bool) -> Result<bool, ConfigError> {
    get_optional_env(key).map_or(Ok(default), |value| {
        parse_bool(&value).ok_or_else(|| {
            ConfigError::InvalidEnvVar(key.to_string(), format!("expected a boolean, got '{value}'"))
        })
    })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Session lifetime must be between one hour and [`MAX_SESSION_TTL_HOURS`].
fn validate_session_ttl(hours: i64, var_name: &str) -> Result<i64, ConfigError> {
    if !(1..=MAX_SESSION_TTL_HOURS).contains(&hours) {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("must be between 1 and {MAX_SESSION_TTL_HOURS} hours (got {hours})"),
        ));
    }
    Ok(hours)
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use `petal-cli gen-secret`."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_shannon_entropy_high() {
        let entropy = shannon_entropy("tR7qLm2ZpX9vKc4W");
        assert!(entropy > MIN_ENTROPY_BITS_PER_CHAR);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let err = validate_secret_strength("changeme-session-key", "TEST_VAR").unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let err = validate_secret_strength(&"ab".repeat(20), "TEST_VAR").unwrap_err();
        assert!(err.to_string().contains("entropy too low"));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        assert!(validate_secret_strength("Nq4vT8mZc2Lr7XpK9sWd3Hf6Jb1Gy5Ea", "TEST_VAR").is_ok());
    }

    #[test]
    fn test_validate_session_secret_length() {
        assert!(validate_session_secret(&SecretString::from("short"), "S").is_err());
        assert!(validate_session_secret(&SecretString::from("k".repeat(32)), "S").is_ok());
    }

    #[test]
    fn test_validate_session_ttl_bounds() {
        assert_eq!(validate_session_ttl(24, "TTL").unwrap(), 24);
        assert_eq!(
            validate_session_ttl(MAX_SESSION_TTL_HOURS, "TTL").unwrap(),
            MAX_SESSION_TTL_HOURS
        );
        assert!(validate_session_ttl(0, "TTL").is_err());
        assert!(validate_session_ttl(-5, "TTL").is_err());

        let err = validate_session_ttl(3_000_000_000_000, "TTL").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
        assert!(err.to_string().contains("8760"));
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let account = FixedAccount {
            name: "Owner".to_string(),
            email: Email::parse("owner@petal.shop").unwrap(),
            role: Role::Admin,
            password: AccountPassword::Plain(SecretString::from("hunter2hunter2")),
        };
        let claude = ClaudeConfig {
            api_key: SecretString::from("sk-ant-live-key"),
            model: DEFAULT_ANTHROPIC_MODEL.to_string(),
            api_url: DEFAULT_ANTHROPIC_API_URL.to_string(),
            timeout: Duration::from_secs(8),
        };

        let rendered = format!("{account:?} {claude:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("sk-ant-live-key"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
