//! Client configuration.
//!
//! [`PayssionConfig`] carries everything a client needs: credentials, the base URL
//! and the [`TransportPolicy`] applied to every request.

use crate::errors::{PayssionError, Result};
use crate::validation::check_credentials;
use std::fmt;
use std::time::Duration;

/// Base URL of the production gateway.
pub const LIVE_API_URL: &str = "https://www.payssion.com/api/v1/";

/// Base URL of the sandbox gateway.
pub const SANDBOX_API_URL: &str = "http://sandbox.payssion.com/api/v1/";

/// Timeout applied to every request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Which gateway environment to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Production
    #[default]
    Live,
    /// Sandbox
    Sandbox,
}

impl Mode {
    /// Maps the `is_livemode` flag used throughout the gateway docs.
    pub fn from_live_flag(is_livemode: bool) -> Self {
        if is_livemode {
            Mode::Live
        } else {
            Mode::Sandbox
        }
    }

    /// Predefined base URL for this mode.
    pub fn base_url(self) -> &'static str {
        match self {
            Mode::Live => LIVE_API_URL,
            Mode::Sandbox => SANDBOX_API_URL,
        }
    }
}

/// How requests are sent.
///
/// The policy travels with each request, so turning TLS verification off affects
/// only calls made by the client that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportPolicy {
    /// Reject invalid server certificates
    pub verify_tls: bool,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for TransportPolicy {
    fn default() -> Self {
        Self {
            verify_tls: true,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TransportPolicy {
    /// Sets TLS verification.
    pub fn with_verify_tls(mut self, verify_tls: bool) -> Self {
        self.verify_tls = verify_tls;
        self
    }
}

/// Complete client configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct PayssionConfig {
    /// Application api_key
    pub api_key: String,

    /// Application secret_key, used only for signing
    pub secret_key: String,

    /// Base URL the endpoint suffixes are appended to
    pub base_url: String,

    /// Transport behaviour
    pub policy: TransportPolicy,
}

impl fmt::Debug for PayssionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayssionConfig")
            .field("api_key", &self.api_key)
            .field("secret_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("policy", &self.policy)
            .finish()
    }
}

impl PayssionConfig {
    /// Creates a configuration, failing if either credential is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use payssion_rs::config::{PayssionConfig, SANDBOX_API_URL};
    ///
    /// let config = PayssionConfig::new("your_api_key", "your_secret_key", false).unwrap();
    /// assert_eq!(config.base_url, SANDBOX_API_URL);
    ///
    /// assert!(PayssionConfig::new("", "your_secret_key", true).is_err());
    /// ```
    pub fn new(
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
        is_livemode: bool,
    ) -> Result<Self> {
        let api_key = api_key.into();
        let secret_key = secret_key.into();
        check_credentials(&api_key, &secret_key)?;

        Ok(Self {
            api_key,
            secret_key,
            base_url: Mode::from_live_flag(is_livemode).base_url().to_string(),
            policy: TransportPolicy::default(),
        })
    }

    /// Builds a configuration from `PAYSSION_*` environment variables.
    ///
    /// * `PAYSSION_API_KEY`, `PAYSSION_SECRET_KEY` - required
    /// * `PAYSSION_LIVE_MODE` - `true`/`false`, defaults to `true`
    /// * `PAYSSION_API_URL` - overrides the mode's base URL
    /// * `PAYSSION_SSL_VERIFY` - `true`/`false`, defaults to `true`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("PAYSSION_API_KEY").unwrap_or_default();
        let secret_key = lookup("PAYSSION_SECRET_KEY").unwrap_or_default();
        let live = parse_flag("PAYSSION_LIVE_MODE", lookup("PAYSSION_LIVE_MODE"), true)?;
        let verify = parse_flag("PAYSSION_SSL_VERIFY", lookup("PAYSSION_SSL_VERIFY"), true)?;

        let mut config = Self::new(api_key, secret_key, live)?;
        if let Some(url) = lookup("PAYSSION_API_URL").filter(|u| !u.is_empty()) {
            config.base_url = url;
        }
        config.policy.verify_tls = verify;
        Ok(config)
    }

    /// Switches between the live and sandbox base URLs.
    pub fn set_mode(&mut self, mode: Mode) {
        self.base_url = mode.base_url().to_string();
    }
}

fn parse_flag(name: &str, value: Option<String>, default: bool) -> Result<bool> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => Ok(false),
        Some(v) => Err(PayssionError::config(format!(
            "{} must be true or false, got '{}'",
            name, v
        ))),
    }
}
