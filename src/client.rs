//! The Payssion API client.
//!
//! [`PayssionClient`] exposes the three gateway operations. They all go through
//! [`PayssionClient::call`], which validates, signs, sends and inspects the result
//! the same way regardless of the operation.

use crate::config::{Mode, PayssionConfig, TransportPolicy};
use crate::dispatch::dispatch;
use crate::errors::Result;
use crate::signer::{sign, Operation};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{CallOutcome, RequestParams};
use crate::validation::validate_call;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Client for the Payssion REST API.
///
/// Every call returns its own [`CallOutcome`]. [`is_success`](Self::is_success)
/// mirrors the outcome of the most recently *finished* call; when calls overlap it
/// reflects whichever finished last, so prefer the per-call value.
pub struct PayssionClient<T = ReqwestTransport> {
    config: PayssionConfig,
    transport: T,
    last_success: AtomicBool,
}

impl<T> fmt::Debug for PayssionClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayssionClient")
            .field("config", &self.config)
            .field("last_success", &self.last_success.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl PayssionClient<ReqwestTransport> {
    /// Creates a client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Application api_key
    /// * `secret_key` - Application secret_key
    /// * `is_livemode` - `false` for sandbox credentials, `true` for live mode
    ///
    /// # Examples
    ///
    /// ```
    /// use payssion_rs::client::PayssionClient;
    ///
    /// let client = PayssionClient::new("your_api_key", "your_secret_key", false).unwrap();
    /// assert_eq!(client.base_url(), "http://sandbox.payssion.com/api/v1/");
    ///
    /// assert!(PayssionClient::new("your_api_key", "", false).is_err());
    /// ```
    pub fn new(
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
        is_livemode: bool,
    ) -> Result<Self> {
        Self::from_config(PayssionConfig::new(api_key, secret_key, is_livemode)?)
    }

    /// Creates a client from a prepared configuration.
    pub fn from_config(config: PayssionConfig) -> Result<Self> {
        Ok(Self::with_transport(config, ReqwestTransport::new()?))
    }

    /// Creates a client configured from `PAYSSION_*` environment variables.
    ///
    /// See [`PayssionConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::from_config(PayssionConfig::from_env()?)
    }
}

impl<T: Transport> PayssionClient<T> {
    /// Creates a client that sends requests through `transport`.
    pub fn with_transport(config: PayssionConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            last_success: AtomicBool::new(false),
        }
    }

    /// Replaces the transport policy.
    pub fn with_policy(mut self, policy: TransportPolicy) -> Self {
        self.config.policy = policy;
        self
    }

    /// Switches between the live and sandbox base URLs.
    pub fn set_live_mode(&mut self, is_livemode: bool) {
        self.config.set_mode(Mode::from_live_flag(is_livemode));
    }

    /// Overrides the base URL. Endpoint suffixes are appended to it as-is, so it
    /// should end with `/`.
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.config.base_url = url.into();
    }

    /// Enables or disables TLS certificate verification for future calls.
    pub fn set_ssl_verify(&mut self, verify: bool) {
        self.config.policy.verify_tls = verify;
    }

    /// Current base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Current transport policy.
    pub fn policy(&self) -> &TransportPolicy {
        &self.config.policy
    }

    /// Application api_key.
    pub fn api_key(&self) -> &str {
        &self.config.api_key
    }

    /// Whether the last finished call returned `result_code == 200`.
    pub fn is_success(&self) -> bool {
        self.last_success.load(Ordering::SeqCst)
    }

    /// Creates a payment.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use payssion_rs::client::PayssionClient;
    /// use payssion_rs::types::CreateParams;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = PayssionClient::new("your_api_key", "your_secret_key", false)?;
    ///
    /// let outcome = client
    ///     .create(CreateParams::new("alipay_cn", "10.00", "USD", "order_1"))
    ///     .await?;
    ///
    /// if outcome.is_success {
    ///     println!("Pay at: {:?}", outcome.response.redirect_url());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create(&self, params: impl Into<RequestParams>) -> Result<CallOutcome> {
        self.call(Operation::Create, "post", params.into()).await
    }

    /// Fetches payment details.
    pub async fn get_details(&self, params: impl Into<RequestParams>) -> Result<CallOutcome> {
        self.call(Operation::Details, "post", params.into()).await
    }

    /// Refunds a payment.
    pub async fn refund(&self, params: impl Into<RequestParams>) -> Result<CallOutcome> {
        self.call(Operation::Refund, "post", params.into()).await
    }

    /// Validates, signs and sends one request for `operation`.
    ///
    /// `api_key` and `api_sig` are injected into `params`, overwriting any values the
    /// caller supplied under those keys.
    pub async fn call(
        &self,
        operation: Operation,
        method: &str,
        mut params: RequestParams,
    ) -> Result<CallOutcome> {
        self.last_success.store(false, Ordering::SeqCst);

        validate_call(method, &params)?;

        params.insert("api_key", self.config.api_key.as_str());
        let api_sig = sign(&params, operation.sig_keys(), &self.config.secret_key);
        params.insert("api_sig", api_sig);

        #[cfg(feature = "tracing")]
        tracing::debug!(operation = %operation, "calling Payssion");

        let response = dispatch(
            &self.transport,
            &self.config.base_url,
            &self.config.policy,
            operation.endpoint(),
            &params,
        )
        .await?;

        let outcome = CallOutcome::from(response);
        self.last_success.store(outcome.is_success, Ordering::SeqCst);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            operation = %operation,
            result_code = ?outcome.response.result_code,
            success = outcome.is_success,
            "Payssion call finished"
        );

        Ok(outcome)
    }
}
