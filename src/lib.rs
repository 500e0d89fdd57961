//! # payssion-rs
//!
//! A Rust client for the Payssion payment gateway REST API.
//!
//! Every request is sent as an `application/x-www-form-urlencoded` POST carrying the
//! application's `api_key` and an `api_sig` signature computed over a fixed, ordered
//! subset of the request fields plus the shared secret.
//!
//! ## Features
//!
//! - **Three operations**: create a payment, query payment details, refund
//! - **Deterministic signing**: canonical `|`-joined message hashed with MD5
//! - **Fail-fast validation**: bad credentials, verbs or empty parameters never hit the network
//! - **Uniform errors**: transport and HTTP failures surface as one [`PayssionError`]
//! - **Per-call outcomes**: every call returns its own success flag
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use payssion_rs::client::PayssionClient;
//! use payssion_rs::types::CreateParams;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = PayssionClient::new("your_api_key", "your_secret_key", false)?;
//!
//! let outcome = client
//!     .create(
//!         CreateParams::new("alipay_cn", "10.00", "USD", "order_1")
//!             .with_return_url("https://your-site.com/return"),
//!     )
//!     .await?;
//!
//! if outcome.is_success {
//!     println!("Redirect payer to {:?}", outcome.response.redirect_url());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Request Flow
//!
//! 1. **Validate**: the verb must be get/put/post/delete and the parameters non-empty
//! 2. **Sign**: `api_key` is injected and `api_sig` computed from the operation's field list
//! 3. **Dispatch**: one POST to `base_url + endpoint` with a 30 second timeout
//! 4. **Inspect**: `result_code == 200` marks the call as a business-level success
//!
//! ## Endpoints
//!
//! | Operation | Endpoint          | Signed fields (then `secret_key`)               |
//! |-----------|-------------------|-------------------------------------------------|
//! | create    | `payment/create`  | api_key, pm_id, amount, currency, order_id      |
//! | details   | `payment/details` | api_key, transaction_id, order_id               |
//! | refund    | `refunds`         | api_key, transaction_id, amount, currency       |
//!
//! ## Security
//!
//! The MD5 signature exists for compatibility with the gateway's verifier. It detects
//! tampering but relies on HTTPS for confidentiality. Disabling TLS verification with
//! [`PayssionClient::set_ssl_verify`](client::PayssionClient::set_ssl_verify) only
//! affects the client it is called on.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod client;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod signer;
pub mod transport;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use client::PayssionClient;
pub use config::{Mode, PayssionConfig, TransportPolicy};
pub use errors::{PayssionError, Result};
pub use signer::Operation;
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    CallOutcome, CreateParams, DetailsParams, PayssionResponse, RefundParams, RequestParams,
};
