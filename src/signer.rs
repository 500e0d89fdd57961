//! Request signing.
//!
//! Each [`Operation`] registers an ordered list of field names. The values of those
//! fields, followed by the secret key, are joined with `|` and hashed with MD5 to
//! produce `api_sig`. The gateway recomputes the same digest, so the field order of
//! every operation is part of the wire protocol and must not change.
//!
//! MD5 is used because the gateway's verifier uses it. It only detects tampering
//! in transit and is not a security boundary on its own.

use crate::errors::PayssionError;
use crate::types::RequestParams;
use md5::{Digest, Md5};
use std::fmt;
use std::str::FromStr;

/// Separator between values in the canonical message.
pub const SIG_DELIMITER: &str = "|";

/// A gateway operation: its signed fields and its endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Create a payment
    Create,
    /// Query a payment
    Details,
    /// Refund a payment
    Refund,
}

impl Operation {
    /// Method name used by the gateway.
    pub fn name(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Details => "details",
            Operation::Refund => "refund",
        }
    }

    /// Ordered field names covered by `api_sig`. The secret key always follows.
    pub fn sig_keys(self) -> &'static [&'static str] {
        match self {
            Operation::Create => &["api_key", "pm_id", "amount", "currency", "order_id"],
            Operation::Details => &["api_key", "transaction_id", "order_id"],
            Operation::Refund => &["api_key", "transaction_id", "amount", "currency"],
        }
    }

    /// Path appended to the base URL.
    pub fn endpoint(self) -> &'static str {
        match self {
            Operation::Create => "payment/create",
            Operation::Details => "payment/details",
            Operation::Refund => "refunds",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = PayssionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Operation::Create),
            "details" => Ok(Operation::Details),
            "refund" => Ok(Operation::Refund),
            other => Err(PayssionError::validation(format!(
                "Unknown method name: {}",
                other
            ))),
        }
    }
}

/// Builds the canonical message that gets hashed.
///
/// Missing fields contribute an empty string.
///
/// # Examples
///
/// ```
/// use payssion_rs::signer::canonical_message;
/// use payssion_rs::types::RequestParams;
///
/// let params = RequestParams::new().with("pm_id", "x");
/// assert_eq!(canonical_message(&params, &["pm_id", "amount"], "s3cret"), "x||s3cret");
/// ```
pub fn canonical_message(params: &RequestParams, sig_keys: &[&str], secret_key: &str) -> String {
    sig_keys
        .iter()
        .map(|key| params.get(key).unwrap_or(""))
        .chain(std::iter::once(secret_key))
        .collect::<Vec<_>>()
        .join(SIG_DELIMITER)
}

/// Computes `api_sig`: the lowercase hex MD5 of the canonical message.
///
/// # Examples
///
/// ```
/// use payssion_rs::signer::sign;
/// use payssion_rs::types::RequestParams;
///
/// let params = RequestParams::new().with("pm_id", "alipay_cn");
/// let sig = sign(&params, &["pm_id"], "s3cret");
///
/// assert_eq!(sig.len(), 32);
/// assert_eq!(sig, sign(&params, &["pm_id"], "s3cret"));
/// ```
pub fn sign(params: &RequestParams, sig_keys: &[&str], secret_key: &str) -> String {
    let message = canonical_message(params, sig_keys, secret_key);
    hex::encode(Md5::digest(message.as_bytes()))
}
