//! Request and response types exchanged with the Payssion gateway.
//!
//! Requests travel as flat string maps ([`RequestParams`]); the typed parameter
//! structs are conveniences that convert into one. Responses are decoded into
//! [`PayssionResponse`], which only interprets `result_code` and keeps every other
//! field as-is.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Business-level success code carried in `result_code`.
pub const RESULT_CODE_SUCCESS: i64 = 200;

/// Flat parameter set for a single call.
///
/// Values are sent verbatim, so amounts should already be formatted the way the
/// gateway expects them (e.g. `"10.00"`).
///
/// # Examples
///
/// ```
/// use payssion_rs::types::RequestParams;
///
/// let mut params = RequestParams::new();
/// params.insert("pm_id", "alipay_cn");
/// params.insert("amount", "10.00");
///
/// assert_eq!(params.get("pm_id"), Some("alipay_cn"));
/// assert_eq!(params.len(), 2);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct RequestParams(BTreeMap<String, String>);

impl RequestParams {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, replacing any previous value under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Looks up a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns true if the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over key/value pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RequestParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, String>> for RequestParams {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

/// Parameters for creating a payment (`payment/create`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateParams {
    /// Payment method identifier (e.g. "alipay_cn")
    pub pm_id: String,

    /// Amount as a decimal string (e.g. "10.00")
    pub amount: String,

    /// ISO 4217 currency code
    pub currency: String,

    /// Merchant order identifier
    pub order_id: String,

    /// Human-readable description shown to the payer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Where the payer is sent after completing the payment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,

    /// Where the gateway posts asynchronous notifications
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_url: Option<String>,

    /// Any additional gateway fields
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl CreateParams {
    /// Creates the parameter set with the fields the gateway requires.
    ///
    /// # Examples
    ///
    /// ```
    /// use payssion_rs::types::CreateParams;
    ///
    /// let params = CreateParams::new("alipay_cn", "10.00", "USD", "order_1")
    ///     .with_description("Test payment")
    ///     .with_return_url("https://your-site.com/return");
    ///
    /// assert_eq!(params.description.as_deref(), Some("Test payment"));
    /// ```
    pub fn new(
        pm_id: impl Into<String>,
        amount: impl Into<String>,
        currency: impl Into<String>,
        order_id: impl Into<String>,
    ) -> Self {
        Self {
            pm_id: pm_id.into(),
            amount: amount.into(),
            currency: currency.into(),
            order_id: order_id.into(),
            description: None,
            return_url: None,
            notify_url: None,
            extra: BTreeMap::new(),
        }
    }

    /// Sets the payment description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the return URL.
    pub fn with_return_url(mut self, url: impl Into<String>) -> Self {
        self.return_url = Some(url.into());
        self
    }

    /// Sets the notification URL.
    pub fn with_notify_url(mut self, url: impl Into<String>) -> Self {
        self.notify_url = Some(url.into());
        self
    }

    /// Adds an arbitrary extra field.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

impl From<CreateParams> for RequestParams {
    fn from(p: CreateParams) -> Self {
        let mut params = RequestParams::from(p.extra);
        params.insert("pm_id", p.pm_id);
        params.insert("amount", p.amount);
        params.insert("currency", p.currency);
        params.insert("order_id", p.order_id);
        if let Some(description) = p.description {
            params.insert("description", description);
        }
        if let Some(url) = p.return_url {
            params.insert("return_url", url);
        }
        if let Some(url) = p.notify_url {
            params.insert("notify_url", url);
        }
        params
    }
}

/// Parameters for querying a payment (`payment/details`).
///
/// Either identifier may be omitted; an omitted identifier is signed as an empty
/// string.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailsParams {
    /// Gateway transaction identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,

    /// Merchant order identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,

    /// Any additional gateway fields
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl DetailsParams {
    /// Query by gateway transaction id.
    pub fn by_transaction(transaction_id: impl Into<String>) -> Self {
        Self {
            transaction_id: Some(transaction_id.into()),
            ..Self::default()
        }
    }

    /// Query by merchant order id.
    pub fn by_order(order_id: impl Into<String>) -> Self {
        Self {
            order_id: Some(order_id.into()),
            ..Self::default()
        }
    }

    /// Adds the merchant order id to an existing query.
    pub fn with_order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }
}

impl From<DetailsParams> for RequestParams {
    fn from(p: DetailsParams) -> Self {
        let mut params = RequestParams::from(p.extra);
        if let Some(id) = p.transaction_id {
            params.insert("transaction_id", id);
        }
        if let Some(id) = p.order_id {
            params.insert("order_id", id);
        }
        params
    }
}

/// Parameters for refunding a payment (`refunds`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RefundParams {
    /// Gateway transaction identifier of the payment to refund
    pub transaction_id: String,

    /// Refund amount as a decimal string
    pub amount: String,

    /// ISO 4217 currency code
    pub currency: String,

    /// Any additional gateway fields
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl RefundParams {
    /// Creates the refund parameter set.
    pub fn new(
        transaction_id: impl Into<String>,
        amount: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            amount: amount.into(),
            currency: currency.into(),
            extra: BTreeMap::new(),
        }
    }
}

impl From<RefundParams> for RequestParams {
    fn from(p: RefundParams) -> Self {
        let mut params = RequestParams::from(p.extra);
        params.insert("transaction_id", p.transaction_id);
        params.insert("amount", p.amount);
        params.insert("currency", p.currency);
        params
    }
}

/// Decoded response body.
///
/// Only `result_code` is interpreted. A `result_code` that is not an integer is
/// treated as absent.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PayssionResponse {
    /// Business-level result code (200 on success)
    #[serde(
        default,
        deserialize_with = "integer_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub result_code: Option<i64>,

    /// Every other field of the body, untouched
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl PayssionResponse {
    /// Returns true if `result_code` equals 200.
    pub fn is_success(&self) -> bool {
        self.result_code == Some(RESULT_CODE_SUCCESS)
    }

    /// Returns a top-level field of the body.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Gateway-supplied description of the outcome.
    pub fn description(&self) -> Option<&str> {
        self.get_str("description")
    }

    /// URL the payer should be redirected to, if any.
    pub fn redirect_url(&self) -> Option<&str> {
        self.get_str("redirect_url")
    }

    /// Gateway transaction identifier.
    pub fn transaction_id(&self) -> Option<&str> {
        self.get_str("transaction_id")
    }

    /// Merchant order identifier.
    pub fn order_id(&self) -> Option<&str> {
        self.get_str("order_id")
    }
}

fn integer_or_none<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_i64()))
}

/// Result of one gateway call.
///
/// `is_success` belongs to this call alone, so it stays correct when several calls
/// share a client.
#[derive(Debug, Clone, PartialEq)]
pub struct CallOutcome {
    /// Decoded response body
    pub response: PayssionResponse,

    /// Whether `result_code` was 200
    pub is_success: bool,
}

impl From<PayssionResponse> for CallOutcome {
    fn from(response: PayssionResponse) -> Self {
        let is_success = response.is_success();
        Self {
            response,
            is_success,
        }
    }
}
