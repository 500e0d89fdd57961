//! Sending prepared requests and classifying failures.
//!
//! A 2xx response is decoded and returned whatever its `result_code`. Non-2xx
//! responses with a well-known status become [`PayssionError::HttpStatus`]; every
//! other failure becomes [`PayssionError::Transport`] naming the base URL.

use crate::config::TransportPolicy;
use crate::errors::{PayssionError, Result};
use crate::transport::{FormRequest, Transport};
use crate::types::{PayssionResponse, RequestParams};
use serde::Serialize;
use url::form_urlencoded;

/// Client version reported to the gateway.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Header carrying the JSON client description.
pub const CLIENT_USER_AGENT_HEADER: &str = "X-Payssion-Client-User-Agent";

/// Content type of every request body.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

const LANG: &str = "rust";
const PUBLISHER: &str = "payssion";

/// Canonical status line for the statuses reported as [`PayssionError::HttpStatus`].
pub fn http_error_phrase(status: u16) -> Option<&'static str> {
    match status {
        400 => Some("400 Bad Request"),
        401 => Some("401 Unauthorized"),
        500 => Some("500 Internal Server Error"),
        501 => Some("501 Not Implemented"),
        502 => Some("502 Bad Gateway"),
        503 => Some("503 Service Unavailable"),
        504 => Some("504 Gateway Timeout"),
        _ => None,
    }
}

#[derive(Serialize)]
struct ClientUserAgent<'a> {
    version: &'a str,
    lang: &'a str,
    lang_version: &'a str,
    publisher: &'a str,
    uname: String,
}

fn lang_version() -> &'static str {
    option_env!("CARGO_PKG_RUST_VERSION")
        .filter(|v| !v.is_empty())
        .unwrap_or("unknown")
}

/// Headers attached to every request.
pub fn client_headers() -> Result<Vec<(&'static str, String)>> {
    let ua = ClientUserAgent {
        version: VERSION,
        lang: LANG,
        lang_version: lang_version(),
        publisher: PUBLISHER,
        uname: format!("{} {}", std::env::consts::OS, std::env::consts::ARCH),
    };

    Ok(vec![
        (CLIENT_USER_AGENT_HEADER, serde_json::to_string(&ua)?),
        (
            "User-Agent",
            format!("Payssion/{}/{}/{}", LANG, lang_version(), VERSION),
        ),
        ("Content-Type", FORM_CONTENT_TYPE.to_string()),
    ])
}

/// Form-encodes the parameters.
///
/// # Examples
///
/// ```
/// use payssion_rs::dispatch::encode_form;
/// use payssion_rs::types::RequestParams;
///
/// let params = RequestParams::new()
///     .with("amount", "10.00")
///     .with("return_url", "https://a.b/c?d=e");
///
/// assert_eq!(
///     encode_form(&params),
///     "amount=10.00&return_url=https%3A%2F%2Fa.b%2Fc%3Fd%3De"
/// );
/// ```
pub fn encode_form(params: &RequestParams) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter())
        .finish()
}

/// Sends `params` to `base_url + endpoint` and decodes the response.
///
/// Exactly one request is made.
pub async fn dispatch<T>(
    transport: &T,
    base_url: &str,
    policy: &TransportPolicy,
    endpoint: &str,
    params: &RequestParams,
) -> Result<PayssionResponse>
where
    T: Transport + ?Sized,
{
    let request = FormRequest {
        url: format!("{}{}", base_url, endpoint),
        headers: client_headers()?,
        body: encode_form(params),
        timeout: policy.timeout,
        verify_tls: policy.verify_tls,
    };

    #[cfg(feature = "tracing")]
    {
        tracing::debug!(url = %request.url, "dispatching Payssion request");
        if !request.verify_tls {
            tracing::warn!(url = %request.url, "TLS certificate verification disabled");
        }
    }

    let response = transport
        .post_form(request)
        .await
        .map_err(|failure| PayssionError::Transport {
            url: base_url.to_string(),
            message: failure.message,
        })?;

    #[cfg(feature = "tracing")]
    tracing::debug!(status = response.status, "Payssion response received");

    if !(200..300).contains(&response.status) {
        return Err(match http_error_phrase(response.status) {
            Some(phrase) => PayssionError::HttpStatus {
                status: response.status,
                phrase,
            },
            None => PayssionError::Transport {
                url: base_url.to_string(),
                message: format!("Request failed with status code {}", response.status),
            },
        });
    }

    Ok(serde_json::from_str(&response.body)?)
}
