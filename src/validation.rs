//! Pre-flight checks.
//!
//! Each check is a standalone function returning [`Result<()>`]; callers chain them
//! with `?` so the first failure wins and nothing reaches the network.

use crate::errors::{PayssionError, Result};
use crate::types::RequestParams;
use std::fmt;
use std::str::FromStr;

/// HTTP verbs a call may be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RequestMethod {
    /// GET
    Get,
    /// PUT
    Put,
    /// POST
    #[default]
    Post,
    /// DELETE
    Delete,
}

impl RequestMethod {
    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            RequestMethod::Get => "get",
            RequestMethod::Put => "put",
            RequestMethod::Post => "post",
            RequestMethod::Delete => "delete",
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestMethod {
    type Err = PayssionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(RequestMethod::Get),
            "put" => Ok(RequestMethod::Put),
            "post" => Ok(RequestMethod::Post),
            "delete" => Ok(RequestMethod::Delete),
            _ => Err(PayssionError::validation("Not allowed request method type")),
        }
    }
}

/// Fails if either credential is empty.
pub fn check_credentials(api_key: &str, secret_key: &str) -> Result<()> {
    if api_key.is_empty() {
        return Err(PayssionError::config("api_key is not set!"));
    }
    if secret_key.is_empty() {
        return Err(PayssionError::config("secret_key is not set!"));
    }
    Ok(())
}

/// Parses a verb, accepting only get/put/post/delete in any case.
///
/// # Examples
///
/// ```
/// use payssion_rs::validation::{check_request_method, RequestMethod};
///
/// assert_eq!(check_request_method("POST").unwrap(), RequestMethod::Post);
/// assert!(check_request_method("patch").is_err());
/// ```
pub fn check_request_method(method: &str) -> Result<RequestMethod> {
    method.parse()
}

/// Fails if the parameter set is empty.
pub fn check_params(params: &RequestParams) -> Result<()> {
    if params.is_empty() {
        return Err(PayssionError::validation("params is null"));
    }
    Ok(())
}

/// Runs the per-call checks in order: verb first, then parameters.
pub fn validate_call(method: &str, params: &RequestParams) -> Result<RequestMethod> {
    let method = check_request_method(method)?;
    check_params(params)?;
    Ok(method)
}
