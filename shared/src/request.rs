use std::collections::HashMap;

use lambda_http::{http::Method, Request, RequestExt};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Rejects the request unless it uses `expected`
pub fn require_method(event: &Request, expected: Method) -> Result<(), ApiError> {
    if *event.method() == expected {
        Ok(())
    } else {
        Err(ApiError::bad_request(format!(
            "{} method is required",
            expected
        )))
    }
}

/// Non-empty path parameter, or 400 with `missing`
pub fn path_param(event: &Request, name: &str, missing: &str) -> Result<String, ApiError> {
    event
        .path_parameters_ref()
        .and_then(|params| params.first(name))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::bad_request(missing))
}

pub fn query_param(event: &Request, name: &str) -> Option<String> {
    event
        .query_string_parameters_ref()
        .and_then(|params| params.first(name))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

pub fn require_body<'a>(event: &'a Request, missing: &str) -> Result<&'a [u8], ApiError> {
    let body: &[u8] = event.body();
    if body.is_empty() {
        Err(ApiError::bad_request(missing))
    } else {
        Ok(body)
    }
}

pub fn json_body<T: DeserializeOwned>(event: &Request, missing: &str) -> Result<T, ApiError> {
    let body = require_body(event, missing)?;
    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!("Failed to parse request body: {}", e);
        ApiError::bad_request("Invalid request body")
    })
}

/// Decodes an `application/x-www-form-urlencoded` body; repeated fields keep the last value
pub fn form_body(event: &Request, missing: &str) -> Result<HashMap<String, String>, ApiError> {
    let body = require_body(event, missing)?;
    Ok(url::form_urlencoded::parse(body).into_owned().collect())
}
