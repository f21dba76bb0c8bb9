use lambda_http::{http::StatusCode, Body, Error, Response};
use serde::Serialize;

use crate::error::ApiError;

/// JSON field the idea and post handlers report messages under
pub const MESSAGE_FIELD: &str = "message";
/// JSON field the user handlers report messages under
pub const ERROR_FIELD: &str = "error";

pub fn json<T: Serialize + ?Sized>(
    status: StatusCode,
    value: &T,
) -> Result<Response<Body>, ApiError> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::to_string(value)?.into())?)
}

/// `{"<field>": "<text>"}` with the given status
pub fn message(status: StatusCode, field: &str, text: &str) -> Result<Response<Body>, ApiError> {
    json(status, &serde_json::json!({ field: text }))
}

/// Response used by the delete handlers, which always carry the same header pair
pub fn delete_response(status: StatusCode, body: Body) -> Result<Response<Body>, ApiError> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Custom-Header", "value")
        .body(body)?)
}

pub fn deleted() -> Result<Response<Body>, ApiError> {
    delete_response(StatusCode::NO_CONTENT, Body::Empty)
}

pub fn delete_missing(text: &str) -> Result<Response<Body>, ApiError> {
    let body = serde_json::json!({ MESSAGE_FIELD: text }).to_string();
    delete_response(StatusCode::NOT_FOUND, body.into())
}

/// Maps a handler outcome onto the gateway response.
///
/// Client errors keep their message. Anything else is logged with its source
/// and answered with `failure` so no store detail reaches the caller.
pub fn finish(
    result: Result<Response<Body>, ApiError>,
    field: &str,
    failure: &str,
) -> Result<Response<Body>, Error> {
    match result {
        Ok(response) => {
            tracing::info!(status = response.status().as_u16(), "request handled");
            Ok(response)
        }
        Err(err) if err.is_client_error() => {
            tracing::warn!(status = err.status().as_u16(), "request rejected: {}", err);
            error_response(err.status(), field, &err.to_string())
        }
        Err(err) => {
            tracing::error!("{}: {}", failure, err);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, field, failure)
        }
    }
}

fn error_response(status: StatusCode, field: &str, text: &str) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::json!({ field: text }).to_string().into())
        .map_err(Box::new)?)
}
