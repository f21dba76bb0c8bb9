//! Request and response helpers for handler tests.

use std::collections::HashMap;

use lambda_http::{http::Method, Body, Request, RequestExt, Response};

pub fn request(method: Method, body: &str) -> Request {
    let body = if body.is_empty() {
        Body::Empty
    } else {
        Body::from(body.to_string())
    };
    lambda_http::http::Request::builder()
        .method(method)
        .uri("/")
        .body(body)
        .unwrap()
}

pub fn with_path(event: Request, name: &str, value: &str) -> Request {
    event.with_path_parameters(HashMap::from([(name.to_string(), value.to_string())]))
}

pub fn with_query(event: Request, name: &str, value: &str) -> Request {
    event.with_query_string_parameters(HashMap::from([(name.to_string(), value.to_string())]))
}

pub fn body_json(response: &Response<Body>) -> serde_json::Value {
    serde_json::from_slice(response.body()).unwrap()
}
