//! HTTP response building module
//!
//! Every builder stamps `Access-Control-Allow-Origin: *` so browser frontends
//! served from another origin can read the response, including error bodies.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};
use serde::Serialize;

/// Methods accepted on the todo route
pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

/// Fixed response bodies
pub const ENCODE_ERROR_MESSAGE: &str = "Unable to encode todos as JSON";
pub const BAD_REQUEST_MESSAGE: &str = "Invalid request body";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed";
pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "Payload Too Large";

/// Response builder with the headers shared by every response
fn base_builder(status: StatusCode, server_name: &str) -> Builder {
    Response::builder()
        .status(status)
        .header("Access-Control-Allow-Origin", "*")
        .header("Server", server_name)
}

/// Finish a builder, falling back to a bare response if a header was rejected
fn finish(builder: Builder, status: StatusCode, body: Bytes) -> Response<Full<Bytes>> {
    builder.body(Full::new(body.clone())).unwrap_or_else(|e| {
        log_build_error(status, &e);
        fallback_response(status, body)
    })
}

fn fallback_response(status: StatusCode, body: Bytes) -> Response<Full<Bytes>> {
    let mut resp = Response::new(Full::new(body));
    *resp.status_mut() = status;
    resp.headers_mut().insert(
        hyper::header::ACCESS_CONTROL_ALLOW_ORIGIN,
        hyper::header::HeaderValue::from_static("*"),
    );
    resp
}

/// Build a JSON response from any serializable value
///
/// Serialization failures turn into a 500 with a fixed plain-text body.
pub fn build_json_response<T: Serialize + ?Sized>(
    status: StatusCode,
    value: &T,
    server_name: &str,
) -> Response<Full<Bytes>> {
    match serde_json::to_vec(value) {
        Ok(json) => finish(
            base_builder(status, server_name).header("Content-Type", "application/json"),
            status,
            Bytes::from(json),
        ),
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            build_500_response(server_name)
        }
    }
}

/// Build plain-text response with a fixed message
pub fn build_text_response(
    status: StatusCode,
    message: &'static str,
    server_name: &str,
) -> Response<Full<Bytes>> {
    finish(
        base_builder(status, server_name).header("Content-Type", "text/plain; charset=utf-8"),
        status,
        Bytes::from_static(message.as_bytes()),
    )
}

/// Build 400 Bad Request response
pub fn build_400_response(server_name: &str) -> Response<Full<Bytes>> {
    build_text_response(StatusCode::BAD_REQUEST, BAD_REQUEST_MESSAGE, server_name)
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(server_name: &str) -> Response<Full<Bytes>> {
    finish(
        base_builder(StatusCode::METHOD_NOT_ALLOWED, server_name)
            .header("Content-Type", "text/plain; charset=utf-8")
            .header("Allow", ALLOWED_METHODS),
        StatusCode::METHOD_NOT_ALLOWED,
        Bytes::from_static(METHOD_NOT_ALLOWED_MESSAGE.as_bytes()),
    )
}

/// Build 413 Payload Too Large response
pub fn build_413_response(server_name: &str) -> Response<Full<Bytes>> {
    build_text_response(
        StatusCode::PAYLOAD_TOO_LARGE,
        PAYLOAD_TOO_LARGE_MESSAGE,
        server_name,
    )
}

/// Build 500 Internal Server Error response
pub fn build_500_response(server_name: &str) -> Response<Full<Bytes>> {
    build_text_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        ENCODE_ERROR_MESSAGE,
        server_name,
    )
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(server_name: &str) -> Response<Full<Bytes>> {
    finish(
        base_builder(StatusCode::OK, server_name)
            .header("Access-Control-Allow-Methods", ALLOWED_METHODS)
            .header("Access-Control-Allow-Headers", "Content-Type"),
        StatusCode::OK,
        Bytes::new(),
    )
}

/// Log response build error
fn log_build_error(status: StatusCode, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
