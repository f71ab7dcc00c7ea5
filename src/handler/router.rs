//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: path and method checks, body size
//! validation, dispatch, and access logging.

use crate::config::AppState;
use crate::handler::todos;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

/// The only path the backend serves
pub const TODO_PATH: &str = "/";

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let entry = state
        .cached_access_log
        .load(Ordering::Relaxed)
        .then(|| access_entry(&req, remote_addr));

    let response = route_request(req, &state).await;

    if let Some(mut entry) = entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Dispatch on path and method
async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let server_name = state.config.http.server_name.as_str();

    if req.uri().path() != TODO_PATH {
        logger::log_warning(&format!(
            "Unsupported path: {} {}",
            req.method(),
            req.uri().path()
        ));
        return http::build_405_response(server_name);
    }

    let method = req.method().clone();
    match method {
        Method::GET => todos::list_todos(state).await,
        Method::POST => {
            if let Some(resp) = check_body_size(&req, state.config.http.max_body_size, server_name)
            {
                return resp;
            }
            todos::create_todo(req, state).await
        }
        Method::OPTIONS => http::build_options_response(server_name),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            http::build_405_response(server_name)
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(
    req: &Request<B>,
    max_body_size: u64,
    server_name: &str,
) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get(hyper::header::CONTENT_LENGTH)?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response(server_name))
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

fn access_entry<B>(req: &Request<B>, remote_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: hyper::header::HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        remote_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = match req.version() {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string();
    entry.referer = header(hyper::header::REFERER);
    entry.user_agent = header(hyper::header::USER_AGENT);
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::todo::Todo;
    use http_body_util::BodyExt;
    use hyper::StatusCode;

    fn test_state() -> Arc<AppState> {
        let mut cfg = Config::defaults();
        cfg.logging.access_log = false;
        Arc::new(AppState::new(&cfg))
    }

    fn request(method: Method, path: &str, body: &'static str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from_static(body.as_bytes())))
            .unwrap()
    }

    async fn send(state: &Arc<AppState>, req: Request<Full<Bytes>>) -> (StatusCode, hyper::HeaderMap, String) {
        let addr: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        let resp = handle_request(req, Arc::clone(state), addr).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_get_on_empty_state_returns_empty_array() {
        let state = test_state();
        let (status, headers, body) = send(&state, request(Method::GET, "/", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["Content-Type"], "application/json");
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn test_post_then_get_returns_item() {
        let state = test_state();
        let (status, _, body) = send(
            &state,
            request(Method::POST, "/", r#"{"title":"a","description":"b"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"title":"a","description":"b"}"#);

        let (status, _, body) = send(&state, request(Method::GET, "/", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"[{"title":"a","description":"b"}]"#);
    }

    #[tokio::test]
    async fn test_malformed_post_is_rejected_without_change() {
        let state = test_state();
        state.todos.push(Todo::new("keep", "me")).await;

        let (status, headers, body) =
            send(&state, request(Method::POST, "/", r#"{"title":"a","descr"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(body, http::response::BAD_REQUEST_MESSAGE);
        assert_eq!(state.todos.list().await, vec![Todo::new("keep", "me")]);
    }

    #[tokio::test]
    async fn test_post_with_wrong_shape_is_rejected() {
        let state = test_state();
        let (status, _, body) = send(&state, request(Method::POST, "/", r#"["a","b"]"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, http::response::BAD_REQUEST_MESSAGE);
        assert_eq!(state.todos.len().await, 0);
    }

    #[tokio::test]
    async fn test_options_returns_preflight_headers() {
        let state = test_state();
        let (status, headers, body) = send(&state, request(Method::OPTIONS, "/", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(headers["Access-Control-Allow-Methods"], "GET, POST, OPTIONS");
        assert_eq!(headers["Access-Control-Allow-Headers"], "Content-Type");
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_methods_return_405() {
        let state = test_state();
        for method in [Method::DELETE, Method::PUT, Method::PATCH, Method::HEAD] {
            let (status, headers, _) = send(&state, request(method, "/", "")).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(headers["Access-Control-Allow-Origin"], "*");
        }
    }

    #[tokio::test]
    async fn test_other_paths_return_405() {
        let state = test_state();
        let (status, _, body) = send(&state, request(Method::GET, "/todos", "")).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, http::response::METHOD_NOT_ALLOWED_MESSAGE);
    }

    #[tokio::test]
    async fn test_declared_oversized_body_returns_413() {
        let mut cfg = Config::defaults();
        cfg.logging.access_log = false;
        cfg.http.max_body_size = 8;
        let state = Arc::new(AppState::new(&cfg));

        let mut req = request(Method::POST, "/", r#"{"title":"a","description":"b"}"#);
        req.headers_mut()
            .insert(hyper::header::CONTENT_LENGTH, "31".parse().unwrap());
        let (status, headers, _) = send(&state, req).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(state.todos.len().await, 0);
    }

    #[tokio::test]
    async fn test_undeclared_oversized_body_returns_400() {
        let mut cfg = Config::defaults();
        cfg.logging.access_log = false;
        cfg.http.max_body_size = 8;
        let state = Arc::new(AppState::new(&cfg));

        let (status, _, _) = send(
            &state,
            request(Method::POST, "/", r#"{"title":"a","description":"b"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(state.todos.len().await, 0);
    }

    #[test]
    fn test_access_entry_captures_request_fields() {
        let req = Request::builder()
            .method(Method::GET)
            .uri("/?page=2")
            .header("User-Agent", "curl/8.0")
            .body(())
            .unwrap();
        let entry = access_entry(&req, "10.0.0.7:5555".parse().unwrap());
        assert_eq!(entry.remote_addr, "10.0.0.7");
        assert_eq!(entry.path, "/");
        assert_eq!(entry.query.as_deref(), Some("page=2"));
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.0"));
        assert_eq!(entry.referer, None);
    }
}
