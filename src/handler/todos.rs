//! Todo handlers
//!
//! `GET /` lists every todo, `POST /` appends one and echoes it back.

use http_body_util::{BodyExt, Full, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode};

use crate::config::AppState;
use crate::http;
use crate::logger;
use crate::todo::Todo;

/// Serialize the current list as a JSON array
pub async fn list_todos(state: &AppState) -> Response<Full<Bytes>> {
    let todos = state.todos.list().await;
    http::build_json_response(StatusCode::OK, &todos, &state.config.http.server_name)
}

/// Decode a todo from the request body, store it, and echo it back
///
/// A body that cannot be read or decoded leaves the list untouched.
pub async fn create_todo<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let server_name = state.config.http.server_name.as_str();
    let limit = usize::try_from(state.config.http.max_body_size).unwrap_or(usize::MAX);

    let whole_body = match Limited::new(req.into_body(), limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            return http::build_400_response(server_name);
        }
    };

    let todo = match Todo::from_json(&whole_body) {
        Ok(todo) => todo,
        Err(e) => {
            logger::log_warning(&format!("Rejected malformed todo: {e}"));
            return http::build_400_response(server_name);
        }
    };

    state.todos.push(todo.clone()).await;
    logger::log_debug(&format!(
        "Added todo '{}' ({} total)",
        todo.title,
        state.todos.len().await
    ));

    http::build_json_response(StatusCode::OK, &todo, server_name)
}
