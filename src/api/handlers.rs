//! HTTP API handlers.

use std::fmt;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::users::{gateway, SharedGateway, User};

/// Body of the health probes.
pub const PROBE_BODY: &str = "OK";
/// Body served for any GET that matches no route.
pub const GREETING_BODY: &str = "<h1>Hola Mundo desde el MS2</h1>";
/// Message returned after a successful insert.
pub const USER_CREATED_MESSAGE: &str = "Usuario creado correctamente";
/// Error returned when `name` is missing or empty.
pub const MISSING_NAME_MESSAGE: &str = "Falta el campo 'name'";
/// Error returned when the body is not JSON.
pub const INVALID_JSON_MESSAGE: &str = "JSON inválido";

const JSON: &str = "application/json";
const JSON_UTF8: &str = "application/json; charset=utf-8";

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Gateway used for every database operation.
    pub gateway: SharedGateway,
}

impl AppState {
    /// Create new app state.
    pub fn new(gateway: SharedGateway) -> Self {
        Self { gateway }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

/// Users listing response.
#[derive(Debug, Serialize)]
pub struct UsersResponse {
    /// Every stored user.
    pub users: Vec<User>,
}

/// Error payload.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,
}

impl ErrorResponse {
    fn new(message: impl fmt::Display) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

/// Response to a successful insert.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    /// Always [`USER_CREATED_MESSAGE`].
    pub message: &'static str,
    /// Identifier assigned by the store.
    pub id: i64,
    /// Name that was inserted.
    pub name: String,
}

/// Why a POST /users body was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewUserError {
    /// The body is not a JSON document.
    InvalidJson,
    /// The document has no usable `name`.
    MissingName,
}

impl NewUserError {
    /// Message sent to the client.
    pub fn message(self) -> &'static str {
        match self {
            Self::InvalidJson => INVALID_JSON_MESSAGE,
            Self::MissingName => MISSING_NAME_MESSAGE,
        }
    }
}

/// Extract the user name from a POST /users body.
///
/// `name` must be a non-empty JSON string. A valid JSON document that is not
/// an object has no `name` either.
pub fn parse_new_user(body: &[u8]) -> Result<String, NewUserError> {
    let document: Value = serde_json::from_slice(body).map_err(|_| NewUserError::InvalidJson)?;

    match document.get("name").and_then(Value::as_str) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(NewUserError::MissingName),
    }
}

fn json_response<T: Serialize>(
    status: StatusCode,
    content_type: &'static str,
    body: &T,
) -> Response {
    match serde_json::to_string(body) {
        Ok(json) => (
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static(content_type))],
            json,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to serialize response: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Startup, liveness and readiness probes - always 200 `OK`.
pub async fn probe() -> Html<&'static str> {
    Html(PROBE_BODY)
}

/// Greeting served for unmatched GET requests.
pub async fn greeting() -> Html<&'static str> {
    Html(GREETING_BODY)
}

/// GET /users - 200 with the users, or 200 with an error payload.
pub async fn list_users(State(state): State<AppState>) -> Response {
    match gateway::list_users(state.gateway.clone()).await {
        Ok(users) => json_response(StatusCode::OK, JSON_UTF8, &UsersResponse { users }),
        Err(e) => json_response(StatusCode::OK, JSON_UTF8, &ErrorResponse::new(e)),
    }
}

/// POST /users - 201 on insert (error payload included), 400 on bad input.
pub async fn create_user(State(state): State<AppState>, body: Bytes) -> Response {
    let name = match parse_new_user(&body) {
        Ok(name) => name,
        Err(rejection) => {
            debug!(?rejection, "Rejected user payload");
            return json_response(
                StatusCode::BAD_REQUEST,
                JSON,
                &ErrorResponse::new(rejection.message()),
            );
        }
    };

    match gateway::create_user(state.gateway.clone(), name).await {
        Ok(created) => json_response(
            StatusCode::CREATED,
            JSON,
            &CreatedResponse {
                message: USER_CREATED_MESSAGE,
                id: created.id,
                name: created.name,
            },
        ),
        Err(e) => json_response(StatusCode::CREATED, JSON, &ErrorResponse::new(e)),
    }
}

/// Anything no route or method matched.
///
/// GET and HEAD get the greeting, POST gets an empty 404 and every other
/// method an empty 501.
pub async fn unmatched(method: Method) -> Response {
    match method {
        Method::GET | Method::HEAD => greeting().await.into_response(),
        Method::POST => StatusCode::NOT_FOUND.into_response(),
        _ => StatusCode::NOT_IMPLEMENTED.into_response(),
    }
}
