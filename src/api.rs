//! HTTP surface for Rusty Link.
//!
//! This module exposes a compact Axum router:
//!
//! - `POST /links` – Create a link from `{ "target", "code"? }` (`url` is accepted for `target`).
//!   Returns `201` with `{ success, message, code, shortUrl }`.
//! - `GET /links` – Full code → target mapping.
//! - `GET /links/:code` – Look up a single link without redirecting.
//! - `PUT /links/:code` – Replace the target of an existing code.
//! - `DELETE /links/:code` – Remove a link.
//! - `GET /:code` – Redirect (`302 Found`) to the stored target.
//! - `GET /metrics` – Store operation counters.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools/hosts.
//!
//! Bodies over [`MAX_BODY_BYTES`] are answered with `413`, non-JSON bodies with `415`.
//!
//! The HTTP surface shares the same alias store with the MCP server and the CLI, so behavior is
//! identical across interfaces.

use crate::backend::AliasMap;
use crate::metrics::MetricsSnapshot;
use crate::store::{AliasApi, StoreError};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Path, State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 32 * 1024;

/// Build the HTTP router exposing the link API surface.
pub fn create_router<S>(store: Arc<S>) -> Router
where
    S: AliasApi + 'static,
{
    Router::new()
        .route("/links", get(list_links::<S>).post(create_link::<S>))
        .route(
            "/links/:code",
            get(show_link::<S>)
                .put(update_link::<S>)
                .delete(delete_link::<S>),
        )
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .route("/:code", get(redirect_link::<S>))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(store)
}

/// Request body for `POST /links`.
#[derive(Deserialize)]
struct CreateLinkRequest {
    /// Destination URL.
    #[serde(default, alias = "url")]
    target: Option<String>,
    /// Optional custom code; whitespace runs become `-`.
    #[serde(default, alias = "shortendCode")]
    code: Option<String>,
}

/// Request body for `PUT /links/:code`.
#[derive(Deserialize)]
struct UpdateLinkRequest {
    #[serde(default, alias = "url")]
    target: Option<String>,
}

/// Success response for create and update.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LinkSavedResponse {
    success: bool,
    message: &'static str,
    code: String,
    short_url: String,
}

/// Response body for `GET /links/:code`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LinkResponse {
    code: String,
    target: String,
    short_url: String,
}

/// Create a new link, generating a code when none is requested.
async fn create_link<S>(
    State(store): State<Arc<S>>,
    payload: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LinkSavedResponse>), AppError>
where
    S: AliasApi,
{
    let Json(request) = payload?;
    let entry = store
        .create(request.target.unwrap_or_default(), request.code)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(LinkSavedResponse {
            success: true,
            message: "Link saved successfully",
            code: entry.code,
            short_url: entry.short_url,
        }),
    ))
}

/// Return every stored link.
async fn list_links<S>(State(store): State<Arc<S>>) -> Result<Json<AliasMap>, AppError>
where
    S: AliasApi,
{
    Ok(Json(store.list().await?))
}

/// Look up a single link.
async fn show_link<S>(
    State(store): State<Arc<S>>,
    Path(code): Path<String>,
) -> Result<Json<LinkResponse>, AppError>
where
    S: AliasApi,
{
    let target = store.get(&code).await?;
    Ok(Json(LinkResponse {
        short_url: store.short_url(&code),
        code,
        target,
    }))
}

/// Replace the target of an existing link.
async fn update_link<S>(
    State(store): State<Arc<S>>,
    Path(code): Path<String>,
    payload: Result<Json<UpdateLinkRequest>, JsonRejection>,
) -> Result<Json<LinkSavedResponse>, AppError>
where
    S: AliasApi,
{
    let Json(request) = payload?;
    let entry = store
        .update(&code, request.target.unwrap_or_default())
        .await?;
    Ok(Json(LinkSavedResponse {
        success: true,
        message: "Link updated successfully",
        code: entry.code,
        short_url: entry.short_url,
    }))
}

/// Remove a link.
async fn delete_link<S>(
    State(store): State<Arc<S>>,
    Path(code): Path<String>,
) -> Result<Json<serde_json::Value>, AppError>
where
    S: AliasApi,
{
    store.delete(&code).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Link deleted successfully",
    })))
}

/// Redirect to the target stored under `code`.
async fn redirect_link<S>(
    State(store): State<Arc<S>>,
    Path(code): Path<String>,
) -> Result<Response, AppError>
where
    S: AliasApi,
{
    let target = store.get(&code).await?;
    let location = HeaderValue::from_str(&target).map_err(|_| {
        tracing::error!(code = %code, "Stored target is not a valid Location header");
        AppError::InvalidTarget(code.clone())
    })?;
    tracing::debug!(code = %code, target = %target, "Redirecting");
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// Return the store operation counters.
async fn get_metrics<S>(State(store): State<Arc<S>>) -> Json<MetricsSnapshot>
where
    S: AliasApi,
{
    Json(store.metrics_snapshot())
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery/UX in hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "create_link",
                method: "POST",
                path: "/links",
                description: "Shorten a URL. Omit `code` to get a random 8-character hex code. \
                    Response returns { \"success\", \"message\", \"code\", \"shortUrl\" }.",
                request_example: Some(json!({
                    "target": "https://example.com/some/long/path",
                    "code": "my-link"
                })),
            },
            CommandDescriptor {
                name: "list_links",
                method: "GET",
                path: "/links",
                description: "Return every stored code and its target URL.",
                request_example: None,
            },
            CommandDescriptor {
                name: "get_link",
                method: "GET",
                path: "/links/{code}",
                description: "Return the target for a code without redirecting.",
                request_example: None,
            },
            CommandDescriptor {
                name: "update_link",
                method: "PUT",
                path: "/links/{code}",
                description: "Point an existing code at a new target URL.",
                request_example: Some(json!({ "target": "https://example.com/new" })),
            },
            CommandDescriptor {
                name: "delete_link",
                method: "DELETE",
                path: "/links/{code}",
                description: "Remove a code and its target.",
                request_example: None,
            },
            CommandDescriptor {
                name: "redirect",
                method: "GET",
                path: "/{code}",
                description: "Redirect (302) to the target URL stored under the code.",
                request_example: None,
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return store operation counters useful for observability dashboards.",
                request_example: None,
            },
        ],
    })
}

enum AppError {
    Store(StoreError),
    Rejected { status: StatusCode, message: String },
    InvalidTarget(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Store(error) => {
                let status = match &error {
                    StoreError::Validation(_) | StoreError::Conflict(_) => StatusCode::BAD_REQUEST,
                    StoreError::NotFound(_) => StatusCode::NOT_FOUND,
                    StoreError::Exhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
                    StoreError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                if status.is_server_error() {
                    tracing::error!(error = %error, "Link request failed");
                }
                (status, error.to_string())
            }
            AppError::Rejected { status, message } => (status, message),
            AppError::InvalidTarget(code) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Link '{code}' has a target that cannot be used for redirects"),
            ),
        };
        (status, Json(json!({ "success": false, "error": message }))).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(inner: StoreError) -> Self {
        Self::Store(inner)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}
