//! Handlers for the link management tools.

use std::sync::Arc;

use crate::store::{AliasApi, AliasStore};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, JsonObject},
};
use serde::Deserialize;
use serde_json::json;

use super::{parse_arguments, store_error};

/// Request payload for the `create-link` tool.
#[derive(Debug, Deserialize)]
pub(crate) struct CreateLinkRequest {
    /// Destination URL.
    #[serde(alias = "url")]
    pub(crate) target: String,
    /// Optional custom code.
    #[serde(default, alias = "shortendCode")]
    pub(crate) code: Option<String>,
}

/// Request payload for tools addressing a single code.
#[derive(Debug, Deserialize)]
pub(crate) struct CodeRequest {
    pub(crate) code: String,
}

/// Request payload for the `update-link` tool.
#[derive(Debug, Deserialize)]
pub(crate) struct UpdateLinkRequest {
    pub(crate) code: String,
    #[serde(alias = "url")]
    pub(crate) target: String,
}

/// Handle the `create-link` tool.
pub(crate) async fn handle_create_link(
    store: &Arc<AliasStore>,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let args: CreateLinkRequest = parse_arguments(arguments)?;
    let entry = store
        .create(args.target, args.code)
        .await
        .map_err(store_error)?;

    Ok(CallToolResult::structured(json!({
        "status": "ok",
        "code": entry.code,
        "target": entry.target,
        "shortUrl": entry.short_url,
    })))
}

/// Handle the `resolve-link` tool.
pub(crate) async fn handle_resolve_link(
    store: &Arc<AliasStore>,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let args: CodeRequest = parse_arguments(arguments)?;
    let target = store.get(&args.code).await.map_err(store_error)?;

    Ok(CallToolResult::structured(json!({
        "shortUrl": store.short_url(&args.code),
        "code": args.code,
        "target": target,
    })))
}

/// Handle the `list-links` tool.
pub(crate) async fn handle_list_links(store: &Arc<AliasStore>) -> Result<CallToolResult, McpError> {
    let links = store.list().await.map_err(store_error)?;
    Ok(CallToolResult::structured(json!({
        "count": links.len(),
        "links": links,
    })))
}

/// Handle the `update-link` tool.
pub(crate) async fn handle_update_link(
    store: &Arc<AliasStore>,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let args: UpdateLinkRequest = parse_arguments(arguments)?;
    let entry = store
        .update(&args.code, args.target)
        .await
        .map_err(store_error)?;

    Ok(CallToolResult::structured(json!({
        "status": "ok",
        "code": entry.code,
        "target": entry.target,
        "shortUrl": entry.short_url,
    })))
}

/// Handle the `delete-link` tool.
pub(crate) async fn handle_delete_link(
    store: &Arc<AliasStore>,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let args: CodeRequest = parse_arguments(arguments)?;
    store.delete(&args.code).await.map_err(store_error)?;
    Ok(CallToolResult::structured(json!({
        "status": "ok",
        "code": args.code,
    })))
}
