//! Handler for the metrics tool.

use std::sync::Arc;

use crate::{
    mcp::format::MetricsPayload,
    store::{AliasApi, AliasStore},
};
use rmcp::{ErrorData as McpError, model::CallToolResult};

/// Handle the `metrics` tool, returning the current store counters.
pub(crate) async fn handle_metrics(store: &Arc<AliasStore>) -> Result<CallToolResult, McpError> {
    let payload = MetricsPayload::from(store.metrics_snapshot());
    let value = serde_json::to_value(payload).map_err(|err| {
        McpError::internal_error(format!("Failed to encode metrics: {err}"), None)
    })?;
    Ok(CallToolResult::structured(value))
}
