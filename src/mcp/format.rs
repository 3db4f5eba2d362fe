//! Formatting helpers shared across MCP handlers and resources.

use crate::metrics::MetricsSnapshot;
use rmcp::model::ResourceContents;
use schemars::JsonSchema;
use serde::Serialize;

pub(crate) const APPLICATION_JSON: &str = "application/json";

/// Backend reachability snapshot returned by the `health` resource.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HealthSnapshot {
    /// Backend description (`file:<path>` or `memory`).
    pub(crate) backend: String,
    /// Whether the mapping could be loaded.
    pub(crate) reachable: bool,
    /// Number of stored links when reachable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) link_count: Option<usize>,
    /// Diagnostic captured when the backend failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
}

/// Counters returned by the `metrics` tool.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MetricsPayload {
    /// Links created since startup.
    pub(crate) links_created: u64,
    /// Targets replaced since startup.
    pub(crate) links_updated: u64,
    /// Links deleted since startup.
    pub(crate) links_deleted: u64,
    /// Creates rejected because the requested code was taken.
    pub(crate) code_conflicts: u64,
    /// Generated codes discarded because they were taken.
    pub(crate) generated_collisions: u64,
}

impl From<MetricsSnapshot> for MetricsPayload {
    fn from(snapshot: MetricsSnapshot) -> Self {
        Self {
            links_created: snapshot.links_created,
            links_updated: snapshot.links_updated,
            links_deleted: snapshot.links_deleted,
            code_conflicts: snapshot.code_conflicts,
            generated_collisions: snapshot.generated_collisions,
        }
    }
}

/// Serialize a value to JSON, falling back to compact formatting on error.
pub(crate) fn serialize_json<T: Serialize>(value: &T, context_uri: &str) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|error| {
        tracing::warn!(uri = context_uri, %error, "Failed to serialize JSON prettily");
        serde_json::to_string(value).unwrap_or_else(|_| "{}".into())
    })
}

/// Build JSON resource contents for MCP resource responses.
pub(crate) fn json_resource_contents(uri: &str, text: String) -> ResourceContents {
    ResourceContents::TextResourceContents {
        uri: uri.to_string(),
        mime_type: Some(APPLICATION_JSON.into()),
        text,
        meta: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn health_snapshot_omits_absent_fields() {
        let snapshot = HealthSnapshot {
            backend: "memory".into(),
            reachable: true,
            link_count: Some(3),
            error: None,
        };
        let value: Value = serde_json::from_str(&serialize_json(&snapshot, "mcp://health"))
            .expect("health payload must be valid JSON");
        assert_eq!(value["backend"], "memory");
        assert_eq!(value["linkCount"], 3);
        assert!(value.get("error").is_none());
    }

    #[test]
    fn resource_contents_are_tagged_as_json() {
        match json_resource_contents("mcp://usage", "{}".into()) {
            ResourceContents::TextResourceContents { mime_type, uri, .. } => {
                assert_eq!(mime_type.as_deref(), Some(APPLICATION_JSON));
                assert_eq!(uri, "mcp://usage");
            }
            other => panic!("unexpected contents: {other:?}"),
        }
    }
}
