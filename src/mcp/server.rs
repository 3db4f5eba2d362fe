//! MCP server bootstrap and request dispatch.

use std::{borrow::Cow, sync::Arc};

use crate::{
    mcp::{
        format::{
            APPLICATION_JSON, HealthSnapshot, MetricsPayload, json_resource_contents,
            serialize_json,
        },
        handlers::{
            links::{
                handle_create_link, handle_delete_link, handle_list_links, handle_resolve_link,
                handle_update_link,
            },
            metrics::handle_metrics,
        },
        registry, schemas,
    },
    store::{AliasApi, AliasStore},
};
use rmcp::{
    ErrorData as McpError,
    handler::server::ServerHandler,
    model::{
        AnnotateAble, CallToolRequestParam, CallToolResult, JsonObject, ListResourcesResult,
        ListToolsResult, RawResource, ReadResourceRequestParam, ReadResourceResult, Resource,
        ServerCapabilities, ServerInfo, Tool, ToolAnnotations,
    },
};
const HEALTH_URI: &str = "mcp://health";
const USAGE_URI: &str = "mcp://usage";

/// MCP server implementation exposing Rusty Link operations.
#[derive(Clone)]
pub struct RustyLinkMcpServer {
    store: Arc<AliasStore>,
    registry: Arc<registry::Registry>,
}

impl RustyLinkMcpServer {
    /// Create a new MCP server backed by the supplied alias store.
    pub fn new(store: Arc<AliasStore>) -> Self {
        let code_schema = Arc::new(schemas::code_input_schema());
        let empty_schema = Arc::new(schemas::empty_object_schema());

        let mut registry = registry::Registry::default();
        registry.register_resource(
            json_resource(HEALTH_URI, "health", "Storage backend and current link count"),
            resource_health,
        );
        registry.register_resource(
            json_resource(
                USAGE_URI,
                "usage",
                "Recommended tool flow: list-links → create-link → resolve-link.",
            ),
            resource_usage,
        );

        registry.register_tool(
            tool(
                "create-link",
                "Create Short Link",
                "Shorten a URL under a custom or generated code; fails if the code is taken.",
                Arc::new(schemas::create_link_input_schema()),
                ToolAnnotations::default().destructive(false).idempotent(false),
            ),
            tool_create_link,
        );
        registry.register_tool(
            tool(
                "resolve-link",
                "Resolve Short Link",
                "Look up the target URL stored under a code.",
                code_schema.clone(),
                ToolAnnotations::default().read_only(true).idempotent(true),
            ),
            tool_resolve_link,
        );
        registry.register_tool(
            tool(
                "list-links",
                "List Short Links",
                "Return every stored code and its target before picking a new code.",
                empty_schema.clone(),
                ToolAnnotations::default().read_only(true).idempotent(true),
            ),
            tool_list_links,
        );
        registry.register_tool(
            tool(
                "update-link",
                "Update Short Link",
                "Point an existing code at a new target URL.",
                Arc::new(schemas::update_link_input_schema()),
                ToolAnnotations::default().destructive(true).idempotent(true),
            ),
            tool_update_link,
        );
        registry.register_tool(
            tool(
                "delete-link",
                "Delete Short Link",
                "Remove a code; later lookups of it report not found.",
                code_schema,
                ToolAnnotations::default().destructive(true).idempotent(false),
            ),
            tool_delete_link,
        );
        registry.register_tool(
            Tool {
                output_schema: Some(Arc::new(schemas::output_schema::<MetricsPayload>())),
                ..tool(
                    "metrics",
                    "Metrics Snapshot",
                    "Check create/update/delete counts and code collisions at a glance.",
                    empty_schema,
                    ToolAnnotations::default().read_only(true).idempotent(true),
                )
            },
            tool_metrics,
        );

        Self {
            store,
            registry: Arc::new(registry),
        }
    }
}

fn tool(
    name: &'static str,
    title: &'static str,
    description: &'static str,
    input_schema: Arc<JsonObject>,
    annotations: ToolAnnotations,
) -> Tool {
    Tool {
        name: Cow::Borrowed(name),
        title: Some(title.to_string()),
        description: Some(Cow::Borrowed(description)),
        input_schema,
        output_schema: None,
        annotations: Some(ToolAnnotations {
            title: Some(title.to_string()),
            ..annotations.open_world(false)
        }),
        icons: None,
    }
}

fn json_resource(uri: &str, name: &str, description: &str) -> Resource {
    let mut raw = RawResource::new(uri, name);
    raw.description = Some(description.into());
    raw.mime_type = Some(APPLICATION_JSON.into());
    raw.no_annotation()
}

fn resource_health(
    server: &RustyLinkMcpServer,
    _request: ReadResourceRequestParam,
) -> registry::ResourceFuture {
    let store = server.store.clone();
    Box::pin(async move {
        let backend = store.describe_backend();
        let payload = match store.list().await {
            Ok(links) => HealthSnapshot {
                backend,
                reachable: true,
                link_count: Some(links.len()),
                error: None,
            },
            Err(error) => {
                tracing::warn!(error = %error, "Backend health probe failed");
                HealthSnapshot {
                    backend,
                    reachable: false,
                    link_count: None,
                    error: Some(error.to_string()),
                }
            }
        };
        Ok(ReadResourceResult {
            contents: vec![json_resource_contents(
                HEALTH_URI,
                serialize_json(&payload, HEALTH_URI),
            )],
        })
    })
}

fn resource_usage(
    _server: &RustyLinkMcpServer,
    _request: ReadResourceRequestParam,
) -> registry::ResourceFuture {
    Box::pin(async move {
        let usage = serde_json::json!({
            "title": "Rusty Link MCP Usage",
            "policy": [
                "Codes are case-sensitive and looked up exactly as stored.",
                "Whitespace in a requested code becomes '-'; '/', '?' and '#' are rejected.",
                "Omit `code` to get a random 8-character hex code.",
                "Targets are stored as given; they must not be empty.",
            ],
            "flows": [
                {
                    "name": "Shorten",
                    "steps": [
                        "list-links() to see codes in use",
                        "create-link({ target, code? })"
                    ]
                },
                {
                    "name": "Maintain",
                    "steps": [
                        "resolve-link({ code })",
                        "update-link({ code, target }) or delete-link({ code })"
                    ]
                }
            ]
        });
        Ok(ReadResourceResult {
            contents: vec![json_resource_contents(
                USAGE_URI,
                serialize_json(&usage, USAGE_URI),
            )],
        })
    })
}

fn tool_create_link(
    server: &RustyLinkMcpServer,
    request: CallToolRequestParam,
) -> registry::ToolFuture {
    let store = server.store.clone();
    Box::pin(async move { handle_create_link(&store, request.arguments).await })
}

fn tool_resolve_link(
    server: &RustyLinkMcpServer,
    request: CallToolRequestParam,
) -> registry::ToolFuture {
    let store = server.store.clone();
    Box::pin(async move { handle_resolve_link(&store, request.arguments).await })
}

fn tool_list_links(
    server: &RustyLinkMcpServer,
    _request: CallToolRequestParam,
) -> registry::ToolFuture {
    let store = server.store.clone();
    Box::pin(async move { handle_list_links(&store).await })
}

fn tool_update_link(
    server: &RustyLinkMcpServer,
    request: CallToolRequestParam,
) -> registry::ToolFuture {
    let store = server.store.clone();
    Box::pin(async move { handle_update_link(&store, request.arguments).await })
}

fn tool_delete_link(
    server: &RustyLinkMcpServer,
    request: CallToolRequestParam,
) -> registry::ToolFuture {
    let store = server.store.clone();
    Box::pin(async move { handle_delete_link(&store, request.arguments).await })
}

fn tool_metrics(
    server: &RustyLinkMcpServer,
    _request: CallToolRequestParam,
) -> registry::ToolFuture {
    let store = server.store.clone();
    Box::pin(async move { handle_metrics(&store).await })
}

impl ServerHandler for RustyLinkMcpServer {
    fn get_info(&self) -> ServerInfo {
        let mut implementation = rmcp::model::Implementation::from_build_env();
        implementation.name = "rusty-link".to_string();
        implementation.title = Some("Rusty Link MCP".to_string());
        implementation.version = env!("CARGO_PKG_VERSION").to_string();

        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_resources()
                .enable_tools()
                .build(),
            server_info: implementation,
            instructions: Some(
                "Use this server to create, resolve, update, and delete short links. \
                 Codes are unique and case-sensitive; omit the code to get a random one."
                    .into(),
            ),
            ..ServerInfo::default()
        }
    }

    fn list_resources(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        std::future::ready(Ok(ListResourcesResult::with_all_items(
            self.registry.resources(),
        )))
    }

    fn list_tools(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult::with_all_items(self.registry.tools())))
    }

    fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        async move {
            let uri = request.uri.clone();
            if let Some(handler) = self.registry.resource(&uri) {
                return handler(self, request).await;
            }

            Err(McpError::invalid_params(
                format!("Unknown resource URI: {uri}"),
                None,
            ))
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            if let Some(handler) = self.registry.tool(request.name.as_ref()) {
                return handler(self, request).await;
            }

            Err(McpError::invalid_params(
                format!("Unknown tool: {}", request.name),
                None,
            ))
        }
    }
}
