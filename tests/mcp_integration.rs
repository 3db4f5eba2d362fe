use std::sync::Arc;

use rmcp::{
    handler::client::ClientHandler,
    model::{
        self, CallToolRequestParam, ClientInfo, PaginatedRequestParam, ReadResourceRequestParam,
        ResourceContents,
    },
    service::{RoleClient, RoleServer, RunningService, Service, serve_directly},
    transport::async_rw::AsyncRwTransport,
};
use rustylink::{
    backend::{AliasMap, InMemoryBackend},
    codegen::CodeGenerator,
    mcp::RustyLinkMcpServer,
    store::{AliasStore, StoreSettings},
};
use serde_json::{Value, json};
use tokio::io::split;

#[derive(Clone, Default)]
struct DummyClientHandler;

impl ClientHandler for DummyClientHandler {
    fn get_info(&self) -> ClientInfo {
        ClientInfo::default()
    }
}

struct TestHarness {
    service: RunningService<RoleClient, DummyClientHandler>,
    server: RunningService<RoleServer, RustyLinkMcpServer>,
}

impl TestHarness {
    async fn new() -> Self {
        Self::with_store(AliasStore::new(
            Box::new(InMemoryBackend::new()),
            StoreSettings::new("http://localhost:3000"),
        ))
        .await
    }

    async fn with_store(store: AliasStore) -> Self {
        let server = RustyLinkMcpServer::new(Arc::new(store));

        let (client_stream, server_stream) = tokio::io::duplex(16 * 1024);
        let (client_read, client_write) = split(client_stream);
        let (server_read, server_write) = split(server_stream);

        let client_transport = AsyncRwTransport::new_client(client_read, client_write);
        let server_transport = AsyncRwTransport::new_server(server_read, server_write);

        let server_info = server.get_info();
        let client_handler = DummyClientHandler;
        let client_info = ClientHandler::get_info(&client_handler);

        let server =
            serve_directly::<RoleServer, _, _, _, _>(server, server_transport, Some(client_info));
        let service = serve_directly::<RoleClient, _, _, _, _>(
            client_handler,
            client_transport,
            Some(server_info),
        );

        Self { service, server }
    }

    async fn call(&self, name: &'static str, arguments: Value) -> Value {
        let response = self
            .service
            .call_tool(CallToolRequestParam {
                name: name.into(),
                arguments: Some(arguments.as_object().unwrap().clone()),
            })
            .await
            .unwrap_or_else(|err| panic!("{name} tool call failed: {err:?}"));
        assert_eq!(response.is_error, Some(false));
        response.structured_content.expect("structured payload")
    }

    async fn call_err(&self, name: &'static str, arguments: Value) -> model::ErrorData {
        let err = self
            .service
            .call_tool(CallToolRequestParam {
                name: name.into(),
                arguments: Some(arguments.as_object().unwrap().clone()),
            })
            .await
            .expect_err("tool call should fail");
        match err {
            rmcp::service::ServiceError::McpError(data) => data,
            other => panic!("expected MCP error, got {other:?}"),
        }
    }

    async fn shutdown(self) {
        let Self { service, server } = self;
        let _ = service.cancel().await;
        let _ = server.cancel().await;
    }
}

#[tokio::test]
async fn initialize_and_list_tools() {
    let harness = TestHarness::new().await;
    let service = &harness.service;

    let info = service
        .peer_info()
        .expect("server info should be initialized");
    assert_eq!(info.server_info.name, "rusty-link");
    assert!(info.capabilities.tools.is_some());

    let tools_result = service
        .list_tools(Some(PaginatedRequestParam { cursor: None }))
        .await
        .expect("list_tools");

    let names: Vec<_> = tools_result
        .tools
        .iter()
        .map(|tool| tool.name.as_ref())
        .collect();

    for expected in [
        "create-link",
        "resolve-link",
        "list-links",
        "update-link",
        "delete-link",
        "metrics",
    ] {
        assert!(names.contains(&expected), "missing tool {expected}");
    }

    let metrics_tool = tools_result
        .tools
        .iter()
        .find(|tool| tool.name == "metrics")
        .expect("metrics tool");
    let output_schema = metrics_tool
        .output_schema
        .as_ref()
        .expect("metrics output schema");
    assert!(output_schema["properties"]["linksCreated"].is_object());

    harness.shutdown().await;
}

#[tokio::test]
async fn link_lifecycle_over_tools() {
    let harness = TestHarness::new().await;

    let created = harness
        .call(
            "create-link",
            json!({ "target": "https://example.com", "code": "my link" }),
        )
        .await;
    assert_eq!(created["status"], "ok");
    assert_eq!(created["code"], "my-link");
    assert_eq!(created["shortUrl"], "http://localhost:3000/my-link");

    let resolved = harness
        .call("resolve-link", json!({ "code": "my-link" }))
        .await;
    assert_eq!(resolved["target"], "https://example.com");

    let updated = harness
        .call(
            "update-link",
            json!({ "code": "my-link", "target": "https://example.org" }),
        )
        .await;
    assert_eq!(updated["target"], "https://example.org");

    let listed = harness.call("list-links", json!({})).await;
    assert_eq!(listed["count"], 1);
    assert_eq!(listed["links"]["my-link"], "https://example.org");

    harness
        .call("delete-link", json!({ "code": "my-link" }))
        .await;
    let missing = harness
        .call_err("resolve-link", json!({ "code": "my-link" }))
        .await;
    assert_eq!(missing.code, model::ErrorCode::INVALID_PARAMS);

    let metrics = harness.call("metrics", json!({})).await;
    assert_eq!(metrics["linksCreated"], 1);
    assert_eq!(metrics["linksUpdated"], 1);
    assert_eq!(metrics["linksDeleted"], 1);

    harness.shutdown().await;
}

#[tokio::test]
async fn invalid_payloads_return_invalid_params() {
    let harness = TestHarness::new().await;

    let empty_target = harness
        .call_err("create-link", json!({ "target": "" }))
        .await;
    assert_eq!(empty_target.code, model::ErrorCode::INVALID_PARAMS);

    let missing_target = harness.call_err("create-link", json!({})).await;
    assert_eq!(missing_target.code, model::ErrorCode::INVALID_PARAMS);

    harness
        .call("create-link", json!({ "target": "https://a.example", "code": "dup" }))
        .await;
    let conflict = harness
        .call_err("create-link", json!({ "target": "https://b.example", "code": "dup" }))
        .await;
    assert_eq!(conflict.code, model::ErrorCode::INVALID_PARAMS);
    assert!(conflict.message.contains("already exists"));

    harness.shutdown().await;
}

#[tokio::test]
async fn health_resource_reports_link_count() {
    let harness = TestHarness::new().await;
    harness
        .call("create-link", json!({ "target": "https://a.example" }))
        .await;

    let result = harness
        .service
        .read_resource(ReadResourceRequestParam {
            uri: "mcp://health".into(),
        })
        .await
        .expect("read health resource");

    let text = match &result.contents[0] {
        ResourceContents::TextResourceContents { text, .. } => text.clone(),
        other => panic!("unexpected contents: {other:?}"),
    };
    let payload: Value = serde_json::from_str(&text).expect("health JSON");
    assert_eq!(payload["backend"], "memory");
    assert_eq!(payload["reachable"], true);
    assert_eq!(payload["linkCount"], 1);

    harness.shutdown().await;
}

struct CollidingGenerator;

impl CodeGenerator for CollidingGenerator {
    fn generate(&self) -> String {
        "taken".to_string()
    }
}

#[tokio::test]
async fn exhausted_code_generation_is_internal_error() {
    let mut seed = AliasMap::new();
    seed.insert("taken".into(), "https://taken.example".into());
    let harness = TestHarness::with_store(AliasStore::with_generator(
        Box::new(InMemoryBackend::with_links(seed)),
        Box::new(CollidingGenerator),
        StoreSettings::new("http://localhost:3000").with_max_generation_attempts(2),
    ))
    .await;

    let exhausted = harness
        .call_err("create-link", json!({ "target": "https://new.example" }))
        .await;
    assert_eq!(exhausted.code, model::ErrorCode::INTERNAL_ERROR);
    assert!(exhausted.message.contains("2 attempts"));

    harness.shutdown().await;
}

#[tokio::test]
async fn create_link_accepts_legacy_field_names() {
    let harness = TestHarness::new().await;

    let created = harness
        .call(
            "create-link",
            json!({ "url": "https://example.com", "shortendCode": "legacy" }),
        )
        .await;
    assert_eq!(created["code"], "legacy");
    assert_eq!(created["target"], "https://example.com");

    harness.shutdown().await;
}
