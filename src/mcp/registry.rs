use std::{collections::HashMap, future::Future, pin::Pin};

use rmcp::ErrorData as McpError;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, ReadResourceRequestParam, ReadResourceResult, Resource,
    Tool,
};

use super::server::RustyLinkMcpServer;

pub type ResourceFuture =
    Pin<Box<dyn Future<Output = Result<ReadResourceResult, McpError>> + Send>>;
pub type ToolFuture = Pin<Box<dyn Future<Output = Result<CallToolResult, McpError>> + Send>>;

pub type ResourceHandler = fn(&RustyLinkMcpServer, ReadResourceRequestParam) -> ResourceFuture;
pub type ToolHandler = fn(&RustyLinkMcpServer, CallToolRequestParam) -> ToolFuture;

/// Tools and resources the server advertises, paired with their handlers.
///
/// Listing order follows registration order.
#[derive(Default)]
pub struct Registry {
    resources: Vec<Resource>,
    resource_handlers: HashMap<String, ResourceHandler>,
    tools: Vec<(Tool, ToolHandler)>,
}

impl Registry {
    pub fn register_resource(&mut self, resource: Resource, handler: ResourceHandler) {
        self.resource_handlers
            .insert(resource.raw.uri.clone(), handler);
        self.resources.push(resource);
    }

    pub fn register_tool(&mut self, tool: Tool, handler: ToolHandler) {
        debug_assert!(
            self.tool(tool.name.as_ref()).is_none(),
            "tool {} registered twice",
            tool.name
        );
        self.tools.push((tool, handler));
    }

    pub fn resource(&self, uri: &str) -> Option<ResourceHandler> {
        self.resource_handlers.get(uri).copied()
    }

    pub fn tool(&self, name: &str) -> Option<ToolHandler> {
        self.tools
            .iter()
            .find(|(tool, _)| tool.name == name)
            .map(|(_, handler)| *handler)
    }

    pub fn resources(&self) -> Vec<Resource> {
        self.resources.clone()
    }

    pub fn tools(&self) -> Vec<Tool> {
        self.tools.iter().map(|(tool, _)| tool.clone()).collect()
    }
}
