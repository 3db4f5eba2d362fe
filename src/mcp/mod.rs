//! Model Context Protocol (MCP) integration for Rusty Link.
//!
//! This module wires the alias store into an MCP server so editors and agent hosts can manage
//! short links over stdio. The surface area consists of:
//!
//! - Tools: `create-link`, `resolve-link`, `list-links`, `update-link`, `delete-link`, `metrics`.
//! - Resources: `mcp://health` and `mcp://usage`.
//!
//! Handlers, schemas, and formatting helpers are kept in focused submodules to make tests and
//! reviews small and targeted.

mod format;
pub mod handlers;
mod registry;
mod schemas;
mod server;

pub use server::RustyLinkMcpServer;
