#![deny(missing_docs)]

//! Core library for the Rusty Link URL shortener.

/// HTTP routing and REST handlers.
pub mod api;
/// Persistence backends for the code→target mapping.
pub mod backend;
/// Short code generation.
pub mod codegen;
/// Environment-driven configuration management.
pub mod config;
/// Structured logging and tracing setup.
pub mod logging;
/// Model Context Protocol server implementation.
pub mod mcp;
/// Store operation metrics helpers.
pub mod metrics;
/// Alias store enforcing code uniqueness and lifecycle rules.
pub mod store;
