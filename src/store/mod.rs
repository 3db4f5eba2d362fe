//! Alias store: the code→target mapping, its invariants, and the operations over it.

mod sanitize;
mod service;
pub mod types;

pub use service::{AliasApi, AliasStore};
pub use types::{AliasEntry, DEFAULT_MAX_GENERATION_ATTEMPTS, StoreError, StoreSettings};
