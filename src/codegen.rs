//! Short code generation.
//!
//! Generated codes are lowercase hex strings drawn from the operating system's CSPRNG. The
//! generator holds no counter or shared state, so two calls are independent draws; uniqueness is
//! enforced by [`crate::store::AliasStore`], not here.

use rand::{RngCore, rngs::OsRng};

/// Number of random bytes drawn per generated code (8 hex characters).
pub const DEFAULT_CODE_BYTES: usize = 4;

/// Source of short codes used when callers do not request one.
pub trait CodeGenerator: Send + Sync {
    /// Produce a fresh candidate code.
    fn generate(&self) -> String;
}

/// Hex-encoded random codes backed by [`OsRng`].
#[derive(Debug, Clone, Copy)]
pub struct RandomHexGenerator {
    byte_len: usize,
}

impl RandomHexGenerator {
    /// Construct a generator emitting the default 8-character codes.
    pub const fn new() -> Self {
        Self {
            byte_len: DEFAULT_CODE_BYTES,
        }
    }

    /// Construct a generator drawing `byte_len` random bytes per code (clamped to at least 1).
    pub fn with_byte_len(byte_len: usize) -> Self {
        Self {
            byte_len: byte_len.max(1),
        }
    }
}

impl Default for RandomHexGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGenerator for RandomHexGenerator {
    fn generate(&self) -> String {
        let mut bytes = vec![0_u8; self.byte_len];
        // OsRng panics if the platform entropy source fails; there is nothing to recover to.
        OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}
