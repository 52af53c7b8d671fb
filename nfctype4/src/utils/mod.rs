//! Small, reusable helpers used across the crate.

pub mod hex;

// Re-export the helpers at the `utils` level so callers can use
// `crate::utils::bytes_to_hex(...)` directly.
pub use hex::*;
