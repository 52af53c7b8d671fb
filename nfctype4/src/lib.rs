// nfctype4-rs/nfctype4/src/lib.rs

//! nfctype4
//!
//! Pure Rust implementation of the NFC Forum Type 4 Tag Operation
//! specification: a reader device performing the Read, Update and
//! Format procedures, and a software tag answering the same command
//! set, both built on a shared ISO 7816-4 APDU and capability container
//! codec. NDEF message payloads are treated as opaque bytes.
#![warn(missing_docs)]

pub mod cc;
pub mod constants;
pub mod device;
pub mod error;
pub mod prelude;
pub mod protocol;
pub mod tag;
pub mod test_support;
pub mod transport;
pub mod types;
pub mod utils;

// Re-export common types at the crate root so `crate::Error`,
// `crate::Result` and the newtypes in `types` are available for
// consumers and for convenient `prelude` re-exports.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;
