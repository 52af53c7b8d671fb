// nfctype4-rs/nfctype4/src/protocol/mod.rs

//! ISO 7816-4 APDU codec shared by the reader device and the tag side.

pub mod capdu;
pub mod parser;
pub mod rapdu;

pub use capdu::{Capdu, INS_READ_BINARY, INS_SELECT, INS_UPDATE_BINARY};
pub use rapdu::Rapdu;
