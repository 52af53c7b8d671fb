// nfctype4-rs/nfctype4/src/transport/mod.rs

//! Channels between a reader device and a tag: a PC/SC hardware
//! transport (behind the `pcsc` feature), an in-process software tag
//! transport, and a scripted transport for tests and examples.

#[cfg(feature = "pcsc")]
pub mod pcsc;
pub mod scripted;
pub mod tag;
pub mod traits;

#[cfg(feature = "pcsc")]
pub use self::pcsc::PcscTransport;
pub use scripted::ScriptedTransport;
pub use tag::TagTransport;
pub use traits::Transport;
