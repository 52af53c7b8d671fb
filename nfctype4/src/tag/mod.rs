// nfctype4-rs/nfctype4/src/tag/mod.rs

//! Software tags: anything that can answer the Type 4 Tag command set.

use crate::protocol::{Capdu, Rapdu};

mod static_tag;
pub use static_tag::StaticTag;

/// A Tag answers command APDUs with response APDUs. Implementations can
/// be paired with a `Device` through `transport::TagTransport` for
/// end-to-end runs without hardware.
pub trait Tag {
    /// Process one command and produce its response. A tag never fails
    /// at this level; protocol problems are reported through the
    /// response status words.
    fn command(&mut self, capdu: &Capdu) -> Rapdu;
}
