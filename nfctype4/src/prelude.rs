// nfctype4-rs/nfctype4/src/prelude.rs

pub use crate::cc::{
    CapabilityContainer, ControlTlv, NdefFileControlTlv, ProprietaryFileControlTlv, Tlv,
};
pub use crate::device::{Commander, Device, TagInfo};
pub use crate::protocol::{Capdu, Rapdu};
pub use crate::tag::{StaticTag, Tag};
#[cfg(feature = "pcsc")]
pub use crate::transport::PcscTransport;
pub use crate::transport::{ScriptedTransport, TagTransport, Transport};
pub use crate::{Error, FileId, Result};

// Re-export small utilities for convenience
pub use crate::utils::{bytes_to_hex, bytes_to_hex_spaced, parse_hex};
