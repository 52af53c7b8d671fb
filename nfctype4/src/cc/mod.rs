// nfctype4-rs/nfctype4/src/cc/mod.rs

//! Capability container and TLV codec.

pub mod container;
pub mod tlv;

pub use container::CapabilityContainer;
pub use tlv::{
    ControlTlv, NdefFileControlTlv, ProprietaryFileControlTlv, Tlv,
    TLV_TYPE_NDEF_FILE_CONTROL, TLV_TYPE_PROPRIETARY_FILE_CONTROL,
};
