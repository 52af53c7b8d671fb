// nfctype4-rs/nfctype4/src/constants.rs
//! Wire constants shared by the reader device and the software tag.

/// NDEF Tag Application name sent with SELECT by name (7 bytes).
pub const NDEF_APPLICATION_NAME: [u8; 7] = [0xD2, 0x76, 0x00, 0x00, 0x85, 0x01, 0x01];

/// Capability container file identifier.
pub const CC_FILE_ID: u16 = 0xE103;

/// Default NDEF file identifier used by the static software tag.
pub const DEFAULT_NDEF_FILE_ID: u16 = 0x8888;

/// Major version of the Type 4 Tag Operation specification implemented here.
pub const NFC_FORUM_MAJOR_VERSION: u8 = 2;

/// Minor version of the Type 4 Tag Operation specification implemented here.
pub const NFC_FORUM_MINOR_VERSION: u8 = 0;

/// Mapping version byte carried in the capability container.
pub const MAPPING_VERSION: u8 = NFC_FORUM_MAJOR_VERSION << 4 | NFC_FORUM_MINOR_VERSION;
