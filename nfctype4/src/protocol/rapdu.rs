// nfctype4-rs/nfctype4/src/protocol/rapdu.rs

use std::fmt;

use crate::utils::bytes_to_hex_spaced;
use crate::{Error, Result};

/// Response APDU: an optional data field followed by the two status
/// bytes SW1 and SW2.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rapdu {
    /// Response data field.
    pub body: Vec<u8>,
    /// First status byte.
    pub sw1: u8,
    /// Second status byte.
    pub sw2: u8,
}

impl Rapdu {
    /// A response with the given status bytes and no data field.
    pub fn new(sw1: u8, sw2: u8) -> Rapdu {
        Rapdu {
            body: Vec::new(),
            sw1,
            sw2,
        }
    }

    /// SW 0x9000, command completed.
    pub fn completed() -> Rapdu {
        Rapdu::new(0x90, 0x00)
    }

    /// SW 0x9000 carrying a data field.
    pub fn completed_with(body: Vec<u8>) -> Rapdu {
        Rapdu {
            body,
            sw1: 0x90,
            sw2: 0x00,
        }
    }

    /// SW 0x6900, command not allowed.
    pub fn command_not_allowed() -> Rapdu {
        Rapdu::new(0x69, 0x00)
    }

    /// SW 0x6A82, file not found.
    pub fn file_not_found() -> Rapdu {
        Rapdu::new(0x6A, 0x82)
    }

    /// SW 0x6901, the tag is not in an active state.
    pub fn inactive_state() -> Rapdu {
        Rapdu::new(0x69, 0x01)
    }

    /// SW 0x6A87, Lc inconsistent with P1-P2.
    pub fn lc_inconsistent() -> Rapdu {
        Rapdu::new(0x6A, 0x87)
    }

    /// True when the status bytes read 0x9000.
    pub fn is_completed(&self) -> bool {
        self.sw1 == 0x90 && self.sw2 == 0x00
    }

    /// True when the status bytes read 0x6A82.
    pub fn is_file_not_found(&self) -> bool {
        self.sw1 == 0x6A && self.sw2 == 0x82
    }

    /// Parse a RAPDU: everything before the last two bytes is the data
    /// field. The data field itself is opaque at this layer.
    pub fn unmarshal(buf: &[u8]) -> Result<Rapdu> {
        if buf.len() < 2 {
            return Err(Error::UnexpectedEndOfData {
                needed: 2 - buf.len(),
                remaining: buf.len(),
            });
        }
        let split = buf.len() - 2;
        Ok(Rapdu {
            body: buf[..split].to_vec(),
            sw1: buf[split],
            sw2: buf[split + 1],
        })
    }

    /// Serialize the RAPDU. The wire grammar is trivial so this cannot
    /// fail.
    pub fn marshal(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.body.len() + 2);
        out.extend_from_slice(&self.body);
        out.push(self.sw1);
        out.push(self.sw2);
        out
    }
}

impl fmt::Display for Rapdu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SW1: {:02x} SW2: {:02x} | Data: {}",
            self.sw1,
            self.sw2,
            bytes_to_hex_spaced(&self.body)
        )
    }
}
