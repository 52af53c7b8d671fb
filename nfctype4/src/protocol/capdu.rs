// nfctype4-rs/nfctype4/src/protocol/capdu.rs

use std::fmt;

use crate::constants::NDEF_APPLICATION_NAME;
use crate::protocol::parser::Reader;
use crate::types::FileId;
use crate::utils::bytes_to_hex;
use crate::{Error, Result};

/// INS byte of the SELECT command.
pub const INS_SELECT: u8 = 0xA4;
/// INS byte of the READ_BINARY command.
pub const INS_READ_BINARY: u8 = 0xB0;
/// INS byte of the UPDATE_BINARY command.
pub const INS_UPDATE_BINARY: u8 = 0xD6;

/// Command APDU as defined by ISO 7816-4. The Lc and Le fields are kept
/// in their wire encoding so marshalling reproduces the exact short or
/// extended form a CAPDU was built or parsed with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capdu {
    /// Class byte.
    pub cla: u8,
    /// Instruction byte.
    pub ins: u8,
    /// First parameter byte.
    pub p1: u8,
    /// Second parameter byte.
    pub p2: u8,
    /// Data field length bytes: empty, one byte, or the 3-byte extended form.
    pub lc: Vec<u8>,
    /// Data field.
    pub data: Vec<u8>,
    /// Expected response length bytes: empty, 1, 2 or 3 bytes.
    pub le: Vec<u8>,
}

impl Capdu {
    /// The numeric Lc value. Returns 0 for an empty Lc field or one that
    /// has an unexpected width.
    pub fn lc_value(&self) -> u16 {
        match self.lc.len() {
            1 => self.lc[0] as u16,
            3 => u16::from_be_bytes([self.lc[1], self.lc[2]]),
            _ => 0,
        }
    }

    /// Encode `n` into the minimal legal Lc form.
    pub fn set_lc(&mut self, n: u16) {
        if n == 0 {
            self.lc.clear();
        } else if n <= 255 {
            self.lc = vec![n as u8];
        } else {
            let b = n.to_be_bytes();
            self.lc = vec![0x00, b[0], b[1]];
        }
    }

    /// The numeric Le value. A single 0x00 byte means 256 and the 2-byte
    /// form 0x0000 means 65536, which is why the result is a u32.
    pub fn le_value(&self) -> u32 {
        match self.le.len() {
            1 => {
                if self.le[0] == 0 {
                    256
                } else {
                    self.le[0] as u32
                }
            }
            2 => {
                let n = u16::from_be_bytes([self.le[0], self.le[1]]);
                if n == 0 {
                    65_536
                } else {
                    n as u32
                }
            }
            3 => u16::from_be_bytes([self.le[1], self.le[2]]) as u32,
            _ => 0,
        }
    }

    /// Encode `n` into the minimal legal Le form. Values above 255 take
    /// the 2-byte form when an Lc is present and the 3-byte form with a
    /// leading zero otherwise. 65536 only has a 2-byte encoding (0x0000);
    /// without an Lc it saturates to 65535.
    pub fn set_le(&mut self, n: u32) {
        if n == 0 {
            self.le.clear();
        } else if n <= 255 {
            self.le = vec![n as u8];
        } else if n == 256 {
            self.le = vec![0x00];
        } else if n <= 65_535 {
            let b = (n as u16).to_be_bytes();
            if self.lc.is_empty() {
                self.le = vec![0x00, b[0], b[1]];
            } else {
                self.le = vec![b[0], b[1]];
            }
        } else if self.lc.is_empty() {
            self.le = vec![0x00, 0xFF, 0xFF];
        } else {
            self.le = vec![0x00, 0x00];
        }
    }

    /// P1 and P2 combined into a big-endian u16, the file offset for
    /// READ_BINARY and UPDATE_BINARY.
    pub fn p1p2(&self) -> u16 {
        u16::from_be_bytes([self.p1, self.p2])
    }

    /// Validate the Lc/Le shapes and the Lc/data agreement.
    pub fn check(&self) -> Result<()> {
        match self.lc.len() {
            1 if self.lc[0] == 0 => {
                return Err(Error::InvalidLc("a 1-byte Lc cannot be 0"));
            }
            2 => return Err(Error::InvalidLc("an Lc cannot have 2 bytes")),
            3 => {
                if self.lc[0] != 0 {
                    return Err(Error::InvalidLc("a 3-byte Lc must start with 0x00"));
                }
                if self.lc[1] == 0 && self.lc[2] == 0 {
                    return Err(Error::InvalidLc("a 3-byte Lc cannot be all zeros"));
                }
            }
            n if n > 3 => {
                return Err(Error::InvalidLc("an Lc cannot have more than 3 bytes"));
            }
            _ => {}
        }

        match self.le.len() {
            2 if self.lc.is_empty() => {
                return Err(Error::InvalidLe("a 2-byte Le needs an Lc present"));
            }
            3 => {
                if !self.lc.is_empty() {
                    return Err(Error::InvalidLe("a 3-byte Le is only valid with an empty Lc"));
                }
                if self.le[0] != 0 {
                    return Err(Error::InvalidLe("a 3-byte Le must start with 0x00"));
                }
            }
            n if n > 3 => {
                return Err(Error::InvalidLe("an Le cannot have more than 3 bytes"));
            }
            _ => {}
        }

        if self.lc_value() as usize != self.data.len() {
            return Err(Error::LcDataMismatch {
                lc: self.lc_value(),
                data_len: self.data.len(),
            });
        }
        Ok(())
    }

    /// Parse a CAPDU from its wire form. The body after the 4 header
    /// bytes is classified into exactly one of the ISO 7816-4 cases
    /// (1, 2S, 3S, 4S, 2E, 3E, 4E); anything else is an error.
    pub fn unmarshal(buf: &[u8]) -> Result<Capdu> {
        let mut r = Reader::new(buf);
        let mut apdu = Capdu {
            cla: r.read_u8()?,
            ins: r.read_u8()?,
            p1: r.read_u8()?,
            p2: r.read_u8()?,
            ..Default::default()
        };
        let body = r.read_slice(r.remaining())?;

        let b = body.len();
        let b1 = body.first().copied().unwrap_or(0);
        let b2 = body.get(1).copied().unwrap_or(0);
        let b3 = body.get(2).copied().unwrap_or(0);
        let ext = u16::from_be_bytes([b2, b3]) as usize;

        if b == 0 {
            // Case 1: header only.
        } else if b == 1 {
            // Case 2S.
            apdu.le = vec![b1];
        } else if b1 != 0 && b == 1 + b1 as usize {
            // Case 3S.
            apdu.lc = vec![b1];
            apdu.data = body[1..].to_vec();
        } else if b1 != 0 && b == 2 + b1 as usize {
            // Case 4S.
            apdu.lc = vec![b1];
            apdu.data = body[1..1 + b1 as usize].to_vec();
            apdu.le = vec![body[b - 1]];
        } else if b1 == 0 && b == 3 {
            // Case 2E.
            apdu.le = vec![b1, b2, b3];
        } else if b1 == 0 && (b2 | b3) != 0 && b == 3 + ext {
            // Case 3E.
            apdu.lc = vec![b1, b2, b3];
            apdu.data = body[3..].to_vec();
        } else if b1 == 0 && (b2 | b3) != 0 && b == 5 + ext {
            // Case 4E.
            apdu.lc = vec![b1, b2, b3];
            apdu.data = body[3..3 + ext].to_vec();
            apdu.le = body[3 + ext..].to_vec();
        } else {
            return Err(Error::UnclassifiableBody(b));
        }

        apdu.check()?;
        Ok(apdu)
    }

    /// Serialize the CAPDU, preserving the stored Lc/Le forms.
    pub fn marshal(&self) -> Result<Vec<u8>> {
        self.check()?;
        let mut out =
            Vec::with_capacity(4 + self.lc.len() + self.data.len() + self.le.len());
        out.push(self.cla);
        out.push(self.ins);
        out.push(self.p1);
        out.push(self.p2);
        out.extend_from_slice(&self.lc);
        out.extend_from_slice(&self.data);
        out.extend_from_slice(&self.le);
        Ok(out)
    }

    /// SELECT by name of the NDEF tag application.
    pub fn ndef_application_select() -> Capdu {
        let mut apdu = Capdu {
            cla: 0x00,
            ins: INS_SELECT,
            p1: 0x04, // select by name
            p2: 0x00, // first or only occurrence
            data: NDEF_APPLICATION_NAME.to_vec(),
            ..Default::default()
        };
        apdu.set_lc(NDEF_APPLICATION_NAME.len() as u16);
        // Single-byte Le of 0x00: the response data field may be up to
        // 256 bytes.
        apdu.set_le(256);
        apdu
    }

    /// SELECT by file identifier.
    pub fn select_by_id(file_id: FileId) -> Capdu {
        let mut apdu = Capdu {
            cla: 0x00,
            ins: INS_SELECT,
            p1: 0x00, // select by id
            p2: 0x0C, // first or only occurrence
            data: file_id.to_be_bytes().to_vec(),
            ..Default::default()
        };
        apdu.set_lc(2);
        apdu
    }

    /// READ_BINARY of `length` bytes starting at `offset`.
    pub fn read_binary(offset: u16, length: u16) -> Capdu {
        let offset = offset.to_be_bytes();
        let mut apdu = Capdu {
            cla: 0x00,
            ins: INS_READ_BINARY,
            p1: offset[0],
            p2: offset[1],
            ..Default::default()
        };
        apdu.set_le(length as u32);
        apdu
    }

    /// UPDATE_BINARY writing `data` at `offset`.
    pub fn update_binary(data: &[u8], offset: u16) -> Capdu {
        let offset = offset.to_be_bytes();
        let mut apdu = Capdu {
            cla: 0x00,
            ins: INS_UPDATE_BINARY,
            p1: offset[0],
            p2: offset[1],
            data: data.to_vec(),
            ..Default::default()
        };
        apdu.set_lc(data.len() as u16);
        apdu
    }
}

impl fmt::Display for Capdu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CLA: {:02x} | INS: {:02x} | P1: {:02x} | P2: {:02x} | Lc: {} | Data: {} | Le: {}",
            self.cla,
            self.ins,
            self.p1,
            self.p2,
            bytes_to_hex(&self.lc),
            bytes_to_hex(&self.data),
            bytes_to_hex(&self.le),
        )
    }
}
