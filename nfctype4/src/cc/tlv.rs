// nfctype4-rs/nfctype4/src/cc/tlv.rs

use crate::protocol::parser::Reader;
use crate::types::FileId;
use crate::{Error, Result};

/// T value of the NDEF file control TLV.
pub const TLV_TYPE_NDEF_FILE_CONTROL: u8 = 0x04;
/// T value of the proprietary file control TLV.
pub const TLV_TYPE_PROPRIETARY_FILE_CONTROL: u8 = 0x05;

/// A plain TLV block: a type byte, a 1- or 3-byte length, and the value.
///
/// Unknown T values are accepted here; type enforcement is the job of
/// the typed control TLVs below.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tlv {
    /// Type of the block.
    pub t: u8,
    /// Declared size of the value field.
    pub l: u16,
    /// Value field.
    pub v: Vec<u8>,
}

impl Tlv {
    /// Consume one TLV block from the reader. A lone T byte at the end
    /// of the input decodes as an empty block.
    pub fn read(r: &mut Reader<'_>) -> Result<Tlv> {
        let t = r.read_u8()?;
        if r.is_empty() {
            return Ok(Tlv {
                t,
                l: 0,
                v: Vec::new(),
            });
        }
        let l0 = r.read_u8()?;
        let l = if l0 == 0xFF {
            // 3-byte form.
            let l = r.read_be_u16()?;
            if l == 0xFFFF {
                return Err(Error::TlvLengthRfu);
            }
            if l < 0xFF {
                return Err(Error::TlvLongFormMisuse);
            }
            l
        } else {
            l0 as u16
        };
        let v = r.read_slice(l as usize)?.to_vec();
        Ok(Tlv { t, l, v })
    }

    /// Parse a TLV from the start of `buf`. Returns the block and the
    /// number of bytes consumed.
    pub fn unmarshal(buf: &[u8]) -> Result<(Tlv, usize)> {
        let mut r = Reader::new(buf);
        let tlv = Tlv::read(&mut r)?;
        tlv.check()?;
        Ok((tlv, r.position()))
    }

    /// Validate the L field against the value.
    pub fn check(&self) -> Result<()> {
        if self.l as usize != self.v.len() {
            return Err(Error::TlvLengthMismatch {
                l: self.l,
                value_len: self.v.len(),
            });
        }
        if self.l == 0xFFFF {
            return Err(Error::TlvLengthRfu);
        }
        Ok(())
    }

    /// Serialize the TLV, picking the 1-byte length form below 0xFF and
    /// the 3-byte form otherwise.
    pub fn marshal(&self) -> Result<Vec<u8>> {
        self.check()?;
        let mut out = Vec::with_capacity(4 + self.v.len());
        out.push(self.t);
        if self.l >= 0xFF {
            out.push(0xFF);
            out.extend_from_slice(&self.l.to_be_bytes());
        } else {
            out.push(self.l as u8);
        }
        out.extend_from_slice(&self.v);
        Ok(out)
    }
}

/// Control TLV: a fixed 8-byte TLV whose value describes one data file
/// of the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlTlv {
    /// Type of the block, 0x04 or 0x05.
    pub t: u8,
    /// Identifier of the described file.
    pub file_id: FileId,
    /// Size of the file, including the 2 NLEN bytes.
    pub max_file_size: u16,
    /// Read access condition. 0x00 readable, 0x80 to 0xFE proprietary,
    /// 0xFF no read access.
    pub read_access: u8,
    /// Write access condition. Same partition, with 0xFF meaning
    /// read-only.
    pub write_access: u8,
}

impl ControlTlv {
    /// Consume one control TLV block, which must span exactly 8 bytes.
    pub fn read(r: &mut Reader<'_>) -> Result<ControlTlv> {
        let start = r.position();
        let tlv = Tlv::read(r)?;
        let span = r.position() - start;
        if span != 8 {
            return Err(Error::ControlTlvSize(span));
        }
        ControlTlv::from_tlv(&tlv)
    }

    /// Project a generic TLV into a control TLV and validate it.
    pub fn from_tlv(tlv: &Tlv) -> Result<ControlTlv> {
        if tlv.t != TLV_TYPE_NDEF_FILE_CONTROL && tlv.t != TLV_TYPE_PROPRIETARY_FILE_CONTROL {
            return Err(Error::NotControlTlv { t: tlv.t });
        }
        if tlv.l != 6 {
            return Err(Error::ControlTlvSize(tlv.l as usize + 2));
        }
        let mut v = Reader::new(&tlv.v);
        let ctlv = ControlTlv {
            t: tlv.t,
            file_id: FileId::new(v.read_be_u16()?),
            max_file_size: v.read_be_u16()?,
            read_access: v.read_u8()?,
            write_access: v.read_u8()?,
        };
        ctlv.check()?;
        Ok(ctlv)
    }

    /// Parse a control TLV from the start of `buf`. Returns the block
    /// and the number of bytes consumed.
    pub fn unmarshal(buf: &[u8]) -> Result<(ControlTlv, usize)> {
        let mut r = Reader::new(buf);
        let ctlv = ControlTlv::read(&mut r)?;
        Ok((ctlv, r.position()))
    }

    /// Serialize through the generic TLV encoder.
    pub fn marshal(&self) -> Result<Vec<u8>> {
        self.check()?;
        let mut v = Vec::with_capacity(6);
        v.extend_from_slice(&self.file_id.to_be_bytes());
        v.extend_from_slice(&self.max_file_size.to_be_bytes());
        v.push(self.read_access);
        v.push(self.write_access);
        Tlv {
            t: self.t,
            l: 6,
            v,
        }
        .marshal()
    }

    /// Reject every RFU or reserved field value.
    pub fn check(&self) -> Result<()> {
        if self.t != TLV_TYPE_NDEF_FILE_CONTROL && self.t != TLV_TYPE_PROPRIETARY_FILE_CONTROL {
            return Err(Error::NotControlTlv { t: self.t });
        }
        if self.file_id.is_reserved() {
            return Err(Error::FileIdReserved(self.file_id));
        }
        if self.file_id.is_rfu() {
            return Err(Error::FileIdRfu(self.file_id));
        }
        if self.max_file_size <= 0x0004 {
            return Err(Error::MaxFileSizeRfu(self.max_file_size));
        }
        if (0x01..=0x7F).contains(&self.read_access) {
            return Err(Error::ReadAccessRfu(self.read_access));
        }
        if (0x01..=0x7F).contains(&self.write_access) {
            return Err(Error::WriteAccessRfu(self.write_access));
        }
        Ok(())
    }

    /// True when T names the NDEF file control TLV.
    pub fn is_ndef_file_control(&self) -> bool {
        self.t == TLV_TYPE_NDEF_FILE_CONTROL
    }

    /// True when T names a proprietary file control TLV.
    pub fn is_proprietary_file_control(&self) -> bool {
        self.t == TLV_TYPE_PROPRIETARY_FILE_CONTROL
    }

    /// True when the read access condition allows reading.
    pub fn is_readable(&self) -> bool {
        self.read_access == 0x00
    }

    /// True when the write access condition allows writing.
    pub fn is_writeable(&self) -> bool {
        self.write_access == 0x00
    }

    /// True when the file can be read but never written.
    pub fn is_read_only(&self) -> bool {
        self.write_access == 0xFF && self.is_readable()
    }
}

/// Control TLV describing the NDEF file. Exactly one is mandatory in
/// every capability container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NdefFileControlTlv(pub ControlTlv);

impl NdefFileControlTlv {
    /// Build an NDEF file control TLV from its four value fields.
    pub fn new(file_id: FileId, max_file_size: u16, read_access: u8, write_access: u8) -> Self {
        Self(ControlTlv {
            t: TLV_TYPE_NDEF_FILE_CONTROL,
            file_id,
            max_file_size,
            read_access,
            write_access,
        })
    }

    /// Consume one control TLV and require the NDEF type.
    pub fn read(r: &mut Reader<'_>) -> Result<NdefFileControlTlv> {
        let ctlv = ControlTlv::read(r)?;
        if !ctlv.is_ndef_file_control() {
            return Err(Error::NotNdefControlTlv { t: ctlv.t });
        }
        Ok(Self(ctlv))
    }

    /// Parse from the start of `buf`.
    pub fn unmarshal(buf: &[u8]) -> Result<(NdefFileControlTlv, usize)> {
        let mut r = Reader::new(buf);
        let tlv = NdefFileControlTlv::read(&mut r)?;
        Ok((tlv, r.position()))
    }

    /// Serialize the underlying control TLV.
    pub fn marshal(&self) -> Result<Vec<u8>> {
        self.0.marshal()
    }
}

/// Control TLV describing a file in a proprietary format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProprietaryFileControlTlv(pub ControlTlv);

impl ProprietaryFileControlTlv {
    /// Build a proprietary file control TLV from its four value fields.
    pub fn new(file_id: FileId, max_file_size: u16, read_access: u8, write_access: u8) -> Self {
        Self(ControlTlv {
            t: TLV_TYPE_PROPRIETARY_FILE_CONTROL,
            file_id,
            max_file_size,
            read_access,
            write_access,
        })
    }

    /// Consume one control TLV and require the proprietary type.
    pub fn read(r: &mut Reader<'_>) -> Result<ProprietaryFileControlTlv> {
        let ctlv = ControlTlv::read(r)?;
        if !ctlv.is_proprietary_file_control() {
            return Err(Error::NotProprietaryControlTlv { t: ctlv.t });
        }
        Ok(Self(ctlv))
    }

    /// Parse from the start of `buf`.
    pub fn unmarshal(buf: &[u8]) -> Result<(ProprietaryFileControlTlv, usize)> {
        let mut r = Reader::new(buf);
        let tlv = ProprietaryFileControlTlv::read(&mut r)?;
        Ok((tlv, r.position()))
    }

    /// Serialize the underlying control TLV.
    pub fn marshal(&self) -> Result<Vec<u8>> {
        self.0.marshal()
    }
}
