// nfctype4-rs/nfctype4/src/cc/container.rs

use crate::cc::tlv::{
    ControlTlv, NdefFileControlTlv, Tlv, TLV_TYPE_NDEF_FILE_CONTROL,
    TLV_TYPE_PROPRIETARY_FILE_CONTROL,
};
use crate::protocol::parser::Reader;
use crate::{Error, Result};

/// Capability container file, stored at file id 0xE103. It advertises
/// the mapping version, the READ_BINARY and UPDATE_BINARY limits, and
/// the control TLV pointing at the NDEF file, optionally followed by
/// further control TLVs.
///
/// CCLEN is not a field: the decoder validates the declared value and
/// the encoder re-derives it from the content, so a container whose
/// unknown trailing TLVs were skipped re-encodes to a self-consistent
/// byte string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityContainer {
    /// Major and minor version of the mapping, 4 bits each.
    pub mapping_version: u8,
    /// Maximum data length a READ_BINARY response may carry.
    pub mle: u16,
    /// Maximum data length an UPDATE_BINARY command may carry.
    pub mlc: u16,
    /// The mandatory NDEF file control TLV.
    pub ndef_file_control: NdefFileControlTlv,
    /// Optional trailing control TLVs. TLVs with a reserved type are
    /// skipped on decode and never re-emitted.
    pub tlv_blocks: Vec<ControlTlv>,
}

impl CapabilityContainer {
    /// The CCLEN this container serializes to: the 7 header bytes plus
    /// 8 bytes per control TLV.
    pub fn cclen(&self) -> u16 {
        (7 + 8 + 8 * self.tlv_blocks.len()) as u16
    }

    /// Parse a capability container. The buffer must hold at least the
    /// declared CCLEN bytes; anything beyond is left untouched.
    pub fn unmarshal(buf: &[u8]) -> Result<CapabilityContainer> {
        if buf.len() < 15 {
            return Err(Error::UnexpectedEndOfData {
                needed: 15 - buf.len(),
                remaining: buf.len(),
            });
        }
        let mut r = Reader::new(buf);
        let cclen = r.read_be_u16()?;
        if cclen <= 0x000E || cclen == 0xFFFF {
            return Err(Error::CclenRfu(cclen));
        }
        let mapping_version = r.read_u8()?;
        let mle = r.read_be_u16()?;
        let mlc = r.read_be_u16()?;
        let ndef_file_control = NdefFileControlTlv::read(&mut r)?;

        let mut tlv_blocks = Vec::new();
        while r.position() < cclen as usize {
            // Parse as a generic TLV first to learn the byte span, then
            // keep only the file control types.
            let start = r.position();
            let tlv = Tlv::read(&mut r)?;
            if tlv.t == TLV_TYPE_NDEF_FILE_CONTROL || tlv.t == TLV_TYPE_PROPRIETARY_FILE_CONTROL {
                let span = r.position() - start;
                if span != 8 {
                    return Err(Error::ControlTlvSize(span));
                }
                tlv_blocks.push(ControlTlv::from_tlv(&tlv)?);
            }
        }
        if r.position() != cclen as usize {
            return Err(Error::CcLengthMismatch {
                expected: cclen,
                parsed: r.position(),
            });
        }

        let cc = CapabilityContainer {
            mapping_version,
            mle,
            mlc,
            ndef_file_control,
            tlv_blocks,
        };
        cc.check()?;
        Ok(cc)
    }

    /// Serialize the container: header, the NDEF file control TLV, then
    /// every trailing control TLV in order.
    pub fn marshal(&self) -> Result<Vec<u8>> {
        self.check()?;
        let mut out = Vec::with_capacity(self.cclen() as usize);
        out.extend_from_slice(&self.cclen().to_be_bytes());
        out.push(self.mapping_version);
        out.extend_from_slice(&self.mle.to_be_bytes());
        out.extend_from_slice(&self.mlc.to_be_bytes());
        out.extend_from_slice(&self.ndef_file_control.marshal()?);
        for block in &self.tlv_blocks {
            out.extend_from_slice(&block.marshal()?);
        }
        Ok(out)
    }

    /// Reject RFU limit values and invalid control TLVs.
    pub fn check(&self) -> Result<()> {
        let total = 7 + 8 + 8 * self.tlv_blocks.len();
        if total > 0xFFFE {
            return Err(Error::CclenRfu(0xFFFF));
        }
        if self.mle <= 0x000E {
            return Err(Error::MleRfu(self.mle));
        }
        if self.mlc == 0x0000 {
            return Err(Error::MlcRfu(self.mlc));
        }
        self.ndef_file_control.0.check()?;
        for block in &self.tlv_blocks {
            block.check()?;
        }
        Ok(())
    }
}
