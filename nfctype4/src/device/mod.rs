// nfctype4-rs/nfctype4/src/device/mod.rs

//! The reader side: NDEF detection plus the Read, Update, Format and
//! Inspect procedures, driven through a Commander over some transport.

use log::debug;

use crate::cc::CapabilityContainer;
use crate::protocol::parser;
use crate::transport::Transport;
use crate::types::FileId;
use crate::{Error, Result};

mod commander;
pub use commander::Commander;

/// Parameters negotiated by the NDEF detection procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagInfo {
    /// Length of the NDEF message currently on the tag.
    pub nlen: u16,
    /// MLe: maximum data bytes one READ_BINARY may return.
    pub max_read_len: u16,
    /// MLc: maximum data bytes one UPDATE_BINARY may carry.
    pub max_update_len: u16,
    /// Size of the NDEF file, including the 2 NLEN bytes.
    pub max_ndef_len: u16,
    /// True when the tag can be read but never written.
    pub read_only: bool,
}

/// An NFC Forum reader device: performs the Type 4 Tag operation
/// procedures against whatever tag its transport reaches. The device
/// owns the transport and brackets every procedure with
/// `initialize()`/`close()`; no other code touches the transport
/// lifecycle.
pub struct Device {
    commander: Commander,
}

impl Device {
    /// A device driving the given transport.
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            commander: Commander::new(transport),
        }
    }

    /// Swap the transport, dropping the previous one. The next
    /// procedure runs against the new channel.
    pub fn setup(&mut self, transport: Box<dyn Transport>) {
        self.commander = Commander::new(transport);
    }

    /// Read the NDEF message stored on the tag. Runs the detection
    /// procedure, then chunks through READ_BINARY calls bounded by the
    /// tag's MLe. The message bytes are opaque at this layer.
    pub fn read(&mut self) -> Result<Vec<u8>> {
        self.with_session(Self::read_message)
    }

    /// Replace the NDEF message on the tag. NLEN is zeroed before the
    /// payload is written and restored afterwards, so a reader that
    /// races the update sees an empty file rather than a torn message.
    pub fn update(&mut self, message: &[u8]) -> Result<()> {
        self.with_session(|dev| dev.update_message(message))
    }

    /// Erase the tag by zeroing NLEN. The payload bytes remain in the
    /// file; callers who need a wipe should Update with a meaningless
    /// payload of the maximum length first.
    pub fn format(&mut self) -> Result<()> {
        self.with_session(Self::format_tag)
    }

    /// Run the detection procedure and report the negotiated
    /// parameters without touching the message.
    pub fn inspect(&mut self) -> Result<TagInfo> {
        self.with_session(Self::detect)
    }

    /// A description of the underlying transport.
    pub fn describe_transport(&self) -> String {
        self.commander.transport.describe()
    }

    // Every procedure brackets the transport session, closing it on
    // success and failure alike.
    fn with_session<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let result = match self.commander.transport.initialize() {
            Ok(()) => f(self),
            Err(err) => Err(err),
        };
        self.commander.transport.close();
        result
    }

    fn read_message(&mut self) -> Result<Vec<u8>> {
        let info = self.detect()?;
        if info.nlen == 0 {
            return Err(Error::NoMessage);
        }

        let mut message = Vec::with_capacity(info.nlen as usize);
        let mut total = 0u16;
        while total < info.nlen {
            let chunk_len = (info.nlen - total).min(info.max_read_len);
            // The first 2 bytes of the file are NLEN, hence the offset.
            let chunk = self.commander.read_binary(2 + total, chunk_len)?;
            message.extend_from_slice(&chunk);
            total += chunk_len;
        }
        debug!("read a {} byte NDEF message", message.len());
        Ok(message)
    }

    fn update_message(&mut self, message: &[u8]) -> Result<()> {
        let info = self.detect()?;
        if info.read_only {
            return Err(Error::ReadOnly);
        }
        let capacity = (info.max_ndef_len - 2) as usize;
        if message.len() > capacity {
            return Err(Error::MessageTooLarge { max: capacity });
        }
        let nlen = message.len() as u16;

        // Invalidate the length prefix first.
        self.commander.update_binary(&[0x00, 0x00], 0)?;

        let mut total = 0u16;
        while total < nlen {
            let chunk_len = (nlen - total).min(info.max_update_len);
            self.commander.update_binary(
                &message[total as usize..(total + chunk_len) as usize],
                2 + total,
            )?;
            total += chunk_len;
        }

        // Commit: only now does the tag hold a valid message again.
        self.commander.update_binary(&nlen.to_be_bytes(), 0)?;
        debug!("wrote a {} byte NDEF message", message.len());
        Ok(())
    }

    fn format_tag(&mut self) -> Result<()> {
        let info = self.detect()?;
        if info.read_only {
            return Err(Error::ReadOnly);
        }
        self.commander.update_binary(&[0x00, 0x00], 0)
    }

    // NDEF detection procedure: select the application, read and parse
    // the capability container, select the NDEF file, read NLEN.
    fn detect(&mut self) -> Result<TagInfo> {
        self.commander.ndef_application_select()?;
        self.commander.select(FileId::CC)?;

        let mut cc_bytes = self.commander.read_binary(0, 15)?;
        let cclen = parser::be_u16_at(&cc_bytes, 0)? as usize;
        if cclen > 15 {
            // Optional TLVs make the container longer than the 15 byte
            // minimum. The MLe bounding the follow-up reads sits in the
            // header we already have.
            let mle = parser::be_u16_at(&cc_bytes, 3)?;
            if mle <= 0x000E {
                return Err(Error::MleRfu(mle));
            }
            while cc_bytes.len() < cclen {
                let chunk_len = (cclen - cc_bytes.len()).min(mle as usize) as u16;
                let chunk = self
                    .commander
                    .read_binary(cc_bytes.len() as u16, chunk_len)?;
                if chunk.is_empty() {
                    return Err(Error::UnexpectedEndOfData {
                        needed: cclen - cc_bytes.len(),
                        remaining: cc_bytes.len(),
                    });
                }
                cc_bytes.extend_from_slice(&chunk);
            }
        }
        let cc = CapabilityContainer::unmarshal(&cc_bytes)?;

        let file_control = cc.ndef_file_control.0;
        if !file_control.is_readable() {
            return Err(Error::NotReadable);
        }

        self.commander.select(file_control.file_id)?;

        let nlen_bytes = self.commander.read_binary(0, 2)?;
        let nlen = parser::be_u16_at(&nlen_bytes, 0)?;
        let capacity = file_control.max_file_size - 2;
        if nlen > capacity {
            return Err(Error::InvalidState { nlen, capacity });
        }

        debug!(
            "detected NDEF file {} (NLEN {}, MLe {}, MLc {})",
            file_control.file_id, nlen, cc.mle, cc.mlc
        );
        Ok(TagInfo {
            nlen,
            max_read_len: cc.mle,
            max_update_len: cc.mlc,
            max_ndef_len: file_control.max_file_size,
            read_only: file_control.is_read_only(),
        })
    }
}
