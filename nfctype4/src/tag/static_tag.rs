// nfctype4-rs/nfctype4/src/tag/static_tag.rs

use std::collections::HashMap;

use log::debug;

use crate::cc::{CapabilityContainer, NdefFileControlTlv};
use crate::constants::{DEFAULT_NDEF_FILE_ID, MAPPING_VERSION, NDEF_APPLICATION_NAME};
use crate::protocol::{Capdu, Rapdu, INS_READ_BINARY, INS_SELECT, INS_UPDATE_BINARY};
use crate::tag::Tag;
use crate::types::FileId;
use crate::{Error, Result};

/// In-memory NFC Type 4 tag holding one NDEF file.
///
/// The tag keeps a file store mapping file ids to their bytes plus the
/// id selected by the last SELECT command. Until `initialize()` has run
/// every command is answered with the inactive-state status, which
/// makes lifecycle mistakes visible on the wire.
#[derive(Debug)]
pub struct StaticTag {
    selected: Option<FileId>,
    ndef_file_id: FileId,
    memory: Option<HashMap<FileId, Vec<u8>>>,
}

impl Default for StaticTag {
    /// An uninitialized tag with the default NDEF file id.
    fn default() -> Self {
        Self {
            selected: None,
            ndef_file_id: FileId::new(DEFAULT_NDEF_FILE_ID),
            memory: None,
        }
    }
}

impl StaticTag {
    /// A freshly initialized tag with an empty NDEF file at the default
    /// id 0x8888.
    pub fn new() -> Self {
        let mut tag = Self::default();
        // The default file id satisfies every control TLV invariant, so
        // initialization cannot fail here.
        let _ = tag.initialize();
        tag
    }

    /// A freshly initialized tag storing its NDEF file at `file_id`.
    /// Reserved and RFU ids are refused.
    pub fn with_file_id(file_id: FileId) -> Result<Self> {
        if file_id.is_reserved() {
            return Err(Error::FileIdReserved(file_id));
        }
        if file_id.is_rfu() {
            return Err(Error::FileIdRfu(file_id));
        }
        let mut tag = Self {
            ndef_file_id: file_id,
            ..Default::default()
        };
        tag.initialize()?;
        Ok(tag)
    }

    /// The id of the NDEF file.
    pub fn ndef_file_id(&self) -> FileId {
        self.ndef_file_id
    }

    /// Reset the tag: drop the memory contents, de-select any file, and
    /// populate the store with the default capability container and an
    /// empty NDEF file.
    pub fn initialize(&mut self) -> Result<()> {
        self.selected = None;
        let cc = CapabilityContainer {
            mapping_version: MAPPING_VERSION,
            // Kept small; readers chunk through these limits anyway.
            mle: 0x000F,
            mlc: 0x000F,
            ndef_file_control: NdefFileControlTlv::new(self.ndef_file_id, 0xFFFE, 0x00, 0x00),
            tlv_blocks: Vec::new(),
        };
        let mut memory = HashMap::new();
        memory.insert(FileId::CC, cc.marshal()?);
        memory.insert(self.ndef_file_id, vec![0x00, 0x00]); // NLEN 0
        self.memory = Some(memory);
        Ok(())
    }

    /// Program the NDEF message. The file becomes NLEN followed by the
    /// message bytes.
    pub fn set_message(&mut self, message: &[u8]) -> Result<()> {
        let memory = self.memory.as_mut().ok_or(Error::TagUninitialized)?;
        if message.len() > 0xFFFE {
            return Err(Error::MessageTooLarge { max: 0xFFFE });
        }
        let mut file = Vec::with_capacity(2 + message.len());
        file.extend_from_slice(&(message.len() as u16).to_be_bytes());
        file.extend_from_slice(message);
        memory.insert(self.ndef_file_id, file);
        Ok(())
    }

    /// The NDEF message currently stored, or `None` when the file is
    /// missing, shorter than its NLEN prefix, or holds NLEN 0.
    pub fn get_message(&self) -> Option<Vec<u8>> {
        let file = self.memory.as_ref()?.get(&self.ndef_file_id)?;
        if file.len() < 2 {
            return None;
        }
        let nlen = u16::from_be_bytes([file[0], file[1]]) as usize;
        if nlen == 0 {
            return None;
        }
        Some(file.get(2..2 + nlen)?.to_vec())
    }

    fn do_select(&mut self, capdu: &Capdu) -> Rapdu {
        if capdu.p1 == 0x04 && capdu.p2 == 0x00 && capdu.lc_value() == 7 {
            // Select by name. Only the NDEF application exists here.
            if capdu.data == NDEF_APPLICATION_NAME {
                debug!("tag: NDEF application selected");
                Rapdu::completed()
            } else {
                Rapdu::file_not_found()
            }
        } else if capdu.p1 == 0x00 && capdu.p2 == 0x0C {
            if capdu.lc_value() != 2 || capdu.data.len() != 2 {
                return Rapdu::lc_inconsistent();
            }
            let id = FileId::from_be_bytes([capdu.data[0], capdu.data[1]]);
            match &self.memory {
                Some(memory) if memory.contains_key(&id) => {
                    debug!("tag: file {} selected", id);
                    self.selected = Some(id);
                    Rapdu::completed()
                }
                _ => Rapdu::file_not_found(),
            }
        } else {
            Rapdu::file_not_found()
        }
    }

    fn do_read(&self, capdu: &Capdu) -> Rapdu {
        let file = match (&self.memory, self.selected) {
            (Some(memory), Some(selected)) => match memory.get(&selected) {
                Some(file) => file,
                None => return Rapdu::file_not_found(),
            },
            _ => return Rapdu::file_not_found(),
        };
        // Window requested by P1-P2 and Le, clipped to the end of the file.
        let offset = capdu.p1p2() as usize;
        let le = capdu.le_value() as usize;
        let start = offset.min(file.len());
        let end = offset.saturating_add(le).min(file.len());
        Rapdu::completed_with(file[start..end].to_vec())
    }

    fn do_update(&mut self, capdu: &Capdu) -> Rapdu {
        let selected = match self.selected {
            Some(selected) => selected,
            None => return Rapdu::file_not_found(),
        };
        if selected == FileId::CC {
            return Rapdu::command_not_allowed();
        }
        let file = match self.memory.as_mut().and_then(|m| m.get_mut(&selected)) {
            Some(file) => file,
            None => return Rapdu::file_not_found(),
        };
        let offset = capdu.p1p2() as usize;
        let end = offset + capdu.data.len();
        if end > file.len() {
            // Growing writes zero-fill any gap below the written range.
            file.resize(end, 0x00);
        }
        file[offset..end].copy_from_slice(&capdu.data);
        debug!(
            "tag: wrote {} bytes at offset {} of file {}",
            capdu.data.len(),
            offset,
            selected
        );
        Rapdu::completed()
    }
}

impl Tag for StaticTag {
    fn command(&mut self, capdu: &Capdu) -> Rapdu {
        if self.memory.is_none() {
            return Rapdu::inactive_state();
        }
        match capdu.ins {
            INS_SELECT => self.do_select(capdu),
            INS_READ_BINARY => self.do_read(capdu),
            INS_UPDATE_BINARY => self.do_update(capdu),
            _ => Rapdu::command_not_allowed(),
        }
    }
}
