// nfctype4-rs/nfctype4/src/device/commander.rs

use log::trace;

use crate::protocol::{Capdu, Rapdu};
use crate::transport::Transport;
use crate::types::FileId;
use crate::{Error, Result};

/// Commander performs the Type 4 Tag command set over a transport: it
/// builds the command APDU, sends it, parses the response APDU, and
/// translates the status words into errors. It never retries, chunks,
/// or caches; that is the device's job.
pub struct Commander {
    /// The channel to the tag. Owned so its lifetime follows the
    /// device's own lifecycle.
    pub transport: Box<dyn Transport>,
}

impl Commander {
    /// Wrap a transport.
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self { transport }
    }

    /// SELECT the NDEF tag application by name.
    pub fn ndef_application_select(&mut self) -> Result<()> {
        let rapdu = self.transceive(&Capdu::ndef_application_select())?;
        if rapdu.is_completed() {
            Ok(())
        } else if rapdu.is_file_not_found() {
            Err(Error::NdefAppNotFound)
        } else {
            Err(Error::Status {
                sw1: rapdu.sw1,
                sw2: rapdu.sw2,
            })
        }
    }

    /// SELECT a file by id.
    pub fn select(&mut self, file_id: FileId) -> Result<()> {
        let rapdu = self.transceive(&Capdu::select_by_id(file_id))?;
        if rapdu.is_completed() {
            Ok(())
        } else if rapdu.is_file_not_found() {
            Err(Error::FileNotFound(file_id))
        } else {
            Err(Error::Status {
                sw1: rapdu.sw1,
                sw2: rapdu.sw2,
            })
        }
    }

    /// READ_BINARY `length` bytes at `offset` from the selected file.
    /// The returned body may be shorter than `length` if the file ends
    /// earlier.
    pub fn read_binary(&mut self, offset: u16, length: u16) -> Result<Vec<u8>> {
        let rapdu = self.transceive(&Capdu::read_binary(offset, length))?;
        if rapdu.is_completed() {
            Ok(rapdu.body)
        } else {
            Err(Error::Status {
                sw1: rapdu.sw1,
                sw2: rapdu.sw2,
            })
        }
    }

    /// UPDATE_BINARY `data` at `offset` of the selected file.
    pub fn update_binary(&mut self, data: &[u8], offset: u16) -> Result<()> {
        let rapdu = self.transceive(&Capdu::update_binary(data, offset))?;
        if rapdu.is_completed() {
            Ok(())
        } else {
            Err(Error::Status {
                sw1: rapdu.sw1,
                sw2: rapdu.sw2,
            })
        }
    }

    // One round trip. The transport may hand back at most the expected
    // response data plus the two status bytes.
    fn transceive(&mut self, capdu: &Capdu) -> Result<Rapdu> {
        let tx = capdu.marshal()?;
        let rx_max = capdu.le_value() as usize + 2;
        trace!("-> {}", capdu);
        let rx = self.transport.transceive(&tx, rx_max)?;
        let rapdu = Rapdu::unmarshal(&rx)?;
        trace!("<- {}", rapdu);
        Ok(rapdu)
    }
}
