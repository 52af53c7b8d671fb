// nfctype4-rs/nfctype4/src/transport/pcsc.rs

use std::ffi::CString;

use log::debug;
use pcsc::{Card, Context, Disposition, Protocols, Scope, ShareMode};

use crate::transport::traits::Transport;
use crate::{Error, Result};

/// Hardware transport backed by a PC/SC smart card reader. ISO 14443-4
/// readers expose a Type 4 tag as a contactless smart card, so the
/// APDUs of this crate travel through `SCardTransmit` unchanged.
pub struct PcscTransport {
    /// Substring of the reader name to pick; the first reader found is
    /// used when empty.
    reader_filter: Option<String>,
    context: Option<Context>,
    card: Option<Card>,
}

impl PcscTransport {
    /// Use the first reader with a tag in the field.
    pub fn new() -> Self {
        Self {
            reader_filter: None,
            context: None,
            card: None,
        }
    }

    /// Use the first reader whose name contains `name`.
    pub fn with_reader(name: impl Into<String>) -> Self {
        Self {
            reader_filter: Some(name.into()),
            context: None,
            card: None,
        }
    }

    fn pick_reader(&self, ctx: &Context) -> Result<CString> {
        let mut buf = [0u8; 4096];
        let readers = ctx.list_readers(&mut buf)?;
        for reader in readers {
            let name = reader.to_string_lossy();
            let matches = match &self.reader_filter {
                Some(filter) => name.contains(filter.as_str()),
                None => true,
            };
            if matches {
                debug!("using reader {}", name);
                return Ok(reader.to_owned());
            }
        }
        Err(Error::NoTargetDetected)
    }
}

impl Default for PcscTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for PcscTransport {
    fn initialize(&mut self) -> Result<()> {
        let ctx = Context::establish(Scope::User)?;
        let reader = self.pick_reader(&ctx)?;
        let card = match ctx.connect(&reader, ShareMode::Shared, Protocols::ANY) {
            Ok(card) => card,
            Err(pcsc::Error::NoSmartcard) => return Err(Error::NoTargetDetected),
            Err(err) => return Err(err.into()),
        };
        self.context = Some(ctx);
        self.card = Some(card);
        Ok(())
    }

    fn close(&mut self) {
        if let Some(card) = self.card.take() {
            // Leave the tag powered so a follow-up procedure can reuse it.
            let _ = card.disconnect(Disposition::LeaveCard);
        }
        self.context = None;
    }

    fn transceive(&mut self, tx: &[u8], rx_max: usize) -> Result<Vec<u8>> {
        let card = self.card.as_ref().ok_or(Error::NoTargetDetected)?;
        let mut rx = vec![0u8; rx_max.max(2)];
        let received = card.transmit(tx, &mut rx)?;
        Ok(received.to_vec())
    }

    fn describe(&self) -> String {
        match (&self.card, &self.reader_filter) {
            (Some(_), _) => "pcsc transport: connected".to_string(),
            (None, Some(filter)) => format!("pcsc transport: idle (reader filter {:?})", filter),
            (None, None) => "pcsc transport: idle".to_string(),
        }
    }
}
