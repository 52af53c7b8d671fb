// nfctype4-rs/nfctype4/src/transport/tag.rs

use crate::protocol::{Capdu, Rapdu};
use crate::tag::Tag;
use crate::transport::traits::Transport;
use crate::{Error, Result};

/// In-process transport that feeds commands straight into a software
/// tag. Pairing it with a `Device` exercises a tag implementation over
/// the exact bytes a hardware reader would produce, which makes it both
/// a conformance harness and a way to expose a software tag behind a
/// radio running in target mode.
#[derive(Debug)]
pub struct TagTransport<T> {
    tag: T,
}

impl<T: Tag> TagTransport<T> {
    /// Wrap a tag.
    pub fn new(tag: T) -> Self {
        Self { tag }
    }

    /// Borrow the wrapped tag.
    pub fn tag(&self) -> &T {
        &self.tag
    }

    /// Mutably borrow the wrapped tag.
    pub fn tag_mut(&mut self) -> &mut T {
        &mut self.tag
    }

    /// Unwrap the tag.
    pub fn into_inner(self) -> T {
        self.tag
    }
}

impl<T: Tag> Transport for TagTransport<T> {
    fn initialize(&mut self) -> Result<()> {
        // Software tags are always in the field.
        Ok(())
    }

    fn close(&mut self) {}

    fn transceive(&mut self, tx: &[u8], rx_max: usize) -> Result<Vec<u8>> {
        let capdu = Capdu::unmarshal(tx)?;
        let rapdu: Rapdu = self.tag.command(&capdu);
        let rx = rapdu.marshal();
        if rx.len() > rx_max {
            return Err(Error::ResponseTooLarge {
                max: rx_max,
                actual: rx.len(),
            });
        }
        Ok(rx)
    }

    fn describe(&self) -> String {
        "software tag transport".to_string()
    }
}
