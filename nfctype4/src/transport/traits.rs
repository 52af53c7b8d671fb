// nfctype4-rs/nfctype4/src/transport/traits.rs

use crate::Result;

/// Transport abstracts the request/response channel between a reader
/// device and a tag, hardware or software.
pub trait Transport {
    /// Make the channel ready: enumerate readers, pick a target, and so
    /// on. Called by the device at the start of every procedure.
    fn initialize(&mut self) -> Result<()>;

    /// Release the channel. Called by the device at the end of every
    /// procedure, including failed ones.
    fn close(&mut self);

    /// Send `tx` and return the response bytes. The response must not
    /// exceed `rx_max` bytes.
    fn transceive(&mut self, tx: &[u8], rx_max: usize) -> Result<Vec<u8>>;

    /// Human-readable description of the transport and its state.
    fn describe(&self) -> String;
}
