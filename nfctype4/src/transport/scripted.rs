// nfctype4-rs/nfctype4/src/transport/scripted.rs

use crate::transport::traits::Transport;
use crate::{Error, Result};

/// Transport that ignores what is sent and replays a queue of preloaded
/// responses. It records every sent frame, which makes it useful both
/// for tests and as the smallest possible example of implementing a
/// transport.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    /// Responses handed out in order, one per `transceive` call.
    pub responses: Vec<Vec<u8>>,
    /// Every frame that was sent, in order.
    pub sent: Vec<Vec<u8>>,
    pos: usize,
}

impl ScriptedTransport {
    /// An empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// A script preloaded with `responses`.
    pub fn with_responses(responses: Vec<Vec<u8>>) -> Self {
        Self {
            responses,
            ..Default::default()
        }
    }

    /// Append one response to the queue.
    pub fn push_response(&mut self, response: Vec<u8>) {
        self.responses.push(response);
    }

    /// Responses consumed so far.
    pub fn consumed(&self) -> usize {
        self.pos
    }
}

impl Transport for ScriptedTransport {
    fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    fn close(&mut self) {}

    fn transceive(&mut self, tx: &[u8], _rx_max: usize) -> Result<Vec<u8>> {
        self.sent.push(tx.to_vec());
        if self.pos >= self.responses.len() {
            return Err(Error::ScriptExhausted(self.pos));
        }
        let response = self.responses[self.pos].clone();
        self.pos += 1;
        Ok(response)
    }

    fn describe(&self) -> String {
        format!(
            "scripted transport: {} of {} responses consumed",
            self.pos,
            self.responses.len()
        )
    }
}
