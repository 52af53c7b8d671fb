//! Test support helpers intended for use by unit and integration tests.
//!
//! These centralize the scripted-transport and device setup so tests
//! across the crate and the tests/ directory reuse the same logic.
#![allow(dead_code)]

use crate::device::Device;
use crate::tag::StaticTag;
use crate::transport::{ScriptedTransport, TagTransport, Transport};

/// A boxed scripted transport preloaded with the given responses.
#[doc(hidden)]
pub fn scripted_transport(responses: Vec<Vec<u8>>) -> Box<dyn Transport> {
    Box::new(ScriptedTransport::with_responses(responses))
}

/// A device whose transport replays the given responses in order.
#[doc(hidden)]
pub fn scripted_device(responses: Vec<Vec<u8>>) -> Device {
    Device::new(scripted_transport(responses))
}

/// A device wired to a freshly initialized static tag.
#[doc(hidden)]
pub fn static_tag_device() -> Device {
    Device::new(Box::new(TagTransport::new(StaticTag::new())))
}

/// A device wired to the given tag.
#[doc(hidden)]
pub fn tag_device(tag: StaticTag) -> Device {
    Device::new(Box::new(TagTransport::new(tag)))
}

/// The bare command-completed response.
#[doc(hidden)]
pub fn sw_ok() -> Vec<u8> {
    vec![0x90, 0x00]
}

/// A command-completed response carrying `body`.
#[doc(hidden)]
pub fn body_ok(body: &[u8]) -> Vec<u8> {
    let mut out = body.to_vec();
    out.extend_from_slice(&[0x90, 0x00]);
    out
}
