#[path = "../common/mod.rs"]
mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::fixtures;
use nfctype4::device::Device;
use nfctype4::protocol::{Capdu, Rapdu, INS_UPDATE_BINARY};
use nfctype4::tag::{StaticTag, Tag};
use nfctype4::test_support::{scripted_device, static_tag_device};
use nfctype4::transport::TagTransport;
use nfctype4::Error;
use proptest::prelude::*;

// Tag wrapper sharing a StaticTag so tests can look inside after the
// Device takes ownership of the transport.
#[derive(Clone)]
struct SharedTag(Rc<RefCell<StaticTag>>);

impl SharedTag {
    fn new(tag: StaticTag) -> Self {
        Self(Rc::new(RefCell::new(tag)))
    }
}

impl Tag for SharedTag {
    fn command(&mut self, capdu: &Capdu) -> Rapdu {
        self.0.borrow_mut().command(capdu)
    }
}

#[test]
fn update_then_read_roundtrip() {
    let mut device = static_tag_device();
    device.update(b"url.com").unwrap();
    let message = device.read().unwrap();
    assert_eq!(message, b"url.com");
}

#[test]
fn update_writes_nlen_last() {
    let tag = SharedTag::new(StaticTag::new());
    let mut device = Device::new(Box::new(TagTransport::new(tag.clone())));
    device.update(b"url.com").unwrap();

    let inner = tag.0.borrow();
    assert_eq!(inner.get_message().unwrap(), b"url.com");
}

// While an update is in flight the NLEN field must read zero, so a
// racing reader sees "no message" instead of a torn payload.
#[test]
fn nlen_is_zero_between_the_payload_writes() {
    struct SnoopingTag {
        inner: SharedTag,
        nlen_during_writes: Rc<RefCell<Vec<Vec<u8>>>>,
    }

    impl Tag for SnoopingTag {
        fn command(&mut self, capdu: &Capdu) -> Rapdu {
            let is_payload_write = capdu.ins == INS_UPDATE_BINARY && capdu.p1p2() >= 2;
            let rapdu = self.inner.command(capdu);
            if is_payload_write && rapdu.is_completed() {
                // Inject a read of the NLEN field between the writes.
                let nlen = self.inner.command(&Capdu::read_binary(0, 2));
                self.nlen_during_writes.borrow_mut().push(nlen.body);
            }
            rapdu
        }
    }

    let observed = Rc::new(RefCell::new(Vec::new()));
    let tag = SnoopingTag {
        inner: SharedTag::new(StaticTag::new()),
        nlen_during_writes: observed.clone(),
    };
    let mut device = Device::new(Box::new(TagTransport::new(tag)));

    // 40 bytes against MLc 15 means three payload chunks.
    let message: Vec<u8> = (0..40u8).collect();
    device.update(&message).unwrap();

    let observed = observed.borrow();
    assert_eq!(observed.len(), 3);
    for nlen in observed.iter() {
        assert_eq!(nlen, &[0x00, 0x00]);
    }
}

#[test]
fn update_chunks_through_mlc() {
    // 40 bytes against the static tag's MLc of 15: the message must
    // still arrive whole.
    let message: Vec<u8> = (0..40u8).collect();
    let mut device = static_tag_device();
    device.update(&message).unwrap();
    assert_eq!(device.read().unwrap(), message);
}

#[test]
fn update_at_the_capacity_boundary() {
    // The static tag advertises a 0xFFFE byte file, so 0xFFFC message
    // bytes fit exactly.
    let mut device = static_tag_device();
    let message = vec![0x5A; 0xFFFC];
    device.update(&message).unwrap();
    assert_eq!(device.read().unwrap(), message);

    let message = vec![0x5A; 0xFFFD];
    assert!(matches!(
        device.update(&message),
        Err(Error::MessageTooLarge { max: 0xFFFC })
    ));
}

#[test]
fn update_of_a_read_only_tag_fails() {
    let cc = fixtures::cc_bytes(0x007F, 0x007F, 0xE104, 0x007F, 0x00, 0xFF);
    let mut device = scripted_device(fixtures::detect_responses(&cc, 0));
    assert!(matches!(device.update(b"nope"), Err(Error::ReadOnly)));
}

#[test]
fn format_of_a_read_only_tag_fails() {
    let cc = fixtures::cc_bytes(0x007F, 0x007F, 0xE104, 0x007F, 0x00, 0xFF);
    let mut device = scripted_device(fixtures::detect_responses(&cc, 0));
    assert!(matches!(device.format(), Err(Error::ReadOnly)));
}

#[test]
fn update_with_an_empty_message_leaves_no_message() {
    let mut device = static_tag_device();
    device.update(b"").unwrap();
    assert!(matches!(device.read(), Err(Error::NoMessage)));
}

#[test]
fn format_erases_a_preseeded_message() {
    let mut tag = StaticTag::new();
    tag.set_message(b"This is a text message").unwrap();
    let mut device = Device::new(Box::new(TagTransport::new(tag)));

    device.format().unwrap();
    assert!(matches!(device.read(), Err(Error::NoMessage)));
}

// Format only zeroes the length prefix; the payload bytes survive in
// the file until overwritten.
#[test]
fn format_leaves_residual_payload_bytes() {
    let tag = SharedTag::new(StaticTag::new());
    tag.0.borrow_mut().set_message(b"secret!").unwrap();
    let mut device = Device::new(Box::new(TagTransport::new(tag.clone())));

    device.format().unwrap();
    assert_eq!(tag.0.borrow().get_message(), None);

    let mut inner = tag.0.borrow_mut();
    let file_id = inner.ndef_file_id();
    assert!(inner.command(&Capdu::select_by_id(file_id)).is_completed());
    let residue = inner.command(&Capdu::read_binary(2, 7));
    assert_eq!(residue.body, b"secret!");
}

proptest! {
    // Any message that fits the file round trips through Update + Read,
    // crossing the MLe/MLc chunking boundaries on the way.
    #[test]
    fn update_read_roundtrip(message in prop::collection::vec(any::<u8>(), 1..100)) {
        let mut device = static_tag_device();
        device.update(&message).unwrap();
        prop_assert_eq!(device.read().unwrap(), message);
    }
}
