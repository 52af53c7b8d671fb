#[path = "../common/mod.rs"]
mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::fixtures;
use nfctype4::device::Device;
use nfctype4::protocol::Capdu;
use nfctype4::test_support::{body_ok, scripted_device, sw_ok};
use nfctype4::transport::{ScriptedTransport, Transport};
use nfctype4::{Error, FileId};

// Transport wrapper that delegates into Rc<RefCell<ScriptedTransport>>
// so a test can inspect the sent frames after the Device takes
// ownership.
struct SharedTransport {
    inner: Rc<RefCell<ScriptedTransport>>,
}

impl Transport for SharedTransport {
    fn initialize(&mut self) -> nfctype4::Result<()> {
        Ok(())
    }
    fn close(&mut self) {}
    fn transceive(&mut self, tx: &[u8], rx_max: usize) -> nfctype4::Result<Vec<u8>> {
        self.inner.borrow_mut().transceive(tx, rx_max)
    }
    fn describe(&self) -> String {
        self.inner.borrow().describe()
    }
}

fn shared_device(responses: Vec<Vec<u8>>) -> (Device, Rc<RefCell<ScriptedTransport>>) {
    let inner = Rc::new(RefCell::new(ScriptedTransport::with_responses(responses)));
    let device = Device::new(Box::new(SharedTransport {
        inner: inner.clone(),
    }));
    (device, inner)
}

#[test]
fn yubikey_style_read() {
    let mut device = scripted_device(fixtures::yubikey_read_responses());
    let message = device.read().unwrap();
    assert_eq!(message.len(), 0x43);
    assert_eq!(message, fixtures::yubikey_payload());
}

#[test]
fn read_twice_returns_identical_bytes() {
    let mut responses = fixtures::yubikey_read_responses();
    responses.extend(fixtures::yubikey_read_responses());
    let mut device = scripted_device(responses);
    let first = device.read().unwrap();
    let second = device.read().unwrap();
    assert_eq!(first, second);
}

#[test]
fn cc_select_failure_is_file_not_found() {
    let mut device = scripted_device(vec![sw_ok(), vec![0x6A, 0x82]]);
    match device.read() {
        Err(Error::FileNotFound(id)) => assert_eq!(id, FileId::new(0xE103)),
        other => panic!("expected FileNotFound, got {:?}", other),
    }
}

#[test]
fn app_select_failure_is_reported() {
    let mut device = scripted_device(vec![vec![0x00, 0x00]]);
    assert!(matches!(
        device.read(),
        Err(Error::Status {
            sw1: 0x00,
            sw2: 0x00,
        })
    ));
}

#[test]
fn read_protected_file_is_rejected() {
    let cc = fixtures::cc_bytes(0x007F, 0x007F, 0xE104, 0x007F, 0x80, 0x00);
    let mut device = scripted_device(vec![sw_ok(), sw_ok(), body_ok(&cc)]);
    assert!(matches!(device.read(), Err(Error::NotReadable)));
}

#[test]
fn oversized_nlen_is_an_invalid_state() {
    let mut device = scripted_device(fixtures::detect_responses(
        &fixtures::yubikey_cc_bytes(),
        0xFFFF,
    ));
    assert!(matches!(
        device.read(),
        Err(Error::InvalidState {
            nlen: 0xFFFF,
            capacity: 0x007D,
        })
    ));
}

#[test]
fn zero_nlen_reports_no_message() {
    let mut device = scripted_device(fixtures::detect_responses(
        &fixtures::yubikey_cc_bytes(),
        0,
    ));
    assert!(matches!(device.read(), Err(Error::NoMessage)));
}

#[test]
fn rfu_mle_in_the_cc_aborts_the_read() {
    let cc = fixtures::cc_bytes(0x0001, 0x007F, 0xE104, 0x007F, 0x00, 0x00);
    let mut device = scripted_device(vec![sw_ok(), sw_ok(), body_ok(&cc)]);
    assert!(matches!(device.read(), Err(Error::MleRfu(0x0001))));
}

#[test]
fn truncated_cc_read_fails() {
    let cc = &fixtures::yubikey_cc_bytes()[..14];
    let mut device = scripted_device(vec![sw_ok(), sw_ok(), body_ok(cc)]);
    assert!(matches!(
        device.read(),
        Err(Error::UnexpectedEndOfData { .. })
    ));
}

// A message longer than MLe forces several READ_BINARY calls with
// monotonically increasing offsets starting after the NLEN prefix.
#[test]
fn chunked_read_respects_mle() {
    let payload: Vec<u8> = (0..40u8).collect();
    let cc = fixtures::cc_bytes(0x000F, 0x000F, 0xE104, 0x007F, 0x00, 0x00);
    let mut responses = fixtures::detect_responses(&cc, 40);
    responses.push(body_ok(&payload[0..15]));
    responses.push(body_ok(&payload[15..30]));
    responses.push(body_ok(&payload[30..40]));

    let (mut device, transport) = shared_device(responses);
    assert_eq!(device.read().unwrap(), payload);

    let sent = &transport.borrow().sent;
    assert_eq!(sent.len(), 8, "detect takes 5 frames, the read 3 more");
    let reads: Vec<Capdu> = sent[5..]
        .iter()
        .map(|tx| Capdu::unmarshal(tx).unwrap())
        .collect();
    assert_eq!(
        reads.iter().map(Capdu::p1p2).collect::<Vec<_>>(),
        vec![2, 17, 32]
    );
    assert_eq!(
        reads.iter().map(Capdu::le_value).collect::<Vec<_>>(),
        vec![15, 15, 10]
    );
}

// A capability container longer than 15 bytes is fetched with
// follow-up reads until CCLEN is satisfied.
#[test]
fn long_cc_ok() {
    let mut cc = fixtures::yubikey_cc_bytes();
    cc[1] = 0x17; // cclen 23
    cc.extend_from_slice(&[0x05, 0x06, 0x84, 0x00, 0x01, 0x00, 0x80, 0x80]);

    let responses = vec![
        sw_ok(),
        sw_ok(),
        body_ok(&cc[..15]),
        body_ok(&cc[15..]),
        sw_ok(),
        body_ok(&[0x00, 0x00]),
    ];
    let (mut device, transport) = shared_device(responses);

    let info = device.inspect().unwrap();
    assert_eq!(info.nlen, 0);
    assert_eq!(info.max_read_len, 0x007F);
    assert_eq!(info.max_ndef_len, 0x007F);
    assert!(!info.read_only);

    // The second CC read starts where the first one ended.
    let sent = &transport.borrow().sent;
    let follow_up = Capdu::unmarshal(&sent[3]).unwrap();
    assert_eq!(follow_up.p1p2(), 15);
    assert_eq!(follow_up.le_value(), 8);
}

#[test]
fn inspect_reports_read_only_tags() {
    let cc = fixtures::cc_bytes(0x007F, 0x007F, 0xE104, 0x007F, 0x00, 0xFF);
    let mut device = scripted_device(fixtures::detect_responses(&cc, 5));
    let info = device.inspect().unwrap();
    assert!(info.read_only);
    assert_eq!(info.nlen, 5);
}
