// fixtures.rs — commonly used response byte sets for device tests

#![allow(dead_code)]

use nfctype4::test_support::{body_ok, sw_ok};

/// A minimal 15 byte capability container with the given limits and
/// NDEF file control values.
pub fn cc_bytes(
    mle: u16,
    mlc: u16,
    file_id: u16,
    max_size: u16,
    read_access: u8,
    write_access: u8,
) -> Vec<u8> {
    let mut out = vec![0x00, 0x0F, 0x20];
    out.extend_from_slice(&mle.to_be_bytes());
    out.extend_from_slice(&mlc.to_be_bytes());
    out.extend_from_slice(&[0x04, 0x06]);
    out.extend_from_slice(&file_id.to_be_bytes());
    out.extend_from_slice(&max_size.to_be_bytes());
    out.push(read_access);
    out.push(write_access);
    out
}

/// The capability container a Yubikey Neo advertises: MLe and MLc 0x7F,
/// NDEF file 0xE104 of 0x7F bytes, open access.
pub fn yubikey_cc_bytes() -> Vec<u8> {
    cc_bytes(0x007F, 0x007F, 0xE104, 0x007F, 0x00, 0x00)
}

/// The 67 byte NDEF message a factory-programmed Yubikey Neo carries:
/// a single URI record pointing at my.yubico.com.
pub fn yubikey_payload() -> Vec<u8> {
    let mut payload = vec![0xD1, 0x01, 0x3F, 0x55, 0x04];
    payload.extend_from_slice(b"my.yubico.com/neo/");
    payload.extend_from_slice(&[b'c'; 44]);
    payload
}

/// The full response script of a successful read against a Yubikey.
pub fn yubikey_read_responses() -> Vec<Vec<u8>> {
    vec![
        sw_ok(),                       // NDEF application select
        sw_ok(),                       // CC select
        body_ok(&yubikey_cc_bytes()),  // CC read
        sw_ok(),                       // NDEF file select
        body_ok(&[0x00, 0x43]),        // NLEN read
        body_ok(&yubikey_payload()),   // NDEF file read
    ]
}

/// A detection script up to and including the NLEN read, parameterized
/// over the capability container bytes and the NLEN value.
pub fn detect_responses(cc: &[u8], nlen: u16) -> Vec<Vec<u8>> {
    vec![
        sw_ok(),
        sw_ok(),
        body_ok(cc),
        sw_ok(),
        body_ok(&nlen.to_be_bytes()),
    ]
}
