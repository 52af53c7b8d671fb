use nfctype4::protocol::Capdu;
use proptest::prelude::*;

// One legal CAPDU per ISO 7816-4 case. The data and Le ranges keep the
// short and extended encodings consistent with each other, which is
// what the wire grammar itself requires.
fn legal_capdu() -> impl Strategy<Value = Capdu> {
    let header = (any::<u8>(), any::<u8>(), any::<u8>(), any::<u8>());

    prop_oneof![
        // Case 1: header only.
        header.prop_map(|(cla, ins, p1, p2)| Capdu {
            cla,
            ins,
            p1,
            p2,
            ..Default::default()
        }),
        // Case 2S.
        (header, 1u32..=256).prop_map(|((cla, ins, p1, p2), le)| {
            let mut apdu = Capdu {
                cla,
                ins,
                p1,
                p2,
                ..Default::default()
            };
            apdu.set_le(le);
            apdu
        }),
        // Case 3S.
        (header, prop::collection::vec(any::<u8>(), 1..=255)).prop_map(
            |((cla, ins, p1, p2), data)| {
                let mut apdu = Capdu {
                    cla,
                    ins,
                    p1,
                    p2,
                    data,
                    ..Default::default()
                };
                apdu.set_lc(apdu.data.len() as u16);
                apdu
            }
        ),
        // Case 4S.
        (
            header,
            prop::collection::vec(any::<u8>(), 1..=255),
            1u32..=256
        )
            .prop_map(|((cla, ins, p1, p2), data, le)| {
                let mut apdu = Capdu {
                    cla,
                    ins,
                    p1,
                    p2,
                    data,
                    ..Default::default()
                };
                apdu.set_lc(apdu.data.len() as u16);
                apdu.set_le(le);
                apdu
            }),
        // Case 2E.
        (header, 257u32..=65_535).prop_map(|((cla, ins, p1, p2), le)| {
            let mut apdu = Capdu {
                cla,
                ins,
                p1,
                p2,
                ..Default::default()
            };
            apdu.set_le(le);
            apdu
        }),
        // Case 3E.
        (header, prop::collection::vec(any::<u8>(), 256..=600)).prop_map(
            |((cla, ins, p1, p2), data)| {
                let mut apdu = Capdu {
                    cla,
                    ins,
                    p1,
                    p2,
                    data,
                    ..Default::default()
                };
                apdu.set_lc(apdu.data.len() as u16);
                apdu
            }
        ),
        // Case 4E.
        (
            header,
            prop::collection::vec(any::<u8>(), 256..=600),
            257u32..=65_536
        )
            .prop_map(|((cla, ins, p1, p2), data, le)| {
                let mut apdu = Capdu {
                    cla,
                    ins,
                    p1,
                    p2,
                    data,
                    ..Default::default()
                };
                apdu.set_lc(apdu.data.len() as u16);
                apdu.set_le(le);
                apdu
            }),
    ]
}

proptest! {
    #[test]
    fn legal_capdus_roundtrip(apdu in legal_capdu()) {
        let wire = apdu.marshal().expect("legal CAPDU must marshal");
        let back = Capdu::unmarshal(&wire).expect("marshalled CAPDU must parse");
        prop_assert_eq!(back, apdu);
    }

    #[test]
    fn one_byte_lc_zero_fails_marshal(data in prop::collection::vec(any::<u8>(), 0..4)) {
        let apdu = Capdu {
            lc: vec![0x00],
            data,
            ..Default::default()
        };
        prop_assert!(apdu.marshal().is_err());
    }

    #[test]
    fn two_byte_lc_fails_marshal(b0 in any::<u8>(), b1 in any::<u8>()) {
        let apdu = Capdu {
            lc: vec![b0, b1],
            ..Default::default()
        };
        prop_assert!(apdu.marshal().is_err());
    }

    #[test]
    fn three_byte_lc_with_nonzero_prefix_fails_marshal(
        b0 in 1u8..,
        b1 in any::<u8>(),
        b2 in any::<u8>(),
    ) {
        let apdu = Capdu {
            lc: vec![b0, b1, b2],
            ..Default::default()
        };
        prop_assert!(apdu.marshal().is_err());
    }

    #[test]
    fn two_byte_le_without_lc_fails_marshal(b0 in any::<u8>(), b1 in any::<u8>()) {
        let apdu = Capdu {
            le: vec![b0, b1],
            ..Default::default()
        };
        prop_assert!(apdu.marshal().is_err());
    }

    #[test]
    fn three_byte_le_next_to_lc_fails_marshal(le_lo in any::<u8>()) {
        let apdu = Capdu {
            lc: vec![0x01],
            data: vec![0xAA],
            le: vec![0x00, 0x01, le_lo],
            ..Default::default()
        };
        prop_assert!(apdu.marshal().is_err());
    }

    #[test]
    fn oversized_lc_and_le_fail_marshal(extra in 4usize..8) {
        let apdu = Capdu {
            lc: vec![0x00; extra],
            ..Default::default()
        };
        prop_assert!(apdu.marshal().is_err());

        let apdu = Capdu {
            le: vec![0x00; extra],
            ..Default::default()
        };
        prop_assert!(apdu.marshal().is_err());
    }

    #[test]
    fn lc_disagreeing_with_data_fails_marshal(
        declared in 1u8..,
        data in prop::collection::vec(any::<u8>(), 0..16),
    ) {
        prop_assume!(declared as usize != data.len());
        let apdu = Capdu {
            lc: vec![declared],
            data,
            ..Default::default()
        };
        prop_assert!(apdu.marshal().is_err());
    }

    // Parsing arbitrary bytes may fail but must never panic.
    #[test]
    fn unmarshal_never_panics(buf in prop::collection::vec(any::<u8>(), 0..64)) {
        let _ = Capdu::unmarshal(&buf);
    }
}

#[test]
fn le_65536_survives_a_roundtrip() {
    // 65536 only exists in the 2-byte Le form, which in turn needs the
    // extended Lc form on the wire.
    let mut apdu = Capdu {
        data: vec![0xAA; 256],
        ..Default::default()
    };
    apdu.set_lc(256);
    apdu.set_le(65_536);
    assert_eq!(apdu.le, vec![0x00, 0x00]);
    assert_eq!(apdu.le_value(), 65_536);
    let wire = apdu.marshal().unwrap();
    assert_eq!(Capdu::unmarshal(&wire).unwrap(), apdu);
}
