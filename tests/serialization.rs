//! End-to-end tests of the point serialization formats, driven through the
//! public API only. Points are sampled by coordinate recovery over a seeded
//! generator, which is also how the statistical behavior of the formats is
//! pinned down.

use bandersnatch::{
    map_to_field_element, CurveError, DeserializationError, Endianness, ExtendedPoint,
    FieldElement, PointDecode, PointRead, PointSerializer, PointSerializerXAndSignY,
    PointSerializerXY, PointSerializerYAndSignX, SerializationError, SubgroupPoint, TrustLevel,
    BANDERWAGON_LONG, BANDERWAGON_SHORT,
};
use rand_chacha::ChaCha8Rng;
use rand_core::{RngCore, SeedableRng};

fn rng(seed: u8) -> ChaCha8Rng {
    ChaCha8Rng::from_seed([seed; 32])
}

fn sample_subgroup(rng: &mut ChaCha8Rng) -> SubgroupPoint {
    loop {
        let x = FieldElement::random(&mut *rng);
        if let Ok(point) = SubgroupPoint::from_x_times_sign_y(&x, TrustLevel::Untrusted) {
            return point;
        }
    }
}

fn sample_full(rng: &mut ChaCha8Rng) -> ExtendedPoint {
    loop {
        let x = FieldElement::random(&mut *rng);
        let sign = if rng.next_u32() & 1 == 0 { 1 } else { -1 };
        if let Ok(point) = ExtendedPoint::from_x_and_sign_y(&x, sign, TrustLevel::Untrusted) {
            return point;
        }
    }
}

/// An on-curve point whose whole class {±P, ±(P+A)} avoids the subgroup.
fn sample_outside_subgroup(rng: &mut ChaCha8Rng) -> ExtendedPoint {
    loop {
        let point = sample_full(rng);
        if !point.is_in_subgroup() && !point.torque().is_in_subgroup() {
            return point;
        }
    }
}

#[test]
fn banderwagon_round_trips() {
    let mut rng = rng(20);
    for _ in 0..32 {
        let point = sample_subgroup(&mut rng);

        let mut short = Vec::new();
        assert_eq!(
            BANDERWAGON_SHORT
                .serialize_curve_point(&mut short, &point)
                .unwrap(),
            32
        );
        let decoded = BANDERWAGON_SHORT
            .deserialize_curve_point(&mut short.as_slice(), TrustLevel::Untrusted)
            .unwrap();
        assert_eq!(point, decoded);

        let mut long = Vec::new();
        assert_eq!(
            BANDERWAGON_LONG
                .serialize_curve_point(&mut long, &point)
                .unwrap(),
            64
        );
        let decoded = BANDERWAGON_LONG
            .deserialize_curve_point(&mut long.as_slice(), TrustLevel::Untrusted)
            .unwrap();
        assert_eq!(point, decoded);

        // The short form is the trailing half of the long form.
        assert_eq!(&long[32..], &short[..]);
    }
}

#[test]
fn trusted_decoding_matches_untrusted_on_valid_input() {
    let mut rng = rng(21);
    for _ in 0..16 {
        let point = sample_subgroup(&mut rng);
        let mut bytes = Vec::new();
        BANDERWAGON_LONG
            .serialize_curve_point(&mut bytes, &point)
            .unwrap();
        let trusted = BANDERWAGON_LONG
            .deserialize_curve_point(&mut bytes.as_slice(), TrustLevel::Trusted)
            .unwrap();
        let untrusted = BANDERWAGON_LONG
            .deserialize_curve_point(&mut bytes.as_slice(), TrustLevel::Untrusted)
            .unwrap();
        assert_eq!(trusted, untrusted);
    }
}

#[test]
fn full_curve_round_trips() {
    let mut rng = rng(22);
    let xy = PointSerializerXY::new(Endianness::Little, false);
    let x_sign = PointSerializerXAndSignY::new(Endianness::Little, false);
    let y_sign = PointSerializerYAndSignX::new(Endianness::Little, false);

    for _ in 0..32 {
        let point = sample_full(&mut rng);

        let mut bytes = Vec::new();
        xy.serialize_curve_point(&mut bytes, &point).unwrap();
        let decoded: ExtendedPoint = xy
            .deserialize_curve_point(&mut bytes.as_slice(), TrustLevel::Untrusted)
            .unwrap();
        assert_eq!(point, decoded);

        let mut bytes = Vec::new();
        x_sign.serialize_curve_point(&mut bytes, &point).unwrap();
        let decoded: ExtendedPoint = x_sign
            .deserialize_curve_point(&mut bytes.as_slice(), TrustLevel::Untrusted)
            .unwrap();
        assert_eq!(point, decoded);

        let mut bytes = Vec::new();
        y_sign.serialize_curve_point(&mut bytes, &point).unwrap();
        let decoded: ExtendedPoint = y_sign
            .deserialize_curve_point(&mut bytes.as_slice(), TrustLevel::Untrusted)
            .unwrap();
        assert_eq!(point, decoded);
    }
}

#[test]
fn subgroup_restricted_round_trips() {
    let mut rng = rng(23);
    let xy = PointSerializerXY::new(Endianness::Little, true);
    let x_sign = PointSerializerXAndSignY::new(Endianness::Little, true);
    let y_sign = PointSerializerYAndSignX::new(Endianness::Little, true);

    for _ in 0..16 {
        let point = sample_subgroup(&mut rng);

        let mut bytes = Vec::new();
        xy.serialize_curve_point(&mut bytes, &point).unwrap();
        let decoded: SubgroupPoint = xy
            .deserialize_curve_point(&mut bytes.as_slice(), TrustLevel::Untrusted)
            .unwrap();
        assert_eq!(point, decoded);

        let mut bytes = Vec::new();
        x_sign.serialize_curve_point(&mut bytes, &point).unwrap();
        let decoded: SubgroupPoint = x_sign
            .deserialize_curve_point(&mut bytes.as_slice(), TrustLevel::Untrusted)
            .unwrap();
        assert_eq!(point, decoded);

        let mut bytes = Vec::new();
        y_sign.serialize_curve_point(&mut bytes, &point).unwrap();
        let decoded: SubgroupPoint = y_sign
            .deserialize_curve_point(&mut bytes.as_slice(), TrustLevel::Untrusted)
            .unwrap();
        assert_eq!(point, decoded);
    }
}

#[test]
fn encode_is_left_inverse_of_decode() {
    // Any byte string that decodes successfully re-encodes to itself.
    let mut rng = rng(24);
    let mut hits = 0;
    for _ in 0..400 {
        let mut word = [0u8; 32];
        rng.fill_bytes(&mut word);
        word[31] |= 0x80; // satisfy the short-format header
        let Ok(point) =
            BANDERWAGON_SHORT.deserialize_curve_point(&mut word.as_slice(), TrustLevel::Untrusted)
        else {
            continue;
        };
        hits += 1;
        let mut reencoded = Vec::new();
        BANDERWAGON_SHORT
            .serialize_curve_point(&mut reencoded, &point)
            .unwrap();
        assert_eq!(reencoded, word);
    }
    // Roughly a quarter of headed random words decode.
    assert!(hits > 50, "only {hits} random words decoded");
}

#[test]
fn cross_scheme_decodes_agree() {
    let mut rng = rng(25);
    for _ in 0..8 {
        let point = sample_subgroup(&mut rng);
        let mut short = Vec::new();
        let mut long = Vec::new();
        BANDERWAGON_SHORT
            .serialize_curve_point(&mut short, &point)
            .unwrap();
        BANDERWAGON_LONG
            .serialize_curve_point(&mut long, &point)
            .unwrap();
        let from_short = BANDERWAGON_SHORT
            .deserialize_curve_point(&mut short.as_slice(), TrustLevel::Untrusted)
            .unwrap();
        let from_long = BANDERWAGON_LONG
            .deserialize_curve_point(&mut long.as_slice(), TrustLevel::Untrusted)
            .unwrap();
        assert_eq!(from_short, from_long);
        assert_eq!(
            map_to_field_element(&from_short),
            map_to_field_element(&from_long)
        );
    }
}

#[test]
fn non_subgroup_points_are_refused_and_rejected() {
    let mut rng = rng(26);
    let point = sample_outside_subgroup(&mut rng);

    // The write path refuses.
    let mut bytes = Vec::new();
    let err = BANDERWAGON_SHORT
        .serialize_curve_point(&mut bytes, &point)
        .unwrap_err();
    assert!(matches!(err, SerializationError::PointOutsideSubgroup));

    // Forged wire bytes for the same x coordinate are rejected on decode.
    let (x, _) = point.xy_affine();
    let mut forged = x.to_bytes();
    forged[31] |= 0x80;
    let err = BANDERWAGON_SHORT
        .deserialize_curve_point(&mut forged.as_slice(), TrustLevel::Untrusted)
        .unwrap_err();
    assert_eq!(err.curve_error(), Some(CurveError::XNotInSubgroup));
}

#[test]
fn full_coordinate_subgroup_decode_rejects_the_translate() {
    let mut rng = rng(27);
    let xy = PointSerializerXY::new(Endianness::Little, true);
    let point = sample_subgroup(&mut rng);
    let (x, y) = point.xy_affine();

    // Wire image of the +A translate: both words negated.
    let mut translate = Vec::new();
    translate.extend_from_slice(&(-x).to_bytes());
    translate.extend_from_slice(&(-y).to_bytes());
    let err = xy
        .deserialize_curve_point::<_, SubgroupPoint>(&mut translate.as_slice(), TrustLevel::Untrusted)
        .unwrap_err();
    assert_eq!(err.curve_error(), Some(CurveError::NotInSubgroup));

    // The canonical representative decodes fine.
    let mut canonical = Vec::new();
    canonical.extend_from_slice(&x.to_bytes());
    canonical.extend_from_slice(&y.to_bytes());
    let decoded: SubgroupPoint = xy
        .deserialize_curve_point(&mut canonical.as_slice(), TrustLevel::Untrusted)
        .unwrap();
    assert_eq!(decoded, point);
}

#[test]
fn header_bits_are_enforced() {
    let mut rng = rng(28);
    let point = sample_subgroup(&mut rng);
    let mut bytes = Vec::new();
    BANDERWAGON_LONG
        .serialize_curve_point(&mut bytes, &point)
        .unwrap();

    // Either bit of the leading word's 2-bit header.
    for bit in [0x80, 0x40] {
        let mut corrupted = bytes.clone();
        corrupted[31] ^= bit;
        let err = BANDERWAGON_LONG
            .deserialize_curve_point(&mut corrupted.as_slice(), TrustLevel::Untrusted)
            .unwrap_err();
        assert!(matches!(err, DeserializationError::HeaderMismatch { .. }));
    }

    // The trailing word's 1-bit header.
    let mut corrupted = bytes.clone();
    corrupted[63] ^= 0x80;
    let err = BANDERWAGON_LONG
        .deserialize_curve_point(&mut corrupted.as_slice(), TrustLevel::Untrusted)
        .unwrap_err();
    assert!(matches!(err, DeserializationError::HeaderMismatch { .. }));
    assert_eq!(err.read_data().bytes_read, 64);
}

#[test]
fn modulus_valued_word_is_rejected_everywhere() {
    // p itself, encoded little endian. The de-prefixed integer equals the
    // modulus, one past the largest canonical element.
    let mut p_le =
        hex_literal::hex!("73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001");
    p_le.reverse();

    let y_sign = PointSerializerYAndSignX::new(Endianness::Little, false);
    let err = y_sign
        .deserialize_curve_point::<_, ExtendedPoint>(&mut p_le.as_slice(), TrustLevel::Untrusted)
        .unwrap_err();
    assert!(matches!(
        err,
        DeserializationError::ValueExceedsFieldSize { .. }
    ));

    let mut headed = p_le;
    headed[31] |= 0x80;
    let err = BANDERWAGON_SHORT
        .deserialize_curve_point(&mut headed.as_slice(), TrustLevel::Untrusted)
        .unwrap_err();
    assert!(matches!(
        err,
        DeserializationError::ValueExceedsFieldSize { .. }
    ));
}

#[test]
fn truncated_streams_report_partial_reads() {
    let mut rng = rng(29);
    let point = sample_subgroup(&mut rng);
    let mut bytes = Vec::new();
    BANDERWAGON_SHORT
        .serialize_curve_point(&mut bytes, &point)
        .unwrap();

    let err = BANDERWAGON_SHORT
        .deserialize_curve_point(&mut bytes[..15].as_ref(), TrustLevel::Untrusted)
        .unwrap_err();
    assert!(matches!(err, DeserializationError::UnexpectedEof { .. }));
    assert!(err.read_data().partial_read);
    assert_eq!(err.read_data().bytes_read, 15);

    let empty: &[u8] = &[];
    let err = BANDERWAGON_SHORT
        .deserialize_curve_point(&mut { empty }, TrustLevel::Untrusted)
        .unwrap_err();
    assert!(matches!(err, DeserializationError::Eof { .. }));
    assert_eq!(err.read_data().bytes_read, 0);
}

#[test]
#[should_panic(expected = "trusted input failed validation")]
fn trusted_decoding_of_garbage_panics() {
    // An x coordinate with no matching curve point fails even the reduced
    // checks of the trusted path, which must escalate to a panic rather
    // than report the error.
    let mut rng = rng(30);
    let x = loop {
        let candidate = FieldElement::random(&mut rng);
        if ExtendedPoint::from_x_and_sign_y(&candidate, 1, TrustLevel::Untrusted).is_err() {
            break candidate;
        }
    };
    let mut forged = x.to_bytes();
    forged[31] |= 0x80;
    let _ = BANDERWAGON_SHORT.deserialize_curve_point(&mut forged.as_slice(), TrustLevel::Trusted);
}

#[test]
fn big_endian_configuration_round_trips() {
    let mut rng = rng(31);
    let short_be = BANDERWAGON_SHORT.with_endianness(Endianness::Big);
    for _ in 0..8 {
        let point = sample_subgroup(&mut rng);
        let mut le = Vec::new();
        let mut be = Vec::new();
        BANDERWAGON_SHORT
            .serialize_curve_point(&mut le, &point)
            .unwrap();
        short_be.serialize_curve_point(&mut be, &point).unwrap();

        // Same word, opposite byte order.
        let mut reversed = be.clone();
        reversed.reverse();
        assert_eq!(le, reversed);

        let decoded = short_be
            .deserialize_curve_point(&mut be.as_slice(), TrustLevel::Untrusted)
            .unwrap();
        assert_eq!(point, decoded);
    }
}

#[test]
fn neutral_element_wire_formats() {
    // Known-answer bytes for the neutral element across the formats.
    let mut short = Vec::new();
    BANDERWAGON_SHORT
        .serialize_curve_point(&mut short, &SubgroupPoint::NEUTRAL)
        .unwrap();
    let mut expected_short = vec![0u8; 32];
    expected_short[31] = 0x80;
    assert_eq!(short, expected_short);

    let mut long = Vec::new();
    BANDERWAGON_LONG
        .serialize_curve_point(&mut long, &SubgroupPoint::NEUTRAL)
        .unwrap();
    let mut expected_long = vec![0u8; 64];
    expected_long[0] = 0x01;
    expected_long[63] = 0x80;
    assert_eq!(long, expected_long);

    // An all-zero stream decodes to an error, never to the neutral
    // element.
    let zeroes = [0u8; 32];
    assert!(BANDERWAGON_SHORT
        .deserialize_curve_point(&mut zeroes.as_slice(), TrustLevel::Untrusted)
        .is_err());
    let zeroes = [0u8; 64];
    assert!(BANDERWAGON_LONG
        .deserialize_curve_point(&mut zeroes.as_slice(), TrustLevel::Untrusted)
        .is_err());
}

#[test]
fn decoded_points_have_canonical_sign() {
    // The decaf formats pin the stored representative to positive sign(y),
    // making the byte image independent of how the caller's point was
    // produced.
    let mut rng = rng(32);
    for _ in 0..8 {
        let point = sample_subgroup(&mut rng);
        let mut bytes = Vec::new();
        BANDERWAGON_LONG
            .serialize_curve_point(&mut bytes, &point)
            .unwrap();
        let decoded = BANDERWAGON_LONG
            .deserialize_curve_point(&mut bytes.as_slice(), TrustLevel::Untrusted)
            .unwrap();
        assert_eq!(decoded.y_decaf_affine().sign(), 1);
    }
}
