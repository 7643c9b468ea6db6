//! The concrete point serialization schemes.

use std::io::{Read, Write};

use crate::curve::{PointDecode, PointRead, SubgroupPoint, TrustLevel};
use crate::errors::{CurveError, DeserializationError, ReadErrorData, SerializationError};
use crate::serializer::values::{
    DoubleHeaderFieldSerializer, HeaderFieldSerializer, SignBitFieldSerializer, WORD_LENGTH,
};
use crate::serializer::{check_point_serializability, BitHeader, Endianness};

/// The deployed Banderwagon 32-byte format: `x·sign(y)` behind a set
/// 1-bit header, little endian. The header makes an all-zero word fail
/// decoding instead of producing the neutral element.
pub const BANDERWAGON_SHORT: PointSerializerXTimesSignY =
    PointSerializerXTimesSignY::new(Endianness::Little, BitHeader::new(0b1, 1));

/// The deployed Banderwagon 64-byte format: `y·sign(y)` behind a clear
/// 2-bit header, then `x·sign(y)` behind a set 1-bit header, little
/// endian. The leading word's header differs from the short format's in
/// its first big-endian bit, so the two formats can be told apart at the
/// first byte of a stream.
pub const BANDERWAGON_LONG: PointSerializerYXTimesSignY = PointSerializerYXTimesSignY::new(
    Endianness::Little,
    BitHeader::new(0b00, 2),
    BitHeader::new(0b1, 1),
);

/// A dynamically typed serializer parameter, paired with a parameter name
/// in [`PointSerializer::with_parameter`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParameterValue {
    /// Byte order of the encoded words.
    Endianness(Endianness),
    /// A boolean parameter, currently only `"subgroup_only"`.
    Bool(bool),
    /// A bit header, for the `"bit_header"`/`"bit_header2"` parameters.
    BitHeader(BitHeader),
}

/// Configuration surface shared by every point serializer.
///
/// Serializers are immutable; the `with_*` builders return a modified
/// copy, validated eagerly. Parameter names are matched case
/// insensitively; an unknown name, a mistyped value, or a configuration
/// violating the scheme's bit layout panics, since it is a programming
/// error rather than a data error.
pub trait PointSerializer: Clone {
    /// The exact number of bytes one point occupies on the wire.
    fn output_length(&self) -> usize;

    /// Whether this serializer only handles prime-order subgroup points.
    fn is_subgroup_only(&self) -> bool;

    /// The configured byte order.
    fn endianness(&self) -> Endianness;

    /// Returns a copy using the given byte order.
    fn with_endianness(&self, endianness: Endianness) -> Self {
        self.with_parameter("endianness", ParameterValue::Endianness(endianness))
    }

    /// Returns a copy with one named parameter replaced.
    fn with_parameter(&self, name: &str, value: ParameterValue) -> Self;

    /// Reads back a named parameter.
    fn get_parameter(&self, name: &str) -> ParameterValue;

    /// Re-checks the configuration invariants.
    fn validate(&self);
}

fn unknown_parameter(name: &str) -> ! {
    panic!("unknown serializer parameter: {name}");
}

fn parameter_type_mismatch(name: &str) -> ! {
    panic!("serializer parameter {name} received a value of the wrong type");
}

/// Wraps a point construction failure, recording how many bytes the
/// encoded point occupied.
fn curve_error(source: CurveError, bytes_read: usize) -> DeserializationError {
    DeserializationError::Curve {
        source,
        data: ReadErrorData {
            partial_read: false,
            bytes_read,
            actually_read: Vec::new(),
            expected: Vec::new(),
        },
    }
}

/// Serializes both affine coordinates, 64 bytes per point.
///
/// With the subgroup restriction enabled, writing refuses points outside
/// the prime-order subgroup and reading validates membership of the
/// decoded coordinates exactly.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PointSerializerXY {
    values: DoubleHeaderFieldSerializer,
    subgroup_only: bool,
}

impl PointSerializerXY {
    /// Creates the scheme with empty headers.
    pub const fn new(endianness: Endianness, subgroup_only: bool) -> Self {
        Self {
            values: DoubleHeaderFieldSerializer {
                endianness,
                header1: BitHeader::EMPTY,
                header2: BitHeader::EMPTY,
            },
            subgroup_only,
        }
    }

    /// Writes the point. Errors: the serializability refusals and i/o
    /// failures with write accounting.
    pub fn serialize_curve_point<W: Write + ?Sized>(
        &self,
        writer: &mut W,
        point: &impl PointRead,
    ) -> Result<usize, SerializationError> {
        check_point_serializability(point, self.subgroup_only)?;
        let (x, y) = point.xy_affine();
        self.values.serialize(writer, &x, &y)
    }

    /// Reads one point. On any error the stream may have consumed up to
    /// [`output_length`](PointSerializer::output_length) bytes, as
    /// recorded in the error data.
    pub fn deserialize_curve_point<R: Read + ?Sized, P: PointDecode>(
        &self,
        reader: &mut R,
        trust: TrustLevel,
    ) -> Result<P, DeserializationError> {
        let (x, y, read) = self.values.deserialize(reader)?;
        if self.subgroup_only {
            let point = SubgroupPoint::from_xy_affine(&x, &y, trust)
                .map_err(|e| curve_error(e, read))?;
            Ok(P::from_subgroup_point(point))
        } else {
            P::from_xy_affine(&x, &y, trust).map_err(|e| curve_error(e, read))
        }
    }
}

impl PointSerializer for PointSerializerXY {
    fn output_length(&self) -> usize {
        2 * WORD_LENGTH
    }

    fn is_subgroup_only(&self) -> bool {
        self.subgroup_only
    }

    fn endianness(&self) -> Endianness {
        self.values.endianness
    }

    fn with_parameter(&self, name: &str, value: ParameterValue) -> Self {
        let mut copy = *self;
        if name.eq_ignore_ascii_case("endianness") {
            match value {
                ParameterValue::Endianness(e) => copy.values.endianness = e,
                _ => parameter_type_mismatch(name),
            }
        } else if name.eq_ignore_ascii_case("subgroup_only") {
            match value {
                ParameterValue::Bool(b) => copy.subgroup_only = b,
                _ => parameter_type_mismatch(name),
            }
        } else if name.eq_ignore_ascii_case("bit_header") {
            match value {
                ParameterValue::BitHeader(h) => copy.values.header1 = h,
                _ => parameter_type_mismatch(name),
            }
        } else if name.eq_ignore_ascii_case("bit_header2") {
            match value {
                ParameterValue::BitHeader(h) => copy.values.header2 = h,
                _ => parameter_type_mismatch(name),
            }
        } else {
            unknown_parameter(name);
        }
        copy.validate();
        copy
    }

    fn get_parameter(&self, name: &str) -> ParameterValue {
        if name.eq_ignore_ascii_case("endianness") {
            ParameterValue::Endianness(self.values.endianness)
        } else if name.eq_ignore_ascii_case("subgroup_only") {
            ParameterValue::Bool(self.subgroup_only)
        } else if name.eq_ignore_ascii_case("bit_header") {
            ParameterValue::BitHeader(self.values.header1)
        } else if name.eq_ignore_ascii_case("bit_header2") {
            ParameterValue::BitHeader(self.values.header2)
        } else {
            unknown_parameter(name);
        }
    }

    fn validate(&self) {
        // Both words carry full-range coordinates, leaving one free bit.
        assert!(
            self.values.header1.prefix_len() <= 1 && self.values.header2.prefix_len() <= 1,
            "headers on full-range coordinates are limited to one bit"
        );
    }
}

/// Serializes the affine x coordinate with the sign of y folded into the
/// most significant bit, 32 bytes per point. y is never zero on the
/// curve, so the sign is always ±1.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PointSerializerXAndSignY {
    values: SignBitFieldSerializer,
    subgroup_only: bool,
}

impl PointSerializerXAndSignY {
    /// Creates the scheme.
    pub const fn new(endianness: Endianness, subgroup_only: bool) -> Self {
        Self {
            values: SignBitFieldSerializer { endianness },
            subgroup_only,
        }
    }

    /// Writes the point; the sign bit is set exactly for negative
    /// `sign(y)`.
    pub fn serialize_curve_point<W: Write + ?Sized>(
        &self,
        writer: &mut W,
        point: &impl PointRead,
    ) -> Result<usize, SerializationError> {
        check_point_serializability(point, self.subgroup_only)?;
        let (x, y) = point.xy_affine();
        self.values.serialize(writer, &x, y.sign() < 0)
    }

    /// Reads one point.
    pub fn deserialize_curve_point<R: Read + ?Sized, P: PointDecode>(
        &self,
        reader: &mut R,
        trust: TrustLevel,
    ) -> Result<P, DeserializationError> {
        let (x, sign_bit, read) = self.values.deserialize(reader)?;
        let sign_y = if sign_bit { -1 } else { 1 };
        if self.subgroup_only {
            let point = SubgroupPoint::from_x_and_sign_y(&x, sign_y, trust)
                .map_err(|e| curve_error(e, read))?;
            Ok(P::from_subgroup_point(point))
        } else {
            P::from_x_and_sign_y(&x, sign_y, trust).map_err(|e| curve_error(e, read))
        }
    }
}

impl PointSerializer for PointSerializerXAndSignY {
    fn output_length(&self) -> usize {
        WORD_LENGTH
    }

    fn is_subgroup_only(&self) -> bool {
        self.subgroup_only
    }

    fn endianness(&self) -> Endianness {
        self.values.endianness
    }

    fn with_parameter(&self, name: &str, value: ParameterValue) -> Self {
        let mut copy = *self;
        if name.eq_ignore_ascii_case("endianness") {
            match value {
                ParameterValue::Endianness(e) => copy.values.endianness = e,
                _ => parameter_type_mismatch(name),
            }
        } else if name.eq_ignore_ascii_case("subgroup_only") {
            match value {
                ParameterValue::Bool(b) => copy.subgroup_only = b,
                _ => parameter_type_mismatch(name),
            }
        } else {
            unknown_parameter(name);
        }
        copy.validate();
        copy
    }

    fn get_parameter(&self, name: &str) -> ParameterValue {
        if name.eq_ignore_ascii_case("endianness") {
            ParameterValue::Endianness(self.values.endianness)
        } else if name.eq_ignore_ascii_case("subgroup_only") {
            ParameterValue::Bool(self.subgroup_only)
        } else {
            unknown_parameter(name);
        }
    }

    fn validate(&self) {}
}

/// Serializes the affine y coordinate with the sign of x folded into the
/// most significant bit, 32 bytes per point.
///
/// x is zero exactly for `y = ±1`; those points are written with a clear
/// sign bit, and decoding rejects the redundant set-bit encoding with
/// [`CurveError::UnexpectedNegativeZero`] to keep the format canonical.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PointSerializerYAndSignX {
    values: SignBitFieldSerializer,
    subgroup_only: bool,
}

impl PointSerializerYAndSignX {
    /// Creates the scheme.
    pub const fn new(endianness: Endianness, subgroup_only: bool) -> Self {
        Self {
            values: SignBitFieldSerializer { endianness },
            subgroup_only,
        }
    }

    /// Writes the point; for `x = 0` the sign bit stays clear.
    pub fn serialize_curve_point<W: Write + ?Sized>(
        &self,
        writer: &mut W,
        point: &impl PointRead,
    ) -> Result<usize, SerializationError> {
        check_point_serializability(point, self.subgroup_only)?;
        let (x, y) = point.xy_affine();
        self.values.serialize(writer, &y, x.sign() < 0)
    }

    /// Reads one point, rejecting the non-canonical negative encoding of
    /// `x = 0`.
    pub fn deserialize_curve_point<R: Read + ?Sized, P: PointDecode + PointRead>(
        &self,
        reader: &mut R,
        trust: TrustLevel,
    ) -> Result<P, DeserializationError> {
        let (y, sign_bit, read) = self.values.deserialize(reader)?;
        let sign_x = if sign_bit { -1 } else { 1 };
        let point: P = if self.subgroup_only {
            let point = SubgroupPoint::from_y_and_sign_x(&y, sign_x, trust)
                .map_err(|e| curve_error(e, read))?;
            P::from_subgroup_point(point)
        } else {
            P::from_y_and_sign_x(&y, sign_x, trust).map_err(|e| curve_error(e, read))?
        };
        // The point construction accepts any sign for x = 0 (negating zero
        // is a no-op); the wire format does not.
        if sign_bit && bool::from(point.x_decaf_affine().is_zero()) {
            let error = curve_error(CurveError::UnexpectedNegativeZero, read);
            if trust.is_trusted() {
                // Reachable even for honest callers of trusted decoding:
                // the non-canonical bit pattern passes every point-level
                // check.
                panic!("trusted deserialization failed: {error}");
            }
            return Err(error);
        }
        Ok(point)
    }
}

impl PointSerializer for PointSerializerYAndSignX {
    fn output_length(&self) -> usize {
        WORD_LENGTH
    }

    fn is_subgroup_only(&self) -> bool {
        self.subgroup_only
    }

    fn endianness(&self) -> Endianness {
        self.values.endianness
    }

    fn with_parameter(&self, name: &str, value: ParameterValue) -> Self {
        let mut copy = *self;
        if name.eq_ignore_ascii_case("endianness") {
            match value {
                ParameterValue::Endianness(e) => copy.values.endianness = e,
                _ => parameter_type_mismatch(name),
            }
        } else if name.eq_ignore_ascii_case("subgroup_only") {
            match value {
                ParameterValue::Bool(b) => copy.subgroup_only = b,
                _ => parameter_type_mismatch(name),
            }
        } else {
            unknown_parameter(name);
        }
        copy.validate();
        copy
    }

    fn get_parameter(&self, name: &str) -> ParameterValue {
        if name.eq_ignore_ascii_case("endianness") {
            ParameterValue::Endianness(self.values.endianness)
        } else if name.eq_ignore_ascii_case("subgroup_only") {
            ParameterValue::Bool(self.subgroup_only)
        } else {
            unknown_parameter(name);
        }
    }

    fn validate(&self) {}
}

/// Serializes `x·sign(y)` behind a bit header, 32 bytes per point.
///
/// Only prime-order subgroup points can be represented: recovering the
/// point from a single coordinate relies on the subgroup constraint to
/// resolve the remaining ambiguity, and the subgroup restriction is
/// therefore not configurable.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PointSerializerXTimesSignY {
    values: HeaderFieldSerializer,
}

impl PointSerializerXTimesSignY {
    /// Creates the scheme. The header may use at most one bit, since
    /// `x·sign(y)` ranges over the whole field.
    pub const fn new(endianness: Endianness, header: BitHeader) -> Self {
        assert!(
            header.prefix_len() <= 1,
            "headers on full-range coordinates are limited to one bit"
        );
        Self {
            values: HeaderFieldSerializer { endianness, header },
        }
    }

    /// Writes the point.
    pub fn serialize_curve_point<W: Write + ?Sized>(
        &self,
        writer: &mut W,
        point: &impl PointRead,
    ) -> Result<usize, SerializationError> {
        check_point_serializability(point, true)?;
        let mut x = point.x_decaf_affine();
        if point.y_decaf_affine().sign() < 0 {
            x = -x;
        }
        self.values.serialize(writer, &x)
    }

    /// Reads one subgroup point.
    pub fn deserialize_curve_point<R: Read + ?Sized>(
        &self,
        reader: &mut R,
        trust: TrustLevel,
    ) -> Result<SubgroupPoint, DeserializationError> {
        let (x_sign_y, read) = self.values.deserialize(reader)?;
        SubgroupPoint::from_x_times_sign_y(&x_sign_y, trust).map_err(|e| curve_error(e, read))
    }
}

impl PointSerializer for PointSerializerXTimesSignY {
    fn output_length(&self) -> usize {
        WORD_LENGTH
    }

    fn is_subgroup_only(&self) -> bool {
        true
    }

    fn endianness(&self) -> Endianness {
        self.values.endianness
    }

    fn with_parameter(&self, name: &str, value: ParameterValue) -> Self {
        let mut copy = *self;
        if name.eq_ignore_ascii_case("endianness") {
            match value {
                ParameterValue::Endianness(e) => copy.values.endianness = e,
                _ => parameter_type_mismatch(name),
            }
        } else if name.eq_ignore_ascii_case("bit_header") {
            match value {
                ParameterValue::BitHeader(h) => copy.values.header = h,
                _ => parameter_type_mismatch(name),
            }
        } else if name.eq_ignore_ascii_case("subgroup_only") {
            panic!("the subgroup restriction of this serializer is not configurable");
        } else {
            unknown_parameter(name);
        }
        copy.validate();
        copy
    }

    fn get_parameter(&self, name: &str) -> ParameterValue {
        if name.eq_ignore_ascii_case("endianness") {
            ParameterValue::Endianness(self.values.endianness)
        } else if name.eq_ignore_ascii_case("subgroup_only") {
            ParameterValue::Bool(true)
        } else if name.eq_ignore_ascii_case("bit_header") {
            ParameterValue::BitHeader(self.values.header)
        } else {
            unknown_parameter(name);
        }
    }

    fn validate(&self) {
        assert!(
            self.values.header.prefix_len() <= 1,
            "headers on full-range coordinates are limited to one bit"
        );
    }
}

/// Serializes `y·sign(y)` then `x·sign(y)`, 64 bytes per point, subgroup
/// only.
///
/// The y word comes first so the information distinguishing the long
/// format from the short one sits at the start of the stream; since
/// `y·sign(y)` always has positive sign, its word has two free bits and
/// can carry a 2-bit header.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PointSerializerYXTimesSignY {
    values: DoubleHeaderFieldSerializer,
}

impl PointSerializerYXTimesSignY {
    /// Creates the scheme. The leading (y) header may use two bits, the
    /// trailing (x) header one.
    pub const fn new(endianness: Endianness, header_y: BitHeader, header_x: BitHeader) -> Self {
        assert!(
            header_y.prefix_len() <= 2,
            "the y word of this format has two free bits"
        );
        assert!(
            header_x.prefix_len() <= 1,
            "headers on full-range coordinates are limited to one bit"
        );
        Self {
            values: DoubleHeaderFieldSerializer {
                endianness,
                header1: header_y,
                header2: header_x,
            },
        }
    }

    /// Writes the point.
    pub fn serialize_curve_point<W: Write + ?Sized>(
        &self,
        writer: &mut W,
        point: &impl PointRead,
    ) -> Result<usize, SerializationError> {
        check_point_serializability(point, true)?;
        let mut x = point.x_decaf_affine();
        let mut y = point.y_decaf_affine();
        if y.sign() < 0 {
            x = -x;
            y = -y;
        }
        self.values.serialize(writer, &y, &x)
    }

    /// Reads one subgroup point.
    pub fn deserialize_curve_point<R: Read + ?Sized>(
        &self,
        reader: &mut R,
        trust: TrustLevel,
    ) -> Result<SubgroupPoint, DeserializationError> {
        let (y_sign_y, x_sign_y, read) = self.values.deserialize(reader)?;
        SubgroupPoint::from_yx_times_sign_y(&y_sign_y, &x_sign_y, trust)
            .map_err(|e| curve_error(e, read))
    }
}

impl PointSerializer for PointSerializerYXTimesSignY {
    fn output_length(&self) -> usize {
        2 * WORD_LENGTH
    }

    fn is_subgroup_only(&self) -> bool {
        true
    }

    fn endianness(&self) -> Endianness {
        self.values.endianness
    }

    fn with_parameter(&self, name: &str, value: ParameterValue) -> Self {
        let mut copy = *self;
        if name.eq_ignore_ascii_case("endianness") {
            match value {
                ParameterValue::Endianness(e) => copy.values.endianness = e,
                _ => parameter_type_mismatch(name),
            }
        } else if name.eq_ignore_ascii_case("bit_header") {
            match value {
                ParameterValue::BitHeader(h) => copy.values.header1 = h,
                _ => parameter_type_mismatch(name),
            }
        } else if name.eq_ignore_ascii_case("bit_header2") {
            match value {
                ParameterValue::BitHeader(h) => copy.values.header2 = h,
                _ => parameter_type_mismatch(name),
            }
        } else if name.eq_ignore_ascii_case("subgroup_only") {
            panic!("the subgroup restriction of this serializer is not configurable");
        } else {
            unknown_parameter(name);
        }
        copy.validate();
        copy
    }

    fn get_parameter(&self, name: &str) -> ParameterValue {
        if name.eq_ignore_ascii_case("endianness") {
            ParameterValue::Endianness(self.values.endianness)
        } else if name.eq_ignore_ascii_case("subgroup_only") {
            ParameterValue::Bool(true)
        } else if name.eq_ignore_ascii_case("bit_header") {
            ParameterValue::BitHeader(self.values.header1)
        } else if name.eq_ignore_ascii_case("bit_header2") {
            ParameterValue::BitHeader(self.values.header2)
        } else {
            unknown_parameter(name);
        }
    }

    fn validate(&self) {
        assert!(
            self.values.header1.prefix_len() <= 2,
            "the y word of this format has two free bits"
        );
        assert!(
            self.values.header2.prefix_len() <= 1,
            "headers on full-range coordinates are limited to one bit"
        );
    }
}
