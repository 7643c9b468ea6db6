//! Curve point ↔ byte stream serialization.
//!
//! Serializers are small immutable values holding the format metadata
//! (endianness, bit headers, subgroup restriction); the curve points to
//! process are passed to their methods. Parameter changes go through
//! `with_*` builders that return a validated copy.
//!
//! Five schemes are provided:
//!
//! | scheme | size | payload |
//! |---|---|---|
//! | [`PointSerializerXY`] | 64 B | affine `x`, affine `y` |
//! | [`PointSerializerXAndSignY`] | 32 B | `x` with the sign bit of `y` |
//! | [`PointSerializerYAndSignX`] | 32 B | `y` with the sign bit of `x` |
//! | [`PointSerializerXTimesSignY`] | 32 B | `x·sign(y)`, subgroup only |
//! | [`PointSerializerYXTimesSignY`] | 64 B | `y·sign(y)` then `x·sign(y)`, subgroup only |
//!
//! The deployed Banderwagon formats are [`BANDERWAGON_SHORT`] and
//! [`BANDERWAGON_LONG`].

mod basic;
mod bit_header;
mod stream;
mod values;

pub use basic::{
    ParameterValue, PointSerializer, PointSerializerXAndSignY, PointSerializerXTimesSignY,
    PointSerializerXY, PointSerializerYAndSignX, PointSerializerYXTimesSignY, BANDERWAGON_LONG,
    BANDERWAGON_SHORT,
};
pub use bit_header::BitHeader;
pub use stream::{consume_expected_bytes, read_full, write_full};

use crate::curve::PointRead;
use crate::errors::SerializationError;

/// Byte order of the 32-byte words on the wire. The logical bit layout
/// (header and sign bits in the most significant positions of the
/// big-endian interpretation) is independent of this choice.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Endianness {
    /// Little-endian words, the deployed Banderwagon byte order.
    #[default]
    Little,
    /// Big-endian words.
    Big,
}

/// Checks that a point may be serialized at all: NaPs and points at
/// infinity are always refused, points outside the prime-order subgroup
/// whenever the serializer is restricted to the subgroup.
///
/// This runs on the write path, where there is no trust parameter: a
/// subgroup-only serializer always verifies membership, which is trivial
/// for point types that cannot hold anything else.
pub(crate) fn check_point_serializability(
    point: &impl PointRead,
    subgroup_check: bool,
) -> Result<(), SerializationError> {
    if point.is_nap() {
        return Err(SerializationError::CannotSerializeNaP);
    }
    if point.is_at_infinity() {
        return Err(SerializationError::CannotSerializePointAtInfinity);
    }
    if subgroup_check && !point.can_only_represent_subgroup() && !point.is_in_subgroup() {
        return Err(SerializationError::PointOutsideSubgroup);
    }
    Ok(())
}
