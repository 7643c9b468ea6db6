//! Bandersnatch curve points and Banderwagon serialization.
//!
//! Bandersnatch is the twisted Edwards curve `-5·x² + y² = 1 + d·x²·y²`
//! over the BLS12-381 scalar field; Banderwagon is its prime-order
//! subgroup taken modulo the affine 2-torsion point. This crate implements
//! the point ↔ byte-stream pipeline for both: coordinate recovery from
//! partial data, curve and subgroup validation, and a family of wire
//! formats with embedded bit headers and configurable endianness.
//!
//! ```
//! use bandersnatch::{
//!     FieldElement, SubgroupPoint, TrustLevel, BANDERWAGON_SHORT,
//! };
//!
//! // Derive a subgroup element from a field element and round-trip it
//! // through the 32-byte Banderwagon format.
//! let point = SubgroupPoint::from_x_times_sign_y(
//!     &FieldElement::ZERO,
//!     TrustLevel::Untrusted,
//! )
//! .unwrap();
//!
//! let mut encoded = Vec::new();
//! BANDERWAGON_SHORT
//!     .serialize_curve_point(&mut encoded, &point)
//!     .unwrap();
//! let decoded = BANDERWAGON_SHORT
//!     .deserialize_curve_point(&mut encoded.as_slice(), TrustLevel::Untrusted)
//!     .unwrap();
//! assert_eq!(point, decoded);
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::unwrap_used,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused,
    unused_attributes,
    unused_imports,
    unused_mut,
    unused_must_use
)]

// Internal macros. Must come first!
#[macro_use]
mod macros;

pub mod constants;
pub mod curve;
pub mod errors;
pub mod field;
pub mod serializer;

pub use curve::{
    map_to_field_element, ExtendedPoint, PointDecode, PointRead, SubgroupPoint, TrustLevel,
};
pub use errors::{
    CurveError, DeserializationError, ReadErrorData, SerializationError, WriteErrorData,
};
pub use field::FieldElement;
pub use serializer::{
    BitHeader, Endianness, ParameterValue, PointSerializer, PointSerializerXAndSignY,
    PointSerializerXTimesSignY, PointSerializerXY, PointSerializerYAndSignX,
    PointSerializerYXTimesSignY, BANDERWAGON_LONG, BANDERWAGON_SHORT,
};
