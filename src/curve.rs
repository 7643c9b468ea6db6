//! Curve point types and coordinate recovery.
//!
//! Two representations exist side by side, mirroring the two trust domains
//! of the serialization layer:
//!
//! - [`ExtendedPoint`] holds any rational point of the curve, including the
//!   two points at infinity, in extended twisted Edwards projective
//!   coordinates.
//! - [`SubgroupPoint`] holds an element of the prime-order subgroup in
//!   affine extended coordinates, stored modulo the affine 2-torsion point
//!   `A = (0, -1)`: the representatives `(x, y)` and `(-x, -y)` denote the
//!   same element.

mod extended;
mod recover;
mod subgroup;

pub use extended::ExtendedPoint;
pub use subgroup::SubgroupPoint;

pub(crate) use recover::{is_in_subgroup_affine, recover_x_from_y, recover_y_from_x};

use crate::errors::CurveError;
use crate::field::FieldElement;

/// Whether a decoder may assume its input encodes a valid point.
///
/// This is a dedicated enum rather than a bool so call sites spell out the
/// trust decision. [`Trusted`](TrustLevel::Trusted) skips the expensive
/// validation steps; the caller vouches for the input, and feeding invalid
/// data is the caller's fault. Whenever a trusted path detects an
/// inconsistency anyway, it panics with the diagnostic error instead of
/// returning it: trusted inputs must not fail silently.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TrustLevel {
    /// The input was produced by this library or checked before; skip
    /// optional validation.
    Trusted,
    /// The input comes from the outside; run every check.
    Untrusted,
}

impl TrustLevel {
    /// Whether optional validation may be skipped.
    pub fn is_trusted(self) -> bool {
        matches!(self, Self::Trusted)
    }
}

/// Escalates a validation failure on trusted input to a panic.
pub(crate) fn reject(trust: TrustLevel, error: CurveError) -> CurveError {
    if trust.is_trusted() {
        panic!("trusted input failed validation: {error}");
    }
    error
}

/// Read access to the point capabilities the serializers consume.
pub trait PointRead {
    /// Whether this is the not-a-point sentinel (`x = y = 0`).
    fn is_nap(&self) -> bool;
    /// Whether this is one of the two points at infinity.
    fn is_at_infinity(&self) -> bool;
    /// Whether this point lies in the prime-order subgroup.
    fn is_in_subgroup(&self) -> bool;
    /// Whether the type can only hold subgroup elements, making
    /// [`is_in_subgroup`](Self::is_in_subgroup) trivially true.
    fn can_only_represent_subgroup(&self) -> bool;
    /// The affine coordinates. Panics for NaPs and points at infinity.
    fn xy_affine(&self) -> (FieldElement, FieldElement);
    /// The affine x coordinate of some representative; for subgroup points
    /// the result is only defined up to simultaneous negation with y.
    fn x_decaf_affine(&self) -> FieldElement;
    /// The affine y coordinate of some representative; see
    /// [`x_decaf_affine`](Self::x_decaf_affine).
    fn y_decaf_affine(&self) -> FieldElement;
    /// The projective x coordinate of some representative.
    fn x_decaf_projective(&self) -> FieldElement;
    /// The projective y coordinate of some representative.
    fn y_decaf_projective(&self) -> FieldElement;
}

/// Construction of points from decoded coordinate data.
///
/// Implementations validate according to their own contract:
/// [`SubgroupPoint`] additionally enforces subgroup membership, while
/// [`ExtendedPoint`] accepts any rational point.
pub trait PointDecode: Sized {
    /// Builds a point from both affine coordinates.
    fn from_xy_affine(
        x: &FieldElement,
        y: &FieldElement,
        trust: TrustLevel,
    ) -> Result<Self, CurveError>;

    /// Builds a point from the affine x coordinate and the sign (±1) of y.
    fn from_x_and_sign_y(
        x: &FieldElement,
        sign_y: i32,
        trust: TrustLevel,
    ) -> Result<Self, CurveError>;

    /// Builds a point from the affine y coordinate and the sign of x.
    /// A zero sign is accepted exactly for `y = ±1`, where `x = 0`.
    fn from_y_and_sign_x(
        y: &FieldElement,
        sign_x: i32,
        trust: TrustLevel,
    ) -> Result<Self, CurveError>;

    /// Embeds an already-validated subgroup point.
    fn from_subgroup_point(point: SubgroupPoint) -> Self;
}

/// Maps a curve point to a field element as `x/y`.
///
/// Preimages have the form `{P, P+A}` with `A` the affine 2-torsion point,
/// so the map is injective on the prime-order subgroup and well-defined on
/// the sign-ambiguous subgroup representation. The neutral element maps to
/// zero. Panics for NaPs and points at infinity.
pub fn map_to_field_element(point: &impl PointRead) -> FieldElement {
    if point.is_at_infinity() {
        panic!("cannot map a point at infinity to a field element");
    }
    if point.is_nap() {
        panic!("cannot map a NaP to a field element");
    }
    point.x_decaf_projective() * point.y_decaf_projective().invert()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trust_level_predicates() {
        assert!(TrustLevel::Trusted.is_trusted());
        assert!(!TrustLevel::Untrusted.is_trusted());
    }

    #[test]
    fn neutral_maps_to_zero() {
        assert_eq!(
            map_to_field_element(&ExtendedPoint::NEUTRAL),
            FieldElement::ZERO
        );
        assert_eq!(
            map_to_field_element(&ExtendedPoint::ORDER_TWO),
            FieldElement::ZERO
        );
        assert_eq!(
            map_to_field_element(&SubgroupPoint::NEUTRAL),
            FieldElement::ZERO
        );
    }

    #[test]
    fn invariant_under_torsion_translation() {
        let point = ExtendedPoint::sample_on_curve(11);
        let translated = point.torque();
        assert_eq!(map_to_field_element(&point), map_to_field_element(&translated));
    }

    #[test]
    #[should_panic(expected = "point at infinity")]
    fn panics_for_infinity() {
        map_to_field_element(&ExtendedPoint::INFINITY_E1);
    }

    #[test]
    #[should_panic(expected = "NaP")]
    fn panics_for_nap() {
        map_to_field_element(&ExtendedPoint::nap_for_tests());
    }
}
