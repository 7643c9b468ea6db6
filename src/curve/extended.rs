use subtle::{Choice, ConstantTimeEq};

#[cfg(feature = "zeroize")]
use zeroize::DefaultIsZeroes;

use crate::constants::{EDWARDS_D, NEG_SQRT_D_OVER_A, SQRT_D_OVER_A};
use crate::curve::{
    is_in_subgroup_affine, recover_x_from_y, recover_y_from_x, reject, PointDecode, PointRead,
    SubgroupPoint, TrustLevel,
};
use crate::errors::CurveError;
use crate::field::FieldElement;

/// A rational point of the Bandersnatch curve in extended twisted Edwards
/// projective coordinates `(x : y : t : z)` with `x·y = t·z`.
///
/// Unlike [`SubgroupPoint`], this type can hold any rational point,
/// including the two points at infinity (`z = 0`). Coordinates are exact:
/// `(x, y)` and `(-x, -y)` are different points.
///
/// A zero-initialized value of this type is the not-a-point sentinel
/// (`x = y = 0`), not a valid point; the serializers refuse it.
#[derive(Clone, Copy, Debug)]
pub struct ExtendedPoint {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) t: FieldElement,
    pub(crate) z: FieldElement,
}

impl Default for ExtendedPoint {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

#[cfg(feature = "zeroize")]
impl DefaultIsZeroes for ExtendedPoint {}

impl ConstantTimeEq for ExtendedPoint {
    fn ct_eq(&self, other: &Self) -> Choice {
        // Cross-multiplied projective comparison. The t-coordinate pairs
        // keep the test meaningful at infinity, where both z vanish.
        let xz = (self.x * other.z).ct_eq(&(other.x * self.z));
        let yz = (self.y * other.z).ct_eq(&(other.y * self.z));
        let xt = (self.x * other.t).ct_eq(&(other.x * self.t));
        let yt = (self.y * other.t).ct_eq(&(other.y * self.t));
        xz & yz & xt & yt
    }
}

impl PartialEq for ExtendedPoint {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}
impl Eq for ExtendedPoint {}

impl ExtendedPoint {
    /// The neutral element `(0, 1)`.
    pub const NEUTRAL: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
        t: FieldElement::ZERO,
        z: FieldElement::ONE,
    };

    /// The affine 2-torsion point `A = (0, -1)`.
    pub const ORDER_TWO: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::MINUS_ONE,
        t: FieldElement::ZERO,
        z: FieldElement::ONE,
    };

    /// One of the two order-2 points at infinity,
    /// `(sqrt(d/a) : 0 : 1 : 0)`.
    pub const INFINITY_E1: Self = Self {
        x: SQRT_D_OVER_A,
        y: FieldElement::ZERO,
        t: FieldElement::ONE,
        z: FieldElement::ZERO,
    };

    /// The other point at infinity, `(-sqrt(d/a) : 0 : 1 : 0)`.
    pub const INFINITY_E2: Self = Self {
        x: NEG_SQRT_D_OVER_A,
        y: FieldElement::ZERO,
        t: FieldElement::ONE,
        z: FieldElement::ZERO,
    };

    /// Whether this is the not-a-point sentinel (`x = y = 0`).
    pub fn is_nap(&self) -> Choice {
        self.x.is_zero() & self.y.is_zero()
    }

    /// Whether this is one of the two points at infinity. NaPs answer
    /// false.
    pub fn is_at_infinity(&self) -> Choice {
        self.z.is_zero() & !self.is_nap()
    }

    /// Whether the coordinates satisfy the projective curve equation
    /// `a·x² + y² = z² + d·t²` together with the extended-coordinate
    /// constraint `x·y = t·z`.
    pub fn is_on_curve(&self) -> Choice {
        let xx = self.x.square();
        let lhs = self.y.square() - xx.double().double() - xx; // a·x² + y²
        let rhs = self.z.square() + EDWARDS_D * self.t.square();
        lhs.ct_eq(&rhs) & (self.x * self.y).ct_eq(&(self.t * self.z))
    }

    /// Exact membership in the prime-order subgroup. NaPs and points at
    /// infinity answer false.
    pub fn is_in_subgroup(&self) -> bool {
        if bool::from(self.is_nap()) || bool::from(self.is_at_infinity()) {
            return false;
        }
        let (x, y) = self.xy_affine();
        is_in_subgroup_affine(&x, &y)
    }

    /// Doubles this point. Every doubled rational point lies in the
    /// prime-order subgroup; the points at infinity double to the neutral
    /// element.
    pub fn double(&self) -> Self {
        // dbl-2008-hwcd with a = -5.
        let a = self.x.square();
        let b = self.y.square();
        let c = self.z.square().double();
        let d = -(a.double().double() + a);
        let e = (self.x + self.y).square() - a - b;
        let g = d + b;
        let f = g - c;
        let h = d - b;
        Self {
            x: e * f,
            y: g * h,
            t: e * h,
            z: f * g,
        }
    }

    /// The negated point `(-x, y)`.
    pub fn neg(&self) -> Self {
        Self {
            x: -self.x,
            y: self.y,
            t: -self.t,
            z: self.z,
        }
    }

    /// Translation by the affine 2-torsion point: `P + A = (-x, -y)`.
    pub fn torque(&self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            t: self.t,
            z: self.z,
        }
    }

    #[cfg(test)]
    pub(crate) fn nap_for_tests() -> Self {
        Self {
            x: FieldElement::ZERO,
            y: FieldElement::ZERO,
            t: FieldElement::ZERO,
            z: FieldElement::ZERO,
        }
    }

    /// Derives some rational curve point from a seed. Test helper; the
    /// result is frequently outside the prime-order subgroup.
    #[cfg(test)]
    pub(crate) fn sample_on_curve(seed: u64) -> Self {
        use rand_core::{RngCore, SeedableRng};
        let mut seed_bytes = [0u8; 32];
        seed_bytes[..8].copy_from_slice(&seed.to_le_bytes());
        let mut rng = rand_chacha::ChaCha8Rng::from_seed(seed_bytes);
        loop {
            let x = FieldElement::random(&mut rng);
            let Ok(y) = recover_y_from_x(&x, false) else {
                continue;
            };
            let y = if rng.next_u32() & 1 == 0 { y } else { -y };
            return Self {
                x,
                y,
                t: x * y,
                z: FieldElement::ONE,
            };
        }
    }
}

impl PointRead for ExtendedPoint {
    fn is_nap(&self) -> bool {
        ExtendedPoint::is_nap(self).into()
    }

    fn is_at_infinity(&self) -> bool {
        ExtendedPoint::is_at_infinity(self).into()
    }

    fn is_in_subgroup(&self) -> bool {
        ExtendedPoint::is_in_subgroup(self)
    }

    fn can_only_represent_subgroup(&self) -> bool {
        false
    }

    fn xy_affine(&self) -> (FieldElement, FieldElement) {
        if bool::from(ExtendedPoint::is_nap(self)) {
            panic!("cannot take affine coordinates of a NaP");
        }
        if bool::from(ExtendedPoint::is_at_infinity(self)) {
            panic!("cannot take affine coordinates of a point at infinity");
        }
        let inv_z = self.z.invert();
        (self.x * inv_z, self.y * inv_z)
    }

    fn x_decaf_affine(&self) -> FieldElement {
        self.xy_affine().0
    }

    fn y_decaf_affine(&self) -> FieldElement {
        self.xy_affine().1
    }

    fn x_decaf_projective(&self) -> FieldElement {
        self.x
    }

    fn y_decaf_projective(&self) -> FieldElement {
        self.y
    }
}

impl PointDecode for ExtendedPoint {
    /// Builds a point from both affine coordinates.
    ///
    /// Untrusted inputs are checked for the NaP encoding (`x = y = 0`,
    /// [`CurveError::XYAllZero`]) and curve membership
    /// ([`CurveError::NotOnCurve`]). Trusted inputs skip every check.
    /// Points at infinity cannot be built this way.
    fn from_xy_affine(
        x: &FieldElement,
        y: &FieldElement,
        trust: TrustLevel,
    ) -> Result<Self, CurveError> {
        let point = Self {
            x: *x,
            y: *y,
            t: x * y,
            z: FieldElement::ONE,
        };
        if !trust.is_trusted() {
            if bool::from(point.is_nap()) {
                return Err(CurveError::XYAllZero);
            }
            if !bool::from(point.is_on_curve()) {
                return Err(CurveError::NotOnCurve);
            }
        }
        Ok(point)
    }

    /// Builds a point from the affine x coordinate and the sign of y.
    ///
    /// The y coordinate is recovered for any trust level; it is needed to
    /// build the point at all. With trusted input, a recovery failure
    /// panics instead of returning.
    fn from_x_and_sign_y(
        x: &FieldElement,
        sign_y: i32,
        trust: TrustLevel,
    ) -> Result<Self, CurveError> {
        if sign_y != 1 && sign_y != -1 {
            return Err(reject(trust, CurveError::InvalidSign(sign_y)));
        }
        let mut y = recover_y_from_x(x, false).map_err(|e| reject(trust, e))?;
        // y is never zero on the curve, so the sign comparison is exact.
        if y.sign() != sign_y {
            y = -y;
        }
        Ok(Self {
            x: *x,
            y,
            t: x * y,
            z: FieldElement::ONE,
        })
    }

    /// Builds a point from the affine y coordinate and the sign of x.
    ///
    /// A zero sign is accepted exactly for `y = ±1`, the two points with
    /// `x = 0`; those y values in turn accept any sign, since negating
    /// `x = 0` is a no-op. Other y values with a zero sign are rejected
    /// with [`CurveError::InvalidZeroSignX`].
    fn from_y_and_sign_x(
        y: &FieldElement,
        sign_x: i32,
        trust: TrustLevel,
    ) -> Result<Self, CurveError> {
        if sign_x == 0 {
            return if *y == FieldElement::ONE {
                Ok(Self::NEUTRAL)
            } else if *y == FieldElement::MINUS_ONE {
                Ok(Self::ORDER_TWO)
            } else {
                Err(reject(trust, CurveError::InvalidZeroSignX))
            };
        }
        if sign_x != 1 && sign_x != -1 {
            return Err(reject(trust, CurveError::InvalidSign(sign_x)));
        }
        let mut x = recover_x_from_y(y).map_err(|e| reject(trust, e))?;
        // For y = ±1 the recovered x is zero and keeps its zero sign; any
        // requested sign is accepted there.
        if x.sign() != sign_x {
            x = -x;
        }
        Ok(Self {
            x,
            y: *y,
            t: x * y,
            z: FieldElement::ONE,
        })
    }

    fn from_subgroup_point(point: SubgroupPoint) -> Self {
        let (x, y) = point.xy_affine();
        Self {
            x,
            y,
            t: x * y,
            z: FieldElement::ONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_of_special_points() {
        assert!(bool::from(ExtendedPoint::NEUTRAL.is_on_curve()));
        assert!(bool::from(ExtendedPoint::ORDER_TWO.is_on_curve()));
        assert!(bool::from(ExtendedPoint::INFINITY_E1.is_on_curve()));
        assert!(bool::from(ExtendedPoint::INFINITY_E2.is_on_curve()));

        assert!(bool::from(ExtendedPoint::INFINITY_E1.is_at_infinity()));
        assert!(bool::from(ExtendedPoint::INFINITY_E2.is_at_infinity()));
        assert!(!bool::from(ExtendedPoint::NEUTRAL.is_at_infinity()));

        assert!(bool::from(ExtendedPoint::nap_for_tests().is_nap()));
        assert!(!bool::from(ExtendedPoint::nap_for_tests().is_at_infinity()));

        assert!(ExtendedPoint::NEUTRAL.is_in_subgroup());
        assert!(!ExtendedPoint::ORDER_TWO.is_in_subgroup());
        assert!(!ExtendedPoint::INFINITY_E1.is_in_subgroup());
    }

    #[test]
    fn equality_distinguishes_the_points_at_infinity() {
        assert_eq!(ExtendedPoint::INFINITY_E1, ExtendedPoint::INFINITY_E1);
        assert_ne!(ExtendedPoint::INFINITY_E1, ExtendedPoint::INFINITY_E2);
        assert_ne!(ExtendedPoint::NEUTRAL, ExtendedPoint::INFINITY_E1);
        assert_ne!(ExtendedPoint::NEUTRAL, ExtendedPoint::ORDER_TWO);
    }

    #[test]
    fn doubling_special_points() {
        assert_eq!(ExtendedPoint::NEUTRAL.double(), ExtendedPoint::NEUTRAL);
        assert_eq!(ExtendedPoint::ORDER_TWO.double(), ExtendedPoint::NEUTRAL);
        // The points at infinity have order 2 as well.
        assert_eq!(ExtendedPoint::INFINITY_E1.double(), ExtendedPoint::NEUTRAL);
        assert_eq!(ExtendedPoint::INFINITY_E2.double(), ExtendedPoint::NEUTRAL);
    }

    #[test]
    fn doubling_lands_in_the_subgroup() {
        // The prime-order subgroup is exactly the image of doubling.
        for seed in 0..8 {
            let point = ExtendedPoint::sample_on_curve(seed);
            let doubled = point.double();
            assert!(bool::from(doubled.is_on_curve()));
            assert!(doubled.is_in_subgroup());
            // Its +A translate is the other representative of the class
            // and lies outside.
            assert!(!doubled.torque().is_in_subgroup());
            // Negation stays inside.
            assert!(doubled.neg().is_in_subgroup());
        }
    }

    #[test]
    fn torque_is_an_involution() {
        let point = ExtendedPoint::sample_on_curve(3);
        assert!(bool::from(point.torque().is_on_curve()));
        assert_ne!(point, point.torque());
        assert_eq!(point, point.torque().torque());
    }

    #[test]
    fn xy_affine_round_trip() {
        let point = ExtendedPoint::sample_on_curve(4);
        let (x, y) = point.xy_affine();
        let rebuilt = ExtendedPoint::from_xy_affine(&x, &y, TrustLevel::Untrusted).unwrap();
        assert_eq!(point, rebuilt);
    }

    #[test]
    fn from_xy_affine_rejects_bad_input() {
        assert_eq!(
            ExtendedPoint::from_xy_affine(
                &FieldElement::ZERO,
                &FieldElement::ZERO,
                TrustLevel::Untrusted
            ),
            Err(CurveError::XYAllZero)
        );
        assert_eq!(
            ExtendedPoint::from_xy_affine(
                &FieldElement::ONE,
                &FieldElement::ONE,
                TrustLevel::Untrusted
            ),
            Err(CurveError::NotOnCurve)
        );
    }

    #[test]
    fn from_x_and_sign_y_honors_the_sign() {
        let point = ExtendedPoint::sample_on_curve(5);
        let (x, y) = point.xy_affine();
        let rebuilt =
            ExtendedPoint::from_x_and_sign_y(&x, y.sign(), TrustLevel::Untrusted).unwrap();
        assert_eq!(point, rebuilt);
        let flipped =
            ExtendedPoint::from_x_and_sign_y(&x, -y.sign(), TrustLevel::Untrusted).unwrap();
        assert_eq!(point.neg().torque(), flipped); // (x, -y)
        assert_eq!(
            ExtendedPoint::from_x_and_sign_y(&x, 0, TrustLevel::Untrusted),
            Err(CurveError::InvalidSign(0))
        );
        assert_eq!(
            ExtendedPoint::from_x_and_sign_y(&x, 2, TrustLevel::Untrusted),
            Err(CurveError::InvalidSign(2))
        );
    }

    #[test]
    fn from_y_and_sign_x_special_cases() {
        // Zero sign works exactly for y = ±1.
        assert_eq!(
            ExtendedPoint::from_y_and_sign_x(&FieldElement::ONE, 0, TrustLevel::Untrusted),
            Ok(ExtendedPoint::NEUTRAL)
        );
        assert_eq!(
            ExtendedPoint::from_y_and_sign_x(&FieldElement::MINUS_ONE, 0, TrustLevel::Untrusted),
            Ok(ExtendedPoint::ORDER_TWO)
        );
        let point = ExtendedPoint::sample_on_curve(6);
        let (x, y) = point.xy_affine();
        assert_eq!(
            ExtendedPoint::from_y_and_sign_x(&y, 0, TrustLevel::Untrusted),
            Err(CurveError::InvalidZeroSignX)
        );
        let rebuilt =
            ExtendedPoint::from_y_and_sign_x(&y, x.sign(), TrustLevel::Untrusted).unwrap();
        assert_eq!(point, rebuilt);
    }

    #[test]
    #[should_panic(expected = "trusted input failed validation")]
    fn trusted_recovery_failure_panics() {
        // Find an x that is not on the curve and feed it as trusted.
        let mut x = FieldElement::from_u64(2);
        while recover_y_from_x(&x, false).is_ok() {
            x += FieldElement::ONE;
        }
        let _ = ExtendedPoint::from_x_and_sign_y(&x, 1, TrustLevel::Trusted);
    }
}
