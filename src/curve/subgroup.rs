use subtle::{Choice, ConstantTimeEq};

#[cfg(feature = "zeroize")]
use zeroize::DefaultIsZeroes;

use crate::constants::EDWARDS_D;
use crate::curve::{
    is_in_subgroup_affine, recover_y_from_x, reject, ExtendedPoint, PointDecode, PointRead,
    TrustLevel,
};
use crate::errors::CurveError;
use crate::field::FieldElement;

/// An element of the prime-order subgroup in affine extended coordinates
/// `(x, y, t)` with `t = x·y`.
///
/// The element is stored modulo the affine 2-torsion point `A = (0, -1)`:
/// the coordinate pairs `(x, y)` and `(-x, -y)` denote the same element,
/// and the stored representative carries no meaning beyond its class. The
/// `*_decaf_*` accessors expose the stored, sign-ambiguous representative;
/// [`xy_affine`](PointRead::xy_affine) resolves to the representative that
/// lies in the subgroup exactly.
///
/// A zero-initialized value is the not-a-point sentinel, not a valid
/// element.
#[derive(Clone, Copy, Debug)]
pub struct SubgroupPoint {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) t: FieldElement,
}

impl Default for SubgroupPoint {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

#[cfg(feature = "zeroize")]
impl DefaultIsZeroes for SubgroupPoint {}

impl ConstantTimeEq for SubgroupPoint {
    fn ct_eq(&self, other: &Self) -> Choice {
        // x/y is injective on subgroup elements modulo A, so comparing the
        // cross products compares classes. y is never zero on the curve.
        (self.x * other.y).ct_eq(&(other.x * self.y))
    }
}

impl PartialEq for SubgroupPoint {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}
impl Eq for SubgroupPoint {}

impl SubgroupPoint {
    /// The neutral element. Its class also contains the representative
    /// `(0, -1)`.
    pub const NEUTRAL: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
        t: FieldElement::ZERO,
    };

    /// Whether this is the not-a-point sentinel.
    pub fn is_nap(&self) -> Choice {
        self.x.is_zero() & self.y.is_zero()
    }

    /// Whether this is the neutral element.
    pub fn is_neutral(&self) -> Choice {
        // x = 0 holds exactly for the class {(0, 1), (0, -1)}.
        self.x.is_zero() & !self.is_nap()
    }

    /// Builds an element from `x·sign(y)`.
    ///
    /// The recovered point is only defined up to the sign of `x`, which is
    /// exactly the `+A` ambiguity this representation absorbs. For
    /// untrusted input the subgroup Legendre check runs alongside the
    /// recovery, so a single square-root attempt suffices.
    ///
    /// Errors: [`CurveError::XNotOnCurve`], [`CurveError::XNotInSubgroup`].
    pub fn from_x_times_sign_y(
        x_sign_y: &FieldElement,
        trust: TrustLevel,
    ) -> Result<Self, CurveError> {
        // Recovery only depends on x², so the embedded sign does not
        // disturb it.
        let mut y = recover_y_from_x(x_sign_y, !trust.is_trusted())
            .map_err(|e| reject(trust, e))?;
        // The four sign choices (±x, ±y) form {P, -P, P+A, -P+A}; working
        // modulo A, forcing y positive pins the class down.
        if y.sign() < 0 {
            y = -y;
        }
        Ok(Self {
            x: *x_sign_y,
            y,
            t: x_sign_y * y,
        })
    }

    /// Builds an element from the pair `(x·sign(y), y·sign(y))`.
    ///
    /// For untrusted input, `y·sign(y)` must have positive sign
    /// ([`CurveError::WrongSignY`]); the curve equation and the subgroup
    /// Legendre condition are then verified, reporting
    /// [`CurveError::NotOnCurve`] in preference to
    /// [`CurveError::NotInSubgroup`] when both fail.
    pub fn from_xy_times_sign_y(
        x_sign_y: &FieldElement,
        y_sign_y: &FieldElement,
        trust: TrustLevel,
    ) -> Result<Self, CurveError> {
        if !trust.is_trusted() && y_sign_y.sign() <= 0 {
            return Err(CurveError::WrongSignY);
        }

        // If sign(y) was +1 this is the point itself; if it was -1, the +A
        // translate, which denotes the same element.
        let point = Self {
            x: *x_sign_y,
            y: *y_sign_y,
            t: x_sign_y * y_sign_y,
        };

        if !trust.is_trusted() {
            // 1 - a·x² - y² + d·t² vanishes iff the point is on the curve;
            // the subexpression 1 - a·x² doubles as the subgroup check.
            let xx = x_sign_y.square();
            let mut acc = xx.double().double() + xx + FieldElement::ONE; // 1 - a·x²

            let mut error = None;
            if acc.jacobi() < 0 {
                error = Some(CurveError::NotInSubgroup);
            }
            acc -= y_sign_y.square();
            acc += EDWARDS_D * point.t.square();
            if !bool::from(acc.is_zero()) {
                // Overrides the subgroup verdict: "not on curve" is the
                // more informative failure.
                error = Some(CurveError::NotOnCurve);
            }
            if let Some(error) = error {
                return Err(error);
            }
        }
        Ok(point)
    }

    /// Builds an element from the pair `(y·sign(y), x·sign(y))`, the
    /// argument order of the 64-byte wire format, which leads with the
    /// `y` word so the long form is distinguishable from the short form at
    /// the first byte.
    pub fn from_yx_times_sign_y(
        y_sign_y: &FieldElement,
        x_sign_y: &FieldElement,
        trust: TrustLevel,
    ) -> Result<Self, CurveError> {
        Self::from_xy_times_sign_y(x_sign_y, y_sign_y, trust)
    }

    /// Flips the stored representative to the other member of the class.
    #[cfg(test)]
    pub(crate) fn flip_representative(&self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            t: self.t,
        }
    }
}

impl PointRead for SubgroupPoint {
    fn is_nap(&self) -> bool {
        SubgroupPoint::is_nap(self).into()
    }

    fn is_at_infinity(&self) -> bool {
        false
    }

    fn is_in_subgroup(&self) -> bool {
        true
    }

    fn can_only_represent_subgroup(&self) -> bool {
        true
    }

    fn xy_affine(&self) -> (FieldElement, FieldElement) {
        if bool::from(SubgroupPoint::is_nap(self)) {
            panic!("cannot take affine coordinates of a NaP");
        }
        // Resolve the class to the representative that is a subgroup
        // member exactly.
        if is_in_subgroup_affine(&self.x, &self.y) {
            (self.x, self.y)
        } else {
            (-self.x, -self.y)
        }
    }

    fn x_decaf_affine(&self) -> FieldElement {
        self.x
    }

    fn y_decaf_affine(&self) -> FieldElement {
        self.y
    }

    fn x_decaf_projective(&self) -> FieldElement {
        self.x
    }

    fn y_decaf_projective(&self) -> FieldElement {
        self.y
    }
}

impl PointDecode for SubgroupPoint {
    /// Builds an element from both affine coordinates, which must describe
    /// a subgroup member exactly; the `+A` translate of a member is
    /// rejected, keeping the full-coordinate encodings canonical.
    fn from_xy_affine(
        x: &FieldElement,
        y: &FieldElement,
        trust: TrustLevel,
    ) -> Result<Self, CurveError> {
        let full = ExtendedPoint::from_xy_affine(x, y, trust)?;
        if !trust.is_trusted() && !is_in_subgroup_affine(x, y) {
            return Err(CurveError::NotInSubgroup);
        }
        Ok(Self {
            x: full.x,
            y: full.y,
            t: full.t,
        })
    }

    /// Builds an element from the affine x coordinate and the sign of y;
    /// `(x, y)` with the requested sign must be a subgroup member exactly.
    fn from_x_and_sign_y(
        x: &FieldElement,
        sign_y: i32,
        trust: TrustLevel,
    ) -> Result<Self, CurveError> {
        if sign_y != 1 && sign_y != -1 {
            return Err(reject(trust, CurveError::InvalidSign(sign_y)));
        }
        if trust.is_trusted() {
            let full = ExtendedPoint::from_x_and_sign_y(x, sign_y, trust)?;
            return Ok(Self {
                x: full.x,
                y: full.y,
                t: full.t,
            });
        }
        let mut y = recover_y_from_x(x, true)?;
        if y.sign() != sign_y {
            y = -y;
        }
        if !is_in_subgroup_affine(x, &y) {
            // The x coordinate admits a subgroup point, but the requested
            // sign of y selects the +A translate.
            return Err(CurveError::NotInSubgroup);
        }
        Ok(Self {
            x: *x,
            y,
            t: x * y,
        })
    }

    /// Builds an element from the affine y coordinate and the sign of x;
    /// the selected point must be a subgroup member exactly. Note that
    /// `y = -1` selects the 2-torsion point `A`, which is not a member.
    fn from_y_and_sign_x(
        y: &FieldElement,
        sign_x: i32,
        trust: TrustLevel,
    ) -> Result<Self, CurveError> {
        let full = ExtendedPoint::from_y_and_sign_x(y, sign_x, trust)?;
        if !trust.is_trusted() && !full.is_in_subgroup() {
            return Err(CurveError::NotInSubgroup);
        }
        Ok(Self {
            x: full.x,
            y: full.y,
            t: full.t,
        })
    }

    fn from_subgroup_point(point: SubgroupPoint) -> Self {
        point
    }
}
