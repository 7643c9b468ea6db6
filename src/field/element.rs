use core::fmt::{self, Debug, Display, Formatter, LowerHex};
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crypto_bigint::{Encoding, U256};
use rand_core::RngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

#[cfg(feature = "zeroize")]
use zeroize::DefaultIsZeroes;

use super::{ResidueType, MODULUS};

/// `p - 2`, the inversion exponent.
const INVERSION_EXP: U256 =
    U256::from_be_hex("73eda753299d7d483339d80809a1d80553bda402fffe5bfefffffffeffffffff");

/// `(p - 1) / 2`. Euler-criterion exponent; doubles as the threshold between
/// positive-sign and negative-sign representatives.
pub(crate) const P_MINUS_ONE_OVER_TWO: U256 =
    U256::from_be_hex("39f6d3a994cebea4199cec0404d0ec02a9ded2017fff2dff7fffffff80000000");

/// `t = (p - 1) / 2^32`, odd.
const TONELLI_SHANKS_T: U256 =
    U256::from_be_hex("0000000073eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff");

/// `(t - 1) / 2`.
const TONELLI_SHANKS_EXP: U256 =
    U256::from_be_hex("0000000039f6d3a994cebea4199cec0404d0ec02a9ded2017fff2dff7fffffff");

/// 2-adicity of `p - 1`.
const TWO_ADICITY: u32 = 32;

/// An element of the Bandersnatch base field.
#[derive(Clone, Copy, Default)]
pub struct FieldElement(pub(crate) ResidueType);

impl Display for FieldElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0.retrieve())
    }
}

impl Debug for FieldElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({:x})", self.0.retrieve())
    }
}

impl LowerHex for FieldElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0.retrieve())
    }
}

impl ConstantTimeEq for FieldElement {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self(ResidueType::conditional_select(&a.0, &b.0, choice))
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &FieldElement) -> bool {
        self.ct_eq(other).into()
    }
}
impl Eq for FieldElement {}

#[cfg(feature = "zeroize")]
impl DefaultIsZeroes for FieldElement {}

impl Add<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn add(self, other: &FieldElement) -> FieldElement {
        FieldElement(self.0.add(&other.0))
    }
}

define_add_variants!(
    LHS = FieldElement,
    RHS = FieldElement,
    Output = FieldElement
);

impl AddAssign for FieldElement {
    fn add_assign(&mut self, other: FieldElement) {
        *self = *self + other;
    }
}

impl AddAssign<&FieldElement> for FieldElement {
    fn add_assign(&mut self, other: &FieldElement) {
        *self = *self + *other;
    }
}

impl Sub<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn sub(self, other: &FieldElement) -> FieldElement {
        FieldElement(self.0.sub(&other.0))
    }
}

define_sub_variants!(
    LHS = FieldElement,
    RHS = FieldElement,
    Output = FieldElement
);

impl SubAssign for FieldElement {
    fn sub_assign(&mut self, other: FieldElement) {
        *self = *self - other;
    }
}

impl SubAssign<&FieldElement> for FieldElement {
    fn sub_assign(&mut self, other: &FieldElement) {
        *self = *self - *other;
    }
}

impl Mul<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn mul(self, other: &FieldElement) -> FieldElement {
        FieldElement(self.0.mul(&other.0))
    }
}

define_mul_variants!(
    LHS = FieldElement,
    RHS = FieldElement,
    Output = FieldElement
);

impl MulAssign<&FieldElement> for FieldElement {
    fn mul_assign(&mut self, other: &FieldElement) {
        *self = *self * *other;
    }
}

impl MulAssign for FieldElement {
    fn mul_assign(&mut self, other: FieldElement) {
        *self = *self * other;
    }
}

impl Neg for &FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        -*self
    }
}

impl Neg for FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        Self(self.0.neg())
    }
}

impl FieldElement {
    /// The additive identity.
    pub const ZERO: Self = Self(ResidueType::new(&U256::ZERO));
    /// The multiplicative identity.
    pub const ONE: Self = Self(ResidueType::new(&U256::ONE));
    /// Two.
    pub const TWO: Self = Self(ResidueType::new(&U256::from_u64(2)));
    /// `p - 1`.
    pub const MINUS_ONE: Self = Self(ResidueType::new(&U256::from_be_hex(
        "73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000000",
    )));

    /// Converts a small integer into a field element.
    pub const fn from_u64(value: u64) -> Self {
        Self(ResidueType::new(&U256::from_u64(value)))
    }

    /// Whether this element is zero.
    pub fn is_zero(&self) -> Choice {
        self.ct_eq(&Self::ZERO)
    }

    pub(crate) fn pow(&self, exponent: &U256) -> Self {
        Self(self.0.pow(exponent))
    }

    /// Squares this element.
    pub fn square(&self) -> Self {
        Self(self.0.square())
    }

    /// Doubles this element.
    pub fn double(&self) -> Self {
        Self(self.0.add(&self.0))
    }

    /// The multiplicative inverse. Zero maps to zero.
    pub fn invert(&self) -> Self {
        self.pow(&INVERSION_EXP)
    }

    /// The Jacobi symbol of this element: +1 for non-zero squares, -1 for
    /// non-squares, 0 for zero.
    pub fn jacobi(&self) -> i32 {
        let symbol = self.pow(&P_MINUS_ONE_OVER_TWO);
        if bool::from(symbol.is_zero()) {
            0
        } else if symbol == Self::ONE {
            1
        } else {
            -1
        }
    }

    /// The sign of this element: 0 for zero, +1 for canonical representatives
    /// in `[1, (p-1)/2]`, -1 for those in `[(p+1)/2, p-1]`.
    pub fn sign(&self) -> i32 {
        let value = self.0.retrieve();
        if value == U256::ZERO {
            0
        } else if value <= P_MINUS_ONE_OVER_TWO {
            1
        } else {
            -1
        }
    }

    /// Whether `self` equals `other` or `-other`.
    pub fn eq_up_to_sign(&self, other: &Self) -> bool {
        self == other || *self == -*other
    }

    /// A square root of this element, if one exists. Which of the two roots
    /// is returned is unspecified.
    ///
    /// Tonelli-Shanks, from <https://eprint.iacr.org/2012/685.pdf> (page 12,
    /// algorithm 5); `p ≡ 1 (mod 2^32)` rules out the single-exponentiation
    /// variants.
    pub fn sqrt(&self) -> CtOption<Self> {
        let w = self.pow(&TONELLI_SHANKS_EXP);

        let mut v = TWO_ADICITY;
        let mut x = *self * w;
        let mut b = x * w;
        // 7 generates the multiplicative group, so 7^t generates the 2-Sylow
        // subgroup.
        let mut z = Self::from_u64(7).pow(&TONELLI_SHANKS_T);

        for max_v in (1..=TWO_ADICITY).rev() {
            let mut k = 1;
            let mut tmp = b.square();
            let mut j_less_than_v = Choice::from(1);

            for j in 2..max_v {
                let tmp_is_one = tmp.ct_eq(&Self::ONE);
                let squared = Self::conditional_select(&tmp, &z, tmp_is_one).square();
                tmp = Self::conditional_select(&squared, &tmp, tmp_is_one);
                let new_z = Self::conditional_select(&z, &squared, tmp_is_one);
                j_less_than_v &= !j.ct_eq(&v);
                k = u32::conditional_select(&j, &k, tmp_is_one);
                z = Self::conditional_select(&z, &new_z, j_less_than_v);
            }

            let result = x * z;
            x = Self::conditional_select(&result, &x, b.ct_eq(&Self::ONE));
            z = z.square();
            b *= z;
            v = k;
        }

        CtOption::new(x, (x * x).ct_eq(self))
    }

    /// The canonical 32-byte little-endian encoding.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.retrieve().to_le_bytes()
    }

    /// Parses a canonical 32-byte little-endian encoding. Rejects values
    /// `>= p`.
    pub fn from_bytes(bytes: &[u8; 32]) -> CtOption<Self> {
        let integer = U256::from_le_slice(bytes);
        let is_canonical = Choice::from((integer < MODULUS) as u8);
        CtOption::new(Self(ResidueType::new(&integer)), is_canonical)
    }

    /// The canonical integer representative.
    pub(crate) fn to_uint(&self) -> U256 {
        self.0.retrieve()
    }

    /// Builds a field element from a canonical integer representative, or
    /// `None` for values `>= p`.
    pub(crate) fn from_uint(integer: &U256) -> Option<Self> {
        if integer < &MODULUS {
            Some(Self(ResidueType::new(integer)))
        } else {
            None
        }
    }

    /// Returns a uniformly random field element by rejection sampling.
    pub fn random(mut rng: impl RngCore) -> Self {
        let mut bytes = [0u8; 32];
        loop {
            rng.fill_bytes(&mut bytes);
            bytes[31] &= 0x7f;
            if let Some(fe) = Option::<Self>::from(Self::from_bytes(&bytes)) {
                return fe;
            }
        }
    }
}
