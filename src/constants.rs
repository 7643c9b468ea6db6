//! Bandersnatch curve parameters.
//!
//! The curve is `a·x² + y² = 1 + d·x²·y²` over the base field, with
//! `a = -5` and `d = -15 - 10·sqrt(2)`. Both `a` and `d` are non-squares,
//! which is what makes coordinate recovery unambiguous: the denominators
//! `1 - d·x²` and `d·y² - a` vanish only at the points at infinity.

use crate::field::{FieldElement, ResidueType};
use crypto_bigint::U256;

/// The twisted Edwards coefficient `a = -5`.
pub const EDWARDS_A: FieldElement = FieldElement(ResidueType::new(&U256::from_be_hex(
    "73eda753299d7d483339d80809a1d80553bda402fffe5bfefffffffefffffffc",
)));

/// The twisted Edwards coefficient `d`.
pub const EDWARDS_D: FieldElement = FieldElement(ResidueType::new(&U256::from_be_hex(
    "6389c12633c267cbc66e3bf86be3b6d8cb66677177e54f92b369f2f5188d58e7",
)));

/// A square root of `d/a`; the x-coordinate of one of the two points at
/// infinity.
pub const SQRT_D_OVER_A: FieldElement = FieldElement(ResidueType::new(&U256::from_be_hex(
    "52c9f28b828426a561f00d3a63511a882ea712770d9af4d6ee0f014d172510b6",
)));

/// `-sqrt(d/a)`; the x-coordinate of the other point at infinity. Of the
/// two roots, this is the one with `(x + 1)² = 2`, an identity of the
/// curve construction.
pub const NEG_SQRT_D_OVER_A: FieldElement = FieldElement(ResidueType::new(&U256::from_be_hex(
    "2123b4c7a71956a2d149cacda650bd7d2516918bf263672811f0feb1e8daef4b",
)));

/// `1/2`.
pub const ONE_HALF: FieldElement = FieldElement(ResidueType::new(&U256::from_be_hex(
    "39f6d3a994cebea4199cec0404d0ec02a9ded2017fff2dff7fffffff80000001",
)));

/// The order of the prime subgroup, a 253-bit prime.
pub const SUBGROUP_ORDER: U256 =
    U256::from_be_hex("1cfb69d4ca675f520cce760202687600ff8f87007419047174fd06b52876e7e1");

/// The cofactor of the prime subgroup. The quotient group has the shape
/// `Z/2 x Z/2`: the affine 2-torsion point and the two points at infinity.
pub const COFACTOR: u64 = 4;
