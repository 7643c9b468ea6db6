//! The Bandersnatch base field.
//!
//! This is the 255-bit prime field with modulus
//! `p = 0x73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001`
//! (the scalar field of BLS12-381). `p ≡ 1 (mod 2^32)`, so square roots
//! use the generic Tonelli-Shanks algorithm.

mod element;

pub use element::FieldElement;

use crypto_bigint::{
    impl_modulus,
    modular::constant_mod::{Residue, ResidueParams},
    U256,
};

impl_modulus!(
    FieldModulus,
    U256,
    "73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001"
);

pub(crate) type ResidueType = Residue<FieldModulus, { FieldModulus::LIMBS }>;

/// The field modulus as a plain integer.
pub(crate) const MODULUS: U256 = FieldModulus::MODULUS;
