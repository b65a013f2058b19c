//! Field arithmetic modulo p = 0xfffffffeffffffffffffffffffffffffffffffff00000000ffffffffffffffff
//!
//! Elements are kept in Montgomery form using `crypto-bigint`'s constant
//! modulus residues.

use super::MODULUS_HEX;
use crate::{FieldBytes, Sm2, U256};
use core::fmt::{self, Debug};
use elliptic_curve::bigint::{impl_modulus, modular::constant_mod::Residue, ArrayEncoding};

impl_modulus!(FieldModulus, U256, MODULUS_HEX);

type FieldResidue = Residue<FieldModulus, { U256::LIMBS }>;

/// Element in the SM2 finite field modulo `p`.
#[derive(Clone, Copy)]
pub struct FieldElement(FieldResidue);

impl FieldElement {
    /// Zero element.
    pub const ZERO: Self = Self(FieldResidue::ZERO);

    /// Multiplicative identity.
    pub const ONE: Self = Self(FieldResidue::ONE);

    /// Create a field element from a canonical integer.
    ///
    /// Returns `None` if `uint` is not below the field modulus.
    pub fn from_uint(uint: &U256) -> Option<Self> {
        if uint < &Sm2::MODULUS {
            Some(Self(FieldResidue::new(uint)))
        } else {
            None
        }
    }

    /// Create a field element from an integer already known to be below `p`.
    pub(crate) const fn from_uint_unchecked(uint: &U256) -> Self {
        Self(FieldResidue::new(uint))
    }

    /// Decode a field element from its 32-byte big endian encoding.
    ///
    /// Returns `None` if the encoded value is not below the field modulus.
    pub fn from_bytes(bytes: &FieldBytes) -> Option<Self> {
        Self::from_uint(&U256::from_be_byte_array(*bytes))
    }

    /// Canonical integer value of this element.
    pub fn to_uint(&self) -> U256 {
        self.0.retrieve()
    }

    /// Big endian encoding, left-padded with zeros to 32 bytes.
    pub fn to_bytes(&self) -> FieldBytes {
        self.to_uint().to_be_byte_array()
    }

    /// Small constant `n mod p`.
    pub fn from_u64(n: u64) -> Self {
        Self(FieldResidue::new(&U256::from_u64(n)))
    }

    /// Is this element zero?
    pub fn is_zero(&self) -> bool {
        self.to_uint() == U256::ZERO
    }

    /// `self + rhs mod p`
    pub fn add(&self, rhs: &Self) -> Self {
        Self(self.0 + rhs.0)
    }

    /// `self - rhs mod p`
    pub fn sub(&self, rhs: &Self) -> Self {
        Self(self.0 - rhs.0)
    }

    /// `self * rhs mod p`
    pub fn multiply(&self, rhs: &Self) -> Self {
        Self(self.0 * rhs.0)
    }

    /// `self² mod p`
    pub fn square(&self) -> Self {
        Self(self.0.square())
    }

    /// `2 * self mod p`
    pub fn double(&self) -> Self {
        self.add(self)
    }

    /// Compute `1 / self mod p`.
    ///
    /// Returns `None` for zero, which has no inverse.
    pub fn invert(&self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }

        // `p` is prime, so every non-zero residue is invertible.
        let (inverse, _) = self.0.invert();
        Some(Self(inverse))
    }
}

impl Default for FieldElement {
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.to_uint() == other.to_uint()
    }
}

impl Eq for FieldElement {}

impl Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement(0x{:X})", self.to_uint())
    }
}
