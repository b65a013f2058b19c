//! SM2 scalars: private keys and ephemeral nonces.

use crate::{Error, FieldBytes, Result, Sm2, U256};
use core::fmt::{self, Debug};
use elliptic_curve::{
    bigint::ArrayEncoding,
    rand_core::CryptoRngCore,
    zeroize::Zeroize,
    Curve as _,
};

/// Integer in `[1, n - 1]` where `n` is the order of the SM2 group.
///
/// A zero scalar would map every point to the point at infinity, so it is
/// unrepresentable; so is anything at or above `n`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Scalar(U256);

impl Scalar {
    /// Multiplicative identity.
    pub const ONE: Self = Self(U256::ONE);

    /// Create a scalar from an integer, checking it lies in `[1, n - 1]`.
    pub fn from_uint(uint: U256) -> Result<Self> {
        if uint == U256::ZERO || uint >= Sm2::ORDER {
            return Err(Error::InvalidScalar);
        }

        Ok(Self(uint))
    }

    /// Decode a scalar from its 32-byte big endian encoding.
    pub fn from_bytes(bytes: &FieldBytes) -> Result<Self> {
        Self::from_uint(U256::from_be_byte_array(*bytes))
    }

    /// Decode a scalar from a big endian byte slice of at most 32 bytes.
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        if slice.len() > 32 {
            return Err(Error::InvalidLength);
        }

        let mut bytes = [0u8; 32];
        bytes[32 - slice.len()..].copy_from_slice(slice);
        let scalar = Self::from_uint(U256::from_be_slice(&bytes));
        bytes.zeroize();
        scalar
    }

    /// Draw a uniformly random scalar by rejection sampling.
    pub fn random(rng: &mut impl CryptoRngCore) -> Self {
        let mut bytes = [0u8; 32];
        loop {
            rng.fill_bytes(&mut bytes);
            if let Ok(scalar) = Self::from_uint(U256::from_be_slice(&bytes)) {
                bytes.zeroize();
                return scalar;
            }
        }
    }

    /// Borrow the integer value of this scalar.
    pub fn as_uint(&self) -> &U256 {
        &self.0
    }

    /// Big endian encoding, left-padded with zeros to 32 bytes.
    pub fn to_bytes(&self) -> FieldBytes {
        self.0.to_be_byte_array()
    }
}

impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl TryFrom<U256> for Scalar {
    type Error = Error;

    fn try_from(uint: U256) -> Result<Self> {
        Self::from_uint(uint)
    }
}

impl From<Scalar> for FieldBytes {
    fn from(scalar: Scalar) -> Self {
        scalar.to_bytes()
    }
}

impl Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Scalar(...)")
    }
}
