//! Secret and public keys, and their fixed-width hex and SEC1 encodings.

use crate::{
    arithmetic::point::POINT_LEN, EncodedPoint, Error, FieldBytes, FieldPoint, Result, Scalar,
};
use alloc::{boxed::Box, string::String, vec::Vec};
use core::fmt::{self, Debug};
use elliptic_curve::{rand_core::CryptoRngCore, zeroize::Zeroize};

/// Length of a hex-encoded private scalar.
const SECRET_HEX_LEN: usize = 64;

/// Length of a hex-encoded untagged public point.
const PUBLIC_HEX_LEN: usize = POINT_LEN * 2;

/// Hex form of the SEC1 uncompressed point tag.
const UNCOMPRESSED_TAG_HEX: &str = "04";

/// SM2 secret key: wrapper around a private [`Scalar`].
///
/// Zeroizes the scalar on drop and never prints it.
#[derive(Clone)]
pub struct SecretKey {
    scalar: Scalar,
}

impl SecretKey {
    /// Generate a random secret key.
    pub fn random(rng: &mut impl CryptoRngCore) -> Self {
        Self {
            scalar: Scalar::random(rng),
        }
    }

    /// Create a secret key from a scalar.
    pub fn from_scalar(scalar: Scalar) -> Self {
        Self { scalar }
    }

    /// Deserialize from a 32-byte big endian scalar.
    pub fn from_bytes(bytes: &FieldBytes) -> Result<Self> {
        Scalar::from_bytes(bytes).map(Self::from_scalar)
    }

    /// Deserialize from a big endian byte slice.
    ///
    /// Leading zero bytes beyond the 32-byte width are ignored, so keys
    /// exported with a sign byte are accepted.
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        let start = slice
            .iter()
            .position(|&b| b != 0)
            .unwrap_or(slice.len())
            .min(slice.len().saturating_sub(32));
        Scalar::from_slice(&slice[start..]).map(Self::from_scalar)
    }

    /// Parse a hex-encoded private key of at least 64 characters.
    pub fn from_hex(hex: &str) -> Result<Self> {
        if hex.len() < SECRET_HEX_LEN {
            return Err(Error::TooShort);
        }

        let mut bytes = hex::decode(hex)?;
        let key = Self::from_slice(&bytes);
        bytes.zeroize();
        key
    }

    /// Borrow the secret [`Scalar`].
    ///
    /// # ⚠️ Warning
    ///
    /// This value is key material.
    ///
    /// Please treat it with the care it deserves!
    pub fn as_scalar(&self) -> &Scalar {
        &self.scalar
    }

    /// Serialize as 32 big endian bytes.
    pub fn to_bytes(&self) -> FieldBytes {
        self.scalar.to_bytes()
    }

    /// Serialize as 64 lowercase hex characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Compute the public key `Q = [d]G`.
    pub fn public_key(&self) -> Result<PublicKey> {
        PublicKey::from_secret_key(self)
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.scalar.zeroize();
    }
}

impl Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey").finish_non_exhaustive()
    }
}

impl Eq for SecretKey {}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        use elliptic_curve::subtle::ConstantTimeEq;
        self.to_bytes().ct_eq(&other.to_bytes()).into()
    }
}

/// SM2 public key: a finite point on the curve.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PublicKey {
    point: FieldPoint,
}

impl PublicKey {
    /// Wrap a point, rejecting the point at infinity and points off the curve.
    pub fn from_affine(point: FieldPoint) -> Result<Self> {
        if point.is_identity() {
            return Err(Error::PointAtInfinity);
        }
        if !point.is_on_curve() {
            return Err(Error::InvalidPoint);
        }

        Ok(Self { point })
    }

    /// Derive the public key of a secret key.
    pub fn from_secret_key(secret_key: &SecretKey) -> Result<Self> {
        Self::from_affine(FieldPoint::mul_by_generator(secret_key.as_scalar())?)
    }

    /// Parse a SEC1 uncompressed point (`0x04 ‖ X ‖ Y`).
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self> {
        let encoded = EncodedPoint::from_bytes(bytes).map_err(|_| Error::InvalidPoint)?;
        Self::from_affine(FieldPoint::from_encoded_point(&encoded)?)
    }

    /// Parse a hex-encoded public key: 128 characters of `X ‖ Y`, optionally
    /// preceded by the `04` uncompressed tag.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let body = match hex.len() {
            PUBLIC_HEX_LEN => hex,
            len if len == PUBLIC_HEX_LEN + UNCOMPRESSED_TAG_HEX.len() => hex
                .strip_prefix(UNCOMPRESSED_TAG_HEX)
                .ok_or(Error::InvalidPoint)?,
            _ => return Err(Error::InvalidLength),
        };

        let mut bytes = [0u8; POINT_LEN];
        hex::decode_to_slice(body, &mut bytes)?;
        Self::from_affine(FieldPoint::from_untagged_bytes(&bytes)?)
    }

    /// Borrow the underlying point.
    pub fn as_affine(&self) -> &FieldPoint {
        &self.point
    }

    /// Serialize as a SEC1 uncompressed point.
    pub fn to_sec1_bytes(&self) -> Result<Box<[u8]>> {
        Ok(self.point.to_encoded_point()?.as_bytes().into())
    }

    /// Serialize as `X ‖ Y` without a tag.
    pub fn to_untagged_bytes(&self) -> Result<[u8; POINT_LEN]> {
        self.point.to_untagged_bytes()
    }

    /// Serialize as 130 lowercase hex characters, `04 ‖ X ‖ Y`.
    pub fn to_hex(&self) -> Result<String> {
        let mut out = String::with_capacity(PUBLIC_HEX_LEN + UNCOMPRESSED_TAG_HEX.len());
        out.push_str(UNCOMPRESSED_TAG_HEX);
        out.push_str(&self.to_untagged_hex()?);
        Ok(out)
    }

    /// Serialize as 128 lowercase hex characters, `X ‖ Y`.
    pub fn to_untagged_hex(&self) -> Result<String> {
        Ok(hex::encode(self.to_untagged_bytes()?))
    }
}

impl AsRef<FieldPoint> for PublicKey {
    fn as_ref(&self) -> &FieldPoint {
        &self.point
    }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_sec1_bytes(bytes)
    }
}

/// A secret key together with its public key.
///
/// The public half is always derived from the secret half.
#[derive(Clone)]
pub struct KeyPair {
    secret_key: SecretKey,
    public_key: PublicKey,
}

impl KeyPair {
    /// Generate a fresh key pair.
    pub fn generate(rng: &mut impl CryptoRngCore) -> Result<Self> {
        Self::from_secret_key(SecretKey::random(rng))
    }

    /// Complete a key pair from its secret key.
    pub fn from_secret_key(secret_key: SecretKey) -> Result<Self> {
        let public_key = secret_key.public_key()?;
        Ok(Self {
            secret_key,
            public_key,
        })
    }

    /// Parse the hex-encoded private key and derive its public key.
    pub fn from_hex(private_key_hex: &str) -> Result<Self> {
        Self::from_secret_key(SecretKey::from_hex(private_key_hex)?)
    }

    /// Borrow the secret key.
    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    /// Borrow the public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Hex export of both halves: `(private, 04 ‖ X ‖ Y)`.
    pub fn to_hex(&self) -> Result<(String, String)> {
        Ok((self.secret_key.to_hex(), self.public_key.to_hex()?))
    }
}

impl Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

/// Decode a hex string into owned bytes.
pub(crate) fn decode_hex(hex: &str) -> Result<Vec<u8>> {
    Ok(hex::decode(hex)?)
}

#[cfg(test)]
mod tests {
    use super::{PublicKey, SecretKey};
    use crate::Error;

    #[test]
    fn secret_key_length_checks() {
        assert_eq!(SecretKey::from_hex("01").unwrap_err(), Error::TooShort);
        assert_eq!(
            SecretKey::from_hex(&"0".repeat(64)).unwrap_err(),
            Error::InvalidScalar
        );
        assert_eq!(
            SecretKey::from_hex(&"1".repeat(66)).unwrap_err(),
            Error::InvalidLength
        );
        assert_eq!(
            SecretKey::from_hex(&"z".repeat(64)).unwrap_err(),
            Error::InvalidHex
        );
    }

    #[test]
    fn secret_key_sign_byte_is_ignored() {
        let key = "59276e27d506861a16680f3ad9c02dccef3cc1fa3cdbe4ce6d54b80deac1bc21";
        let padded = ["00", key].concat();
        assert_eq!(
            SecretKey::from_hex(&padded).unwrap(),
            SecretKey::from_hex(key).unwrap()
        );
    }

    #[test]
    fn public_key_length_checks() {
        assert_eq!(
            PublicKey::from_hex(&"0".repeat(127)).unwrap_err(),
            Error::InvalidLength
        );
        assert_eq!(
            PublicKey::from_hex(&["05", &"0".repeat(128)].concat()).unwrap_err(),
            Error::InvalidPoint
        );
        assert_eq!(
            PublicKey::from_hex(&"0".repeat(128)).unwrap_err(),
            Error::InvalidPoint
        );
    }
}
