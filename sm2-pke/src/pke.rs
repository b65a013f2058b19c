//! SM2 Encryption Algorithm (SM2) as defined in [draft-shen-sm2-ecdsa § 5].
//!
//! A ciphertext has three fields:
//!
//! - `C1`: the ephemeral public point `[k]G`,
//! - `C2`: the message XORed with the KDF mask,
//! - `C3`: `SM3(x₂ ‖ M ‖ y₂)`, authenticating the plaintext.
//!
//! [`Mode`] selects the order of `C2` and `C3` on the wire, [`Encoding`] how
//! `C1` is framed.
//!
//! ## Usage
#![cfg_attr(feature = "getrandom", doc = "```")]
#![cfg_attr(not(feature = "getrandom"), doc = "```ignore")]
//! # fn example() -> Result<(), sm2_pke::Error> {
//! use rand_core::OsRng; // requires 'getrandom' feature
//! use sm2_pke::{DecryptingKey, KeyPair, Mode};
//!
//! // Encrypting
//! let key_pair = KeyPair::generate(&mut OsRng)?;
//! let decrypting_key = DecryptingKey::new_with_mode(key_pair.secret_key().clone(), Mode::C1C3C2)?;
//! let encrypting_key = decrypting_key.encrypting_key();
//! let ciphertext = encrypting_key.encrypt(&mut OsRng, b"plaintext")?;
//!
//! // Decrypting
//! let plaintext = decrypting_key.decrypt(&ciphertext)?;
//! assert_eq!(plaintext, b"plaintext");
//! # Ok(())
//! # }
//! ```
//!
//! Browser libraries exchange hex strings with an untagged `C1`:
//!
#![cfg_attr(feature = "getrandom", doc = "```")]
#![cfg_attr(not(feature = "getrandom"), doc = "```ignore")]
//! # fn example() -> Result<(), sm2_pke::Error> {
//! use rand_core::OsRng;
//! use sm2_pke::{decrypt_hex, encrypt_hex, KeyPair, Mode};
//!
//! let (private_key, public_key) = KeyPair::generate(&mut OsRng)?.to_hex()?;
//! let ciphertext = encrypt_hex("123456", &public_key, Mode::C1C3C2)?;
//! assert_eq!(decrypt_hex(&ciphertext, &private_key, Mode::C1C3C2)?, "123456");
//! # Ok(())
//! # }
//! ```
//!
//! [draft-shen-sm2-ecdsa § 5]: https://datatracker.ietf.org/doc/html/draft-shen-sm2-ecdsa-02#section-5

mod decrypting;
mod encrypting;

pub use self::{decrypting::DecryptingKey, encrypting::EncryptingKey};

use crate::{
    arithmetic::point::POINT_LEN, hash::TAG_LEN, key::decode_hex, EncodedPoint, Error,
    FieldElement, FieldPoint, PublicKey, Result, SecretKey,
};
use alloc::{string::String, vec::Vec};
use elliptic_curve::rand_core::CryptoRngCore;

/// Ordering of the `C2` and `C3` fields.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Mode {
    /// `C1 ‖ C2 ‖ C3`, the original GM/T 0003-2012 layout (flag `0`).
    C1C2C3 = 0,

    /// `C1 ‖ C3 ‖ C2`, the GB/T 32918.4-2016 layout (flag `1`).
    #[default]
    C1C3C2 = 1,
}

impl TryFrom<u8> for Mode {
    type Error = Error;

    fn try_from(flag: u8) -> Result<Self> {
        match flag {
            0 => Ok(Mode::C1C2C3),
            1 => Ok(Mode::C1C3C2),
            _ => Err(Error::InvalidMode),
        }
    }
}

impl From<Mode> for u8 {
    fn from(mode: Mode) -> u8 {
        mode as u8
    }
}

/// Framing of `C1` in a serialized ciphertext.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Encoding {
    /// `X ‖ Y` with no tag byte, as produced by browser SM2 libraries.
    Bare,

    /// SEC1 uncompressed point, `0x04 ‖ X ‖ Y`.
    #[default]
    Sec1,

    /// A single `0x10` tag byte followed by `X ‖ Y ‖ C3 ‖ C2`.
    ///
    /// Emitted by some third-party encoders. The body is always in
    /// [`Mode::C1C3C2`] order, whatever mode is requested.
    Prefixed,
}

impl Encoding {
    /// Tag byte ahead of `C1`, if any.
    pub fn tag(self) -> Option<u8> {
        match self {
            Encoding::Bare => None,
            Encoding::Sec1 => Some(Cipher::SEC1_TAG),
            Encoding::Prefixed => Some(Cipher::PREFIXED_TAG),
        }
    }

    /// Layout actually used on the wire for a requested mode.
    fn layout(self, mode: Mode) -> Mode {
        match self {
            Encoding::Prefixed => Mode::C1C3C2,
            Encoding::Bare | Encoding::Sec1 => mode,
        }
    }
}

/// Decoded SM2 ciphertext.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Cipher {
    c1: (FieldElement, FieldElement),
    c2: Vec<u8>,
    c3: [u8; TAG_LEN],
}

impl Cipher {
    /// Length of `C1` without a tag byte.
    pub const POINT_LEN: usize = POINT_LEN;

    /// Length of `C3`.
    pub const TAG_LEN: usize = TAG_LEN;

    /// Tag byte of [`Encoding::Sec1`].
    pub const SEC1_TAG: u8 = 0x04;

    /// Tag byte of [`Encoding::Prefixed`].
    pub const PREFIXED_TAG: u8 = 0x10;

    /// Assemble a ciphertext from its fields.
    ///
    /// Fails if `c1` is the point at infinity.
    pub fn new(c1: FieldPoint, c2: Vec<u8>, c3: [u8; TAG_LEN]) -> Result<Self> {
        let c1 = c1.coordinates().ok_or(Error::PointAtInfinity)?;
        Ok(Self { c1, c2, c3 })
    }

    /// Decode a ciphertext in the given mode and encoding.
    ///
    /// `C1` must be a point on the curve. At least a full `C1` and `C3` must
    /// be present; an empty `C2` is allowed.
    pub fn decode(bytes: &[u8], mode: Mode, encoding: Encoding) -> Result<Self> {
        let tag_len = usize::from(encoding.tag().is_some());
        if bytes.len() < tag_len + POINT_LEN + TAG_LEN {
            return Err(Error::TooShort);
        }

        let (c1, body) = bytes.split_at(tag_len + POINT_LEN);
        let c1 = match encoding {
            Encoding::Bare => FieldPoint::from_untagged_bytes(c1)?,
            Encoding::Sec1 => {
                let encoded = EncodedPoint::from_bytes(c1).map_err(|_| Error::InvalidPoint)?;
                FieldPoint::from_encoded_point(&encoded)?
            }
            Encoding::Prefixed => match c1.split_first() {
                Some((&Self::PREFIXED_TAG, point)) => FieldPoint::from_untagged_bytes(point)?,
                _ => return Err(Error::InvalidPoint),
            },
        };

        let (c2, c3) = match encoding.layout(mode) {
            Mode::C1C2C3 => body.split_at(body.len() - TAG_LEN),
            Mode::C1C3C2 => {
                let (c3, c2) = body.split_at(TAG_LEN);
                (c2, c3)
            }
        };

        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(c3);
        Self::new(c1, c2.to_vec(), tag)
    }

    /// Encode in the given mode and encoding.
    pub fn encode(&self, mode: Mode, encoding: Encoding) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + POINT_LEN + TAG_LEN + self.c2.len());
        out.extend(encoding.tag());
        out.extend_from_slice(&self.c1.0.to_bytes());
        out.extend_from_slice(&self.c1.1.to_bytes());
        match encoding.layout(mode) {
            Mode::C1C2C3 => {
                out.extend_from_slice(&self.c2);
                out.extend_from_slice(&self.c3);
            }
            Mode::C1C3C2 => {
                out.extend_from_slice(&self.c3);
                out.extend_from_slice(&self.c2);
            }
        }
        out
    }

    /// Decode a tagged ciphertext, choosing the encoding from its first byte.
    ///
    /// `0x04` selects [`Encoding::Sec1`] in the given `mode`; `0x10` selects
    /// [`Encoding::Prefixed`].
    pub fn from_slice(bytes: &[u8], mode: Mode) -> Result<Self> {
        match bytes.first() {
            Some(&Self::SEC1_TAG) => Self::decode(bytes, mode, Encoding::Sec1),
            Some(&Self::PREFIXED_TAG) => Self::decode(bytes, mode, Encoding::Prefixed),
            Some(_) => Err(Error::InvalidPoint),
            None => Err(Error::TooShort),
        }
    }

    /// Encode with a SEC1 tagged `C1`.
    pub fn to_vec(&self, mode: Mode) -> Vec<u8> {
        self.encode(mode, Encoding::Sec1)
    }

    /// Decode a hex ciphertext with an untagged `C1`.
    pub fn from_hex(hex: &str, mode: Mode) -> Result<Self> {
        if hex.len() < POINT_LEN * 2 {
            return Err(Error::TooShort);
        }

        Self::decode(&decode_hex(hex)?, mode, Encoding::Bare)
    }

    /// Encode as lowercase hex with an untagged `C1`.
    pub fn to_hex(&self, mode: Mode) -> String {
        hex::encode(self.encode(mode, Encoding::Bare))
    }

    /// Get C1
    pub fn c1(&self) -> FieldPoint {
        FieldPoint::Finite {
            x: self.c1.0,
            y: self.c1.1,
        }
    }

    /// Get C2
    pub fn c2(&self) -> &[u8] {
        &self.c2
    }

    /// Get C3
    pub fn c3(&self) -> &[u8; TAG_LEN] {
        &self.c3
    }
}

/// Re-encode a ciphertext between modes and encodings without decrypting it.
pub fn convert(
    bytes: &[u8],
    from: (Mode, Encoding),
    to: (Mode, Encoding),
) -> Result<Vec<u8>> {
    Ok(Cipher::decode(bytes, from.0, from.1)?.encode(to.0, to.1))
}

/// Re-order a hex ciphertext (untagged `C1`) from one mode to another.
pub fn convert_hex(ciphertext_hex: &str, from: Mode, to: Mode) -> Result<String> {
    Ok(Cipher::from_hex(ciphertext_hex, from)?.to_hex(to))
}

/// Encrypt `plaintext` to a hex-encoded public key, drawing the ephemeral
/// scalar from `rng`.
///
/// The public key is 128 hex characters of `X ‖ Y`, optionally preceded by
/// `04`. The result is hex with an untagged `C1`.
pub fn encrypt_hex_with_rng(
    rng: &mut impl CryptoRngCore,
    plaintext: impl AsRef<[u8]>,
    public_key_hex: &str,
    mode: Mode,
) -> Result<String> {
    let public_key = PublicKey::from_hex(public_key_hex)?;
    EncryptingKey::new_with_mode(public_key, mode).encrypt_hex(rng, plaintext.as_ref())
}

/// Encrypt `plaintext` to a hex-encoded public key using the operating
/// system's random number generator.
#[cfg(feature = "getrandom")]
pub fn encrypt_hex(
    plaintext: impl AsRef<[u8]>,
    public_key_hex: &str,
    mode: Mode,
) -> Result<String> {
    encrypt_hex_with_rng(&mut rand_core::OsRng, plaintext, public_key_hex, mode)
}

/// Decrypt a hex ciphertext (untagged `C1`) with a hex-encoded private key,
/// returning the plaintext as a string.
///
/// The ciphertext must hold at least the 128 hex characters of `C1` and the
/// private key at least 64 characters; shorter inputs are rejected with
/// [`Error::TooShort`].
pub fn decrypt_hex(ciphertext_hex: &str, private_key_hex: &str, mode: Mode) -> Result<String> {
    if ciphertext_hex.len() < POINT_LEN * 2 {
        return Err(Error::TooShort);
    }

    let secret_key = SecretKey::from_hex(private_key_hex)?;
    let decrypting_key = DecryptingKey::new_with_mode(secret_key, mode)?;
    let plaintext = decrypting_key.decrypt_hex(ciphertext_hex)?;
    String::from_utf8(plaintext).map_err(|_| Error::InvalidUtf8)
}

#[cfg(test)]
mod tests {
    use super::{Cipher, Encoding, Mode};
    use crate::{Error, FieldPoint};

    fn sample() -> Cipher {
        Cipher::new(FieldPoint::generator(), b"c2 bytes".to_vec(), [0xc3; 32]).unwrap()
    }

    #[test]
    fn mode_flags() {
        assert_eq!(Mode::try_from(0), Ok(Mode::C1C2C3));
        assert_eq!(Mode::try_from(1), Ok(Mode::C1C3C2));
        assert_eq!(Mode::try_from(2), Err(Error::InvalidMode));
        assert_eq!(u8::from(Mode::C1C3C2), 1);
    }

    #[test]
    fn field_order_follows_mode() {
        let cipher = sample();
        let c1c2c3 = cipher.encode(Mode::C1C2C3, Encoding::Bare);
        let c1c3c2 = cipher.encode(Mode::C1C3C2, Encoding::Bare);
        assert_eq!(&c1c2c3[64..72], b"c2 bytes");
        assert_eq!(&c1c2c3[72..], &[0xc3; 32]);
        assert_eq!(&c1c3c2[64..96], &[0xc3; 32]);
        assert_eq!(&c1c3c2[96..], b"c2 bytes");
    }

    #[test]
    fn tagged_encodings() {
        let cipher = sample();
        let sec1 = cipher.encode(Mode::C1C2C3, Encoding::Sec1);
        let prefixed = cipher.encode(Mode::C1C2C3, Encoding::Prefixed);
        assert_eq!(sec1[0], 0x04);
        assert_eq!(prefixed[0], 0x10);
        assert_eq!(
            &prefixed[1..],
            &cipher.encode(Mode::C1C3C2, Encoding::Bare)[..]
        );

        assert_eq!(Cipher::from_slice(&sec1, Mode::C1C2C3).unwrap(), cipher);
        assert_eq!(Cipher::from_slice(&prefixed, Mode::C1C2C3).unwrap(), cipher);
        assert_eq!(
            Cipher::from_slice(&sec1[1..], Mode::C1C2C3),
            Err(Error::InvalidPoint)
        );
    }

    #[test]
    fn short_input_is_rejected_before_slicing() {
        let bytes = sample().encode(Mode::C1C2C3, Encoding::Bare);
        for len in [0, 1, 63, 64, 95] {
            assert_eq!(
                Cipher::decode(&bytes[..len], Mode::C1C2C3, Encoding::Bare),
                Err(Error::TooShort)
            );
        }
        assert!(Cipher::decode(&bytes[..96], Mode::C1C2C3, Encoding::Bare)
            .unwrap()
            .c2()
            .is_empty());
    }

    #[test]
    fn hex_round_trip_changes_nothing() {
        let cipher = sample();
        let hex = cipher.to_hex(Mode::C1C2C3);
        assert_eq!(hex.len(), 2 * (64 + 8 + 32));
        assert_eq!(Cipher::from_hex(&hex, Mode::C1C2C3).unwrap(), cipher);
        assert_eq!(
            Cipher::from_hex(&hex[..126], Mode::C1C2C3),
            Err(Error::TooShort)
        );
    }
}
