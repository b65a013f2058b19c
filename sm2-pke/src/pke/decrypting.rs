use core::fmt::{self, Debug};

use super::{encrypting::EncryptingKey, Cipher, Encoding, Mode};
use crate::{hash::tag, kdf::KdfStream, Error, KeyPair, Result, Scalar, SecretKey};
use alloc::vec::Vec;
use elliptic_curve::{
    subtle::{Choice, ConstantTimeEq},
    zeroize::Zeroize,
};

/// Represents a decryption key used for decrypting messages using elliptic curve cryptography.
#[derive(Clone)]
pub struct DecryptingKey {
    secret_key: SecretKey,
    encrypting_key: EncryptingKey,
    mode: Mode,
}

impl DecryptingKey {
    /// Creates a new `DecryptingKey` from a `SecretKey` with the default decryption mode (`C1C3C2`).
    pub fn new(secret_key: SecretKey) -> Result<Self> {
        Self::new_with_mode(secret_key, Mode::default())
    }

    /// Creates a new `DecryptingKey` from a `SecretKey` and sets the decryption mode.
    pub fn new_with_mode(secret_key: SecretKey, mode: Mode) -> Result<Self> {
        let public_key = secret_key.public_key()?;
        Ok(Self {
            secret_key,
            encrypting_key: EncryptingKey::new_with_mode(public_key, mode),
            mode,
        })
    }

    /// Parse a decryption key from a hex private key of at least 64 characters.
    pub fn from_hex(private_key_hex: &str) -> Result<Self> {
        Self::new(SecretKey::from_hex(private_key_hex)?)
    }

    /// Parse a decryption key from big endian-encoded byte slice containing a secret
    /// scalar value.
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        Self::new(SecretKey::from_slice(slice)?)
    }

    /// Borrow the [`SecretKey`] of this key.
    ///
    /// # ⚠️ Warning
    ///
    /// This value is key material.
    ///
    /// Please treat it with the care it deserves!
    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    /// Get the [`EncryptingKey`] which corresponds to this [`DecryptingKey`].
    pub fn encrypting_key(&self) -> &EncryptingKey {
        &self.encrypting_key
    }

    /// Field ordering expected in ciphertexts.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Decrypts a tagged ciphertext: SEC1 (`0x04`) in this key's mode, or the
    /// `0x10`-prefixed encoding.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.decrypt_cipher(&Cipher::from_slice(ciphertext, self.mode)?)
    }

    /// Decrypts a ciphertext in the given encoding.
    pub fn decrypt_encoded(&self, ciphertext: &[u8], encoding: Encoding) -> Result<Vec<u8>> {
        self.decrypt_cipher(&Cipher::decode(ciphertext, self.mode, encoding)?)
    }

    /// Decrypts a hex ciphertext with an untagged `C1`.
    pub fn decrypt_hex(&self, ciphertext_hex: &str) -> Result<Vec<u8>> {
        self.decrypt_cipher(&Cipher::from_hex(ciphertext_hex, self.mode)?)
    }

    /// Decrypts decoded ciphertext fields.
    ///
    /// The plaintext is only returned once `C3` has been verified.
    pub fn decrypt_cipher(&self, cipher: &Cipher) -> Result<Vec<u8>> {
        decrypt(self.secret_key.as_scalar(), cipher)
    }
}

impl TryFrom<KeyPair> for DecryptingKey {
    type Error = Error;

    fn try_from(key_pair: KeyPair) -> Result<Self> {
        Self::new(key_pair.secret_key().clone())
    }
}

//
// Other trait impls
//

impl AsRef<EncryptingKey> for DecryptingKey {
    fn as_ref(&self) -> &EncryptingKey {
        &self.encrypting_key
    }
}

impl ConstantTimeEq for DecryptingKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.secret_key
            .as_scalar()
            .as_uint()
            .ct_eq(other.secret_key.as_scalar().as_uint())
    }
}

impl Debug for DecryptingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecryptingKey")
            .field("encrypting_key", &self.encrypting_key())
            .finish_non_exhaustive()
    }
}

/// Constant-time comparison
impl Eq for DecryptingKey {}
impl PartialEq for DecryptingKey {
    fn eq(&self, other: &DecryptingKey) -> bool {
        self.ct_eq(other).into()
    }
}

fn decrypt(secret_scalar: &Scalar, cipher: &Cipher) -> Result<Vec<u8>> {
    // B1: 𝐶1 was checked to be on the curve when decoded
    // B2: the cofactor is 1, and a decoded 𝐶1 is never the point at infinity

    // B3: compute [𝑑𝐵]𝐶1 = (𝑥2, 𝑦2)
    let (x2, y2) = cipher
        .c1()
        .scalar_mul(secret_scalar)?
        .coordinates()
        .ok_or(Error::PointAtInfinity)?;
    let (x2, y2) = (x2.to_bytes(), y2.to_bytes());

    // B4: compute 𝑡 = 𝐾𝐷𝐹(𝑥2 ∥ 𝑦2, 𝑘𝑙𝑒𝑛)
    // B5: get 𝐶2 from 𝐶 and compute 𝑀′ = 𝐶2 ⊕ t
    let mut msg = cipher.c2().to_vec();
    KdfStream::from_coordinates(&x2, &y2).apply(&mut msg)?;

    // B6: compute 𝑢 = 𝐻𝑎𝑠ℎ(𝑥2 ∥ 𝑀′∥ 𝑦2); if 𝑢 ≠ 𝐶3, output “ERROR” and exit
    let u = tag(&x2, &msg, &y2);
    if !bool::from(u[..].ct_eq(&cipher.c3()[..])) {
        msg.zeroize();
        return Err(Error::TagMismatch);
    }

    // B7: output the plaintext 𝑀′
    Ok(msg)
}
