use super::{Cipher, Encoding, Mode};
use crate::{hash::tag, kdf::KdfStream, Error, FieldPoint, PublicKey, Result, Scalar};
use alloc::{string::String, vec, vec::Vec};
use elliptic_curve::{rand_core::CryptoRngCore, zeroize::Zeroize};

/// Represents an encryption key used for encrypting messages using elliptic curve cryptography.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EncryptingKey {
    public_key: PublicKey,
    mode: Mode,
}

impl EncryptingKey {
    /// Initialize [`EncryptingKey`] from PublicKey
    pub fn new(public_key: PublicKey) -> Self {
        Self::new_with_mode(public_key, Mode::default())
    }

    /// Initialize [`EncryptingKey`] from PublicKey and set Encryption mode
    pub fn new_with_mode(public_key: PublicKey, mode: Mode) -> Self {
        Self { public_key, mode }
    }

    /// Initialize [`EncryptingKey`] from a SEC1-encoded public key.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self> {
        PublicKey::from_sec1_bytes(bytes).map(Self::new)
    }

    /// Initialize [`EncryptingKey`] from a hex public key, with or without
    /// the `04` tag.
    pub fn from_hex(public_key_hex: &str) -> Result<Self> {
        PublicKey::from_hex(public_key_hex).map(Self::new)
    }

    /// Borrow the [`PublicKey`] of this key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Field ordering of ciphertexts produced by this key.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Encrypts a message, returning the ciphertext with a SEC1 tagged `C1`.
    pub fn encrypt(&self, rng: &mut impl CryptoRngCore, msg: &[u8]) -> Result<Vec<u8>> {
        self.encrypt_encoded(rng, msg, Encoding::Sec1)
    }

    /// Encrypts a message, returning the ciphertext in the given encoding.
    pub fn encrypt_encoded(
        &self,
        rng: &mut impl CryptoRngCore,
        msg: &[u8],
        encoding: Encoding,
    ) -> Result<Vec<u8>> {
        Ok(self.encrypt_cipher(rng, msg)?.encode(self.mode, encoding))
    }

    /// Encrypts a message, returning lowercase hex with an untagged `C1`.
    pub fn encrypt_hex(&self, rng: &mut impl CryptoRngCore, msg: &[u8]) -> Result<String> {
        Ok(self.encrypt_cipher(rng, msg)?.to_hex(self.mode))
    }

    /// Encrypts a message, returning the decoded ciphertext fields.
    pub fn encrypt_cipher(&self, rng: &mut impl CryptoRngCore, msg: &[u8]) -> Result<Cipher> {
        encrypt(rng, &self.public_key, msg)
    }
}

impl From<PublicKey> for EncryptingKey {
    fn from(value: PublicKey) -> Self {
        Self::new(value)
    }
}

/// Encrypts a message to the given public key.
fn encrypt(rng: &mut impl CryptoRngCore, public_key: &PublicKey, msg: &[u8]) -> Result<Cipher> {
    loop {
        // A1: generate a random number 𝑘 ∈ [1, 𝑛 − 1] with the random number generator
        let mut k = Scalar::random(rng);

        // A2: compute point 𝐶1 = [𝑘]𝐺 = (𝑥1, 𝑦1)
        let c1 = FieldPoint::mul_by_generator(&k)?;

        // A3: the cofactor is 1, and a `PublicKey` is never the point at infinity

        // A4: compute point [𝑘]𝑃𝐵 = (𝑥2, 𝑦2)
        let shared = public_key.as_affine().scalar_mul(&k);
        k.zeroize();
        let (x2, y2) = shared?.coordinates().ok_or(Error::PointAtInfinity)?;
        let (x2, y2) = (x2.to_bytes(), y2.to_bytes());

        // A5: compute 𝑡 = 𝐾𝐷𝐹(𝑥2||𝑦2, 𝑘𝑙𝑒𝑛); if 𝑡 is all zero, go to A1
        let mut c2 = vec![0u8; msg.len()];
        KdfStream::from_coordinates(&x2, &y2).fill(&mut c2)?;
        if !c2.is_empty() && c2.iter().all(|&b| b == 0) {
            continue;
        }

        // A6: compute 𝐶2 = 𝑀 ⊕ t
        for (c, m) in c2.iter_mut().zip(msg) {
            *c ^= m;
        }

        // A7: compute 𝐶3 = 𝐻𝑎𝑠ℎ(𝑥2||𝑀||𝑦2)
        let c3 = tag(&x2, msg, &y2);

        // A8: output the ciphertext 𝐶 = 𝐶1||𝐶2||𝐶3
        return Cipher::new(c1, c2, c3);
    }
}
