//! SM3-based key derivation function (GB/T 32918.4 § 5.4.3).
//!
//! The shared secret `Z = x₂ ‖ y₂` is expanded into a keystream by hashing
//! `Z ‖ ct` for a big endian 32-bit counter `ct` starting at 1 and
//! concatenating the digests:
//!
//! ```text
//! K = SM3(Z ‖ 00000001) ‖ SM3(Z ‖ 00000002) ‖ ...
//! ```
//!
//! The stream is deterministic, so encryption and decryption derive the same
//! mask independently.

use crate::{hash::TAG_LEN, Error, FieldBytes, Result};
use alloc::vec::Vec;
use core::cmp::min;
use elliptic_curve::zeroize::Zeroize;
use sm3::{Digest, Sm3};

/// Incremental KDF keystream over a fixed seed.
#[derive(Clone)]
pub struct KdfStream {
    /// SM3 state after absorbing the seed.
    seeded: Sm3,
    /// Counter for the next block.
    counter: Option<u32>,
    /// Current block.
    block: [u8; TAG_LEN],
    /// Bytes of `block` already consumed.
    offset: usize,
}

impl KdfStream {
    /// Start a keystream over an arbitrary seed `Z`.
    pub fn new(seed: &[u8]) -> Self {
        let mut seeded = Sm3::new();
        seeded.update(seed);
        Self {
            seeded,
            counter: Some(1),
            block: [0u8; TAG_LEN],
            offset: TAG_LEN,
        }
    }

    /// Start a keystream over the coordinates of a shared point.
    pub fn from_coordinates(x2: &FieldBytes, y2: &FieldBytes) -> Self {
        let mut stream = Self::new(x2);
        stream.seeded.update(y2);
        stream
    }

    /// Fill `out` with the next `out.len()` keystream bytes.
    pub fn fill(&mut self, out: &mut [u8]) -> Result<()> {
        let mut written = 0;
        while written < out.len() {
            if self.offset == TAG_LEN {
                self.next_block()?;
            }

            let n = min(TAG_LEN - self.offset, out.len() - written);
            out[written..written + n].copy_from_slice(&self.block[self.offset..self.offset + n]);
            self.offset += n;
            written += n;
        }
        Ok(())
    }

    /// XOR the next `buf.len()` keystream bytes into `buf`.
    pub fn apply(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut written = 0;
        while written < buf.len() {
            if self.offset == TAG_LEN {
                self.next_block()?;
            }

            let n = min(TAG_LEN - self.offset, buf.len() - written);
            for (b, k) in buf[written..written + n]
                .iter_mut()
                .zip(&self.block[self.offset..self.offset + n])
            {
                *b ^= k;
            }
            self.offset += n;
            written += n;
        }
        Ok(())
    }

    fn next_block(&mut self) -> Result<()> {
        let ct = self.counter.ok_or(Error::KdfExhausted)?;
        let mut hasher = self.seeded.clone();
        hasher.update(ct.to_be_bytes());
        self.block = hasher.finalize().into();
        self.counter = ct.checked_add(1);
        self.offset = 0;
        Ok(())
    }
}

impl Drop for KdfStream {
    fn drop(&mut self) {
        self.block.zeroize();
    }
}

/// Derive `len` bytes of keystream from `seed`.
pub fn derive(seed: &[u8], len: usize) -> Result<Vec<u8>> {
    let mut out = alloc::vec![0u8; len];
    KdfStream::new(seed).fill(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{derive, KdfStream};
    use crate::FieldBytes;
    use hex_literal::hex;

    const SEED: [u8; 64] = {
        let mut seed = [0u8; 64];
        let mut i = 0;
        while i < 64 {
            seed[i] = i as u8;
            i += 1;
        }
        seed
    };

    #[test]
    fn counter_starts_at_one() {
        assert_eq!(
            derive(&SEED, 40).unwrap(),
            hex!("c3e5cfe48b9da30523c65df3b189227188a89ac9057b739bb779f028e4afe606e9df98cf02023b77")
        );
    }

    #[test]
    fn partial_block() {
        assert_eq!(
            derive(b"abc", 19).unwrap(),
            hex!("fe1ea80dac6f100c33537bd24619ec7c72a1e8")
        );
    }

    #[test]
    fn empty_output() {
        assert!(derive(b"abc", 0).unwrap().is_empty());
    }

    #[test]
    fn chunked_reads_match_one_shot() {
        let expected = derive(&SEED, 100).unwrap();
        let mut stream = KdfStream::new(&SEED);
        let mut out = [0u8; 100];
        for chunk in out.chunks_mut(7) {
            stream.fill(chunk).unwrap();
        }
        assert_eq!(&out[..], &expected[..]);
    }

    #[test]
    fn coordinates_seed_is_concatenation() {
        let (x, y) = SEED.split_at(32);
        let mut stream =
            KdfStream::from_coordinates(FieldBytes::from_slice(x), FieldBytes::from_slice(y));
        let mut buf = [0u8; 40];
        stream.apply(&mut buf).unwrap();
        assert_eq!(&buf[..], &derive(&SEED, 40).unwrap()[..]);
    }
}
