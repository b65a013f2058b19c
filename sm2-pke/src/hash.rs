//! SM3 adapter used by the KDF, the `C3` tag and [`hash`].

use crate::FieldBytes;
use alloc::string::String;
use sm3::{Digest, Sm3};

/// Length of an SM3 digest, which is also the length of the `C3` field.
pub(crate) const TAG_LEN: usize = 32;

/// SM3 digest of `data`.
pub fn sm3_digest(data: impl AsRef<[u8]>) -> [u8; TAG_LEN] {
    Sm3::digest(data.as_ref()).into()
}

/// SM3 digest of `text`, as 64 lowercase hex characters.
pub fn hash(text: impl AsRef<[u8]>) -> String {
    hex::encode(sm3_digest(text))
}

/// Compute `C3 = SM3(x₂ ‖ M ‖ y₂)` over the plaintext.
pub(crate) fn tag(x2: &FieldBytes, msg: &[u8], y2: &FieldBytes) -> [u8; TAG_LEN] {
    let mut hasher = Sm3::new();
    hasher.update(x2);
    hasher.update(msg);
    hasher.update(y2);
    hasher.finalize().into()
}
