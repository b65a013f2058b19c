//! Error type

use core::fmt::{self, Display};

/// Result type with the `sm2-pke` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// SM2 encryption errors.
///
/// Every failure is local to a single call and is never transient, so none of
/// these are worth retrying. Use [`Error::kind`] to tell malformed input apart
/// from arithmetic failures and from authentication failures.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Input is not valid hexadecimal.
    InvalidHex,

    /// Key, point or ciphertext has the wrong length.
    InvalidLength,

    /// Ciphertext or private key is shorter than its fixed-width fields.
    TooShort,

    /// Scalar is zero or not below the group order.
    InvalidScalar,

    /// Point encoding is malformed, or the point is not on the curve.
    InvalidPoint,

    /// A modular inverse was required for a zero denominator.
    NotInvertible,

    /// A computation that must yield a finite point produced the identity.
    PointAtInfinity,

    /// The KDF counter wrapped around before the mask was complete.
    KdfExhausted,

    /// The recomputed `C3` tag does not match the received one.
    TagMismatch,

    /// Decrypted plaintext is not valid UTF-8.
    InvalidUtf8,

    /// Cipher mode flag is neither `0` nor `1`.
    InvalidMode,
}

/// Coarse classification of an [`Error`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// Undecodable or wrongly sized input.
    Format,

    /// Curve arithmetic could not be carried out on the given values.
    Arithmetic,

    /// Ciphertext failed authentication.
    Authentication,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidHex
            | Error::InvalidLength
            | Error::TooShort
            | Error::InvalidScalar
            | Error::InvalidUtf8
            | Error::InvalidMode => ErrorKind::Format,
            Error::InvalidPoint
            | Error::NotInvertible
            | Error::PointAtInfinity
            | Error::KdfExhausted => ErrorKind::Arithmetic,
            Error::TagMismatch => ErrorKind::Authentication,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Error::InvalidHex => "invalid hex encoding",
            Error::InvalidLength => "invalid length",
            Error::TooShort => "input too short",
            Error::InvalidScalar => "scalar out of range",
            Error::InvalidPoint => "invalid curve point",
            Error::NotInvertible => "modular inverse does not exist",
            Error::PointAtInfinity => "unexpected point at infinity",
            Error::KdfExhausted => "KDF counter exhausted",
            Error::TagMismatch => "ciphertext authentication failed",
            Error::InvalidUtf8 => "plaintext is not valid UTF-8",
            Error::InvalidMode => "unknown cipher mode",
        })
    }
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        match err {
            hex::FromHexError::InvalidHexCharacter { .. } => Error::InvalidHex,
            _ => Error::InvalidLength,
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
