//! Affine curve points and the double-and-add group law.
//!
//! # ⚠️ Security Warning
//!
//! Scalar multiplication here is a plain bit scan: it branches
//! on every bit of the scalar and on the point-at-infinity cases of the
//! addition law, so its running time leaks the scalar. The algorithm is kept
//! because ciphertexts must stay reproducible against other SM2
//! implementations; a deployment exposed to timing observers needs a
//! constant-time ladder instead.

use super::{field::FieldElement, scalar::Scalar};
use crate::{EncodedPoint, Error, FieldBytes, Result, Sm2, U256};
use elliptic_curve::{bigint::ArrayEncoding, sec1::Coordinates};

/// Length of an affine point serialized as `X ‖ Y`.
pub(crate) const POINT_LEN: usize = 64;

const EQUATION_A: FieldElement = FieldElement::from_uint_unchecked(&Sm2::EQUATION_A);
const EQUATION_B: FieldElement = FieldElement::from_uint_unchecked(&Sm2::EQUATION_B);
const GENERATOR_X: FieldElement = FieldElement::from_uint_unchecked(&Sm2::GENERATOR.0);
const GENERATOR_Y: FieldElement = FieldElement::from_uint_unchecked(&Sm2::GENERATOR.1);
const THREE: FieldElement = FieldElement::from_uint_unchecked(&U256::from_u64(3));

/// Point on the SM2 curve in affine coordinates.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldPoint {
    /// Additive identity of the group a.k.a. the point at infinity.
    Infinity,

    /// Finite point `(x, y)`.
    Finite {
        /// x-coordinate
        x: FieldElement,

        /// y-coordinate
        y: FieldElement,
    },
}

impl FieldPoint {
    /// Base point `G` of the curve.
    pub fn generator() -> Self {
        Self::Finite {
            x: GENERATOR_X,
            y: GENERATOR_Y,
        }
    }

    /// Create a finite point, checking it satisfies the curve equation.
    pub fn from_affine(x: FieldElement, y: FieldElement) -> Result<Self> {
        let point = Self::Finite { x, y };
        if point.is_on_curve() {
            Ok(point)
        } else {
            Err(Error::InvalidPoint)
        }
    }

    /// Decode a finite point from its two 32-byte big endian coordinates.
    pub fn from_coordinates(x: &FieldBytes, y: &FieldBytes) -> Result<Self> {
        let x = FieldElement::from_bytes(x).ok_or(Error::InvalidPoint)?;
        let y = FieldElement::from_bytes(y).ok_or(Error::InvalidPoint)?;
        Self::from_affine(x, y)
    }

    /// Decode a finite point from a SEC1 uncompressed encoding.
    pub fn from_encoded_point(encoded: &EncodedPoint) -> Result<Self> {
        match encoded.coordinates() {
            Coordinates::Uncompressed { x, y } => Self::from_coordinates(x, y),
            _ => Err(Error::InvalidPoint),
        }
    }

    /// Decode a finite point from `X ‖ Y` (64 bytes, no tag).
    pub fn from_untagged_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != POINT_LEN {
            return Err(Error::InvalidLength);
        }

        let (x, y) = bytes.split_at(POINT_LEN / 2);
        Self::from_coordinates(FieldBytes::from_slice(x), FieldBytes::from_slice(y))
    }

    /// Is this the point at infinity?
    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Infinity)
    }

    /// Does this point satisfy `y² = x³ + ax + b`?
    ///
    /// The point at infinity is always on the curve.
    pub fn is_on_curve(&self) -> bool {
        match self {
            Self::Infinity => true,
            Self::Finite { x, y } => {
                let rhs = x
                    .square()
                    .multiply(x)
                    .add(&EQUATION_A.multiply(x))
                    .add(&EQUATION_B);
                y.square() == rhs
            }
        }
    }

    /// Affine coordinates, or `None` for the point at infinity.
    pub fn coordinates(&self) -> Option<(FieldElement, FieldElement)> {
        match self {
            Self::Infinity => None,
            Self::Finite { x, y } => Some((*x, *y)),
        }
    }

    /// Serialize as `X ‖ Y`, each coordinate left-padded with zeros to 32 bytes.
    pub fn to_untagged_bytes(&self) -> Result<[u8; POINT_LEN]> {
        let (x, y) = self.coordinates().ok_or(Error::PointAtInfinity)?;
        let mut out = [0u8; POINT_LEN];
        out[..POINT_LEN / 2].copy_from_slice(&x.to_bytes());
        out[POINT_LEN / 2..].copy_from_slice(&y.to_bytes());
        Ok(out)
    }

    /// Serialize as a SEC1 uncompressed point (`0x04 ‖ X ‖ Y`).
    pub fn to_encoded_point(&self) -> Result<EncodedPoint> {
        let (x, y) = self.coordinates().ok_or(Error::PointAtInfinity)?;
        Ok(EncodedPoint::from_affine_coordinates(
            &x.to_bytes(),
            &y.to_bytes(),
            false,
        ))
    }

    /// Point doubling.
    ///
    /// ```text
    /// λ  = (3x² + a) / 2y
    /// x' = λ² - 2x
    /// y' = λ(x - x') - y
    /// ```
    ///
    /// Fails with [`Error::NotInvertible`] when `y = 0`.
    pub fn double(&self) -> Result<Self> {
        let (x, y) = match self {
            Self::Infinity => return Ok(Self::Infinity),
            Self::Finite { x, y } => (x, y),
        };

        let numerator = THREE.multiply(&x.square()).add(&EQUATION_A);
        let denominator = y.double().invert().ok_or(Error::NotInvertible)?;
        let lambda = numerator.multiply(&denominator);

        let x3 = lambda.square().sub(&x.double());
        let y3 = lambda.multiply(&x.sub(&x3)).sub(y);
        Ok(Self::Finite { x: x3, y: y3 })
    }

    /// Point addition.
    ///
    /// ```text
    /// λ  = (y₂ - y₁) / (x₂ - x₁)
    /// x₃ = λ² - x₁ - x₂
    /// y₃ = λ(x₁ - x₃) - y₁
    /// ```
    ///
    /// Equal points are doubled; `P + (-P)` is the point at infinity.
    pub fn add_point(&self, other: &Self) -> Result<Self> {
        let ((x1, y1), (x2, y2)) = match (self, other) {
            (Self::Infinity, _) => return Ok(*other),
            (_, Self::Infinity) => return Ok(*self),
            (Self::Finite { x: x1, y: y1 }, Self::Finite { x: x2, y: y2 }) => {
                ((x1, y1), (x2, y2))
            }
        };

        if x1 == x2 {
            return if y1 == y2 {
                self.double()
            } else {
                Ok(Self::Infinity)
            };
        }

        let denominator = x2.sub(x1).invert().ok_or(Error::NotInvertible)?;
        let lambda = y2.sub(y1).multiply(&denominator);

        let x3 = lambda.square().sub(x1).sub(x2);
        let y3 = lambda.multiply(&x1.sub(&x3)).sub(y1);
        Ok(Self::Finite { x: x3, y: y3 })
    }

    /// Scalar multiplication `[k]P` by double-and-add.
    pub fn scalar_mul(&self, k: &Scalar) -> Result<Self> {
        self.mul_vartime(k.as_uint())
    }

    /// Multiply by an arbitrary integer; zero (and multiples of the group
    /// order) yield the point at infinity.
    ///
    /// Bits are scanned from least to most significant: every set bit adds
    /// the running point into the accumulator, and the running point is
    /// doubled after every bit but the most significant one.
    pub fn mul_vartime(&self, k: &U256) -> Result<Self> {
        let bytes = k.to_be_byte_array();
        let bit_len = bit_length(&bytes);

        let mut acc = Self::Infinity;
        let mut running = *self;
        for i in 0..bit_len {
            if bit(&bytes, i) {
                acc = acc.add_point(&running)?;
            }
            if i + 1 < bit_len {
                running = running.double()?;
            }
        }

        Ok(acc)
    }

    /// `[k]G`
    pub fn mul_by_generator(k: &Scalar) -> Result<Self> {
        Self::generator().scalar_mul(k)
    }
}

/// Bit `i` (counting from the least significant) of a big endian integer.
fn bit(bytes: &[u8], i: usize) -> bool {
    let byte = bytes[bytes.len() - 1 - i / 8];
    (byte >> (i % 8)) & 1 == 1
}

/// Position of the most significant set bit, plus one.
fn bit_length(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .position(|&b| b != 0)
        .map(|idx| {
            let leading = bytes[idx].leading_zeros() as usize;
            (bytes.len() - idx) * 8 - leading
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{
        bit_length, FieldPoint, EQUATION_A, EQUATION_B, GENERATOR_X, GENERATOR_Y, THREE,
    };
    use crate::{Error, FieldBytes, FieldElement, Scalar, Sm2, U256};
    use elliptic_curve::Curve;
    use hex_literal::hex;

    fn point(x: [u8; 32], y: [u8; 32]) -> FieldPoint {
        FieldPoint::from_coordinates(&FieldBytes::from(x), &FieldBytes::from(y)).unwrap()
    }

    fn two_g() -> FieldPoint {
        point(
            hex!("56cefd60d7c87c000d58ef57fa73ba4d9c0dfa08c08a7331495c2e1da3f2bd52"),
            hex!("31b7e7e6cc8189f668535ce0f8eaf1bd6de84c182f6c8e716f780d3a970a23c3"),
        )
    }

    fn three_g() -> FieldPoint {
        point(
            hex!("a97f7cd4b3c993b4be2daa8cdb41e24ca13f6bd945302244e26918f1d0509ebf"),
            hex!("530b5dd88c688ef5ccc5cec08a72150f7c400ee5cd045292aaacdd037458f6e6"),
        )
    }

    #[test]
    fn curve_constants_are_canonical() {
        let canonical = |uint: &U256| FieldElement::from_uint(uint).unwrap();
        assert_eq!(EQUATION_A, canonical(&Sm2::EQUATION_A));
        assert_eq!(EQUATION_B, canonical(&Sm2::EQUATION_B));
        assert_eq!(GENERATOR_X, canonical(&Sm2::GENERATOR.0));
        assert_eq!(GENERATOR_Y, canonical(&Sm2::GENERATOR.1));
        assert_eq!(THREE, FieldElement::from_u64(3));
        assert_eq!(EQUATION_A.add(&THREE), FieldElement::ZERO);
    }

    #[test]
    fn generator_is_on_curve() {
        assert!(FieldPoint::generator().is_on_curve());
        assert!(FieldPoint::Infinity.is_on_curve());
    }

    #[test]
    fn off_curve_points_are_rejected() {
        let (x, y) = FieldPoint::generator().coordinates().unwrap();
        assert_eq!(
            FieldPoint::from_affine(x, y.add(&FieldElement::ONE)),
            Err(Error::InvalidPoint)
        );
    }

    #[test]
    fn double_generator() {
        assert_eq!(FieldPoint::generator().double().unwrap(), two_g());
    }

    #[test]
    fn add_generator_to_double() {
        let g = FieldPoint::generator();
        assert_eq!(two_g().add_point(&g).unwrap(), three_g());
        assert_eq!(g.add_point(&two_g()).unwrap(), three_g());
        assert_eq!(g.add_point(&g).unwrap(), two_g());
    }

    #[test]
    fn identity_is_neutral() {
        let g = FieldPoint::generator();
        assert_eq!(g.add_point(&FieldPoint::Infinity).unwrap(), g);
        assert_eq!(FieldPoint::Infinity.add_point(&g).unwrap(), g);
        assert_eq!(FieldPoint::Infinity.double().unwrap(), FieldPoint::Infinity);
    }

    #[test]
    fn adding_negation_gives_infinity() {
        let (x, y) = FieldPoint::generator().coordinates().unwrap();
        let neg = FieldPoint::from_affine(x, FieldElement::ZERO.sub(&y)).unwrap();
        assert_eq!(
            FieldPoint::generator().add_point(&neg).unwrap(),
            FieldPoint::Infinity
        );
    }

    #[test]
    fn doubling_with_zero_y_is_not_invertible() {
        // Not on the curve; exercises the unguarded arithmetic path.
        let degenerate = FieldPoint::Finite {
            x: FieldElement::ONE,
            y: FieldElement::ZERO,
        };
        assert_eq!(degenerate.double(), Err(Error::NotInvertible));
    }

    #[test]
    fn small_multiples() {
        let g = FieldPoint::generator();
        assert_eq!(g.mul_vartime(&U256::ZERO).unwrap(), FieldPoint::Infinity);
        assert_eq!(g.mul_vartime(&U256::ONE).unwrap(), g);
        assert_eq!(g.mul_vartime(&U256::from_u64(2)).unwrap(), two_g());
        assert_eq!(g.mul_vartime(&U256::from_u64(3)).unwrap(), three_g());
    }

    #[test]
    fn order_multiples() {
        let g = FieldPoint::generator();
        assert_eq!(g.mul_vartime(&Sm2::ORDER).unwrap(), FieldPoint::Infinity);

        let n_minus_one = Scalar::from_uint(Sm2::ORDER.wrapping_sub(&U256::ONE)).unwrap();
        let (x, y) = g.coordinates().unwrap();
        assert_eq!(
            g.scalar_mul(&n_minus_one).unwrap(),
            FieldPoint::Finite {
                x,
                y: FieldElement::ZERO.sub(&y)
            }
        );
    }

    #[test]
    fn scalar_mul_distributes() {
        let a = Scalar::from_uint(U256::from_u64(0xdead_beef)).unwrap();
        let b = Scalar::from_uint(U256::from_u64(0x1234_5678)).unwrap();
        let sum = Scalar::from_uint(U256::from_u64(0xdead_beef + 0x1234_5678)).unwrap();

        let lhs = FieldPoint::mul_by_generator(&sum).unwrap();
        let rhs = FieldPoint::mul_by_generator(&a)
            .unwrap()
            .add_point(&FieldPoint::mul_by_generator(&b).unwrap())
            .unwrap();
        assert_eq!(lhs, rhs);
        assert!(lhs.is_on_curve());
    }

    #[test]
    fn encoding_is_zero_padded() {
        let bytes = two_g().to_untagged_bytes().unwrap();
        assert_eq!(FieldPoint::from_untagged_bytes(&bytes).unwrap(), two_g());
        assert_eq!(
            FieldPoint::Infinity.to_untagged_bytes(),
            Err(Error::PointAtInfinity)
        );
        assert_eq!(
            FieldPoint::from_untagged_bytes(&bytes[1..]),
            Err(Error::InvalidLength)
        );
    }

    #[test]
    fn bit_length_of_big_endian() {
        assert_eq!(bit_length(&[0, 0]), 0);
        assert_eq!(bit_length(&[0, 1]), 1);
        assert_eq!(bit_length(&[0x80, 0]), 16);
        assert_eq!(bit_length(&[0, 0x13]), 5);
    }
}
