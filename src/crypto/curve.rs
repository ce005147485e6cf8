//! secp256k1 field and group arithmetic.
//!
//! The curve is `y² = x³ + 7` over `F_p` with `p = 2^256 − 2^32 − 977`.
//! Points are kept affine at the API boundary; [`scalar_multiply`] runs in
//! Jacobian coordinates and converts back with one inversion.

use std::sync::LazyLock;

use num_bigint::BigUint;
use num_traits::{One, Zero};

const P_WORDS: [u32; 8] = [
    0xFFFFFFFF, 0xFFFFFFFF, 0xFFFFFFFF, 0xFFFFFFFF, 0xFFFFFFFF, 0xFFFFFFFF, 0xFFFFFFFE, 0xFFFFFC2F,
];
const N_WORDS: [u32; 8] = [
    0xFFFFFFFF, 0xFFFFFFFF, 0xFFFFFFFF, 0xFFFFFFFE, 0xBAAEDCE6, 0xAF48A03B, 0xBFD25E8C, 0xD0364141,
];
const GX_WORDS: [u32; 8] = [
    0x79BE667E, 0xF9DCBBAC, 0x55A06295, 0xCE870B07, 0x029BFCDB, 0x2DCE28D9, 0x59F2815B, 0x16F81798,
];
const GY_WORDS: [u32; 8] = [
    0x483ADA77, 0x26A3C465, 0x5DA4FBFC, 0x0E1108A8, 0xFD17B448, 0xA6855419, 0x9C47D08F, 0xFB10D4B8,
];

/// Domain parameters of secp256k1.
#[derive(Debug)]
pub struct CurveParams {
    /// Field prime.
    pub p: BigUint,
    /// Group order.
    pub n: BigUint,
    /// Generator point.
    pub g: Point,
}

/// The secp256k1 parameters.
pub static SECP256K1: LazyLock<CurveParams> = LazyLock::new(|| CurveParams {
    p: from_be_words(P_WORDS),
    n: from_be_words(N_WORDS),
    g: Point::Affine {
        x: from_be_words(GX_WORDS),
        y: from_be_words(GY_WORDS),
    },
});

fn from_be_words(words: [u32; 8]) -> BigUint {
    let mut digits = words;
    digits.reverse();
    BigUint::from_slice(&digits)
}

/// A point on the curve, or the identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Point {
    /// The point at infinity.
    Infinity,
    /// A finite point with coordinates in `[0, p)`.
    Affine { x: BigUint, y: BigUint },
}

impl Point {
    /// Returns true for the point at infinity.
    pub fn is_infinity(&self) -> bool {
        matches!(self, Point::Infinity)
    }

    /// Checks `y² ≡ x³ + 7 (mod p)`. The identity counts as on the curve.
    pub fn is_on_curve(&self) -> bool {
        match self {
            Point::Infinity => true,
            Point::Affine { x, y } => {
                let p = &SECP256K1.p;
                if x >= p || y >= p {
                    return false;
                }
                (y * y) % p == (x * x * x + 7u32) % p
            }
        }
    }

    /// Serializes the point as `x ‖ y`, each 32 bytes big-endian.
    ///
    /// This is the uncompressed SEC1 encoding without its `0x04` tag. The
    /// identity has no affine coordinates and serializes as zeros.
    pub fn to_uncompressed_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        if let Point::Affine { x, y } = self {
            out[..32].copy_from_slice(&to_bytes32(x));
            out[32..].copy_from_slice(&to_bytes32(y));
        }
        out
    }
}

/// Left-pads a value below 2^256 to 32 big-endian bytes.
pub(crate) fn to_bytes32(value: &BigUint) -> [u8; 32] {
    let bytes = value.to_bytes_be();
    let mut out = [0u8; 32];
    let start = 32usize.saturating_sub(bytes.len());
    let skip = bytes.len().saturating_sub(32);
    out[start..].copy_from_slice(&bytes[skip..]);
    out
}

/// Square-and-multiply modular exponentiation.
pub fn mod_pow(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> BigUint {
    if modulus.is_one() {
        return BigUint::zero();
    }
    let mut result = BigUint::one();
    let mut base = base % modulus;
    for i in 0..exponent.bits() {
        if exponent.bit(i) {
            result = (&result * &base) % modulus;
        }
        base = (&base * &base) % modulus;
    }
    result
}

/// Modular inverse by Fermat's little theorem; `m` must be prime.
///
/// Zero has no inverse and maps to zero.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> BigUint {
    mod_pow(a, &(m - 2u32), m)
}

#[inline]
fn sub_mod(a: &BigUint, b: &BigUint, p: &BigUint) -> BigUint {
    ((a + p) - b) % p
}

#[inline]
fn mul_mod(a: &BigUint, b: &BigUint, p: &BigUint) -> BigUint {
    (a * b) % p
}

/// Affine point addition, including the doubling case.
pub fn point_add(lhs: &Point, rhs: &Point) -> Point {
    let (x1, y1, x2, y2) = match (lhs, rhs) {
        (Point::Infinity, other) | (other, Point::Infinity) => return other.clone(),
        (Point::Affine { x: x1, y: y1 }, Point::Affine { x: x2, y: y2 }) => (x1, y1, x2, y2),
    };
    let p = &SECP256K1.p;

    let slope = if x1 == x2 {
        if y1 != y2 || y1.is_zero() {
            // P + (−P), or a point of order two
            return Point::Infinity;
        }
        let numerator = mul_mod(&(x1 * x1), &BigUint::from(3u32), p);
        let denominator = (y1 << 1u32) % p;
        mul_mod(&numerator, &mod_inverse(&denominator, p), p)
    } else {
        let numerator = sub_mod(y2, y1, p);
        let denominator = sub_mod(x2, x1, p);
        mul_mod(&numerator, &mod_inverse(&denominator, p), p)
    };

    let x3 = sub_mod(&sub_mod(&mul_mod(&slope, &slope, p), x1, p), x2, p);
    let y3 = sub_mod(&mul_mod(&slope, &sub_mod(x1, &x3, p), p), y1, p);
    Point::Affine { x: x3, y: y3 }
}

/// Affine point doubling.
#[inline]
pub fn point_double(point: &Point) -> Point {
    point_add(point, point)
}

/// Jacobian coordinates `(X, Y, Z)` for `(X/Z², Y/Z³)`; `Z = 0` is the identity.
struct Jacobian {
    x: BigUint,
    y: BigUint,
    z: BigUint,
}

impl Jacobian {
    fn identity() -> Self {
        Self {
            x: BigUint::one(),
            y: BigUint::one(),
            z: BigUint::zero(),
        }
    }

    fn is_identity(&self) -> bool {
        self.z.is_zero()
    }

    fn double(&self, p: &BigUint) -> Self {
        if self.is_identity() || self.y.is_zero() {
            return Self::identity();
        }
        let yy = mul_mod(&self.y, &self.y, p);
        let s = mul_mod(&(&self.x << 2u32), &yy, p);
        let m = mul_mod(&(&self.x * 3u32), &self.x, p);
        let x3 = sub_mod(&mul_mod(&m, &m, p), &((&s << 1u32) % p), p);
        let yyyy8 = (mul_mod(&yy, &yy, p) << 3u32) % p;
        let y3 = sub_mod(&mul_mod(&m, &sub_mod(&s, &x3, p), p), &yyyy8, p);
        let z3 = mul_mod(&(&self.y << 1u32), &self.z, p);
        Self { x: x3, y: y3, z: z3 }
    }

    /// Mixed addition with an affine point.
    fn add_affine(&self, x2: &BigUint, y2: &BigUint, p: &BigUint) -> Self {
        if self.is_identity() {
            return Self {
                x: x2.clone(),
                y: y2.clone(),
                z: BigUint::one(),
            };
        }
        let zz = mul_mod(&self.z, &self.z, p);
        let u2 = mul_mod(x2, &zz, p);
        let s2 = mul_mod(y2, &mul_mod(&zz, &self.z, p), p);
        let h = sub_mod(&u2, &self.x, p);
        let r = sub_mod(&s2, &self.y, p);

        if h.is_zero() {
            return if r.is_zero() {
                self.double(p)
            } else {
                Self::identity()
            };
        }

        let hh = mul_mod(&h, &h, p);
        let hhh = mul_mod(&hh, &h, p);
        let v = mul_mod(&self.x, &hh, p);
        let x3 = sub_mod(
            &sub_mod(&mul_mod(&r, &r, p), &hhh, p),
            &((&v << 1u32) % p),
            p,
        );
        let y3 = sub_mod(
            &mul_mod(&r, &sub_mod(&v, &x3, p), p),
            &mul_mod(&self.y, &hhh, p),
            p,
        );
        let z3 = mul_mod(&self.z, &h, p);
        Self { x: x3, y: y3, z: z3 }
    }

    fn to_affine(&self, p: &BigUint) -> Point {
        if self.is_identity() {
            return Point::Infinity;
        }
        let z_inv = mod_inverse(&self.z, p);
        let z_inv2 = mul_mod(&z_inv, &z_inv, p);
        let z_inv3 = mul_mod(&z_inv2, &z_inv, p);
        Point::Affine {
            x: mul_mod(&self.x, &z_inv2, p),
            y: mul_mod(&self.y, &z_inv3, p),
        }
    }
}

/// Computes `k·P` by double-and-add over the bits of `k`, most significant first.
///
/// `k = 0` yields the identity; callers deriving keys keep `k` in `[1, n−1]`.
pub fn scalar_multiply(k: &BigUint, point: &Point) -> Point {
    let (x, y) = match point {
        Point::Infinity => return Point::Infinity,
        Point::Affine { x, y } => (x, y),
    };
    let p = &SECP256K1.p;

    let mut acc = Jacobian::identity();
    for i in (0..k.bits()).rev() {
        acc = acc.double(p);
        if k.bit(i) {
            acc = acc.add_affine(x, y, p);
        }
    }
    acc.to_affine(p)
}

/// Computes `k·G`.
#[inline]
pub fn multiply_generator(k: &BigUint) -> Point {
    scalar_multiply(k, &SECP256K1.g)
}
