//! Field elements of GF(p) in Montgomery form.

use super::field_impl::FieldElementImpl;
use super::uint256::{FRAC_MODULUS_2_CEIL, MODULUS, Uint256};
use crate::error::{Error, Result};
use alloc::vec::Vec;
use core::fmt;
use core::iter::{Product, Sum};
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use num_bigint::BigUint;
use num_traits::cast::ToPrimitive;

/// An element of the Bandersnatch base field.
///
/// The value is held as a Montgomery representation below 2p, so a residue
/// may be carried by either of two bit patterns; equality, ordering-style
/// predicates and serialization all canonicalize first. Elements are plain
/// values: copying is deep and operations never alias their operands in
/// surprising ways.
#[derive(Clone, Copy)]
pub struct FieldElement(FieldElementImpl);

impl FieldElement {
    /// The additive identity.
    pub const ZERO: Self = Self(FieldElementImpl::zero());

    /// The multiplicative identity.
    pub const ONE: Self = Self(FieldElementImpl::one());

    /// The element p - 1.
    pub const MINUS_ONE: Self = Self(FieldElementImpl::minus_one());

    /// Bit length of the field modulus.
    pub const NUM_BITS: u32 = 255;

    /// Byte length of the serialized form.
    pub const NUM_BYTES: usize = 32;

    /// Converts a small unsigned integer into the field.
    pub const fn from_u64(value: u64) -> Self {
        Self(FieldElementImpl::from_canonical(&Uint256::from_u64(value)))
    }

    /// Converts a small signed integer into the field.
    pub const fn from_i64(value: i64) -> Self {
        let magnitude = Self::from_u64(value.unsigned_abs());
        if value < 0 {
            Self(magnitude.0.neg())
        } else {
            magnitude
        }
    }

    /// Converts an arbitrary non-negative integer, reduced mod p.
    pub fn from_biguint(value: &BigUint) -> Self {
        let reduced = value % MODULUS.to_biguint();
        Self(FieldElementImpl::from_canonical(&Uint256::from_biguint(
            &reduced,
        )))
    }

    /// The canonical value as an arbitrary-precision integer.
    pub fn to_biguint(&self) -> BigUint {
        self.0.to_canonical().to_biguint()
    }

    /// Parses the 32-byte little-endian encoding of a canonical value.
    /// Returns `None` when the encoded integer is p or larger.
    pub fn from_bytes(bytes: &[u8; 32]) -> Option<Self> {
        let value = Uint256::from_le_bytes(bytes);
        if value.is_reduced() {
            Some(Self(FieldElementImpl::from_canonical(&value)))
        } else {
            None
        }
    }

    /// The 32-byte little-endian encoding of the canonical value.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_canonical().to_le_bytes()
    }

    /// The canonical value, if it fits in a `u64`.
    pub fn to_u64(&self) -> Result<u64> {
        let canonical = self.0.to_canonical();
        let w = canonical.as_words();
        if w[1] | w[2] | w[3] == 0 {
            Ok(w[0])
        } else {
            Err(Error::NotRepresentable)
        }
    }

    /// The represented residue as an `i64`, taking the representative of
    /// least magnitude: values up to `i64::MAX` map to themselves, values
    /// from `p - 2^63` up map to their negative counterpart.
    pub fn to_i64(&self) -> Result<i64> {
        let canonical = self.0.to_canonical();
        let w = canonical.as_words();
        if w[1] | w[2] | w[3] == 0 && w[0] <= i64::MAX as u64 {
            return Ok(w[0] as i64);
        }
        let (diff, _) = MODULUS.borrowing_sub(&canonical);
        let d = diff.as_words();
        if d[1] | d[2] | d[3] == 0 && d[0] <= 1 << 63 {
            return Ok(d[0].wrapping_neg() as i64);
        }
        Err(Error::NotRepresentable)
    }

    /// Whether the element is zero, in either of its representations.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Whether the element is the multiplicative identity.
    pub fn is_one(&self) -> bool {
        *self == Self::ONE
    }

    /// Doubles the element.
    pub fn double(&self) -> Self {
        Self(self.0.double())
    }

    /// Squares the element.
    pub fn square(&self) -> Self {
        Self(self.0.square())
    }

    /// Multiplies by five with two doublings and an addition; curve
    /// doubling formulas for a = -5 curves lean on this.
    pub fn mul_five(&self) -> Self {
        Self(self.0.mul_five())
    }

    /// Variable-time exponentiation by an arbitrary 256-bit integer.
    /// A zero exponent yields one, for any base.
    pub fn pow_vartime(&self, exp: &Uint256) -> Self {
        Self(self.0.pow(exp))
    }

    /// The multiplicative inverse.
    pub fn invert(&self) -> Result<Self> {
        self.0.invert().map(Self).ok_or(Error::DivisionByZero)
    }

    /// `self / rhs`.
    pub fn divide(&self, rhs: &Self) -> Result<Self> {
        Ok(self * &rhs.invert()?)
    }

    /// The sign of the canonical value: 0 for zero, +1 for values below
    /// (p + 1) / 2, -1 otherwise. Sign-positive values have their top two
    /// bits clear, which the serialization layer relies on for prefix bits.
    pub fn sign(&self) -> i32 {
        let canonical = self.0.to_canonical();
        if canonical.is_zero() {
            0
        } else if canonical < FRAC_MODULUS_2_CEIL {
            1
        } else {
            -1
        }
    }

    /// The Jacobi symbol of the canonical value over p: +1 for nonzero
    /// squares, -1 for non-squares, 0 for zero. Delegates to the
    /// arbitrary-precision collaborator; this is not a hot path.
    pub fn jacobi(&self) -> i32 {
        jacobi_symbol(self.to_biguint(), MODULUS.to_biguint())
    }

    /// Forces the canonical representation of the payload. Values compare
    /// equal regardless; this only pins down the bit pattern.
    pub fn normalize(&self) -> Self {
        Self(self.0.normalize())
    }

    /// Replaces the payload with the equivalent representation below 2p
    /// selected by the seed's low bit, so that observers of raw payloads
    /// cannot rely on any particular representative.
    pub fn rerandomize_representation(&mut self, seed: u64) {
        self.0 = self.0.rerandomize(seed);
    }

    /// Inverts every element of the slice in place with Montgomery's
    /// trick: one inversion and three multiplications per element.
    ///
    /// If any input is zero, no input is modified and the returned error
    /// lists every zero index.
    pub fn batch_invert(elements: &mut [Self]) -> Result<()> {
        let zero_indices: Vec<usize> = elements
            .iter()
            .enumerate()
            .filter_map(|(i, x)| x.is_zero().then_some(i))
            .collect();
        if !zero_indices.is_empty() {
            return Err(Error::BatchInversionOfZero { zero_indices });
        }
        if elements.is_empty() {
            return Ok(());
        }

        let mut products = Vec::with_capacity(elements.len());
        let mut acc = Self::ONE;
        for x in elements.iter() {
            acc = acc * x;
            products.push(acc);
        }

        let mut inv = products[products.len() - 1].invert()?;
        for i in (1..elements.len()).rev() {
            let tmp = inv * &products[i - 1];
            inv = inv * &elements[i];
            elements[i] = tmp;
        }
        elements[0] = inv;
        Ok(())
    }

    /// Sum of a slice; empty slices sum to zero.
    pub fn sum_of(elements: &[Self]) -> Self {
        elements.iter().fold(Self::ZERO, |acc, x| acc + x)
    }

    /// Product of a slice; empty slices multiply to one.
    pub fn product_of(elements: &[Self]) -> Self {
        elements.iter().fold(Self::ONE, |acc, x| acc * x)
    }

    #[cfg(test)]
    pub(crate) fn payload_words(&self) -> [u64; 4] {
        *self.0.payload().as_words()
    }
}

/// Binary Jacobi symbol (a / n) for odd n.
fn jacobi_symbol(mut a: BigUint, mut n: BigUint) -> i32 {
    use num_traits::Zero;

    let mut t = 1i32;
    a %= &n;
    while !a.is_zero() {
        while !a.bit(0) {
            a >>= 1u32;
            let r = (&n % 8u32).to_u32().expect("single digit");
            if r == 3 || r == 5 {
                t = -t;
            }
        }
        core::mem::swap(&mut a, &mut n);
        if (&a % 4u32).to_u32() == Some(3) && (&n % 4u32).to_u32() == Some(3) {
            t = -t;
        }
        a %= &n;
    }
    if n == BigUint::from(1u32) { t } else { 0 }
}

impl Default for FieldElement {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<i64> for FieldElement {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.0.normalize().payload() == other.0.normalize().payload()
    }
}

impl Eq for FieldElement {}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.to_bytes();
        write!(f, "FieldElement(0x")?;
        for b in bytes.iter().rev() {
            write!(f, "{b:02x}")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.to_bytes();
        write!(f, "0x")?;
        for b in bytes.iter().rev() {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl Add<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn add(self, other: &FieldElement) -> FieldElement {
        FieldElement(self.0.add(&other.0))
    }
}

impl Add<&FieldElement> for FieldElement {
    type Output = FieldElement;

    fn add(self, other: &FieldElement) -> FieldElement {
        FieldElement(self.0.add(&other.0))
    }
}

impl Add<FieldElement> for FieldElement {
    type Output = FieldElement;

    fn add(self, other: FieldElement) -> FieldElement {
        FieldElement(self.0.add(&other.0))
    }
}

impl AddAssign<FieldElement> for FieldElement {
    fn add_assign(&mut self, rhs: FieldElement) {
        *self = *self + &rhs;
    }
}

impl AddAssign<&FieldElement> for FieldElement {
    fn add_assign(&mut self, rhs: &FieldElement) {
        *self = *self + rhs;
    }
}

impl Sub<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn sub(self, other: &FieldElement) -> FieldElement {
        FieldElement(self.0.sub(&other.0))
    }
}

impl Sub<&FieldElement> for FieldElement {
    type Output = FieldElement;

    fn sub(self, other: &FieldElement) -> FieldElement {
        FieldElement(self.0.sub(&other.0))
    }
}

impl Sub<FieldElement> for FieldElement {
    type Output = FieldElement;

    fn sub(self, other: FieldElement) -> FieldElement {
        FieldElement(self.0.sub(&other.0))
    }
}

impl SubAssign<FieldElement> for FieldElement {
    fn sub_assign(&mut self, rhs: FieldElement) {
        *self = *self - &rhs;
    }
}

impl SubAssign<&FieldElement> for FieldElement {
    fn sub_assign(&mut self, rhs: &FieldElement) {
        *self = *self - rhs;
    }
}

impl Mul<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn mul(self, other: &FieldElement) -> FieldElement {
        FieldElement(self.0.mul(&other.0))
    }
}

impl Mul<&FieldElement> for FieldElement {
    type Output = FieldElement;

    fn mul(self, other: &FieldElement) -> FieldElement {
        FieldElement(self.0.mul(&other.0))
    }
}

impl Mul<FieldElement> for FieldElement {
    type Output = FieldElement;

    fn mul(self, other: FieldElement) -> FieldElement {
        FieldElement(self.0.mul(&other.0))
    }
}

impl MulAssign<FieldElement> for FieldElement {
    fn mul_assign(&mut self, rhs: FieldElement) {
        *self = *self * &rhs;
    }
}

impl MulAssign<&FieldElement> for FieldElement {
    fn mul_assign(&mut self, rhs: &FieldElement) {
        *self = *self * rhs;
    }
}

impl Neg for FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        FieldElement(self.0.neg())
    }
}

impl Neg for &FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        FieldElement(self.0.neg())
    }
}

impl Sum for FieldElement {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + &x)
    }
}

impl<'a> Sum<&'a FieldElement> for FieldElement {
    fn sum<I: Iterator<Item = &'a FieldElement>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl Product for FieldElement {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, x| acc * &x)
    }
}

impl<'a> Product<&'a FieldElement> for FieldElement {
    fn product<I: Iterator<Item = &'a FieldElement>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, x| acc * x)
    }
}
