//! Raw Montgomery-form field element operations on the 4x64 limb
//! representation.
//!
//! Methods here state their range contracts but do not check them; the
//! checked wrapper lives in `field_impl`.

use super::inverse;
use super::montgomery;
use super::uint256::{MODULUS, MONT_MINUS_ONE, MONT_ONE, MONT_R3, Uint256};

/// A field element as a Montgomery representation below 2p. Most operations
/// return representations below 2^256 - p, which is what the Montgomery
/// product requires of its inputs.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FieldElement4x64(pub(crate) Uint256);

impl FieldElement4x64 {
    pub const fn zero() -> Self {
        Self(Uint256::ZERO)
    }

    pub const fn one() -> Self {
        Self(MONT_ONE)
    }

    pub const fn minus_one() -> Self {
        Self(MONT_MINUS_ONE)
    }

    /// Converts a canonical integer below p into Montgomery form.
    pub const fn from_canonical(value: &Uint256) -> Self {
        Self(montgomery::to_montgomery(value))
    }

    /// Recovers the canonical integer below p.
    pub const fn to_canonical(&self) -> Uint256 {
        montgomery::from_montgomery(&self.0.reduce_partial())
    }

    /// The Montgomery representation itself.
    pub const fn payload(&self) -> &Uint256 {
        &self.0
    }

    /// Whether the represented residue is zero. Both representations of
    /// zero below 2p, the all-zero payload and p itself, are accepted.
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero() || {
            let (diff, _) = self.0.borrowing_sub(&MODULUS);
            diff.is_zero()
        }
    }

    pub const fn add(&self, rhs: &Self) -> Self {
        Self(self.0.add_mod(&rhs.0))
    }

    pub const fn sub(&self, rhs: &Self) -> Self {
        Self(self.0.sub_mod(&rhs.0))
    }

    pub const fn neg(&self) -> Self {
        Self(self.0.neg_mod().reduce_partial())
    }

    pub const fn double(&self) -> Self {
        Self(self.0.double_mod_any().reduce_partial())
    }

    /// 5x via two doublings and one addition.
    pub const fn mul_five(&self) -> Self {
        Self(self.double().double().0.add_mod(&self.0))
    }

    /// Montgomery product. Operands are tightened below 2^256 - p with one
    /// conditional subtraction each before entering the word schedule.
    pub const fn mul(&self, rhs: &Self) -> Self {
        Self(montgomery::mul_montgomery_unrolled(
            &self.0.reduce_partial(),
            &rhs.0.reduce_partial(),
        ))
    }

    pub const fn square(&self) -> Self {
        self.mul(self)
    }

    /// Variable-time exponentiation by a 256-bit integer; the result is a
    /// canonical Montgomery representation.
    pub fn pow(&self, exp: &Uint256) -> Self {
        Self(montgomery::pow_montgomery(&self.0.reduce_partial(), exp))
    }

    /// Multiplicative inverse, or `None` for both representations of zero.
    ///
    /// The payload is inverted directly and lifted back into Montgomery
    /// form with a single product by R^3 mod p.
    pub fn invert(&self) -> Option<Self> {
        let raw_inverse = inverse::invert(&self.0)?;
        Some(Self(montgomery::mul_montgomery_unrolled(
            &raw_inverse,
            &MONT_R3,
        )))
    }

    /// Forces the canonical representation of the payload.
    pub fn normalize(&self) -> Self {
        Self(self.0.barrett_reduce())
    }

    /// Replaces the payload with the representative below 2p selected by
    /// the seed's low bit: the canonical one, or the canonical one plus p.
    pub fn rerandomize(&self, seed: u64) -> Self {
        let canonical = self.0.barrett_reduce();
        if seed & 1 == 1 {
            let (shifted, carry) = canonical.carrying_add(&MODULUS);
            debug_assert!(carry == 0);
            Self(shifted)
        } else {
            Self(canonical)
        }
    }
}
