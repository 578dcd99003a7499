//! Raw 256-bit unsigned integers stored as four 64-bit little-endian limbs,
//! plus every modulus-derived constant used by the arithmetic layers.

use super::util::{adc, mac, sbb};
use core::cmp::Ordering;
use core::fmt;
use num_bigint::BigUint;
use num_traits::cast::ToPrimitive;

/// Number of 64-bit limbs in a [`Uint256`].
pub const LIMBS: usize = 4;

/// An unsigned 256-bit integer.
///
/// Limb 0 is least significant. This is a plain container: all modular
/// semantics live in the layers above.
#[derive(Clone, Copy, Default, Eq, PartialEq)]
pub struct Uint256(pub(crate) [u64; LIMBS]);

/// Constant representing the modulus
/// p = 0x73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001
pub const MODULUS: Uint256 = Uint256([
    0xffff_ffff_0000_0001,
    0x53bd_a402_fffe_5bfe,
    0x3339_d808_09a1_d805,
    0x73ed_a753_299d_7d48,
]);

/// 2p. Fits 256 bits since p < 2^255.
pub(crate) const MODULUS_DOUBLE: Uint256 = Uint256([
    0xffff_fffe_0000_0002,
    0xa77b_4805_fffc_b7fd,
    0x6673_b010_1343_b00a,
    0xe7db_4ea6_533a_fa90,
]);

/// 3p mod 2^256.
pub(crate) const MODULUS_TRIPLE: Uint256 = Uint256([
    0xffff_fffd_0000_0003,
    0xfb38_ec08_fffb_13fc,
    0x99ad_8818_1ce5_880f,
    0x5bc8_f5f9_7cd8_77d8,
]);

/// 2^256 - p: the first value whose addition to p carries out of 256 bits.
pub(crate) const NEG_MODULUS: Uint256 = Uint256([
    0x0000_0000_ffff_ffff,
    0xac42_5bfd_0001_a401,
    0xccc6_27f7_f65e_27fa,
    0x8c12_58ac_d662_82b7,
]);

/// Barrett reciprocal MU = floor(2^512 / p), five limbs.
pub(crate) const MU: [u64; 5] = [
    0x4273_7a02_0c0d_6393,
    0x6504_3eb4_be4b_ad71,
    0x38b5_dcb7_07e0_8ed3,
    0x3550_94ed_fede_377c,
    0x0000_0000_0000_0002,
];

/// R mod p where R = 2^256: the Montgomery representation of 1.
pub(crate) const MONT_ONE: Uint256 = Uint256([
    0x0000_0001_ffff_fffe,
    0x5884_b7fa_0003_4802,
    0x998c_4fef_ecbc_4ff5,
    0x1824_b159_acc5_056f,
]);

/// p - (R mod p): the Montgomery representation of -1.
pub(crate) const MONT_MINUS_ONE: Uint256 = Uint256([
    0xffff_fffd_0000_0003,
    0xfb38_ec08_fffb_13fc,
    0x99ad_8818_1ce5_880f,
    0x5bc8_f5f9_7cd8_77d8,
]);

/// R^2 mod p, used to move values into Montgomery form.
pub(crate) const MONT_R2: Uint256 = Uint256([
    0xc999_e990_f3f2_9c6d,
    0x2b6c_edcb_8792_5c23,
    0x05d3_1496_7254_398f,
    0x0748_d9d9_9f59_ff11,
]);

/// R^3 mod p, used to lift a direct inverse of a Montgomery representation
/// back into Montgomery form with a single product.
pub(crate) const MONT_R3: Uint256 = Uint256([
    0xc62c_1807_439b_73af,
    0x1b3e_0d18_8cf0_6990,
    0x73d1_3c71_c7b5_f418,
    0x6e2a_5bb9_c8db_33e9,
]);

/// -p^-1 mod 2^64, the word-level Montgomery constant.
pub(crate) const INV: u64 = 0xffff_fffe_ffff_ffff;

/// (p - 1) / 2.
pub(crate) const FRAC_MODULUS_2: Uint256 = Uint256([
    0x7fff_ffff_8000_0000,
    0xa9de_d201_7fff_2dff,
    0x199c_ec04_04d0_ec02,
    0x39f6_d3a9_94ce_bea4,
]);

/// (p + 1) / 2, which is also the canonical value of 2^-1 mod p.
pub(crate) const FRAC_MODULUS_2_CEIL: Uint256 = Uint256([
    0x7fff_ffff_8000_0001,
    0xa9de_d201_7fff_2dff,
    0x199c_ec04_04d0_ec02,
    0x39f6_d3a9_94ce_bea4,
]);

impl Uint256 {
    /// The value 0.
    pub const ZERO: Self = Self([0, 0, 0, 0]);

    /// The value 1.
    pub const ONE: Self = Self([1, 0, 0, 0]);

    /// Constructs from four little-endian limbs.
    pub const fn from_words(words: [u64; LIMBS]) -> Self {
        Self(words)
    }

    /// Borrows the little-endian limbs.
    pub const fn as_words(&self) -> &[u64; LIMBS] {
        &self.0
    }

    /// Returns the little-endian limbs.
    pub const fn to_words(self) -> [u64; LIMBS] {
        self.0
    }

    /// Constructs from a single limb.
    pub const fn from_u64(value: u64) -> Self {
        Self([value, 0, 0, 0])
    }

    /// Reads a 256-bit integer from its 32-byte little-endian encoding:
    /// limb 0 occupies bytes 0..8.
    pub fn from_le_bytes(bytes: &[u8; 32]) -> Self {
        let mut w = [0u64; LIMBS];
        for (i, word) in w.iter_mut().enumerate() {
            *word = u64::from_le_bytes(bytes[i * 8..(i + 1) * 8].try_into().expect("8 bytes"));
        }
        Self(w)
    }

    /// Writes the 32-byte little-endian encoding.
    pub fn to_le_bytes(&self) -> [u8; 32] {
        let mut ret = [0u8; 32];
        for (i, word) in self.0.iter().enumerate() {
            ret[i * 8..(i + 1) * 8].copy_from_slice(&word.to_le_bytes());
        }
        ret
    }

    /// Whether all limbs are zero.
    pub const fn is_zero(&self) -> bool {
        (self.0[0] | self.0[1] | self.0[2] | self.0[3]) == 0
    }

    pub(crate) const fn is_odd(&self) -> bool {
        self.0[0] & 1 == 1
    }

    /// Returns bit `i` (little-endian numbering). Out-of-range bits are zero.
    pub fn bit(&self, i: usize) -> bool {
        if i >= 256 {
            return false;
        }
        (self.0[i >> 6] >> (i & 0x3f)) & 1 == 1
    }

    /// Shifts left by one bit, returning the shifted-out top bit.
    pub(crate) const fn shl1(&self) -> (Self, u64) {
        (
            Self([
                self.0[0] << 1,
                (self.0[1] << 1) | (self.0[0] >> 63),
                (self.0[2] << 1) | (self.0[1] >> 63),
                (self.0[3] << 1) | (self.0[2] >> 63),
            ]),
            self.0[3] >> 63,
        )
    }

    /// Shifts right by one bit.
    pub(crate) const fn shr1(&self) -> Self {
        Self([
            (self.0[0] >> 1) | (self.0[1] << 63),
            (self.0[1] >> 1) | (self.0[2] << 63),
            (self.0[2] >> 1) | (self.0[3] << 63),
            self.0[3] >> 1,
        ])
    }

    /// Limb-wise addition. Returns the wrapped sum and the carry out (0 or 1).
    pub(crate) const fn carrying_add(&self, rhs: &Self) -> (Self, u64) {
        let (w0, carry) = adc(self.0[0], rhs.0[0], 0);
        let (w1, carry) = adc(self.0[1], rhs.0[1], carry);
        let (w2, carry) = adc(self.0[2], rhs.0[2], carry);
        let (w3, carry) = adc(self.0[3], rhs.0[3], carry);
        (Self([w0, w1, w2, w3]), carry)
    }

    /// Limb-wise subtraction. Returns the wrapped difference and the borrow
    /// out (0, or all-ones if the subtraction underflowed).
    pub(crate) const fn borrowing_sub(&self, rhs: &Self) -> (Self, u64) {
        let (w0, borrow) = sbb(self.0[0], rhs.0[0], 0);
        let (w1, borrow) = sbb(self.0[1], rhs.0[1], borrow);
        let (w2, borrow) = sbb(self.0[2], rhs.0[2], borrow);
        let (w3, borrow) = sbb(self.0[3], rhs.0[3], borrow);
        (Self([w0, w1, w2, w3]), borrow)
    }

    pub(crate) const fn wrapping_add(&self, rhs: &Self) -> Self {
        self.carrying_add(rhs).0
    }

    pub(crate) const fn wrapping_sub(&self, rhs: &Self) -> Self {
        self.borrowing_sub(rhs).0
    }

    /// Truncates an arbitrary-precision integer to its low 256 bits.
    pub fn from_biguint(value: &BigUint) -> Self {
        let mask = BigUint::from(u64::MAX);
        let mut w = [0u64; LIMBS];
        for (i, word) in w.iter_mut().enumerate() {
            *word = ((value >> (i * 64)) & &mask).to_u64().expect("masked to 64 bits");
        }
        Self(w)
    }

    /// Converts to an arbitrary-precision integer.
    pub fn to_biguint(&self) -> BigUint {
        self.0
            .iter()
            .enumerate()
            .map(|(i, w)| BigUint::from(*w) << (i * 64))
            .sum()
    }
}

impl Ord for Uint256 {
    fn cmp(&self, other: &Self) -> Ordering {
        for i in (0..LIMBS).rev() {
            match self.0[i].cmp(&other.0[i]) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Uint256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Uint256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uint256(0x")?;
        for word in self.0.iter().rev() {
            write!(f, "{word:016x}")?;
        }
        write!(f, ")")
    }
}

impl From<u64> for Uint256 {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

// Compile-time re-derivation of the stored constants from p alone. The
// arrays above are authoritative for readers; these checks keep them honest.
const _: () = {
    const fn eq(a: &Uint256, b: &Uint256) -> bool {
        a.0[0] == b.0[0] && a.0[1] == b.0[1] && a.0[2] == b.0[2] && a.0[3] == b.0[3]
    }

    // 2p and 3p
    let (twice, carry) = MODULUS.shl1();
    assert!(carry == 0 && eq(&twice, &MODULUS_DOUBLE));
    let (triple, carry) = MODULUS_DOUBLE.carrying_add(&MODULUS);
    assert!(carry == 1 && eq(&triple, &MODULUS_TRIPLE));

    // 2^256 - p and R mod p = 2^256 - 2p
    let (sum, carry) = NEG_MODULUS.carrying_add(&MODULUS);
    assert!(carry == 1 && sum.is_zero());
    let (sum, carry) = MONT_ONE.carrying_add(&MODULUS_DOUBLE);
    assert!(carry == 1 && sum.is_zero());
    let (sum, carry) = MONT_ONE.carrying_add(&MONT_MINUS_ONE);
    assert!(carry == 0 && eq(&sum, &MODULUS));

    // word-level Montgomery constant: p * INV = -1 mod 2^64
    assert!(MODULUS.0[0].wrapping_mul(INV) == u64::MAX);

    // (p -+ 1) / 2
    let (twice, carry) = FRAC_MODULUS_2.shl1();
    assert!(carry == 0 && eq(&twice.wrapping_add(&Uint256::ONE), &MODULUS));
    assert!(eq(
        &FRAC_MODULUS_2.wrapping_add(&Uint256::ONE),
        &FRAC_MODULUS_2_CEIL
    ));
};

// MU is the floor of 2^512 / p: MU * p must land within p of 2^512.
const _: () = {
    // 9-limb schoolbook product MU * p
    let p = MODULUS.0;
    let mut prod = [0u64; 9];
    let mut i = 0;
    while i < 5 {
        let mut carry = 0u64;
        let mut j = 0;
        while j < 4 {
            let (w, c) = mac(prod[i + j], MU[i], p[j], carry);
            prod[i + j] = w;
            carry = c;
            j += 1;
        }
        prod[i + 4] = carry;
        i += 1;
    }

    // remainder 2^512 - MU * p
    let mut rem = [0u64; 9];
    let mut borrow = 0u64;
    let mut i = 0;
    while i < 9 {
        let lhs = if i == 8 { 1 } else { 0 };
        let (w, b) = sbb(lhs, prod[i], borrow);
        rem[i] = w;
        borrow = b;
        i += 1;
    }
    assert!(borrow == 0, "MU * p exceeds 2^512");
    assert!(rem[4] == 0 && rem[5] == 0 && rem[6] == 0 && rem[7] == 0 && rem[8] == 0);

    // remainder < p
    let (_, borrow) = Uint256([rem[0], rem[1], rem[2], rem[3]]).borrowing_sub(&MODULUS);
    assert!(borrow != 0, "MU is too small");
};

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;
    use proptest::prelude::*;

    fn modulus_big() -> BigUint {
        MODULUS.to_biguint()
    }

    #[test]
    fn rederive_constants_from_modulus() {
        let p = modulus_big();
        let r = BigUint::from(1u32) << 256;

        assert_eq!(MODULUS_DOUBLE.to_biguint(), 2u32 * &p);
        assert_eq!(MODULUS_TRIPLE.to_biguint(), 3u32 * &p % &r);
        assert_eq!(NEG_MODULUS.to_biguint(), &r - &p);
        assert_eq!(MONT_ONE.to_biguint(), &r % &p);
        assert_eq!(MONT_MINUS_ONE.to_biguint(), &p - (&r % &p));
        assert_eq!(MONT_R2.to_biguint(), (&r * &r) % &p);
        assert_eq!(MONT_R3.to_biguint(), (&r * &r * &r) % &p);
        assert_eq!(FRAC_MODULUS_2.to_biguint(), (&p - 1u32) / 2u32);
        assert_eq!(FRAC_MODULUS_2_CEIL.to_biguint(), (&p + 1u32) / 2u32);

        let mu: BigUint = MU
            .iter()
            .enumerate()
            .map(|(i, w)| BigUint::from(*w) << (i * 64))
            .sum();
        assert_eq!(mu, (BigUint::from(1u32) << 512) / &p);

        // p * INV = -1 mod 2^64
        let inv = (&p * BigUint::from(INV)) & BigUint::from(u64::MAX);
        assert_eq!(inv, BigUint::from(u64::MAX));
    }

    #[test]
    fn byte_round_trip() {
        let x = Uint256([1, 2, 3, 4]);
        assert_eq!(Uint256::from_le_bytes(&x.to_le_bytes()), x);

        let mut bytes = [0u8; 32];
        bytes[0] = 0x2a;
        bytes[31] = 0x80;
        let x = Uint256::from_le_bytes(&bytes);
        assert_eq!(x.0, [0x2a, 0, 0, 0x8000_0000_0000_0000]);
        assert_eq!(x.to_le_bytes(), bytes);
    }

    #[test]
    fn ordering_is_most_significant_first() {
        assert!(Uint256([0, 0, 0, 1]) > Uint256([u64::MAX, u64::MAX, u64::MAX, 0]));
        assert!(Uint256([1, 0, 0, 0]) < Uint256([2, 0, 0, 0]));
        assert_eq!(MODULUS.cmp(&MODULUS), core::cmp::Ordering::Equal);
        assert!(MODULUS < MODULUS_DOUBLE);
    }

    #[test]
    fn shifts() {
        let (x, carry) = Uint256([0, 0, 0, 1 << 63]).shl1();
        assert_eq!((x, carry), (Uint256::ZERO, 1));
        assert_eq!(Uint256([0, 1, 0, 0]).shr1(), Uint256([1 << 63, 0, 0, 0]));
    }

    #[test]
    fn bit_indexing() {
        assert!(Uint256::ONE.bit(0));
        assert!(!Uint256::ONE.bit(1));
        assert!(Uint256([0, 0, 0, 1 << 63]).bit(255));
        assert!(!Uint256([0, 0, 0, 1 << 63]).bit(256));
    }

    proptest! {
        #[test]
        fn fuzzy_biguint_round_trip(words in any::<[u64; 4]>()) {
            let x = Uint256(words);
            prop_assert_eq!(Uint256::from_biguint(&x.to_biguint()), x);
        }

        #[test]
        fn fuzzy_cmp_matches_biguint(a in any::<[u64; 4]>(), b in any::<[u64; 4]>()) {
            let (a, b) = (Uint256(a), Uint256(b));
            prop_assert_eq!(a.cmp(&b), a.to_biguint().cmp(&b.to_biguint()));
        }
    }
}
