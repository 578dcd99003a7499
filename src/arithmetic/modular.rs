//! Additive modular operations with tiered lazy reduction, and Barrett
//! reduction back to canonical form.
//!
//! Residues move between three working ranges: canonical `[0, p)`, the
//! carry-avoiding `[0, 2^256 - p)` that Montgomery multiplication needs, and
//! the loose `[0, 2p)` where each residue keeps at most two
//! representatives. The additive operations below preserve the range their
//! contract names; a full Barrett reduction is only paid at observation
//! boundaries.

use super::uint256::{MODULUS, MODULUS_DOUBLE, MODULUS_TRIPLE, MU, Uint256};
use super::util::{mac, mul_word, sbb};

/// Reduces a value whose true magnitude is `2^256 + w` after an addition
/// carried out of the top limb: subtracts 2p, then p more if the result
/// still does not fit 256 bits.
#[inline(always)]
const fn reduce_carry(w: Uint256) -> Uint256 {
    let (r, borrow) = w.borrowing_sub(&MODULUS_DOUBLE);
    if borrow != 0 {
        r
    } else {
        w.wrapping_sub(&MODULUS_TRIPLE)
    }
}

impl Uint256 {
    /// Whether the value is already canonical, i.e. strictly below p.
    pub const fn is_reduced(&self) -> bool {
        let (_, borrow) = self.borrowing_sub(&MODULUS);
        borrow != 0
    }

    /// Modular addition preserving the working range of its inputs: inputs
    /// below 2p give a result below 2p, inputs below 2^256 - p give a
    /// result below 2^256 - p.
    pub const fn add_mod(&self, rhs: &Self) -> Self {
        let (sum, carry) = self.carrying_add(rhs);
        let sum = if carry != 0 {
            sum.wrapping_sub(&MODULUS_DOUBLE)
        } else {
            sum
        };
        // One conditional subtraction on the top limb alone: past p's top
        // limb the subtraction cannot underflow.
        if sum.0[3] > MODULUS.0[3] {
            sum.wrapping_sub(&MODULUS)
        } else {
            sum
        }
    }

    /// Modular addition of arbitrary 256-bit residues.
    pub const fn add_mod_any(&self, rhs: &Self) -> Self {
        let (sum, carry) = self.carrying_add(rhs);
        if carry == 0 { sum } else { reduce_carry(sum) }
    }

    /// Modular subtraction keeping results below 2p, given inputs below 2p.
    pub const fn sub_mod(&self, rhs: &Self) -> Self {
        let (diff, borrow) = self.borrowing_sub(rhs);
        if borrow != 0 {
            diff.wrapping_add(&MODULUS_DOUBLE)
        } else {
            diff
        }
    }

    /// Modular subtraction keeping results below 2^256 - p, given inputs
    /// below 2^256 - p: adds p back once, and once more only if the first
    /// addition did not clear the borrow.
    pub const fn sub_mod_compact(&self, rhs: &Self) -> Self {
        let (diff, borrow) = self.borrowing_sub(rhs);
        if borrow == 0 {
            return diff;
        }
        let (fixed, carry) = diff.carrying_add(&MODULUS);
        if carry != 0 {
            fixed
        } else {
            fixed.wrapping_add(&MODULUS)
        }
    }

    /// Modular subtraction of arbitrary 256-bit residues.
    pub const fn sub_mod_any(&self, rhs: &Self) -> Self {
        let (diff, borrow) = self.borrowing_sub(rhs);
        if borrow == 0 {
            return diff;
        }
        let (fixed, carry) = diff.carrying_add(&MODULUS_DOUBLE);
        if carry != 0 {
            fixed
        } else {
            diff.wrapping_add(&MODULUS_TRIPLE)
        }
    }

    /// Modular doubling of an arbitrary 256-bit residue via shift-add.
    pub const fn double_mod_any(&self) -> Self {
        let (shifted, carry) = self.shl1();
        if carry == 0 {
            shifted
        } else {
            reduce_carry(shifted)
        }
    }

    /// Modular negation: p - z, or 2p - z when z exceeds p. Keeps results
    /// below 2p for inputs below 2p.
    pub const fn neg_mod(&self) -> Self {
        let (neg, borrow) = MODULUS.borrowing_sub(self);
        if borrow != 0 {
            MODULUS_DOUBLE.wrapping_sub(self)
        } else {
            neg
        }
    }

    /// One conditional subtraction of p decided on the top limb alone.
    /// Brings any 256-bit value below 2^256 - p.
    pub const fn reduce_partial(&self) -> Self {
        if self.0[3] > MODULUS.0[3] {
            self.wrapping_sub(&MODULUS)
        } else {
            *self
        }
    }

    /// Final conditional subtraction of p. Canonicalizes any value below 2p.
    pub const fn reduce_final(&self) -> Self {
        if self.is_reduced() {
            *self
        } else {
            self.wrapping_sub(&MODULUS)
        }
    }

    /// Full Barrett reduction of an arbitrary 256-bit value to canonical
    /// form, using the precomputed reciprocal `MU = floor(2^512 / p)`.
    ///
    /// The quotient estimate `q3 = floor((z / 2^192) * MU / 2^320)` comes
    /// from the top limb alone and lands within 2 of the true quotient, so
    /// the tail loop subtracts p at most twice.
    pub fn barrett_reduce(&self) -> Self {
        // q1 is a single limb here, so only the top limb of q1 * MU
        // survives the shift by 320 bits
        let q1 = self.0[3];
        let mut carry = 0;
        for mu in MU {
            let (_, c) = mac(0, q1, mu, carry);
            carry = c;
        }
        let q3 = carry;

        // r = (z - q3 * p) mod 2^320
        let (lo, hi) = mul_word(MODULUS.as_words(), q3);
        let r2 = [lo, hi[0], hi[1], hi[2], hi[3]];
        let r1 = [self.0[0], self.0[1], self.0[2], self.0[3], 0];
        reduce_five(sub_five(r1, r2))
    }

    /// Barrett reduction of a 512-bit value `hi * 2^256 + lo` to canonical
    /// form. The quotient estimate starts from the top five limbs of the
    /// dividend, so the subtraction loop still needs at most two rounds.
    pub fn barrett_reduce_wide(lo: &Self, hi: &Self) -> Self {
        let a = [
            lo.0[0], lo.0[1], lo.0[2], lo.0[3], hi.0[0], hi.0[1], hi.0[2], hi.0[3],
        ];

        // q1 = floor(a / 2^192), q3 = floor(q1 * MU / 2^320)
        let q1 = [a[3], a[4], a[5], a[6], a[7]];
        let prod = mul_5x5(&q1, &MU);
        let q3 = [prod[5], prod[6], prod[7], prod[8], prod[9]];

        // r = (a - q3 * p) mod 2^320
        let r2 = mul_low5_wide(&q3, MODULUS.as_words());
        let r1 = [a[0], a[1], a[2], a[3], a[4]];
        reduce_five(sub_five(r1, r2))
    }
}

/// Schoolbook 5x5 limb product.
fn mul_5x5(x: &[u64; 5], y: &[u64; 5]) -> [u64; 10] {
    let mut out = [0u64; 10];
    for i in 0..5 {
        let mut carry = 0;
        for j in 0..5 {
            let (w, c) = mac(out[i + j], x[i], y[j], carry);
            out[i + j] = w;
            carry = c;
        }
        out[i + 5] = carry;
    }
    out
}

/// Low five limbs of a 5x4 limb product.
fn mul_low5_wide(x: &[u64; 5], y: &[u64; 4]) -> [u64; 5] {
    let mut out = [0u64; 5];
    for i in 0..5 {
        let mut carry = 0;
        for j in 0..4.min(5 - i) {
            let (w, c) = mac(out[i + j], x[i], y[j], carry);
            out[i + j] = w;
            carry = c;
        }
        if i == 0 {
            out[4] = carry;
        }
    }
    out
}

/// Five-limb subtraction modulo 2^320.
fn sub_five(l: [u64; 5], r: [u64; 5]) -> [u64; 5] {
    let mut out = [0u64; 5];
    let mut borrow = 0;
    for i in 0..5 {
        let (w, b) = sbb(l[i], r[i], borrow);
        out[i] = w;
        borrow = b;
    }
    out
}

/// Subtracts p from a five-limb Barrett remainder until it is canonical.
/// The Barrett bound guarantees at most two rounds.
fn reduce_five(mut r: [u64; 5]) -> Uint256 {
    let mut rounds = 0;
    loop {
        let low = Uint256([r[0], r[1], r[2], r[3]]);
        if r[4] == 0 && low.is_reduced() {
            return low;
        }
        let p = MODULUS.as_words();
        let mut borrow = 0;
        for i in 0..5 {
            let rhs = if i < 4 { p[i] } else { 0 };
            let (w, b) = sbb(r[i], rhs, borrow);
            r[i] = w;
            borrow = b;
        }
        rounds += 1;
        debug_assert!(rounds <= 2, "Barrett remainder out of bounds");
    }
}

#[cfg(test)]
mod tests {
    use super::super::uint256::NEG_MODULUS;
    use super::*;
    use num_bigint::BigUint;
    use proptest::prelude::*;

    fn modulus_big() -> BigUint {
        MODULUS.to_biguint()
    }

    /// Uniform residue strategies for each working range.
    fn below(bound: Uint256) -> impl Strategy<Value = Uint256> {
        any::<[u64; 4]>().prop_map(move |words| {
            Uint256::from_biguint(&(Uint256(words).to_biguint() % bound.to_biguint()))
        })
    }

    fn any_uint256() -> impl Strategy<Value = Uint256> {
        any::<[u64; 4]>().prop_map(Uint256)
    }

    #[test]
    fn is_reduced_boundaries() {
        assert!(Uint256::ZERO.is_reduced());
        assert!(MODULUS.wrapping_sub(&Uint256::ONE).is_reduced());
        assert!(!MODULUS.is_reduced());
        assert!(!MODULUS_DOUBLE.is_reduced());
    }

    #[test]
    fn reduce_final_maps_p_to_zero() {
        assert_eq!(MODULUS.reduce_final(), Uint256::ZERO);
        assert_eq!(Uint256::ONE.reduce_final(), Uint256::ONE);
    }

    #[test]
    fn barrett_extremes() {
        for x in [
            Uint256::ZERO,
            Uint256::ONE,
            MODULUS,
            MODULUS.wrapping_sub(&Uint256::ONE),
            MODULUS_DOUBLE,
            Uint256([u64::MAX; 4]),
        ] {
            assert_eq!(x.barrett_reduce().to_biguint(), x.to_biguint() % modulus_big());
        }
    }

    #[test]
    fn barrett_wide_extremes() {
        let ones = Uint256([u64::MAX; 4]);
        for (lo, hi) in [
            (Uint256::ZERO, Uint256::ZERO),
            (Uint256::ONE, Uint256::ZERO),
            (Uint256::ZERO, ones),
            (ones, ones),
            (MODULUS, MODULUS),
        ] {
            let a = lo.to_biguint() + (hi.to_biguint() << 256);
            assert_eq!(
                Uint256::barrett_reduce_wide(&lo, &hi).to_biguint(),
                a % modulus_big()
            );
        }
    }

    proptest! {
        #[test]
        fn fuzzy_add_preserves_double_range(
            x in below(MODULUS_DOUBLE),
            y in below(MODULUS_DOUBLE)
        ) {
            let z = x.add_mod(&y);
            prop_assert_eq!(
                z.to_biguint() % modulus_big(),
                (x.to_biguint() + y.to_biguint()) % modulus_big()
            );
            prop_assert!(z < MODULUS_DOUBLE);
        }

        #[test]
        fn fuzzy_add_preserves_compact_range(
            x in below(NEG_MODULUS),
            y in below(NEG_MODULUS)
        ) {
            let z = x.add_mod(&y);
            prop_assert_eq!(
                z.to_biguint() % modulus_big(),
                (x.to_biguint() + y.to_biguint()) % modulus_big()
            );
            prop_assert!(z < NEG_MODULUS);
        }

        #[test]
        fn fuzzy_add_any(x in any_uint256(), y in any_uint256()) {
            let z = x.add_mod_any(&y);
            prop_assert_eq!(
                z.to_biguint() % modulus_big(),
                (x.to_biguint() + y.to_biguint()) % modulus_big()
            );
        }

        #[test]
        fn fuzzy_sub_preserves_double_range(
            x in below(MODULUS_DOUBLE),
            y in below(MODULUS_DOUBLE)
        ) {
            let z = x.sub_mod(&y);
            let p = modulus_big();
            prop_assert_eq!(
                z.to_biguint() % &p,
                (x.to_biguint() + 4u32 * &p - y.to_biguint()) % &p
            );
            prop_assert!(z < MODULUS_DOUBLE);
        }

        #[test]
        fn fuzzy_sub_preserves_compact_range(
            x in below(NEG_MODULUS),
            y in below(NEG_MODULUS)
        ) {
            let z = x.sub_mod_compact(&y);
            let p = modulus_big();
            prop_assert_eq!(
                z.to_biguint() % &p,
                (x.to_biguint() + 4u32 * &p - y.to_biguint()) % &p
            );
            prop_assert!(z < NEG_MODULUS);
        }

        #[test]
        fn fuzzy_sub_any(x in any_uint256(), y in any_uint256()) {
            let z = x.sub_mod_any(&y);
            let p = modulus_big();
            prop_assert_eq!(
                z.to_biguint() % &p,
                (x.to_biguint() + 8u32 * &p - y.to_biguint()) % &p
            );
        }

        #[test]
        fn fuzzy_double_any(x in any_uint256()) {
            let z = x.double_mod_any();
            prop_assert_eq!(
                z.to_biguint() % modulus_big(),
                (2u32 * x.to_biguint()) % modulus_big()
            );
        }

        #[test]
        fn fuzzy_neg(x in below(MODULUS_DOUBLE)) {
            let z = x.neg_mod();
            let p = modulus_big();
            prop_assert_eq!(
                (z.to_biguint() + x.to_biguint()) % &p,
                BigUint::from(0u32)
            );
            prop_assert!(z < MODULUS_DOUBLE);
        }

        #[test]
        fn fuzzy_reduce_partial(x in any_uint256()) {
            let z = x.reduce_partial();
            prop_assert_eq!(
                z.to_biguint() % modulus_big(),
                x.to_biguint() % modulus_big()
            );
            prop_assert!(z < NEG_MODULUS);
        }

        #[test]
        fn fuzzy_reduce_final(x in below(MODULUS_DOUBLE)) {
            let z = x.reduce_final();
            prop_assert_eq!(z.to_biguint(), x.to_biguint() % modulus_big());
        }

        #[test]
        fn fuzzy_barrett(x in any_uint256()) {
            prop_assert_eq!(
                x.barrett_reduce().to_biguint(),
                x.to_biguint() % modulus_big()
            );
        }

        #[test]
        fn fuzzy_barrett_wide(lo in any_uint256(), hi in any_uint256()) {
            let a = lo.to_biguint() + (hi.to_biguint() << 256);
            prop_assert_eq!(
                Uint256::barrett_reduce_wide(&lo, &hi).to_biguint(),
                a % modulus_big()
            );
        }
    }
}
