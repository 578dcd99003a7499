//! Montgomery-form multiplication and variable-time exponentiation.
//!
//! With R = 2^256, a residue u is represented by `u * R mod p`. The product
//! of two representations U, V is `U * V * R^-1 mod p`, computed word by
//! word with the reduction constant `INV = -p^-1 mod 2^64`.
//!
//! Two implementations are kept deliberately: [`mul_montgomery`] iterates
//! the textbook word schedule and serves as the reference, while
//! [`mul_montgomery_unrolled`] is the straight-line production path. Both
//! must agree bit for bit on every input; a differential test below holds
//! them to that.

use super::uint256::{INV, MODULUS, MONT_ONE, MONT_R2, MONT_R3, NEG_MODULUS, Uint256};
use super::util::{adc, mac, mul_add_shift, montgomery_step};

/// Whether a value is in the carry-avoiding range `[0, 2^256 - p)` that the
/// Montgomery word schedule requires of its inputs.
const fn fits_carry_range(x: &Uint256) -> bool {
    let (_, borrow) = x.borrowing_sub(&NEG_MODULUS);
    borrow != 0
}

/// Montgomery product, one word of `b` at a time.
///
/// Inputs must be below 2^256 - p; the result is below 2^256 - p and
/// congruent to `a * b * R^-1 mod p`.
pub(crate) const fn mul_montgomery(a: &Uint256, b: &Uint256) -> Uint256 {
    debug_assert!(fits_carry_range(a) && fits_carry_range(b));

    let mut acc = [0u64; 4];
    let mut i = 0;
    while i < 4 {
        let low = mul_add_shift(&mut acc, a.as_words(), b.as_words()[i]);
        let q = low.wrapping_mul(INV);
        montgomery_step(&mut acc, q);
        i += 1;
    }
    Uint256(acc).reduce_partial()
}

/// Montgomery product with the word schedule fully unrolled: a straight-line
/// 4x4 schoolbook multiplication followed by a straight-line reduction.
///
/// Same contract as [`mul_montgomery`], and bit-identical output.
pub(crate) const fn mul_montgomery_unrolled(a: &Uint256, b: &Uint256) -> Uint256 {
    debug_assert!(fits_carry_range(a) && fits_carry_range(b));

    let a = a.as_words();
    let b = b.as_words();

    let (r0, carry) = mac(0, a[0], b[0], 0);
    let (r1, carry) = mac(0, a[0], b[1], carry);
    let (r2, carry) = mac(0, a[0], b[2], carry);
    let (r3, r4) = mac(0, a[0], b[3], carry);

    let (r1, carry) = mac(r1, a[1], b[0], 0);
    let (r2, carry) = mac(r2, a[1], b[1], carry);
    let (r3, carry) = mac(r3, a[1], b[2], carry);
    let (r4, r5) = mac(r4, a[1], b[3], carry);

    let (r2, carry) = mac(r2, a[2], b[0], 0);
    let (r3, carry) = mac(r3, a[2], b[1], carry);
    let (r4, carry) = mac(r4, a[2], b[2], carry);
    let (r5, r6) = mac(r5, a[2], b[3], carry);

    let (r3, carry) = mac(r3, a[3], b[0], 0);
    let (r4, carry) = mac(r4, a[3], b[1], carry);
    let (r5, carry) = mac(r5, a[3], b[2], carry);
    let (r6, r7) = mac(r6, a[3], b[3], carry);

    montgomery_reduce_wide(r0, r1, r2, r3, r4, r5, r6, r7)
}

/// Reduces a 512-bit product to a Montgomery representation below
/// 2^256 - p.
#[allow(clippy::too_many_arguments)]
const fn montgomery_reduce_wide(
    r0: u64,
    r1: u64,
    r2: u64,
    r3: u64,
    r4: u64,
    r5: u64,
    r6: u64,
    r7: u64,
) -> Uint256 {
    let p = MODULUS.as_words();

    let k = r0.wrapping_mul(INV);
    let (_, carry) = mac(r0, k, p[0], 0);
    let (r1, carry) = mac(r1, k, p[1], carry);
    let (r2, carry) = mac(r2, k, p[2], carry);
    let (r3, carry) = mac(r3, k, p[3], carry);
    let (r4, carry2) = adc(r4, 0, carry);

    let k = r1.wrapping_mul(INV);
    let (_, carry) = mac(r1, k, p[0], 0);
    let (r2, carry) = mac(r2, k, p[1], carry);
    let (r3, carry) = mac(r3, k, p[2], carry);
    let (r4, carry) = mac(r4, k, p[3], carry);
    let (r5, carry2) = adc(r5, carry2, carry);

    let k = r2.wrapping_mul(INV);
    let (_, carry) = mac(r2, k, p[0], 0);
    let (r3, carry) = mac(r3, k, p[1], carry);
    let (r4, carry) = mac(r4, k, p[2], carry);
    let (r5, carry) = mac(r5, k, p[3], carry);
    let (r6, carry2) = adc(r6, carry2, carry);

    let k = r3.wrapping_mul(INV);
    let (_, carry) = mac(r3, k, p[0], 0);
    let (r4, carry) = mac(r4, k, p[1], carry);
    let (r5, carry) = mac(r5, k, p[2], carry);
    let (r6, carry) = mac(r6, k, p[3], carry);
    let (r7, carry) = adc(r7, carry2, carry);
    debug_assert!(carry == 0);

    Uint256([r4, r5, r6, r7]).reduce_partial()
}

/// Moves a canonical value into Montgomery form: `u * R mod p`, via one
/// product by R^2 mod p.
pub(crate) const fn to_montgomery(u: &Uint256) -> Uint256 {
    mul_montgomery_unrolled(u, &MONT_R2)
}

/// Recovers the canonical value from a Montgomery representation: one
/// product by 1, whose result is at most p, then a final conditional
/// subtraction.
pub(crate) const fn from_montgomery(u: &Uint256) -> Uint256 {
    mul_montgomery_unrolled(u, &Uint256::ONE).reduce_final()
}

/// Variable-time modular exponentiation with a 4-bit sliding window.
///
/// `base` and the result are in Montgomery form; the result is canonical.
/// An all-zero exponent produces the Montgomery representation of 1.
pub(crate) fn pow_montgomery(base: &Uint256, exp: &Uint256) -> Uint256 {
    let base = base.reduce_partial();

    // Odd powers base^1, base^3, ..., base^15
    let base_sq = mul_montgomery_unrolled(&base, &base);
    let mut table = [base; 8];
    let mut i = 1;
    while i < 8 {
        table[i] = mul_montgomery_unrolled(&table[i - 1], &base_sq);
        i += 1;
    }

    let mut acc = MONT_ONE;
    let mut i: i32 = 255;
    while i >= 0 {
        if !exp.bit(i as usize) {
            acc = mul_montgomery_unrolled(&acc, &acc);
            i -= 1;
            continue;
        }

        // Take the widest window of at most four bits ending in a set bit.
        let mut j = if i >= 3 { i - 3 } else { 0 };
        while !exp.bit(j as usize) {
            j += 1;
        }
        let width = (i - j + 1) as usize;
        let mut w = 0u64;
        for k in (0..width).rev() {
            w = (w << 1) | exp.bit(j as usize + k) as u64;
        }

        for _ in 0..width {
            acc = mul_montgomery_unrolled(&acc, &acc);
        }
        acc = mul_montgomery_unrolled(&acc, &table[((w - 1) / 2) as usize]);
        i = j - 1;
    }

    acc.barrett_reduce()
}

// R^2 mod p must map back to R mod p under a Montgomery product by 1, and
// R^3 mod p back to R^2 mod p.
const _: () = {
    let one = mul_montgomery(&MONT_R2, &Uint256::ONE);
    let (diff, _) = one.borrowing_sub(&MONT_ONE);
    assert!(diff.is_zero(), "R^2 mod p is inconsistent with R mod p");

    let r2 = mul_montgomery(&MONT_R3, &Uint256::ONE);
    let (diff, _) = r2.borrowing_sub(&MONT_R2);
    assert!(diff.is_zero(), "R^3 mod p is inconsistent with R^2 mod p");
};

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;
    use proptest::prelude::*;

    fn modulus_big() -> BigUint {
        MODULUS.to_biguint()
    }

    /// R^-1 mod p.
    fn r_inv() -> BigUint {
        let p = modulus_big();
        (BigUint::from(1u32) << 256u32).modpow(&(&p - BigUint::from(2u32)), &p)
    }

    fn carry_range() -> impl Strategy<Value = Uint256> {
        any::<[u64; 4]>().prop_map(|words| {
            Uint256::from_biguint(&(Uint256(words).to_biguint() % NEG_MODULUS.to_biguint()))
        })
    }

    fn canonical() -> impl Strategy<Value = Uint256> {
        any::<[u64; 4]>().prop_map(|words| {
            Uint256::from_biguint(&(Uint256(words).to_biguint() % modulus_big()))
        })
    }

    #[test]
    fn multiplication_by_zero_and_one() {
        let x = to_montgomery(&Uint256::from_u64(42));
        assert_eq!(mul_montgomery(&x, &Uint256::ZERO), Uint256::ZERO);
        assert_eq!(mul_montgomery(&Uint256::ZERO, &x), Uint256::ZERO);
        assert_eq!(
            mul_montgomery(&x, &MONT_ONE).barrett_reduce(),
            x.barrett_reduce()
        );
    }

    #[test]
    fn round_trip_small_values() {
        for v in 0..32u64 {
            let x = Uint256::from_u64(v);
            assert_eq!(from_montgomery(&to_montgomery(&x)), x);
        }
    }

    #[test]
    fn pow_zero_exponent_is_montgomery_one() {
        assert_eq!(pow_montgomery(&Uint256::ZERO, &Uint256::ZERO), MONT_ONE);
        let x = to_montgomery(&Uint256::from_u64(7));
        assert_eq!(pow_montgomery(&x, &Uint256::ZERO), MONT_ONE);
    }

    #[test]
    fn pow_of_zero_base() {
        assert_eq!(
            pow_montgomery(&Uint256::ZERO, &Uint256::from_u64(5)),
            Uint256::ZERO
        );
    }

    proptest! {
        #[test]
        fn fuzzy_rolled_equals_unrolled(a in carry_range(), b in carry_range()) {
            prop_assert_eq!(mul_montgomery(&a, &b), mul_montgomery_unrolled(&a, &b));
        }

        #[test]
        fn fuzzy_product_semantics(a in carry_range(), b in carry_range()) {
            let got = mul_montgomery_unrolled(&a, &b);
            prop_assert!(got < NEG_MODULUS);
            let want = a.to_biguint() * b.to_biguint() * r_inv() % modulus_big();
            prop_assert_eq!(got.to_biguint() % modulus_big(), want);
        }

        #[test]
        fn fuzzy_form_round_trip(x in canonical()) {
            prop_assert_eq!(from_montgomery(&to_montgomery(&x)), x);
        }

        #[test]
        fn fuzzy_form_round_trip_reversed(u in carry_range()) {
            let back = to_montgomery(&from_montgomery(&u));
            prop_assert_eq!(
                back.to_biguint() % modulus_big(),
                u.to_biguint() % modulus_big()
            );
        }

        #[test]
        fn fuzzy_pow_matches_modpow(x in canonical(), e in any::<[u64; 4]>()) {
            let e = Uint256(e);
            let p = modulus_big();
            let got = pow_montgomery(&to_montgomery(&x), &e);
            let want = x.to_biguint().modpow(&e.to_biguint(), &p) * (BigUint::from(1u32) << 256) % &p;
            prop_assert_eq!(got.to_biguint(), want);
        }
    }
}
