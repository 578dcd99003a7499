//! Limb-level helper functions.

use super::uint256::MODULUS;

#[cfg(test)]
use num_bigint::{BigUint, ToBigUint};

/// Computes a + b + carry, returning the result along with the new carry.
#[inline(always)]
pub const fn adc(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let ret = (a as u128) + (b as u128) + (carry as u128);
    (ret as u64, (ret >> 64) as u64)
}

/// Computes a - (b + borrow), returning the result along with the new borrow.
///
/// The borrow is propagated through its top bit: pass the previous borrow
/// word unchanged, a nonzero (all-ones) word means a borrow occurred.
#[inline(always)]
pub const fn sbb(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let ret = (a as u128).wrapping_sub((b as u128) + ((borrow >> 63) as u128));
    (ret as u64, (ret >> 64) as u64)
}

/// Computes a + (b * c) + carry, returning the result along with the new carry.
#[inline(always)]
pub const fn mac(a: u64, b: u64, c: u64, carry: u64) -> (u64, u64) {
    let ret = (a as u128) + ((b as u128) * (c as u128)) + (carry as u128);
    (ret as u64, (ret >> 64) as u64)
}

/// Widening 64x64 multiplication, returning the low and high halves of the
/// 128-bit product.
#[inline(always)]
pub const fn mul_wide(a: u64, b: u64) -> (u64, u64) {
    let ret = (a as u128) * (b as u128);
    (ret as u64, (ret >> 64) as u64)
}

/// Multiplies the four-limb integer `x` by the single limb `y`.
///
/// The 320-bit product is returned as its lowest limb plus the remaining
/// four limbs: `x * y = hi * 2^64 + lo`.
#[inline(always)]
pub const fn mul_word(x: &[u64; 4], y: u64) -> (u64, [u64; 4]) {
    let (lo, carry) = mul_wide(x[0], y);
    let (h0, carry) = mac(0, x[1], y, carry);
    let (h1, carry) = mac(0, x[2], y, carry);
    let (h2, h3) = mac(0, x[3], y, carry);
    (lo, [h0, h1, h2, h3])
}

/// Adds `x * y` into `acc`, shifting the accumulator down one limb.
///
/// With `T = acc + x * y` (at most 320 bits), returns `T mod 2^64` and
/// overwrites `acc` with `T / 2^64`, which always fits four limbs.
#[inline(always)]
pub const fn mul_add_shift(acc: &mut [u64; 4], x: &[u64; 4], y: u64) -> u64 {
    let (low, carry) = mac(acc[0], x[0], y, 0);
    let (a0, carry) = mac(acc[1], x[1], y, carry);
    let (a1, carry) = mac(acc[2], x[2], y, carry);
    let (a2, a3) = mac(acc[3], x[3], y, carry);
    *acc = [a0, a1, a2, a3];
    low
}

/// Word-level Montgomery reduction step: adds `ceil(q * p / 2^64)` to `acc`,
/// wrapping on 256 bits.
///
/// `q * p` is never divisible by 2^64 for nonzero `q` (p is odd), so for
/// nonzero `q` this adds `(q * p >> 64) + 1`: the high limbs of `q * p` plus
/// the carry produced when its low limb annihilates the limb the caller just
/// shifted out.
#[inline(always)]
pub const fn montgomery_step(acc: &mut [u64; 4], q: u64) {
    let p = MODULUS.as_words();
    let (lo, hi) = mul_word(p, q);
    let carry = (lo != 0) as u64;
    let (a0, carry) = adc(acc[0], hi[0], carry);
    let (a1, carry) = adc(acc[1], hi[1], carry);
    let (a2, carry) = adc(acc[2], hi[2], carry);
    let (a3, _) = adc(acc[3], hi[3], carry);
    *acc = [a0, a1, a2, a3];
}

#[cfg(test)]
pub fn u64_array_to_biguint(words: &[u64; 4]) -> BigUint {
    words
        .iter()
        .enumerate()
        .map(|(i, w)| w.to_biguint().unwrap() << (i * 64))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::{BigUint, ToBigUint};
    use proptest::prelude::*;

    #[test]
    fn adc_carries() {
        assert_eq!(adc(u64::MAX, 1, 0), (0, 1));
        assert_eq!(adc(u64::MAX, u64::MAX, 1), (u64::MAX, 1));
        assert_eq!(adc(1, 2, 0), (3, 0));
    }

    #[test]
    fn sbb_borrows() {
        assert_eq!(sbb(0, 1, 0), (u64::MAX, u64::MAX));
        assert_eq!(sbb(5, 3, 0), (2, 0));
        // incoming borrow is carried through the top bit
        let (_, borrow) = sbb(0, 0, u64::MAX);
        assert_eq!(borrow, u64::MAX);
        let (diff, borrow) = sbb(1, 0, u64::MAX);
        assert_eq!((diff, borrow), (0, 0));
    }

    #[test]
    fn mac_saturated() {
        // (2^64-1) + (2^64-1)^2 + (2^64-1) fits in 128 bits
        let (lo, hi) = mac(u64::MAX, u64::MAX, u64::MAX, u64::MAX);
        let want = BigUint::from(u64::MAX)
            + BigUint::from(u64::MAX) * BigUint::from(u64::MAX)
            + BigUint::from(u64::MAX);
        assert_eq!(u64_array_to_biguint(&[lo, hi, 0, 0]), want);
    }

    proptest! {
        #[test]
        fn fuzzy_mul_word(x in any::<[u64; 4]>(), y in any::<u64>()) {
            let (lo, hi) = mul_word(&x, y);
            let want = u64_array_to_biguint(&x) * y.to_biguint().unwrap();
            let got = lo.to_biguint().unwrap() + (u64_array_to_biguint(&hi) << 64);
            prop_assert_eq!(got, want);
        }

        #[test]
        fn fuzzy_mul_add_shift(
            acc in any::<[u64; 4]>(),
            x in any::<[u64; 4]>(),
            y in any::<u64>()
        ) {
            let t = u64_array_to_biguint(&acc) + u64_array_to_biguint(&x) * y.to_biguint().unwrap();
            let mut target = acc;
            let low = mul_add_shift(&mut target, &x, y);
            prop_assert_eq!(low.to_biguint().unwrap(), &t & BigUint::from(u64::MAX));
            prop_assert_eq!(u64_array_to_biguint(&target), &t >> 64);
        }

        #[test]
        fn fuzzy_montgomery_step(acc in any::<[u64; 4]>(), q in 1u64..) {
            // t + (q * p) / 2^64 + 1 on 256-bit wrap-around
            let p = u64_array_to_biguint(MODULUS.as_words());
            let want = (u64_array_to_biguint(&acc) + ((q.to_biguint().unwrap() * &p) >> 64)
                + 1u32.to_biguint().unwrap())
                % (BigUint::from(1u32) << 256);
            let mut target = acc;
            montgomery_step(&mut target, q);
            prop_assert_eq!(u64_array_to_biguint(&target), want);
        }

        #[test]
        fn montgomery_step_zero_is_identity(acc in any::<[u64; 4]>()) {
            let mut target = acc;
            montgomery_step(&mut target, 0);
            prop_assert_eq!(target, acc);
        }
    }
}
