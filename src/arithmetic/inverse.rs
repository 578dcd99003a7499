//! Variable-time modular inversion: binary extended Euclid on the odd
//! modulus p.
//!
//! The Bezout coefficients are tracked in five-limb two's-complement
//! accumulators. The fifth limb is required because the coefficients go
//! negative and briefly exceed 256 bits; every right shift on them must be
//! arithmetic so the sign survives.

use super::uint256::{MODULUS, Uint256};
use super::util::{adc, sbb};

/// Signed 320-bit accumulator, two's complement, little-endian limbs.
type Accumulator = [u64; 5];

const MODULUS_EXT: Accumulator = [
    MODULUS.0[0],
    MODULUS.0[1],
    MODULUS.0[2],
    MODULUS.0[3],
    0,
];

fn is_negative(a: &Accumulator) -> bool {
    a[4] >> 63 == 1
}

fn is_odd(a: &Accumulator) -> bool {
    a[0] & 1 == 1
}

/// a += b, wrapping on 320 bits.
fn add_assign(a: &mut Accumulator, b: &Accumulator) {
    let mut carry = 0;
    for i in 0..5 {
        let (w, c) = adc(a[i], b[i], carry);
        a[i] = w;
        carry = c;
    }
}

/// a -= b, wrapping on 320 bits.
fn sub_assign(a: &mut Accumulator, b: &Accumulator) {
    let mut borrow = 0;
    for i in 0..5 {
        let (w, bo) = sbb(a[i], b[i], borrow);
        a[i] = w;
        borrow = bo;
    }
}

/// Arithmetic right shift by one bit.
fn shr1_assign(a: &mut Accumulator) {
    for i in 0..4 {
        a[i] = (a[i] >> 1) | (a[i + 1] << 63);
    }
    a[4] = ((a[4] as i64) >> 1) as u64;
}

/// Computes `x^-1 mod p`, or `None` when x is congruent to zero.
///
/// Accepts any 256-bit representative; the input is canonicalized with one
/// Barrett reduction before the zero test. The result is canonical.
pub(crate) fn invert(x: &Uint256) -> Option<Uint256> {
    let x = x.barrett_reduce();
    if x.is_zero() {
        return None;
    }

    let mut u = x;
    let mut v = MODULUS;
    let mut a: Accumulator = [1, 0, 0, 0, 0];
    let mut c: Accumulator = [0; 5];

    // Loop invariants: u = a * x mod p, v = c * x mod p, and u or v is odd.
    while !u.is_zero() {
        while !u.is_odd() {
            u = u.shr1();
            if is_odd(&a) {
                add_assign(&mut a, &MODULUS_EXT);
            }
            shr1_assign(&mut a);
        }
        while !v.is_odd() {
            v = v.shr1();
            if is_odd(&c) {
                add_assign(&mut c, &MODULUS_EXT);
            }
            shr1_assign(&mut c);
        }

        let (diff, borrow) = u.borrowing_sub(&v);
        if borrow == 0 {
            u = diff;
            sub_assign(&mut a, &c);
        } else {
            v = v.wrapping_sub(&u);
            sub_assign(&mut c, &a);
        }
    }

    // gcd(x, p) lands in v; p is prime and x is nonzero.
    debug_assert!(v == Uint256::ONE);

    // c holds the inverse as a signed value of magnitude a little above 2p
    // in the worst case observed over the full modulus, so each fix-up
    // loop needs at most three rounds. The counters keep that claim
    // checked instead of trusted.
    let mut rounds = 0;
    while is_negative(&c) {
        add_assign(&mut c, &MODULUS_EXT);
        rounds += 1;
        debug_assert!(rounds <= 4, "inverse accumulator out of bounds");
    }
    while c[4] != 0 {
        sub_assign(&mut c, &MODULUS_EXT);
        rounds += 1;
        debug_assert!(rounds <= 6, "inverse accumulator out of bounds");
    }

    let mut inverse = Uint256([c[0], c[1], c[2], c[3]]);
    while !inverse.is_reduced() {
        inverse = inverse.wrapping_sub(&MODULUS);
        rounds += 1;
        debug_assert!(rounds <= 8, "inverse accumulator out of bounds");
    }
    Some(inverse)
}
