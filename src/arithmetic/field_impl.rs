//! Field element implementation selection.
//!
//! Release builds use the raw 4x64 representation directly. Debug builds
//! wrap it together with the reduction quality of the payload, and every
//! operation checks both the declared quality transition and that the
//! payload really lies inside the range its tag claims. The tag is the
//! runtime rendition of the working ranges the raw operations document.

#[cfg(not(debug_assertions))]
pub(crate) use super::field_4x64::FieldElement4x64 as FieldElementImpl;

#[cfg(debug_assertions)]
pub(crate) use checked::FieldElementImpl;

#[cfg(debug_assertions)]
mod checked {
    use super::super::field_4x64::FieldElement4x64;
    use super::super::uint256::{MODULUS, MODULUS_DOUBLE, NEG_MODULUS, Uint256};

    /// How tightly reduced a payload is known to be, from canonical `[0, p)`
    /// through carry-free `[0, 2^256 - p)` and loose `[0, 2p)` to arbitrary.
    #[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
    enum Quality {
        Canonical,
        CarryFree,
        Loose,
    }

    impl Quality {
        const fn contains(self, value: &Uint256) -> bool {
            let bound = match self {
                Quality::Canonical => MODULUS,
                Quality::CarryFree => NEG_MODULUS,
                Quality::Loose => MODULUS_DOUBLE,
            };
            let (_, borrow) = value.borrowing_sub(&bound);
            borrow != 0
        }

        const fn max(self, other: Self) -> Self {
            if self as u8 >= other as u8 { self } else { other }
        }
    }

    #[derive(Clone, Copy, Debug)]
    pub(crate) struct FieldElementImpl {
        value: FieldElement4x64,
        quality: Quality,
    }

    impl FieldElementImpl {
        const fn new(value: FieldElement4x64, quality: Quality) -> Self {
            debug_assert!(quality.contains(&value.0));
            Self { value, quality }
        }

        pub const fn zero() -> Self {
            Self::new(FieldElement4x64::zero(), Quality::Canonical)
        }

        pub const fn one() -> Self {
            Self::new(FieldElement4x64::one(), Quality::Canonical)
        }

        pub const fn minus_one() -> Self {
            Self::new(FieldElement4x64::minus_one(), Quality::Canonical)
        }

        pub const fn from_canonical(value: &Uint256) -> Self {
            debug_assert!(value.is_reduced());
            Self::new(FieldElement4x64::from_canonical(value), Quality::CarryFree)
        }

        pub const fn to_canonical(&self) -> Uint256 {
            self.value.to_canonical()
        }

        pub const fn payload(&self) -> &Uint256 {
            self.value.payload()
        }

        pub const fn is_zero(&self) -> bool {
            self.value.is_zero()
        }

        pub const fn add(&self, rhs: &Self) -> Self {
            let quality = self.quality.max(rhs.quality).max(Quality::CarryFree);
            Self::new(self.value.add(&rhs.value), quality)
        }

        pub const fn sub(&self, rhs: &Self) -> Self {
            Self::new(self.value.sub(&rhs.value), Quality::Loose)
        }

        pub const fn neg(&self) -> Self {
            Self::new(self.value.neg(), Quality::CarryFree)
        }

        pub const fn double(&self) -> Self {
            Self::new(self.value.double(), Quality::CarryFree)
        }

        pub const fn mul_five(&self) -> Self {
            let quality = self.quality.max(Quality::CarryFree);
            Self::new(self.value.mul_five(), quality)
        }

        pub const fn mul(&self, rhs: &Self) -> Self {
            Self::new(self.value.mul(&rhs.value), Quality::CarryFree)
        }

        pub const fn square(&self) -> Self {
            Self::new(self.value.square(), Quality::CarryFree)
        }

        pub fn pow(&self, exp: &Uint256) -> Self {
            Self::new(self.value.pow(exp), Quality::Canonical)
        }

        pub fn invert(&self) -> Option<Self> {
            self.value
                .invert()
                .map(|value| Self::new(value, Quality::CarryFree))
        }

        pub fn normalize(&self) -> Self {
            Self::new(self.value.normalize(), Quality::Canonical)
        }

        pub fn rerandomize(&self, seed: u64) -> Self {
            Self::new(self.value.rerandomize(seed), Quality::Loose)
        }
    }
}
