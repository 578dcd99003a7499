//! Multi-precision field arithmetic on four 64-bit limbs.

mod field;
mod field_4x64;
mod field_impl;
mod inverse;
mod modular;
mod montgomery;
mod uint256;
mod util;

pub use field::FieldElement;
pub use uint256::{MODULUS, Uint256};
