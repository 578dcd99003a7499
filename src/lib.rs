#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(
    clippy::mod_module_files,
    clippy::unwrap_used,
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]

//! ## Usage
//!
//! ```
//! use bandersnatch_field::FieldElement;
//!
//! let two = FieldElement::from_u64(2);
//! let half = two.invert()?;
//! assert_eq!(two * half, FieldElement::ONE);
//! assert_eq!(half.sign(), -1);
//! # Ok::<(), bandersnatch_field::Error>(())
//! ```

extern crate alloc;

mod arithmetic;
mod error;

#[cfg(any(feature = "test-vectors", test))]
pub mod test_vectors;

pub use arithmetic::{FieldElement, MODULUS, Uint256};
pub use error::{Error, Result};
