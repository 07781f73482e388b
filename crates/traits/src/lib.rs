//! Core hashing traits.
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`Digest`] | Streaming cryptographic hash with fixed-size output |
//! | [`ParamError`] | Rejected construction parameters (digest/key/salt lengths) |
//!
//! `no_std` compatible. Non-test code denies `unwrap` and `expect` so every
//! error path is handled explicitly.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod digest;
pub mod error;

pub use digest::Digest;
pub use error::ParamError;
