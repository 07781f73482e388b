//! BLAKE2s hashing with runtime-dispatched SIMD kernels.
//!
//! This crate is `no_std` compatible. The `std` feature (default) adds runtime
//! CPU detection, the `BLAKE2S_FORCE` override and cross-kernel test helpers.
//! Dev-only dependencies are used for oracle testing and benchmarking.
//!
//! # Modules
//!
//! - [`crypto`] - BLAKE2s-256, BLAKE2s-128 and the parameterized [`crypto::Blake2s`].
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod crypto;

pub use traits::{Digest, ParamError};
