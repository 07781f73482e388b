//! Cryptographic hash functions.

pub mod blake2s;

pub use blake2s::{Blake2s, Blake2s128, Blake2s256, Blake2sDigest, Blake2sKernelId, Params};
