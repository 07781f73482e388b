//! Backend crate: kernel selection and caching primitives.
//!
//! - **Dispatch**: pick the best kernel from a best-first candidate list
//! - **Caching**: resolve once per process, then a plain copy per call
//!
//! Runtime selection detects CPU features once and caches the chosen kernel
//! table in a [`OnceCache`]. Hashers copy the function pointer they need at
//! construction, so the hot path is a single indirect call.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod cache;
pub mod dispatch;

pub use cache::OnceCache;
pub use dispatch::{Candidate, KernelUnavailable, Selected, select};
