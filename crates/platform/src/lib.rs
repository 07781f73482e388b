//! CPU detection and capabilities for the BLAKE2s kernels.
//!
//! This crate is the single source of truth for "which instructions can run
//! here". Kernel registries query [`caps()`] instead of doing ad-hoc detection.
//!
//! ```
//! use platform::caps::x86;
//!
//! let caps = platform::caps();
//! if caps.has(x86::SSE41_READY) {
//!   // SSE4.1 kernel is safe to call
//! }
//! ```
//!
//! 1. **Zero-cost when possible**: compile-time features are folded in via `cfg!`.
//! 2. **Cached otherwise**: runtime detection is cached in a `OnceLock` (std).
//! 3. **Miri-safe**: under Miri, always returns portable-only caps.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod caps;
mod detect;

pub use caps::Caps;

/// Detected CPU capabilities.
///
/// With `std` the result of runtime detection is cached for the process
/// lifetime; without `std` only compile-time target features are reported.
#[inline]
#[must_use]
pub fn caps() -> Caps {
  detect::caps()
}

/// Capabilities known at compile time (`-C target-feature` / `target-cpu`).
#[inline]
#[must_use]
pub const fn caps_static() -> Caps {
  detect::caps_static()
}
