//! Kernel selection over an ordered candidate list.
//!
//! Algorithm crates register kernels as `Candidate`s ordered best-first. The
//! first candidate whose required capabilities are all present wins:
//!
//! ```
//! use backend::{
//!   candidates,
//!   dispatch::{Candidate, select},
//! };
//! use platform::caps::{Caps, x86};
//!
//! fn wide(x: u32) -> u32 { x.rotate_right(16) }
//! fn narrow(x: u32) -> u32 { x.rotate_right(16) }
//!
//! let table: &[Candidate<fn(u32) -> u32>] = candidates![
//!   "x86_64/sse4.1" => x86::SSE41_READY => wide,
//!   "portable"      => Caps::NONE       => narrow,
//! ];
//! let picked = select(platform::caps(), table);
//! assert!(picked.is_some());
//! ```

use platform::Caps;

/// A candidate kernel with capability requirements.
#[derive(Clone, Copy, Debug)]
pub struct Candidate<F> {
  /// Human-readable name for diagnostics (e.g. `"x86_64/ssse3"`).
  pub name: &'static str,
  /// Required CPU capabilities. Must be a subset of detected caps.
  pub requires: Caps,
  pub func: F,
}

impl<F> Candidate<F> {
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str, requires: Caps, func: F) -> Self {
    Self { name, requires, func }
  }
}

/// The result of kernel selection.
#[derive(Clone, Copy, Debug)]
pub struct Selected<F> {
  pub name: &'static str,
  pub func: F,
}

impl<F> Selected<F> {
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str, func: F) -> Self {
    Self { name, func }
  }
}

/// Select the best kernel from a best-first candidate list.
///
/// Returns `None` only if no candidate matches; lists that end with a
/// `Caps::NONE` fallback always yield `Some`.
#[inline]
#[must_use]
pub fn select<F: Copy>(caps: Caps, candidates: &[Candidate<F>]) -> Option<Selected<F>> {
  let found = candidates.iter().find(|c| caps.has(c.requires))?;
  tracing::debug!(target: "backend::dispatch", kernel = found.name, "selected kernel");
  Some(Selected::new(found.name, found.func))
}

/// Build a `&[Candidate<_>]` slice from `name => caps => func` rows.
#[macro_export]
macro_rules! candidates {
  ($($name:expr => $caps:expr => $func:expr),+ $(,)?) => {
    &[$($crate::dispatch::Candidate::new($name, $caps, $func)),+]
  };
}

/// A specific kernel was requested but this CPU cannot run it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("kernel `{name}` requires CPU features this machine does not have")]
pub struct KernelUnavailable {
  pub name: &'static str,
}

impl KernelUnavailable {
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str) -> Self {
    Self { name }
  }
}

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::string::ToString;

  use platform::caps::{aarch64, x86};

  use super::*;

  type RotFn = fn(u32) -> u32;

  fn portable(x: u32) -> u32 {
    x ^ 0xDEAD_BEEF
  }

  fn fast(x: u32) -> u32 {
    x ^ 0xCAFE_BABE
  }

  #[test]
  fn candidate_creation() {
    let c: Candidate<RotFn> = Candidate::new("test", Caps::NONE, portable);
    assert_eq!(c.name, "test");
    assert_eq!(c.requires, Caps::NONE);
  }

  #[test]
  fn select_portable_fallback() {
    let table: &[Candidate<RotFn>] = candidates![
      "fast" => x86::SSE41_READY => fast,
      "portable" => Caps::NONE => portable,
    ];
    let selected = select(Caps::NONE, table).unwrap();
    assert_eq!(selected.name, "portable");
    assert_eq!((selected.func)(0), 0xDEAD_BEEF);
  }

  #[test]
  fn select_best_match() {
    let table: &[Candidate<RotFn>] = candidates![
      "fast" => x86::SSE41_READY => fast,
      "portable" => Caps::NONE => portable,
    ];
    let selected = select(x86::SSE41_READY, table).unwrap();
    assert_eq!(selected.name, "fast");
    assert_eq!((selected.func)(0), 0xCAFE_BABE);
  }

  #[test]
  fn select_skips_unavailable() {
    let table: &[Candidate<RotFn>] = candidates![
      "needs_sse41" => x86::SSE41_READY => fast,
      "needs_ssse3" => x86::SSSE3_READY => fast,
      "portable" => Caps::NONE => portable,
    ];
    let selected = select(x86::SSSE3_READY, table).unwrap();
    assert_eq!(selected.name, "needs_ssse3");
  }

  #[test]
  fn select_without_fallback_can_fail() {
    let table: &[Candidate<RotFn>] = candidates!["neon" => aarch64::NEON => fast];
    let none = select(x86::SSE2, table);
    assert!(none.is_none());
  }

  #[test]
  fn unavailable_error_names_kernel() {
    let err = KernelUnavailable::new("aarch64/neon");
    assert_eq!(err.to_string(), "kernel `aarch64/neon` requires CPU features this machine does not have");
  }
}
