//! CPU capability representation.
//!
//! [`Caps`] answers one question: "which instructions can this machine run?"
//! It is a 128-bit bitset; each bit is an ISA extension.
//!
//! # Bit Layout
//!
//! - Bits 0-63: x86/x86_64 features
//! - Bits 64-127: aarch64 features
//!
//! # Usage
//!
//! ```
//! use platform::caps::{Caps, x86};
//!
//! let c = platform::caps();
//! if c.has(x86::SSE41) {
//!   // row-vectorized SSE4.1 compression
//! }
//! # let _ = Caps::NONE;
//! ```

// ─────────────────────────────────────────────────────────────────────────────
// Core Capability Type
// ─────────────────────────────────────────────────────────────────────────────

/// CPU capabilities: a 128-bit feature bitset.
///
/// `Caps` is `Copy`, `Send`, and `Sync`. Use [`has()`](Caps::has) to check
/// whether every feature a kernel requires is present.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Caps(pub(crate) [u64; 2]);

impl Caps {
  /// Empty capability set (no features).
  pub const NONE: Self = Self([0; 2]);

  /// Create a capability set from raw words.
  ///
  /// Only available with the `testing` feature or in test builds.
  #[cfg(any(test, feature = "testing"))]
  #[inline]
  #[must_use]
  pub const fn from_raw(words: [u64; 2]) -> Self {
    Self(words)
  }

  /// Access the raw underlying words.
  #[cfg(any(test, feature = "testing"))]
  #[inline]
  #[must_use]
  pub const fn as_raw(&self) -> &[u64; 2] {
    &self.0
  }

  /// Check if all features in `required` are present.
  #[inline(always)]
  #[must_use]
  pub const fn has(self, required: Self) -> bool {
    (self.0[0] & required.0[0]) == required.0[0] && (self.0[1] & required.0[1]) == required.0[1]
  }

  /// Union of two capability sets.
  #[inline]
  #[must_use]
  pub const fn union(self, other: Self) -> Self {
    Self([self.0[0] | other.0[0], self.0[1] | other.0[1]])
  }

  /// Intersection of two capability sets.
  #[inline]
  #[must_use]
  pub const fn intersection(self, other: Self) -> Self {
    Self([self.0[0] & other.0[0], self.0[1] & other.0[1]])
  }

  /// Features in `self` that are not in `other`.
  #[inline]
  #[must_use]
  pub const fn difference(self, other: Self) -> Self {
    Self([self.0[0] & !other.0[0], self.0[1] & !other.0[1]])
  }

  #[inline]
  #[must_use]
  pub const fn is_empty(self) -> bool {
    self.0[0] == 0 && self.0[1] == 0
  }

  /// Count the number of features present.
  #[inline]
  #[must_use]
  pub const fn count(self) -> u32 {
    self.0[0].count_ones() + self.0[1].count_ones()
  }

  /// Create a capability set with a single bit set (0-127).
  #[inline]
  #[must_use]
  pub const fn bit(bit: u8) -> Self {
    let bit_in_word = bit % 64;
    if bit < 64 { Self([1u64 << bit_in_word, 0]) } else { Self([0, 1u64 << bit_in_word]) }
  }

  /// Names of the known features present in this set, in bit order.
  pub fn feature_names(self) -> impl Iterator<Item = &'static str> {
    FEATURE_NAMES.iter().filter(move |(caps, _)| self.has(*caps)).map(|(_, name)| *name)
  }
}

impl core::ops::BitOr for Caps {
  type Output = Self;

  #[inline]
  fn bitor(self, rhs: Self) -> Self::Output {
    self.union(rhs)
  }
}

impl core::ops::BitAnd for Caps {
  type Output = Self;

  #[inline]
  fn bitand(self, rhs: Self) -> Self::Output {
    self.intersection(rhs)
  }
}

impl core::ops::BitOrAssign for Caps {
  #[inline]
  fn bitor_assign(&mut self, rhs: Self) {
    *self = self.union(rhs);
  }
}

impl core::fmt::Debug for Caps {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_list().entries(self.feature_names()).finish()
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// x86_64 Features (bits 0-63)
// ─────────────────────────────────────────────────────────────────────────────

/// x86_64 CPU features used by the compression kernels.
pub mod x86 {
  use super::Caps;

  pub const SSE2: Caps = Caps::bit(0);
  pub const SSSE3: Caps = Caps::bit(2);
  pub const SSE41: Caps = Caps::bit(3);

  /// SSE4.1 kernels also rely on SSSE3 byte shuffles.
  pub const SSE41_READY: Caps = Caps([SSE41.0[0] | SSSE3.0[0] | SSE2.0[0], 0]);
  pub const SSSE3_READY: Caps = Caps([SSSE3.0[0] | SSE2.0[0], 0]);
}

// ─────────────────────────────────────────────────────────────────────────────
// aarch64 Features (bits 64-127)
// ─────────────────────────────────────────────────────────────────────────────

/// aarch64 CPU features used by the compression kernels.
pub mod aarch64 {
  use super::Caps;

  pub const NEON: Caps = Caps::bit(64); // Baseline on AArch64
}

const FEATURE_NAMES: &[(Caps, &str)] = &[
  (x86::SSE2, "sse2"),
  (x86::SSSE3, "ssse3"),
  (x86::SSE41, "sse4.1"),
  (aarch64::NEON, "neon"),
];
