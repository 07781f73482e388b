//! Runtime CPU detection.
//!
//! - Compile-time detection via `cfg!(target_feature = "...")`
//! - Runtime detection via `is_*_feature_detected!` (requires `std`)
//! - Caching in a `OnceLock` (std) so detection runs once per process
//! - Miri fallback (always portable caps)

use crate::caps::Caps;

/// Capabilities the compiler was told it may assume.
#[inline]
#[must_use]
pub(crate) const fn caps_static() -> Caps {
  #[allow(unused_macros)] // Only used on x86_64/aarch64
  macro_rules! detect {
    ($caps:ident; $($feature:literal => $cap:expr),+ $(,)?) => {
      $(if cfg!(target_feature = $feature) { $caps = $caps.union($cap); })+
    };
  }

  #[allow(unused_mut)]
  let mut result = Caps::NONE;

  #[cfg(target_arch = "x86_64")]
  {
    use crate::caps::x86;

    // x86_64 baseline: SSE2 is guaranteed
    result = result.union(x86::SSE2);
    detect!(result;
      "ssse3" => x86::SSSE3,
      "sse4.1" => x86::SSE41,
    );
  }

  #[cfg(target_arch = "aarch64")]
  {
    use crate::caps::aarch64;

    detect!(result; "neon" => aarch64::NEON);
  }

  result
}

#[cfg(all(target_arch = "x86_64", feature = "std"))]
fn runtime() -> Caps {
  use crate::caps::x86;

  let mut caps = Caps::NONE;
  if std::arch::is_x86_feature_detected!("sse2") {
    caps |= x86::SSE2;
  }
  if std::arch::is_x86_feature_detected!("ssse3") {
    caps |= x86::SSSE3;
  }
  if std::arch::is_x86_feature_detected!("sse4.1") {
    caps |= x86::SSE41;
  }
  caps
}

#[cfg(all(target_arch = "aarch64", feature = "std"))]
fn runtime() -> Caps {
  use crate::caps::aarch64;

  if std::arch::is_aarch64_feature_detected!("neon") { aarch64::NEON } else { Caps::NONE }
}

#[cfg(not(all(any(target_arch = "x86_64", target_arch = "aarch64"), feature = "std")))]
#[cfg_attr(any(miri, not(feature = "std")), allow(dead_code))]
fn runtime() -> Caps {
  Caps::NONE
}

/// Detect capabilities without caching.
#[cfg_attr(any(miri, not(feature = "std")), allow(dead_code))]
#[inline]
#[must_use]
pub(crate) fn detect_uncached() -> Caps {
  caps_static().union(runtime())
}

/// Detected capabilities, cached after the first call.
#[inline]
#[must_use]
pub(crate) fn caps() -> Caps {
  // Miri cannot interpret SIMD intrinsics, so always return portable.
  #[cfg(miri)]
  {
    Caps::NONE
  }

  #[cfg(all(not(miri), feature = "std"))]
  {
    use std::sync::OnceLock;
    static CACHED: OnceLock<Caps> = OnceLock::new();
    *CACHED.get_or_init(detect_uncached)
  }

  // Without std only compile-time features are known; recomputing is free.
  #[cfg(all(not(miri), not(feature = "std")))]
  {
    caps_static()
  }
}

#[cfg(all(test, feature = "std"))]
mod tests {
  use super::*;

  #[test]
  fn static_caps_are_subset_of_detected() {
    assert!(detect_uncached().has(caps_static()));
  }

  #[test]
  fn cached_matches_uncached() {
    #[cfg(not(miri))]
    assert_eq!(caps(), detect_uncached());
  }

  #[test]
  #[cfg(target_arch = "x86_64")]
  fn x86_64_always_has_sse2() {
    assert!(caps().has(crate::caps::x86::SSE2));
  }

  #[test]
  #[cfg(target_arch = "x86_64")]
  fn sse41_detection_agrees_with_std() {
    use crate::caps::x86;
    assert_eq!(caps().has(x86::SSE41), std::arch::is_x86_feature_detected!("sse4.1"));
    assert_eq!(caps().has(x86::SSSE3), std::arch::is_x86_feature_detected!("ssse3"));
  }

  #[test]
  #[cfg(target_arch = "aarch64")]
  fn aarch64_has_neon() {
    assert!(caps().has(crate::caps::aarch64::NEON));
  }
}
