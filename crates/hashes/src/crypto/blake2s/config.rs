//! BLAKE2s runtime configuration (kernel override).
//!
//! `BLAKE2S_FORCE` pins the process-wide kernel, which is useful for
//! benchmarking a single tier or ruling out a SIMD path while debugging:
//!
//! | Value | Kernel |
//! |-------|--------|
//! | `auto` (default) | best available |
//! | `portable`, `scalar`, `generic` | `portable` |
//! | `sse2` | `x86_64/sse2` |
//! | `ssse3` | `x86_64/ssse3` |
//! | `sse41`, `sse4.1` | `x86_64/sse4.1` |
//! | `neon` | `aarch64/neon` |
//!
//! Values are case-insensitive. A forced tier this CPU cannot run falls back
//! to `auto`. The variable is read once per process; without the `std`
//! feature the override is always `auto`.

use platform::Caps;

use super::kernels::{self, Blake2sKernelId};

/// Name of the environment variable holding the kernel override.
pub const FORCE_ENV: &str = "BLAKE2S_FORCE";

/// Forced kernel selection for BLAKE2s.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Blake2sForce {
  /// Pick the best kernel for this CPU.
  #[default]
  Auto,
  Portable,
  Sse2,
  Ssse3,
  Sse41,
  Neon,
}

impl Blake2sForce {
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Auto => "auto",
      Self::Portable => "portable",
      Self::Sse2 => "sse2",
      Self::Ssse3 => "ssse3",
      Self::Sse41 => "sse4.1",
      Self::Neon => "neon",
    }
  }

  /// Parse an override value. Unknown or empty values yield `None`.
  #[must_use]
  pub fn parse(value: &str) -> Option<Self> {
    let value = value.trim();
    if value.is_empty() {
      return None;
    }
    let table: [(&str, Self); 9] = [
      ("auto", Self::Auto),
      ("portable", Self::Portable),
      ("scalar", Self::Portable),
      ("generic", Self::Portable),
      ("sse2", Self::Sse2),
      ("ssse3", Self::Ssse3),
      ("sse41", Self::Sse41),
      ("sse4.1", Self::Sse41),
      ("neon", Self::Neon),
    ];
    table
      .iter()
      .find(|(name, _)| value.eq_ignore_ascii_case(name))
      .map(|&(_, force)| force)
  }

  /// The kernel this force names, if it exists on this target.
  #[must_use]
  pub fn kernel(self) -> Option<Blake2sKernelId> {
    match self {
      Self::Auto => None,
      Self::Portable => Some(Blake2sKernelId::Portable),
      #[cfg(target_arch = "x86_64")]
      Self::Sse2 => Some(Blake2sKernelId::X86Sse2),
      #[cfg(target_arch = "x86_64")]
      Self::Ssse3 => Some(Blake2sKernelId::X86Ssse3),
      #[cfg(target_arch = "x86_64")]
      Self::Sse41 => Some(Blake2sKernelId::X86Sse41),
      #[cfg(target_arch = "aarch64")]
      Self::Neon => Some(Blake2sKernelId::Aarch64Neon),
      #[allow(unreachable_patterns)]
      _ => None,
    }
  }
}

impl core::fmt::Display for Blake2sForce {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Full BLAKE2s runtime configuration (after applying overrides).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Blake2sConfig {
  /// Requested force mode (env/programmatic).
  pub requested_force: Blake2sForce,
  /// Force mode clamped to detected CPU capabilities.
  pub effective_force: Blake2sForce,
}

/// Interpret the raw value of `BLAKE2S_FORCE` (`None` when unset).
///
/// Unset, empty and unrecognized values all mean `auto`.
#[must_use]
#[cfg_attr(not(feature = "std"), allow(dead_code))]
pub(crate) fn force_from_env_value(raw: Option<&str>) -> Blake2sForce {
  let Some(raw) = raw else {
    return Blake2sForce::Auto;
  };
  Blake2sForce::parse(raw).unwrap_or_else(|| {
    if !raw.trim().is_empty() {
      tracing::warn!(target: "hashes::blake2s", value = %raw, "ignoring unrecognized BLAKE2S_FORCE value");
    }
    Blake2sForce::Auto
  })
}

#[cfg(feature = "std")]
fn read_env_force() -> Blake2sForce {
  force_from_env_value(std::env::var(FORCE_ENV).ok().as_deref())
}

#[cfg(feature = "std")]
fn requested_force() -> Blake2sForce {
  use std::sync::OnceLock;
  static FORCE: OnceLock<Blake2sForce> = OnceLock::new();
  *FORCE.get_or_init(read_env_force)
}

#[cfg(not(feature = "std"))]
fn requested_force() -> Blake2sForce {
  Blake2sForce::Auto
}

#[inline]
#[must_use]
pub(crate) fn clamp_force_to_caps(requested: Blake2sForce, caps: Caps) -> Blake2sForce {
  if requested == Blake2sForce::Auto {
    return requested;
  }
  match requested.kernel() {
    Some(id) if caps.has(kernels::required_caps(id)) => requested,
    _ => Blake2sForce::Auto,
  }
}

#[inline]
#[must_use]
pub(crate) fn config(requested_force: Blake2sForce, caps: Caps) -> Blake2sConfig {
  let effective_force = clamp_force_to_caps(requested_force, caps);
  if effective_force != requested_force {
    tracing::warn!(
      target: "hashes::blake2s",
      requested = requested_force.as_str(),
      "forced kernel is unavailable on this CPU; using auto"
    );
  }
  Blake2sConfig {
    requested_force,
    effective_force,
  }
}

/// The effective configuration for this process.
#[inline]
#[must_use]
pub fn get() -> Blake2sConfig {
  config(requested_force(), platform::caps())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_accepts_aliases_case_insensitively() {
    assert_eq!(Blake2sForce::parse("AUTO"), Some(Blake2sForce::Auto));
    assert_eq!(Blake2sForce::parse(" Scalar "), Some(Blake2sForce::Portable));
    assert_eq!(Blake2sForce::parse("generic"), Some(Blake2sForce::Portable));
    assert_eq!(Blake2sForce::parse("SSE4.1"), Some(Blake2sForce::Sse41));
    assert_eq!(Blake2sForce::parse("sse41"), Some(Blake2sForce::Sse41));
    assert_eq!(Blake2sForce::parse("neon"), Some(Blake2sForce::Neon));
  }

  #[test]
  fn parse_rejects_unknown() {
    assert_eq!(Blake2sForce::parse(""), None);
    assert_eq!(Blake2sForce::parse("avx512"), None);
  }

  #[test]
  fn env_value_defaults_to_auto() {
    assert_eq!(force_from_env_value(None), Blake2sForce::Auto);
    assert_eq!(force_from_env_value(Some("")), Blake2sForce::Auto);
    assert_eq!(force_from_env_value(Some("   ")), Blake2sForce::Auto);
    assert_eq!(force_from_env_value(Some("avx512")), Blake2sForce::Auto);
  }

  #[test]
  fn env_value_accepts_aliases() {
    assert_eq!(force_from_env_value(Some("Scalar")), Blake2sForce::Portable);
    assert_eq!(force_from_env_value(Some("sse4.1")), Blake2sForce::Sse41);
    assert_eq!(force_from_env_value(Some(" NEON ")), Blake2sForce::Neon);
  }

  #[test]
  fn process_config_is_consistent() {
    let cfg = get();
    assert_eq!(cfg, get());
    assert_eq!(cfg.effective_force, clamp_force_to_caps(cfg.requested_force, platform::caps()));
  }

  #[test]
  fn portable_is_never_clamped() {
    let cfg = config(Blake2sForce::Portable, Caps::NONE);
    assert_eq!(cfg.effective_force, Blake2sForce::Portable);
    assert_eq!(cfg.requested_force, Blake2sForce::Portable);
  }

  #[test]
  fn missing_caps_clamp_to_auto() {
    #[cfg(target_arch = "x86_64")]
    let forced = Blake2sForce::Sse41;
    #[cfg(not(target_arch = "x86_64"))]
    let forced = Blake2sForce::Neon;

    let cfg = config(forced, Caps::NONE);
    assert_eq!(cfg.requested_force, forced);
    assert_eq!(cfg.effective_force, Blake2sForce::Auto);
  }

  #[test]
  fn foreign_arch_force_clamps_to_auto() {
    #[cfg(target_arch = "aarch64")]
    let foreign = Blake2sForce::Sse2;
    #[cfg(not(target_arch = "aarch64"))]
    let foreign = Blake2sForce::Neon;

    assert_eq!(foreign.kernel(), None);
    assert_eq!(clamp_force_to_caps(foreign, platform::caps()), Blake2sForce::Auto);
  }
}
