//! Process-wide BLAKE2s kernel selection.
//!
//! Resolved once (CPU detection plus the `BLAKE2S_FORCE` override) and cached;
//! every hasher built afterwards copies the chosen kernel.

use backend::{Candidate, OnceCache, candidates, select};
use platform::Caps;

use super::{
  config::{self, Blake2sForce},
  kernels::{ALL, Blake2sKernelId, required_caps},
};

#[cfg(target_arch = "x86_64")]
const CANDIDATES: &[Candidate<Blake2sKernelId>] = candidates![
  "x86_64/sse4.1" => required_caps(Blake2sKernelId::X86Sse41) => Blake2sKernelId::X86Sse41,
  "x86_64/ssse3"  => required_caps(Blake2sKernelId::X86Ssse3) => Blake2sKernelId::X86Ssse3,
  "x86_64/sse2"   => required_caps(Blake2sKernelId::X86Sse2)  => Blake2sKernelId::X86Sse2,
  "portable"      => Caps::NONE                               => Blake2sKernelId::Portable,
];

#[cfg(target_arch = "aarch64")]
const CANDIDATES: &[Candidate<Blake2sKernelId>] = candidates![
  "aarch64/neon" => required_caps(Blake2sKernelId::Aarch64Neon) => Blake2sKernelId::Aarch64Neon,
  "portable"     => Caps::NONE                                  => Blake2sKernelId::Portable,
];

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
const CANDIDATES: &[Candidate<Blake2sKernelId>] = candidates![
  "portable" => Caps::NONE => Blake2sKernelId::Portable,
];

static ACTIVE: OnceCache<Blake2sKernelId> = OnceCache::new();

/// Pick a kernel for `caps`, honouring an already clamped `force`.
#[must_use]
pub(crate) fn resolve(force: Blake2sForce, caps: Caps) -> Blake2sKernelId {
  if let Some(id) = force.kernel().filter(|&id| caps.has(required_caps(id))) {
    tracing::debug!(target: "hashes::blake2s", kernel = id.as_str(), "using forced kernel");
    return id;
  }
  let id = select(caps, CANDIDATES).map_or(Blake2sKernelId::Portable, |s| s.func);
  tracing::debug!(target: "hashes::blake2s", kernel = id.as_str(), "resolved kernel");
  id
}

/// The kernel new hashers use.
#[inline]
#[must_use]
pub fn active_kernel() -> Blake2sKernelId {
  ACTIVE.get_or_init(|| resolve(config::get().effective_force, platform::caps()))
}

/// Name of [`active_kernel`], e.g. `"x86_64/ssse3"`.
#[inline]
#[must_use]
pub fn kernel_name() -> &'static str {
  active_kernel().as_str()
}

/// Kernels this CPU can run, best first. Always ends with `portable`.
pub fn available_kernels() -> impl Iterator<Item = Blake2sKernelId> {
  let caps = platform::caps();
  ALL.iter().copied().filter(move |&id| caps.has(required_caps(id)))
}
