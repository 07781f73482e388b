//! BLAKE2s kernel registry.
//!
//! Every kernel shares one signature, so the hasher stores a plain function
//! pointer and switching kernels never changes output.

use platform::Caps;

use super::portable;

/// `(h, blocks, bytes_hashed, is_last, last_block_len)`.
///
/// `blocks` is a whole number of 64-byte blocks. The counter is advanced by
/// 64 per block before each compression, except for a final block, which
/// advances it by `last_block_len`.
pub(crate) type CompressFn = fn(&mut [u32; 8], &[u8], &mut u64, bool, u32);

/// Identifies one BLAKE2s compression kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Blake2sKernelId {
  Portable = 0,
  #[cfg(target_arch = "x86_64")]
  X86Sse2 = 1,
  #[cfg(target_arch = "x86_64")]
  X86Ssse3 = 2,
  #[cfg(target_arch = "x86_64")]
  X86Sse41 = 3,
  #[cfg(target_arch = "aarch64")]
  Aarch64Neon = 4,
}

/// Kernels compiled for this target, best first.
pub const ALL: &[Blake2sKernelId] = &[
  #[cfg(target_arch = "x86_64")]
  Blake2sKernelId::X86Sse41,
  #[cfg(target_arch = "x86_64")]
  Blake2sKernelId::X86Ssse3,
  #[cfg(target_arch = "x86_64")]
  Blake2sKernelId::X86Sse2,
  #[cfg(target_arch = "aarch64")]
  Blake2sKernelId::Aarch64Neon,
  Blake2sKernelId::Portable,
];

impl Blake2sKernelId {
  #[inline]
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Portable => "portable",
      #[cfg(target_arch = "x86_64")]
      Self::X86Sse2 => "x86_64/sse2",
      #[cfg(target_arch = "x86_64")]
      Self::X86Ssse3 => "x86_64/ssse3",
      #[cfg(target_arch = "x86_64")]
      Self::X86Sse41 => "x86_64/sse4.1",
      #[cfg(target_arch = "aarch64")]
      Self::Aarch64Neon => "aarch64/neon",
    }
  }

  /// Whether this CPU can run the kernel.
  #[inline]
  #[must_use]
  pub fn is_available(self) -> bool {
    is_available(self)
  }
}

impl core::fmt::Display for Blake2sKernelId {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Look up a kernel by its [`Blake2sKernelId::as_str`] name.
#[must_use]
pub fn id_from_name(name: &str) -> Option<Blake2sKernelId> {
  ALL.iter().copied().find(|id| id.as_str() == name)
}

#[must_use]
pub(crate) fn compress_fn(id: Blake2sKernelId) -> CompressFn {
  match id {
    Blake2sKernelId::Portable => portable::compress_blocks,
    #[cfg(target_arch = "x86_64")]
    Blake2sKernelId::X86Sse2 => super::x86_64::compress_sse2,
    #[cfg(target_arch = "x86_64")]
    Blake2sKernelId::X86Ssse3 => super::x86_64::compress_ssse3,
    #[cfg(target_arch = "x86_64")]
    Blake2sKernelId::X86Sse41 => super::x86_64::compress_sse41,
    #[cfg(target_arch = "aarch64")]
    Blake2sKernelId::Aarch64Neon => super::aarch64::compress_neon,
  }
}

#[inline]
#[must_use]
pub const fn required_caps(id: Blake2sKernelId) -> Caps {
  match id {
    Blake2sKernelId::Portable => Caps::NONE,
    #[cfg(target_arch = "x86_64")]
    Blake2sKernelId::X86Sse2 => platform::caps::x86::SSE2,
    #[cfg(target_arch = "x86_64")]
    Blake2sKernelId::X86Ssse3 => platform::caps::x86::SSSE3_READY,
    #[cfg(target_arch = "x86_64")]
    Blake2sKernelId::X86Sse41 => platform::caps::x86::SSE41_READY,
    #[cfg(target_arch = "aarch64")]
    Blake2sKernelId::Aarch64Neon => platform::caps::aarch64::NEON,
  }
}

#[inline]
#[must_use]
pub(crate) fn is_available(id: Blake2sKernelId) -> bool {
  platform::caps().has(required_caps(id))
}
