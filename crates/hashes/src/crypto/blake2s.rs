//! BLAKE2s (RFC 7693).
//!
//! Keyed, variable-output (1..=32 bytes) hashing over 32-bit words, with
//! runtime-dispatched compression kernels:
//!
//! | Kernel | Requires |
//! |--------|----------|
//! | `x86_64/sse4.1` | SSE4.1 + SSSE3 |
//! | `x86_64/ssse3` | SSSE3 |
//! | `x86_64/sse2` | SSE2 (x86_64 baseline) |
//! | `aarch64/neon` | NEON |
//! | `portable` | nothing |
//!
//! Every kernel produces bit-identical output. The best kernel is resolved
//! once per process ([`dispatch::active_kernel`]); a hasher captures its kernel
//! at construction, and [`Blake2s::with_kernel`] pins a specific one.
//!
//! ```
//! use hashes::{
//!   Digest as _,
//!   crypto::blake2s::{Blake2s256, Params},
//! };
//!
//! let mut h = Blake2s256::new();
//! h.update(b"hello ");
//! h.update(b"world");
//! assert_eq!(h.finalize(), Blake2s256::digest(b"hello world"));
//!
//! let mac = Params::new().digest_length(16).key(b"secret").to_state()?;
//! assert_eq!(mac.finalize().len(), 16);
//! # Ok::<(), hashes::ParamError>(())
//! ```

#![allow(clippy::indexing_slicing)] // Block buffer and schedule use fixed indices

use core::fmt;

use backend::KernelUnavailable;
use traits::{Digest, ParamError};

use self::kernels::CompressFn;

#[cfg(target_arch = "aarch64")]
mod aarch64;
pub mod config;
pub mod dispatch;
pub mod kernels;
mod params;
mod portable;
#[cfg(target_arch = "x86_64")]
mod x86_64;

pub use config::{Blake2sConfig, Blake2sForce};
pub use kernels::Blake2sKernelId;
pub use params::Params;

/// Bytes per compression block.
pub const BLOCK_LEN: usize = 64;
/// Largest digest length.
pub const OUT_LEN_MAX: usize = 32;
/// Largest key length.
pub const KEY_LEN_MAX: usize = 32;
/// Salt length in the parameter block.
pub const SALT_LEN: usize = 8;
/// Personalization length in the parameter block.
pub const PERSONAL_LEN: usize = 8;

pub(crate) const IV: [u32; 8] = [
  0x6A09_E667,
  0xBB67_AE85,
  0x3C6E_F372,
  0xA54F_F53A,
  0x510E_527F,
  0x9B05_688C,
  0x1F83_D9AB,
  0x5BE0_CD19,
];

/// Message word permutation for each of the ten rounds.
pub(crate) const SIGMA: [[usize; 16]; 10] = [
  [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
  [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
  [11, 8, 12, 0, 5, 2, 15, 13, 10, 14, 3, 6, 7, 1, 9, 4],
  [7, 9, 3, 1, 13, 12, 11, 14, 2, 6, 5, 10, 4, 0, 15, 8],
  [9, 0, 5, 7, 2, 4, 10, 15, 14, 1, 11, 12, 6, 8, 3, 13],
  [2, 12, 6, 10, 0, 11, 8, 3, 4, 13, 7, 5, 15, 14, 1, 9],
  [12, 5, 1, 15, 14, 13, 4, 10, 0, 7, 6, 3, 9, 2, 8, 11],
  [13, 11, 7, 14, 12, 1, 3, 9, 5, 0, 15, 4, 8, 6, 2, 10],
  [6, 15, 14, 9, 11, 3, 0, 8, 12, 2, 13, 7, 1, 4, 10, 5],
  [10, 2, 8, 4, 7, 6, 1, 5, 15, 11, 9, 14, 3, 12, 13, 0],
];

// ─────────────────────────────────────────────────────────────────────────────
// Output
// ─────────────────────────────────────────────────────────────────────────────

/// A BLAKE2s digest of the length chosen at construction (1..=32 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Blake2sDigest {
  bytes: [u8; OUT_LEN_MAX],
  len: u8,
}

impl Blake2sDigest {
  #[inline]
  #[must_use]
  pub fn as_bytes(&self) -> &[u8] {
    &self.bytes[..self.len as usize]
  }

  #[inline]
  #[must_use]
  pub const fn len(&self) -> usize {
    self.len as usize
  }

  /// Whether the digest holds no bytes. Hashers only accept lengths in
  /// `1..=32`, so this is `false` for every digest they produce.
  #[inline]
  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.len == 0
  }
}

impl AsRef<[u8]> for Blake2sDigest {
  #[inline]
  fn as_ref(&self) -> &[u8] {
    self.as_bytes()
  }
}

impl fmt::Debug for Blake2sDigest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Blake2sDigest(")?;
    for b in self.as_bytes() {
      write!(f, "{b:02x}")?;
    }
    f.write_str(")")
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Core hasher
// ─────────────────────────────────────────────────────────────────────────────

/// Incremental BLAKE2s hasher with runtime-chosen digest length and key.
///
/// `finalize` does not consume or modify the hasher; it can be called
/// repeatedly and updates may continue afterwards.
#[derive(Clone)]
pub struct Blake2s {
  h: [u32; 8],
  buf: [u8; BLOCK_LEN],
  buf_len: usize,
  bytes_hashed: u64,
  /// Chaining value right after the parameter block, for `reset`.
  h_init: [u32; 8],
  key: [u8; KEY_LEN_MAX],
  key_len: u8,
  out_len: u8,
  kernel: Blake2sKernelId,
  compress: CompressFn,
}

impl Blake2s {
  /// Build a hasher from `params`, using the process-wide kernel.
  ///
  /// # Errors
  ///
  /// Returns [`ParamError`] if any length in `params` is out of range.
  pub fn new(params: &Params) -> Result<Self, ParamError> {
    params.validate()?;
    Ok(Self::from_valid_params(params, dispatch::active_kernel()))
  }

  /// `params` must already be validated.
  fn from_valid_params(params: &Params, kernel: Blake2sKernelId) -> Self {
    let h_init = params.chaining_value();
    let key = params.key_bytes();
    let mut state = Self {
      h: h_init,
      buf: [0u8; BLOCK_LEN],
      buf_len: 0,
      bytes_hashed: 0,
      h_init,
      key: [0u8; KEY_LEN_MAX],
      key_len: key.len() as u8,
      out_len: params.out_len() as u8,
      kernel,
      compress: kernels::compress_fn(kernel),
    };
    state.key[..key.len()].copy_from_slice(key);
    state.absorb_key();
    state
  }

  /// Switch this hasher to a specific compression kernel.
  ///
  /// All kernels are bit-identical, so this may be called at any point in the
  /// stream.
  ///
  /// # Errors
  ///
  /// Returns [`KernelUnavailable`] if this CPU lacks the kernel's features.
  pub fn with_kernel(mut self, kernel: Blake2sKernelId) -> Result<Self, KernelUnavailable> {
    if !kernels::is_available(kernel) {
      return Err(KernelUnavailable::new(kernel.as_str()));
    }
    self.kernel = kernel;
    self.compress = kernels::compress_fn(kernel);
    Ok(self)
  }

  /// The compression kernel this hasher runs.
  #[inline]
  #[must_use]
  pub fn kernel(&self) -> Blake2sKernelId {
    self.kernel
  }

  /// Digest length in bytes, fixed at construction.
  #[inline]
  #[must_use]
  pub fn digest_length(&self) -> usize {
    self.out_len as usize
  }

  /// The key, zero padded, is the first block of input. It stays buffered so
  /// that a keyed hash of the empty message finalizes the key block itself.
  #[inline]
  fn absorb_key(&mut self) {
    if self.key_len != 0 {
      self.buf[..KEY_LEN_MAX].copy_from_slice(&self.key);
      self.buf_len = BLOCK_LEN;
    }
  }

  /// Absorb `data`. Any chunking of the same byte stream yields the same digest.
  ///
  /// The buffer always ends up holding the newest 1..=64 bytes (or nothing
  /// when no input has arrived), since the final block must be compressed by
  /// [`finalize`](Self::finalize) with the last-block flag set.
  pub fn update(&mut self, mut data: &[u8]) {
    while !data.is_empty() {
      if self.buf_len == BLOCK_LEN {
        self.compress_buffer();
      }

      if self.buf_len == 0 && data.len() > BLOCK_LEN {
        // Bulk path: everything except the trailing 1..=64 bytes.
        let bulk = (data.len() - 1) / BLOCK_LEN * BLOCK_LEN;
        let (blocks, tail) = data.split_at(bulk);
        (self.compress)(&mut self.h, blocks, &mut self.bytes_hashed, false, 0);
        data = tail;
      }

      let room = BLOCK_LEN - self.buf_len;
      let (head, tail) = data.split_at(data.len().min(room));
      self.buf[self.buf_len..self.buf_len + head.len()].copy_from_slice(head);
      self.buf_len += head.len();
      data = tail;
    }
  }

  /// Compress a full buffer as a non-final block.
  #[inline]
  fn compress_buffer(&mut self) {
    (self.compress)(&mut self.h, &self.buf, &mut self.bytes_hashed, false, 0);
    self.buf_len = 0;
  }

  /// Full 32-byte output of the final compression; callers truncate.
  fn finalize_full(&self) -> [u8; OUT_LEN_MAX] {
    let mut h = self.h;
    let mut buf = self.buf;
    let len = self.buf_len;

    buf[len..].fill(0);
    let mut t = self.bytes_hashed;
    (self.compress)(&mut h, &buf, &mut t, true, len as u32);

    let mut out = [0u8; OUT_LEN_MAX];
    for (chunk, word) in out.chunks_exact_mut(4).zip(h) {
      chunk.copy_from_slice(&word.to_le_bytes());
    }
    out
  }

  /// The digest of everything absorbed so far.
  #[must_use]
  pub fn finalize(&self) -> Blake2sDigest {
    Blake2sDigest {
      bytes: self.finalize_full(),
      len: self.out_len,
    }
  }

  /// Back to the post-construction state (key re-absorbed, same kernel).
  pub fn reset(&mut self) {
    self.h = self.h_init;
    self.buf = [0u8; BLOCK_LEN];
    self.buf_len = 0;
    self.bytes_hashed = 0;
    self.absorb_key();
  }

  /// Total input bytes absorbed, not counting the key block.
  #[inline]
  #[must_use]
  pub fn count(&self) -> u64 {
    let total = self.bytes_hashed.wrapping_add(self.buf_len as u64);
    if self.key_len != 0 { total.wrapping_sub(BLOCK_LEN as u64) } else { total }
  }
}

impl fmt::Debug for Blake2s {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Blake2s")
      .field("digest_length", &self.out_len)
      .field("keyed", &(self.key_len != 0))
      .field("kernel", &self.kernel.as_str())
      .finish_non_exhaustive()
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Presets
// ─────────────────────────────────────────────────────────────────────────────

/// BLAKE2s-256: 32-byte digest, optionally keyed.
#[derive(Clone, Debug)]
pub struct Blake2s256(Blake2s);

impl Blake2s256 {
  /// Keyed BLAKE2s-256 (MAC mode). `key` must be at most 32 bytes.
  ///
  /// # Errors
  ///
  /// Returns [`ParamError::KeyLength`] for keys longer than 32 bytes.
  pub fn new_keyed(key: &[u8]) -> Result<Self, ParamError> {
    Params::new().key(key).to_state().map(Self)
  }

  /// See [`Blake2s::with_kernel`].
  ///
  /// # Errors
  ///
  /// Returns [`KernelUnavailable`] if this CPU lacks the kernel's features.
  pub fn with_kernel(self, kernel: Blake2sKernelId) -> Result<Self, KernelUnavailable> {
    self.0.with_kernel(kernel).map(Self)
  }

  #[inline]
  #[must_use]
  pub fn kernel(&self) -> Blake2sKernelId {
    self.0.kernel()
  }
}

impl Default for Blake2s256 {
  #[inline]
  fn default() -> Self {
    Self(Blake2s::from_valid_params(&Params::new(), dispatch::active_kernel()))
  }
}

impl Digest for Blake2s256 {
  const OUTPUT_SIZE: usize = 32;
  const BLOCK_SIZE: usize = BLOCK_LEN;
  type Output = [u8; 32];

  #[inline]
  fn new() -> Self {
    Self::default()
  }

  #[inline]
  fn update(&mut self, data: &[u8]) {
    self.0.update(data);
  }

  #[inline]
  fn finalize(&self) -> Self::Output {
    self.0.finalize_full()
  }

  #[inline]
  fn reset(&mut self) {
    self.0.reset();
  }
}

/// BLAKE2s-128: 16-byte digest, keyed only.
///
/// A 128-bit BLAKE2s output is too short for collision resistance, so this
/// preset is offered as a keyed MAC-style hash and requires a 1..=32 byte key.
/// The unkeyed 16-byte variant remains reachable through [`Params`].
#[derive(Clone, Debug)]
pub struct Blake2s128(Blake2s);

impl Blake2s128 {
  /// # Errors
  ///
  /// [`ParamError::MissingKey`] for an empty key, [`ParamError::KeyLength`]
  /// for keys longer than 32 bytes.
  pub fn new_keyed(key: &[u8]) -> Result<Self, ParamError> {
    if key.is_empty() {
      return Err(ParamError::MissingKey);
    }
    Params::new().digest_length(16).key(key).to_state().map(Self)
  }

  /// See [`Blake2s::with_kernel`].
  ///
  /// # Errors
  ///
  /// Returns [`KernelUnavailable`] if this CPU lacks the kernel's features.
  pub fn with_kernel(self, kernel: Blake2sKernelId) -> Result<Self, KernelUnavailable> {
    self.0.with_kernel(kernel).map(Self)
  }

  #[inline]
  #[must_use]
  pub fn kernel(&self) -> Blake2sKernelId {
    self.0.kernel()
  }

  #[inline]
  pub fn update(&mut self, data: &[u8]) {
    self.0.update(data);
  }

  #[must_use]
  pub fn finalize(&self) -> [u8; 16] {
    let full = self.0.finalize_full();
    let mut out = [0u8; 16];
    out.copy_from_slice(&full[..16]);
    out
  }

  #[inline]
  pub fn reset(&mut self) {
    self.0.reset();
  }
}

#[cfg(feature = "std")]
pub mod kernel_test;
