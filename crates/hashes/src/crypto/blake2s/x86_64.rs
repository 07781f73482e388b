//! BLAKE2s x86_64 SIMD kernels (SSE2, SSSE3, SSE4.1).
//!
//! The 4x4 state matrix is held as four row vectors. Column steps run
//! directly on the rows; diagonal steps rotate rows 1..3 by one, two and
//! three lanes first and rotate them back afterwards.
//!
//! The tiers differ only in how they rotate and gather message words:
//!
//! | Tier | rot16 / rot8 | rot12 / rot7 | message gather |
//! |------|--------------|--------------|----------------|
//! | SSE2 | `pshuflw`+`pshufhw` / shifts | shifts | `_mm_setr_epi32` |
//! | SSSE3 | `pshufb` | shifts | `_mm_setr_epi32` |
//! | SSE4.1 | `pshufb` | shifts | `pinsrd` |
//!
//! # Safety
//!
//! The `unsafe fn`s here require the CPU feature named in their
//! `target_feature`. The safe `compress_*` wrappers are only reachable through
//! the kernel registry, which checks capabilities first.

#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]
#![allow(clippy::inline_always)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::undocumented_unsafe_blocks)]
#![allow(clippy::cast_possible_wrap)]

use core::arch::x86_64::*;

use super::{
  BLOCK_LEN, IV, SIGMA,
  portable::{counter_words, for_each_block, load_msg},
};

/// `pshufb` mask rotating each u32 lane right by 16.
const ROT16_SHUFFLE: [i8; 16] = [2, 3, 0, 1, 6, 7, 4, 5, 10, 11, 8, 9, 14, 15, 12, 13];

/// `pshufb` mask rotating each u32 lane right by 8.
const ROT8_SHUFFLE: [i8; 16] = [1, 2, 3, 0, 5, 6, 7, 4, 9, 10, 11, 8, 13, 14, 15, 12];

// ─────────────────────────────────────────────────────────────────────────────
// Shared round body
// ─────────────────────────────────────────────────────────────────────────────

/// Expands to the body of a single-block compression.
///
/// `$rot16`/`$rot8` are rotation expressions taking one `__m128i`, `$gather`
/// builds a message vector from four word indices.
macro_rules! compress_body {
  ($h:ident, $m:ident, $t:ident, $last:ident, $rot16:expr, $rot8:expr, $gather:expr) => {{
    let rot16 = $rot16;
    let rot8 = $rot8;
    let gather = $gather;

    let (t_lo, t_hi) = counter_words($t);
    let f0: i32 = if $last { -1 } else { 0 };

    let h_lo = _mm_loadu_si128($h.as_ptr().cast());
    let h_hi = _mm_loadu_si128($h.as_ptr().add(4).cast());

    let mut a = h_lo;
    let mut b = h_hi;
    let mut c = _mm_loadu_si128(IV.as_ptr().cast());
    let mut d = _mm_xor_si128(
      _mm_loadu_si128(IV.as_ptr().add(4).cast()),
      _mm_setr_epi32(t_lo as i32, t_hi as i32, f0, 0),
    );

    macro_rules! g {
      ($mx:expr, $my:expr) => {{
        a = _mm_add_epi32(_mm_add_epi32(a, b), $mx);
        d = rot16(_mm_xor_si128(d, a));
        c = _mm_add_epi32(c, d);
        b = _mm_xor_si128(b, c);
        b = _mm_or_si128(_mm_srli_epi32(b, 12), _mm_slli_epi32(b, 20));
        a = _mm_add_epi32(_mm_add_epi32(a, b), $my);
        d = rot8(_mm_xor_si128(d, a));
        c = _mm_add_epi32(c, d);
        b = _mm_xor_si128(b, c);
        b = _mm_or_si128(_mm_srli_epi32(b, 7), _mm_slli_epi32(b, 25));
      }};
    }

    for s in &SIGMA {
      g!(gather(&$m, s[0], s[2], s[4], s[6]), gather(&$m, s[1], s[3], s[5], s[7]));

      b = _mm_shuffle_epi32(b, 0b00_11_10_01); // rotate left 1
      c = _mm_shuffle_epi32(c, 0b01_00_11_10); // rotate left 2
      d = _mm_shuffle_epi32(d, 0b10_01_00_11); // rotate left 3

      g!(gather(&$m, s[8], s[10], s[12], s[14]), gather(&$m, s[9], s[11], s[13], s[15]));

      b = _mm_shuffle_epi32(b, 0b10_01_00_11);
      c = _mm_shuffle_epi32(c, 0b01_00_11_10);
      d = _mm_shuffle_epi32(d, 0b00_11_10_01);
    }

    _mm_storeu_si128($h.as_mut_ptr().cast(), _mm_xor_si128(h_lo, _mm_xor_si128(a, c)));
    _mm_storeu_si128($h.as_mut_ptr().add(4).cast(), _mm_xor_si128(h_hi, _mm_xor_si128(b, d)));
  }};
}

// ─────────────────────────────────────────────────────────────────────────────
// Rotation and gather helpers
// ─────────────────────────────────────────────────────────────────────────────

#[inline(always)]
unsafe fn rot16_sse2(x: __m128i) -> __m128i {
  _mm_shufflehi_epi16(_mm_shufflelo_epi16(x, 0b10_11_00_01), 0b10_11_00_01)
}

#[inline(always)]
unsafe fn rot8_sse2(x: __m128i) -> __m128i {
  _mm_or_si128(_mm_srli_epi32(x, 8), _mm_slli_epi32(x, 24))
}

#[inline(always)]
unsafe fn gather_setr(m: &[u32; 16], i0: usize, i1: usize, i2: usize, i3: usize) -> __m128i {
  _mm_setr_epi32(m[i0] as i32, m[i1] as i32, m[i2] as i32, m[i3] as i32)
}

#[inline]
#[target_feature(enable = "sse4.1")]
unsafe fn gather_insert(m: &[u32; 16], i0: usize, i1: usize, i2: usize, i3: usize) -> __m128i {
  let v = _mm_cvtsi32_si128(m[i0] as i32);
  let v = _mm_insert_epi32(v, m[i1] as i32, 1);
  let v = _mm_insert_epi32(v, m[i2] as i32, 2);
  _mm_insert_epi32(v, m[i3] as i32, 3)
}

// ─────────────────────────────────────────────────────────────────────────────
// Kernels
// ─────────────────────────────────────────────────────────────────────────────

/// # Safety
///
/// Caller must ensure SSE2 is available.
#[target_feature(enable = "sse2")]
unsafe fn compress_block_sse2(h: &mut [u32; 8], block: &[u8; BLOCK_LEN], t: u64, last: bool) {
  let m = load_msg(block);
  compress_body!(h, m, t, last, |x| rot16_sse2(x), |x| rot8_sse2(x), |m: &[u32; 16], i0, i1, i2, i3| {
    gather_setr(m, i0, i1, i2, i3)
  });
}

/// # Safety
///
/// Caller must ensure SSSE3 is available.
#[target_feature(enable = "ssse3")]
unsafe fn compress_block_ssse3(h: &mut [u32; 8], block: &[u8; BLOCK_LEN], t: u64, last: bool) {
  let m = load_msg(block);
  let r16 = _mm_loadu_si128(ROT16_SHUFFLE.as_ptr().cast());
  let r8 = _mm_loadu_si128(ROT8_SHUFFLE.as_ptr().cast());
  compress_body!(
    h,
    m,
    t,
    last,
    |x| _mm_shuffle_epi8(x, r16),
    |x| _mm_shuffle_epi8(x, r8),
    |m: &[u32; 16], i0, i1, i2, i3| gather_setr(m, i0, i1, i2, i3)
  );
}

/// # Safety
///
/// Caller must ensure SSE4.1 and SSSE3 are available.
#[target_feature(enable = "sse4.1,ssse3")]
unsafe fn compress_block_sse41(h: &mut [u32; 8], block: &[u8; BLOCK_LEN], t: u64, last: bool) {
  let m = load_msg(block);
  let r16 = _mm_loadu_si128(ROT16_SHUFFLE.as_ptr().cast());
  let r8 = _mm_loadu_si128(ROT8_SHUFFLE.as_ptr().cast());
  compress_body!(
    h,
    m,
    t,
    last,
    |x| _mm_shuffle_epi8(x, r16),
    |x| _mm_shuffle_epi8(x, r8),
    |m: &[u32; 16], i0, i1, i2, i3| gather_insert(m, i0, i1, i2, i3)
  );
}

// ─────────────────────────────────────────────────────────────────────────────
// Registry entry points
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) fn compress_sse2(h: &mut [u32; 8], blocks: &[u8], bytes_hashed: &mut u64, is_last: bool, last_len: u32) {
  for_each_block(blocks, bytes_hashed, is_last, last_len, |block, t, last| {
    // SAFETY: SSE2 is part of the x86_64 baseline.
    unsafe { compress_block_sse2(h, block, t, last) }
  });
}

pub(crate) fn compress_ssse3(h: &mut [u32; 8], blocks: &[u8], bytes_hashed: &mut u64, is_last: bool, last_len: u32) {
  for_each_block(blocks, bytes_hashed, is_last, last_len, |block, t, last| {
    // SAFETY: the registry only hands out this kernel when SSSE3 was detected.
    unsafe { compress_block_ssse3(h, block, t, last) }
  });
}

pub(crate) fn compress_sse41(h: &mut [u32; 8], blocks: &[u8], bytes_hashed: &mut u64, is_last: bool, last_len: u32) {
  for_each_block(blocks, bytes_hashed, is_last, last_len, |block, t, last| {
    // SAFETY: the registry only hands out this kernel when SSE4.1 and SSSE3 were detected.
    unsafe { compress_block_sse41(h, block, t, last) }
  });
}
