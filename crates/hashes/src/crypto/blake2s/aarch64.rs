//! BLAKE2s aarch64 NEON kernel.
//!
//! Same row layout as the x86_64 kernels. Rotations use `vrev32q_u16` for 16
//! bits and shift-right-insert (`vsliq_n_u32`) for 12, 8 and 7 bits; lane
//! rotations for the diagonal step use `vextq_u32`.
//!
//! # Safety
//!
//! `compress_block_neon` requires NEON. The safe wrapper is only reachable
//! through the kernel registry, which checks capabilities first.

#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]
#![allow(clippy::inline_always)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::undocumented_unsafe_blocks)]

use core::arch::aarch64::*;

use super::{
  BLOCK_LEN, IV, SIGMA,
  portable::{counter_words, for_each_block, load_msg},
};

#[inline(always)]
unsafe fn rotr16(v: uint32x4_t) -> uint32x4_t {
  vreinterpretq_u32_u16(vrev32q_u16(vreinterpretq_u16_u32(v)))
}

#[inline(always)]
unsafe fn rotr12(v: uint32x4_t) -> uint32x4_t {
  vsliq_n_u32(vshrq_n_u32(v, 12), v, 20)
}

#[inline(always)]
unsafe fn rotr8(v: uint32x4_t) -> uint32x4_t {
  vsliq_n_u32(vshrq_n_u32(v, 8), v, 24)
}

#[inline(always)]
unsafe fn rotr7(v: uint32x4_t) -> uint32x4_t {
  vsliq_n_u32(vshrq_n_u32(v, 7), v, 25)
}

#[inline(always)]
unsafe fn gather(m: &[u32; 16], i0: usize, i1: usize, i2: usize, i3: usize) -> uint32x4_t {
  let words = [m[i0], m[i1], m[i2], m[i3]];
  vld1q_u32(words.as_ptr())
}

/// # Safety
///
/// Caller must ensure NEON is available.
#[target_feature(enable = "neon")]
unsafe fn compress_block_neon(h: &mut [u32; 8], block: &[u8; BLOCK_LEN], t: u64, last: bool) {
  let m = load_msg(block);
  let (t_lo, t_hi) = counter_words(t);
  let f0 = if last { u32::MAX } else { 0 };
  let tweak = [t_lo, t_hi, f0, 0];

  let h_lo = vld1q_u32(h.as_ptr());
  let h_hi = vld1q_u32(h.as_ptr().add(4));

  let mut a = h_lo;
  let mut b = h_hi;
  let mut c = vld1q_u32(IV.as_ptr());
  let mut d = veorq_u32(vld1q_u32(IV.as_ptr().add(4)), vld1q_u32(tweak.as_ptr()));

  macro_rules! g {
    ($mx:expr, $my:expr) => {{
      a = vaddq_u32(vaddq_u32(a, b), $mx);
      d = rotr16(veorq_u32(d, a));
      c = vaddq_u32(c, d);
      b = rotr12(veorq_u32(b, c));
      a = vaddq_u32(vaddq_u32(a, b), $my);
      d = rotr8(veorq_u32(d, a));
      c = vaddq_u32(c, d);
      b = rotr7(veorq_u32(b, c));
    }};
  }

  for s in &SIGMA {
    g!(gather(&m, s[0], s[2], s[4], s[6]), gather(&m, s[1], s[3], s[5], s[7]));

    b = vextq_u32(b, b, 1);
    c = vextq_u32(c, c, 2);
    d = vextq_u32(d, d, 3);

    g!(gather(&m, s[8], s[10], s[12], s[14]), gather(&m, s[9], s[11], s[13], s[15]));

    b = vextq_u32(b, b, 3);
    c = vextq_u32(c, c, 2);
    d = vextq_u32(d, d, 1);
  }

  vst1q_u32(h.as_mut_ptr(), veorq_u32(h_lo, veorq_u32(a, c)));
  vst1q_u32(h.as_mut_ptr().add(4), veorq_u32(h_hi, veorq_u32(b, d)));
}

pub(crate) fn compress_neon(h: &mut [u32; 8], blocks: &[u8], bytes_hashed: &mut u64, is_last: bool, last_len: u32) {
  for_each_block(blocks, bytes_hashed, is_last, last_len, |block, t, last| {
    // SAFETY: the registry only hands out this kernel when NEON was detected.
    unsafe { compress_block_neon(h, block, t, last) }
  });
}

#[cfg(all(test, not(miri)))]
mod tests {
  use super::{super::portable, *};

  #[test]
  fn neon_matches_portable() {
    if !platform::caps().has(platform::caps::aarch64::NEON) {
      return;
    }
    let mut data = [0u8; 3 * BLOCK_LEN];
    for (i, b) in data.iter_mut().enumerate() {
      *b = (i as u8).wrapping_mul(13);
    }
    for &last_len in &[0u32, 5, 64] {
      let mut h_ref = IV;
      let mut t_ref = u64::from(u32::MAX) - 64;
      portable::compress_blocks(&mut h_ref, &data, &mut t_ref, true, last_len);

      let mut h = IV;
      let mut t = u64::from(u32::MAX) - 64;
      compress_neon(&mut h, &data, &mut t, true, last_len);
      assert_eq!(h, h_ref, "last_len={last_len}");
    }
  }
}
