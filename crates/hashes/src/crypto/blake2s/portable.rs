//! Portable BLAKE2s compression (scalar `u32` arithmetic).

use super::{BLOCK_LEN, IV, SIGMA};

/// State word indices mixed by each of the eight G steps in a round: four
/// columns, then four diagonals.
const MIX: [[usize; 4]; 8] = [
  [0, 4, 8, 12],
  [1, 5, 9, 13],
  [2, 6, 10, 14],
  [3, 7, 11, 15],
  [0, 5, 10, 15],
  [1, 6, 11, 12],
  [2, 7, 8, 13],
  [3, 4, 9, 14],
];

#[inline(always)]
fn g(v: &mut [u32; 16], [a, b, c, d]: [usize; 4], x: u32, y: u32) {
  v[a] = v[a].wrapping_add(v[b]).wrapping_add(x);
  v[d] = (v[d] ^ v[a]).rotate_right(16);
  v[c] = v[c].wrapping_add(v[d]);
  v[b] = (v[b] ^ v[c]).rotate_right(12);
  v[a] = v[a].wrapping_add(v[b]).wrapping_add(y);
  v[d] = (v[d] ^ v[a]).rotate_right(8);
  v[c] = v[c].wrapping_add(v[d]);
  v[b] = (v[b] ^ v[c]).rotate_right(7);
}

#[inline(always)]
pub(crate) fn load_msg(block: &[u8; BLOCK_LEN]) -> [u32; 16] {
  let mut m = [0u32; 16];
  for (word, chunk) in m.iter_mut().zip(block.chunks_exact(4)) {
    *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
  }
  m
}

/// Split the byte counter into the two words mixed into `v[12]` and `v[13]`.
#[inline(always)]
pub(crate) const fn counter_words(t: u64) -> (u32, u32) {
  (t as u32, (t >> 32) as u32)
}

/// One compression of a single block. `t` is the counter after this block.
#[inline]
pub(crate) fn compress_block(h: &mut [u32; 8], block: &[u8; BLOCK_LEN], t: u64, last: bool) {
  let m = load_msg(block);
  let (t_lo, t_hi) = counter_words(t);

  let mut v = [0u32; 16];
  v[..8].copy_from_slice(h);
  v[8..].copy_from_slice(&IV);
  v[12] ^= t_lo;
  v[13] ^= t_hi;
  if last {
    v[14] = !v[14];
  }

  for s in &SIGMA {
    for (i, &idx) in MIX.iter().enumerate() {
      g(&mut v, idx, m[s[2 * i]], m[s[2 * i + 1]]);
    }
  }

  for i in 0..8 {
    h[i] ^= v[i] ^ v[i + 8];
  }
}

/// Walk `blocks`, advancing the counter and handing each block to `f`.
///
/// Only the final block of the slice carries the `is_last` flag, and its
/// counter increment is `last_block_len` instead of a full block.
#[inline(always)]
pub(crate) fn for_each_block(
  blocks: &[u8],
  bytes_hashed: &mut u64,
  is_last: bool,
  last_block_len: u32,
  mut f: impl FnMut(&[u8; BLOCK_LEN], u64, bool),
) {
  debug_assert_eq!(blocks.len() % BLOCK_LEN, 0);
  let n = blocks.len() / BLOCK_LEN;
  let (chunks, _) = blocks.as_chunks::<BLOCK_LEN>();
  for (i, block) in chunks.iter().enumerate() {
    let last = is_last && i + 1 == n;
    let inc = if last { u64::from(last_block_len) } else { BLOCK_LEN as u64 };
    *bytes_hashed = bytes_hashed.wrapping_add(inc);
    f(block, *bytes_hashed, last);
  }
}

pub(crate) fn compress_blocks(h: &mut [u32; 8], blocks: &[u8], bytes_hashed: &mut u64, is_last: bool, last_len: u32) {
  for_each_block(blocks, bytes_hashed, is_last, last_len, |block, t, last| {
    compress_block(h, block, t, last);
  });
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn counter_carries_into_high_word() {
    assert_eq!(counter_words(u64::from(u32::MAX) + 1), (0, 1));
    assert_eq!(counter_words(64), (64, 0));
  }

  #[test]
  fn final_flag_changes_output() {
    let block = [0u8; BLOCK_LEN];
    let mut a = IV;
    let mut b = IV;
    compress_block(&mut a, &block, 0, false);
    compress_block(&mut b, &block, 0, true);
    assert_ne!(a, b);
  }

  #[test]
  fn multi_block_equals_sequential() {
    let mut data = [0u8; 3 * BLOCK_LEN];
    for (i, b) in data.iter_mut().enumerate() {
      *b = i as u8;
    }

    let mut h_multi = IV;
    let mut t_multi = 0u64;
    compress_blocks(&mut h_multi, &data, &mut t_multi, true, 10);

    let mut h_seq = IV;
    let mut t_seq = 0u64;
    compress_blocks(&mut h_seq, &data[..BLOCK_LEN], &mut t_seq, false, 0);
    compress_blocks(&mut h_seq, &data[BLOCK_LEN..2 * BLOCK_LEN], &mut t_seq, false, 0);
    compress_blocks(&mut h_seq, &data[2 * BLOCK_LEN..], &mut t_seq, true, 10);

    assert_eq!(h_multi, h_seq);
    assert_eq!(t_multi, 2 * BLOCK_LEN as u64 + 10);
    assert_eq!(t_seq, t_multi);
  }
}
