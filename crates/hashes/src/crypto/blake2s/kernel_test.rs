//! Cross-kernel conformance helpers.
//!
//! Used by integration tests, benches and the fuzz target to run one input
//! through every kernel this CPU supports.

extern crate alloc;

use alloc::vec::Vec;

use super::{Blake2s, Blake2sDigest, Params, dispatch::available_kernels, kernels::Blake2sKernelId};

#[derive(Clone, Debug)]
pub struct KernelResult {
  pub name: &'static str,
  pub digest: Blake2sDigest,
}

/// A hasher for `params` pinned to `id`.
///
/// # Panics
///
/// If `params` is invalid or `id` is not available on this CPU.
#[must_use]
#[allow(clippy::expect_used)]
pub fn hasher_for_kernel(params: &Params, id: Blake2sKernelId) -> Blake2s {
  params
    .to_state()
    .expect("valid params")
    .with_kernel(id)
    .expect("kernel available")
}

/// Hash `data` with `params` on every available kernel.
#[must_use]
pub fn run_all_blake2s_kernels(params: &Params, data: &[u8]) -> Vec<KernelResult> {
  available_kernels()
    .map(|id| {
      let mut h = hasher_for_kernel(params, id);
      h.update(data);
      KernelResult {
        name: id.as_str(),
        digest: h.finalize(),
      }
    })
    .collect()
}

/// # Errors
///
/// Names the first kernel whose digest differs from the best kernel's.
pub fn verify_blake2s_kernels(params: &Params, data: &[u8]) -> Result<(), &'static str> {
  let results = run_all_blake2s_kernels(params, data);
  let Some((first, rest)) = results.split_first() else {
    return Ok(());
  };
  match rest.iter().find(|r| r.digest != first.digest) {
    Some(r) => Err(r.name),
    None => Ok(()),
  }
}

#[cfg(test)]
mod tests {
  use blake2::digest::{Update as _, VariableOutput as _};

  use super::*;

  fn pattern(len: usize) -> Vec<u8> {
    (0..len)
      .map(|i| (i as u8).wrapping_mul(17).wrapping_add((i >> 8) as u8))
      .collect()
  }

  fn oracle(out_len: usize, data: &[u8]) -> Vec<u8> {
    let mut h = blake2::Blake2sVar::new(out_len).unwrap();
    h.update(data);
    let mut out = alloc::vec![0u8; out_len];
    h.finalize_variable(&mut out).unwrap();
    out
  }

  #[test]
  fn all_kernels_match_blake2_oracle_and_streaming_splits() {
    let lens = [0usize, 1, 2, 3, 31, 32, 33, 63, 64, 65, 127, 128, 129, 1000, 10_000];

    for id in available_kernels() {
      for &out_len in &[32usize, 16, 1] {
        let mut params = Params::new();
        params.digest_length(out_len);

        for &len in &lens {
          let msg = pattern(len);
          let mut h = hasher_for_kernel(&params, id);
          h.update(&msg);
          let ours = h.finalize();
          assert_eq!(
            ours.as_bytes(),
            oracle(out_len, &msg).as_slice(),
            "blake2s oracle mismatch kernel={} out_len={out_len} len={len}",
            id.as_str()
          );

          for &chunk in &[1usize, 7, 31, 32, 63, 64, 65, 128, 1024, 4096] {
            let mut h = hasher_for_kernel(&params, id);
            for part in msg.chunks(chunk) {
              h.update(part);
            }
            assert_eq!(
              h.finalize(),
              ours,
              "blake2s streaming mismatch kernel={} len={len} chunk={chunk}",
              id.as_str()
            );
          }
        }
      }
    }
  }

  #[test]
  fn kernels_agree_on_keyed_salted_input() {
    let mut params = Params::new();
    params.key(b"kernel agreement").salt(b"salt").personal(b"pers");
    for len in [0usize, 64, 65, 300] {
      assert_eq!(verify_blake2s_kernels(&params, &pattern(len)), Ok(()));
    }
    assert_eq!(
      run_all_blake2s_kernels(&params, b"").len(),
      available_kernels().count()
    );
  }
}
