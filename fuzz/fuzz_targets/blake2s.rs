//! Differential fuzz target for BLAKE2s.
//!
//! Hashes random input with random parameters on every available kernel,
//! feeding it through random split points, and checks against the RustCrypto
//! `blake2` crate.

#![no_main]

use arbitrary::Arbitrary;
use blake2::digest::{FixedOutput as _, Update as _, VariableOutput as _};
use hashes::crypto::{Params, blake2s::dispatch::available_kernels};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
  out_len: u8,
  key: Vec<u8>,
  salt: Vec<u8>,
  personal: Vec<u8>,
  data: Vec<u8>,
  splits: Vec<usize>,
}

fuzz_target!(|input: Input| {
  let out_len = usize::from(input.out_len % 32) + 1;
  let key = &input.key[..input.key.len().min(32)];
  let salt = &input.salt[..input.salt.len().min(8)];
  let personal = &input.personal[..input.personal.len().min(8)];
  let data = &input.data;

  let mut splits: Vec<usize> = input.splits.iter().map(|s| s % (data.len() + 1)).collect();
  splits.sort_unstable();
  splits.dedup();

  let expected = reference(out_len, key, salt, personal, data);

  for id in available_kernels() {
    let mut h = Params::new()
      .digest_length(out_len)
      .key(key)
      .salt(salt)
      .personal(personal)
      .to_state()
      .unwrap()
      .with_kernel(id)
      .unwrap();

    let mut prev = 0;
    for &split in &splits {
      h.update(&data[prev..split]);
      prev = split;
    }
    h.update(&data[prev..]);

    let got = h.finalize();
    assert_eq!(got.as_bytes(), &expected[..], "blake2s mismatch kernel={id}");
  }
});

fn reference(out_len: usize, key: &[u8], salt: &[u8], personal: &[u8], data: &[u8]) -> Vec<u8> {
  if key.is_empty() && salt.is_empty() && personal.is_empty() {
    let mut h = blake2::Blake2sVar::new(out_len).unwrap();
    h.update(data);
    let mut out = vec![0u8; out_len];
    h.finalize_variable(&mut out).unwrap();
    return out;
  }
  if out_len == 32 && !key.is_empty() {
    let mut mac = blake2::Blake2sMac256::new_with_salt_and_personal(key, salt, personal).unwrap();
    mac.update(data);
    return mac.finalize_fixed().to_vec();
  }
  // No oracle for this parameter mix; fall back to kernel agreement against
  // the portable kernel.
  let mut h = Params::new()
    .digest_length(out_len)
    .key(key)
    .salt(salt)
    .personal(personal)
    .to_state()
    .unwrap()
    .with_kernel(hashes::crypto::Blake2sKernelId::Portable)
    .unwrap();
  h.update(data);
  h.finalize().as_bytes().to_vec()
}
