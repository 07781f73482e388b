//! Keyed BLAKE2s known-answer tables.
//!
//! Line `i` of each table is the digest of input bytes `0x00..i` under the key
//! `0x00..=0x1f`.

use hashes::{
  Digest as _,
  crypto::{
    Blake2s128, Blake2s256,
    blake2s::{Blake2sKernelId, dispatch::available_kernels},
  },
};

const KEYED_256: &str = include_str!("../testdata/blake2s/keyed_256.txt");
const KEYED_128: &str = include_str!("../testdata/blake2s/keyed_128.txt");

fn key() -> [u8; 32] {
  core::array::from_fn(|i| i as u8)
}

fn input() -> Vec<u8> {
  (0u8..=254).collect()
}

fn table(text: &str) -> Vec<Vec<u8>> {
  text.lines().map(|line| hex::decode(line.trim()).unwrap()).collect()
}

fn keyed_256(id: Blake2sKernelId) -> Blake2s256 {
  Blake2s256::new_keyed(&key()).unwrap().with_kernel(id).unwrap()
}

fn keyed_128(id: Blake2sKernelId) -> Blake2s128 {
  Blake2s128::new_keyed(&key()).unwrap().with_kernel(id).unwrap()
}

#[test]
fn tables_are_complete() {
  let t256 = table(KEYED_256);
  let t128 = table(KEYED_128);
  assert_eq!(t256.len(), 256);
  assert_eq!(t128.len(), 256);
  assert!(t256.iter().all(|d| d.len() == 32));
  assert!(t128.iter().all(|d| d.len() == 16));
}

#[test]
fn keyed_empty_input() {
  let h = keyed_256(Blake2sKernelId::Portable);
  assert_eq!(
    hex::encode(h.finalize()),
    "48a8997da407876b3d79c0d92325ad3b89cbb754d86ab71aee047ad345fd2c49"
  );
  let h = keyed_128(Blake2sKernelId::Portable);
  assert_eq!(hex::encode(h.finalize()), "9536f9b267655743dee97b8a670f9f53");
}

#[test]
fn blake2s_256_keyed_single_write() {
  let input = input();
  for id in available_kernels() {
    for (i, expected) in table(KEYED_256).iter().enumerate() {
      let mut h = keyed_256(id);
      h.update(&input[..i]);
      assert_eq!(&h.finalize()[..], &expected[..], "blake2s-256 kernel={id} len={i}");
    }
  }
}

#[test]
fn blake2s_256_keyed_byte_by_byte_with_reset() {
  let input = input();
  let expected = table(KEYED_256);
  for id in available_kernels() {
    let mut h = keyed_256(id);
    for (i, want) in expected.iter().enumerate() {
      // Streaming: the digest of the prefix seen so far.
      assert_eq!(&h.finalize()[..], &want[..], "blake2s-256 streaming kernel={id} len={i}");
      if let Some(&b) = input.get(i) {
        h.update(&[b]);
      }
    }

    h.reset();
    h.update(&input[..100]);
    assert_eq!(&h.finalize()[..], &expected[100][..], "blake2s-256 after reset kernel={id}");
  }
}

#[test]
fn blake2s_128_keyed_single_write() {
  let input = input();
  for id in available_kernels() {
    for (i, expected) in table(KEYED_128).iter().enumerate() {
      let mut h = keyed_128(id);
      h.update(&input[..i]);
      assert_eq!(&h.finalize()[..], &expected[..], "blake2s-128 kernel={id} len={i}");
    }
  }
}

#[test]
fn blake2s_128_keyed_byte_by_byte_with_reset() {
  let input = input();
  let expected = table(KEYED_128);
  for id in available_kernels() {
    let mut h = keyed_128(id);
    for (i, want) in expected.iter().enumerate() {
      assert_eq!(&h.finalize()[..], &want[..], "blake2s-128 streaming kernel={id} len={i}");
      if let Some(&b) = input.get(i) {
        h.update(&[b]);
      }
    }

    h.reset();
    h.update(&input[..64]);
    assert_eq!(&h.finalize()[..], &expected[64][..], "blake2s-128 after reset kernel={id}");
  }
}
