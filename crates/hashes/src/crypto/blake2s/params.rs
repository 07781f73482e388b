//! BLAKE2s parameter block builder.

use core::fmt;

use traits::ParamError;

use super::{Blake2s, IV, KEY_LEN_MAX, OUT_LEN_MAX, PERSONAL_LEN, SALT_LEN};

/// Construction parameters for [`Blake2s`].
///
/// Setters record what they are given; nothing is checked until
/// [`Params::to_state`], which rejects out-of-range lengths instead of
/// clamping them.
///
/// ```
/// use hashes::crypto::blake2s::Params;
///
/// let mut params = Params::new();
/// params.digest_length(16).salt(b"saltsalt").personal(b"myapp");
/// let h = params.to_state()?;
/// assert_eq!(h.digest_length(), 16);
/// # Ok::<(), hashes::ParamError>(())
/// ```
#[derive(Clone)]
pub struct Params {
  out_len: usize,
  key: [u8; KEY_LEN_MAX],
  key_len: usize,
  salt: [u8; SALT_LEN],
  salt_len: usize,
  personal: [u8; PERSONAL_LEN],
  personal_len: usize,
}

impl Params {
  /// Unkeyed, 32-byte digest, no salt or personalization.
  #[must_use]
  pub const fn new() -> Self {
    Self {
      out_len: OUT_LEN_MAX,
      key: [0u8; KEY_LEN_MAX],
      key_len: 0,
      salt: [0u8; SALT_LEN],
      salt_len: 0,
      personal: [0u8; PERSONAL_LEN],
      personal_len: 0,
    }
  }

  /// Digest length in bytes, 1..=32.
  pub fn digest_length(&mut self, len: usize) -> &mut Self {
    self.out_len = len;
    self
  }

  /// Secret key, at most 32 bytes. An empty key means unkeyed.
  pub fn key(&mut self, key: &[u8]) -> &mut Self {
    self.key = [0u8; KEY_LEN_MAX];
    self.key_len = key.len();
    let n = key.len().min(KEY_LEN_MAX);
    self.key[..n].copy_from_slice(&key[..n]);
    self
  }

  /// Salt, at most 8 bytes; shorter values are zero padded.
  pub fn salt(&mut self, salt: &[u8]) -> &mut Self {
    self.salt = [0u8; SALT_LEN];
    self.salt_len = salt.len();
    let n = salt.len().min(SALT_LEN);
    self.salt[..n].copy_from_slice(&salt[..n]);
    self
  }

  /// Personalization, at most 8 bytes; shorter values are zero padded.
  pub fn personal(&mut self, personal: &[u8]) -> &mut Self {
    self.personal = [0u8; PERSONAL_LEN];
    self.personal_len = personal.len();
    let n = personal.len().min(PERSONAL_LEN);
    self.personal[..n].copy_from_slice(&personal[..n]);
    self
  }

  /// Check every length.
  ///
  /// # Errors
  ///
  /// The first out-of-range length, in the order digest, key, salt,
  /// personalization.
  pub fn validate(&self) -> Result<(), ParamError> {
    if self.out_len == 0 || self.out_len > OUT_LEN_MAX {
      return Err(ParamError::DigestLength {
        len: self.out_len,
        max: OUT_LEN_MAX,
      });
    }
    if self.key_len > KEY_LEN_MAX {
      return Err(ParamError::KeyLength {
        len: self.key_len,
        max: KEY_LEN_MAX,
      });
    }
    if self.salt_len > SALT_LEN {
      return Err(ParamError::SaltLength {
        len: self.salt_len,
        max: SALT_LEN,
      });
    }
    if self.personal_len > PERSONAL_LEN {
      return Err(ParamError::PersonalLength {
        len: self.personal_len,
        max: PERSONAL_LEN,
      });
    }
    Ok(())
  }

  /// Build a hasher from these parameters.
  ///
  /// # Errors
  ///
  /// See [`Params::validate`].
  pub fn to_state(&self) -> Result<Blake2s, ParamError> {
    Blake2s::new(self)
  }

  #[inline]
  pub(super) fn out_len(&self) -> usize {
    self.out_len
  }

  /// Only meaningful after `validate`.
  #[inline]
  pub(super) fn key_bytes(&self) -> &[u8] {
    &self.key[..self.key_len.min(KEY_LEN_MAX)]
  }

  /// IV xor the parameter block. Only meaningful after `validate`.
  pub(super) fn chaining_value(&self) -> [u32; 8] {
    let word = |b: &[u8], i: usize| u32::from_le_bytes([b[i], b[i + 1], b[i + 2], b[i + 3]]);

    let mut h = IV;
    // digest length | key length | fanout = 1 | depth = 1
    h[0] ^= (self.out_len as u32) | ((self.key_len as u32) << 8) | (1 << 16) | (1 << 24);
    // words 1..=3 (leaf length, node offset, node depth, inner length) are zero
    h[4] ^= word(&self.salt, 0);
    h[5] ^= word(&self.salt, 4);
    h[6] ^= word(&self.personal, 0);
    h[7] ^= word(&self.personal, 4);
    h
  }
}

impl Default for Params {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Debug for Params {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Params")
      .field("digest_length", &self.out_len)
      .field("key_length", &self.key_len)
      .field("salt", &&self.salt[..self.salt_len.min(SALT_LEN)])
      .field("personal", &&self.personal[..self.personal_len.min(PERSONAL_LEN)])
      .finish()
  }
}

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::format;

  use super::*;

  #[test]
  fn default_parameter_word() {
    let h = Params::new().chaining_value();
    assert_eq!(h[0], IV[0] ^ 0x0101_0020);
    assert_eq!(&h[1..], &IV[1..]);
  }

  #[test]
  fn key_length_lands_in_second_byte() {
    let h = Params::new().digest_length(16).key(&[7u8; 32]).chaining_value();
    assert_eq!(h[0], IV[0] ^ 0x0101_2010);
  }

  #[test]
  fn salt_and_personal_are_little_endian_words() {
    let h = Params::new()
      .salt(&[1, 0, 0, 0, 2, 0, 0, 0])
      .personal(&[3, 0, 0, 0])
      .chaining_value();
    assert_eq!(h[4], IV[4] ^ 1);
    assert_eq!(h[5], IV[5] ^ 2);
    assert_eq!(h[6], IV[6] ^ 3);
    assert_eq!(h[7], IV[7]);
  }

  #[test]
  fn validate_bounds() {
    assert_eq!(
      Params::new().digest_length(0).validate(),
      Err(ParamError::DigestLength { len: 0, max: 32 })
    );
    assert_eq!(
      Params::new().digest_length(33).validate(),
      Err(ParamError::DigestLength { len: 33, max: 32 })
    );
    assert!(Params::new().digest_length(1).validate().is_ok());
    assert_eq!(
      Params::new().key(&[0u8; 33]).validate(),
      Err(ParamError::KeyLength { len: 33, max: 32 })
    );
    assert_eq!(
      Params::new().salt(&[0u8; 9]).validate(),
      Err(ParamError::SaltLength { len: 9, max: 8 })
    );
    assert_eq!(
      Params::new().personal(&[0u8; 9]).validate(),
      Err(ParamError::PersonalLength { len: 9, max: 8 })
    );
  }

  #[test]
  fn setting_key_again_replaces_it() {
    let mut p = Params::new();
    p.key(&[0xFF; 32]).key(b"ab");
    assert_eq!(p.key_bytes(), b"ab");
  }

  #[test]
  fn debug_omits_key_bytes() {
    let dbg = format!("{:?}", Params::new().key(b"hunter2"));
    assert!(dbg.contains("key_length: 7"));
    assert!(!dbg.contains("104")); // 'h'
  }
}
